//! Game state and core simulation types
//!
//! Everything the match director owns lives here; components receive the
//! pieces they need as explicit arguments.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::BotMode;
use super::arena::Arena;
use super::goal::GoalDetector;
use super::replay::{ReplayBuffer, VehiclePose};
use crate::consts::*;
use crate::tuning::{Tuning, VehicleTuning};
use crate::{forward_from_yaw, yaw_toward};

/// Team identity. Blue is the human, Orange the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Orange,
}

impl Team {
    /// Sign of the end this team concedes at: -1 for Blue (goal at -Z),
    /// +1 for Orange (goal at +Z)
    #[inline]
    pub fn side(self) -> f32 {
        match self {
            Team::Blue => -1.0,
            Team::Orange => 1.0,
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Orange,
            Team::Orange => Team::Blue,
        }
    }

    /// Z of the end wall this team defends
    #[inline]
    pub fn own_goal_z(self, arena: &Arena) -> f32 {
        self.side() * arena.half_length()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Blue => "Blue",
            Team::Orange => "Orange",
        }
    }
}

/// Position and velocity; velocity is in units per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub pos: Vec3,
    pub vel: Vec3,
}

impl RigidBody {
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.vel.x, self.vel.z).length()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Per-vehicle class scaling applied on top of the shared vehicle tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handicap {
    pub accel_scale: f32,
    pub max_speed_scale: f32,
    pub turn_scale: f32,
    /// Floor on the low-speed steering factor (1.0 = full authority at rest)
    pub min_turn_factor: f32,
}

impl Handicap {
    /// Human vehicle: unscaled, no steering at rest
    pub const FULL: Handicap = Handicap {
        accel_scale: 1.0,
        max_speed_scale: 1.0,
        turn_scale: 1.0,
        min_turn_factor: 0.0,
    };
}

impl Default for Handicap {
    fn default() -> Self {
        Self::FULL
    }
}

/// A car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub team: Team,
    pub body: RigidBody,
    /// Heading (radians); see `forward_from_yaw`
    pub yaw: f32,
    /// Residual tilt, damped back to zero on the ground
    pub roll: f32,
    pub pitch: f32,
    /// Boost meter, always within [0, boost_max]
    pub boost: f32,
    pub grounded: bool,
    /// One ground jump per landing
    pub can_jump: bool,
    /// Armed by the ground jump, consumed by the double jump
    pub can_double_jump: bool,
    /// Jump force is still being added while held
    pub is_jumping: bool,
    /// Ticks the current jump has been held
    pub jump_timer: u32,
    /// Ticks left before the bot starts deciding (always 0 for the human)
    pub kickoff_delay: u32,
    pub handicap: Handicap,
    /// Wheel rotation for rendering
    #[serde(default)]
    pub wheel_spin: f32,
}

impl Vehicle {
    pub fn new(team: Team, handicap: Handicap, tuning: &VehicleTuning) -> Self {
        Self {
            team,
            body: RigidBody {
                pos: Vec3::new(0.0, tuning.ground_height, 0.0),
                vel: Vec3::ZERO,
            },
            yaw: 0.0,
            roll: 0.0,
            pitch: 0.0,
            boost: tuning.boost_max,
            grounded: true,
            can_jump: true,
            can_double_jump: false,
            is_jumping: false,
            jump_timer: 0,
            kickoff_delay: 0,
            handicap,
            wheel_spin: 0.0,
        }
    }

    /// Place the vehicle at a kickoff spot, at rest, with a full meter
    pub fn spawn(&mut self, pos: Vec3, yaw: f32, tuning: &VehicleTuning) {
        self.body = RigidBody { pos, vel: Vec3::ZERO };
        self.yaw = yaw;
        self.roll = 0.0;
        self.pitch = 0.0;
        self.boost = tuning.boost_max;
        self.grounded = true;
        self.can_jump = true;
        self.can_double_jump = false;
        self.is_jumping = false;
        self.jump_timer = 0;
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn pose(&self) -> VehiclePose {
        VehiclePose {
            pos: self.body.pos,
            yaw: self.yaw,
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: RigidBody,
    pub radius: f32,
    /// Rolling rotation for rendering (about X and Z)
    #[serde(default)]
    pub spin: Vec2,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        let mut ball = Self {
            body: RigidBody::default(),
            radius,
            spin: Vec2::ZERO,
        };
        ball.reset();
        ball
    }

    /// Back to centre field, slightly above resting height, at rest
    pub fn reset(&mut self) {
        self.body = RigidBody {
            pos: Vec3::new(0.0, self.radius + BALL_KICKOFF_LIFT, 0.0),
            vel: Vec3::ZERO,
        };
    }
}

/// Match flow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Clock and physics running
    Running,
    /// Paused by the player
    Paused,
    /// Frozen after a goal while the replay plays
    GoalPause { ticks_remaining: u32, scorer: Team },
    /// Kickoff reset happens on the next tick
    Resetting,
    /// Clock expired; only a restart leaves this phase
    Ended { winner: Option<Team> },
}

impl MatchPhase {
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, MatchPhase::Running)
    }
}

/// Outcome from the human's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

/// Score, clock and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub blue_score: u32,
    pub orange_score: u32,
    /// Seconds remaining, never negative
    pub clock: f32,
    pub phase: MatchPhase,
}

impl MatchState {
    pub fn new(duration: f32) -> Self {
        Self {
            blue_score: 0,
            orange_score: 0,
            clock: duration,
            phase: MatchPhase::Running,
        }
    }

    pub fn score(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue_score,
            Team::Orange => self.orange_score,
        }
    }

    pub fn add_goal(&mut self, team: Team) {
        match team {
            Team::Blue => self.blue_score += 1,
            Team::Orange => self.orange_score += 1,
        }
    }

    /// Leading team, or None when level
    pub fn leader(&self) -> Option<Team> {
        use std::cmp::Ordering;
        match self.blue_score.cmp(&self.orange_score) {
            Ordering::Greater => Some(Team::Blue),
            Ordering::Less => Some(Team::Orange),
            Ordering::Equal => None,
        }
    }

    pub fn result(&self) -> MatchResult {
        match self.leader() {
            Some(Team::Blue) => MatchResult::Win,
            Some(Team::Orange) => MatchResult::Loss,
            None => MatchResult::Draw,
        }
    }
}

/// Fire-and-forget notifications for audio/visual/UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A vehicle burned boost this tick
    Boost { team: Team },
    /// A vehicle touched the ball
    Hit { team: Team, pos: Vec3 },
    Jump { team: Team, double: bool },
    GoalScored { team: Team },
    MatchEnded { winner: Option<Team> },
    /// Vehicles and ball repositioned for kickoff
    KickoffReset,
}

/// Read-only HUD data for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    /// Human boost meter, 0-100
    pub boost_percent: f32,
    pub clock_remaining: f32,
    pub blue_score: u32,
    pub orange_score: u32,
    pub phase: MatchPhase,
}

impl HudSnapshot {
    /// Clock as `m:ss`, seconds rounded down
    pub fn clock_text(&self) -> String {
        format_clock(self.clock_remaining)
    }
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next draw; advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete match state (deterministic for a given seed and inputs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub rng_state: RngState,
    pub arena: Arena,
    pub tuning: Tuning,
    /// Human at `HUMAN_SLOT`, bot at `BOT_SLOT`
    pub vehicles: [Vehicle; 2],
    pub ball: Ball,
    #[serde(rename = "match")]
    pub match_state: MatchState,
    pub goal_detector: GoalDetector,
    pub replay: ReplayBuffer,
    /// Replay frame shown during the goal pause
    pub replay_playhead: usize,
    /// Running ticks simulated since the match started
    pub time_ticks: u64,
    /// Last bot mode, for change logging only
    #[serde(skip)]
    pub bot_mode: Option<BotMode>,
    /// Pending notifications, drained by the host every frame. Past
    /// `MAX_PENDING_EVENTS` the oldest are dropped.
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a match on `arena`, ready to run from kickoff
    pub fn new(arena: Arena, tuning: Tuning, seed: u64) -> Self {
        let bot_handicap = Handicap {
            accel_scale: tuning.bot.accel_scale,
            max_speed_scale: tuning.bot.max_speed_scale,
            turn_scale: tuning.bot.turn_scale,
            min_turn_factor: 1.0,
        };
        let vehicles = [
            Vehicle::new(Team::Blue, Handicap::FULL, &tuning.vehicle),
            Vehicle::new(Team::Orange, bot_handicap, &tuning.vehicle),
        ];
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            ball: Ball::new(tuning.ball.radius),
            match_state: MatchState::new(tuning.match_.duration),
            goal_detector: GoalDetector::new(),
            replay: ReplayBuffer::new(tuning.match_.replay_capacity),
            replay_playhead: 0,
            time_ticks: 0,
            bot_mode: None,
            events: Vec::new(),
            vehicles,
            arena,
            tuning,
        };

        state.reset_kickoff();
        log::info!(
            "Match started on {} (seed {}, {}s)",
            state.arena.style.as_str(),
            seed,
            state.tuning.match_.duration
        );
        state
    }

    #[inline]
    pub fn human(&self) -> &Vehicle {
        &self.vehicles[HUMAN_SLOT]
    }

    #[inline]
    pub fn bot(&self) -> &Vehicle {
        &self.vehicles[BOT_SLOT]
    }

    /// Reposition everything for a kickoff.
    ///
    /// Spawns are diagonally opposite, each vehicle in front of the goal it
    /// attacks; which lateral side the human starts on is drawn from the
    /// match RNG.
    pub fn reset_kickoff(&mut self) {
        let mut rng = self.rng_state.next_rng();
        let lateral = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        let vt = &self.tuning.vehicle;
        let depth = self.arena.half_length() - self.tuning.match_.kickoff_depth;
        let offset = self.tuning.match_.kickoff_offset * lateral;
        let centre = Vec3::new(0.0, vt.ground_height, 0.0);

        for vehicle in &mut self.vehicles {
            let x = if vehicle.team == Team::Blue { offset } else { -offset };
            let pos = Vec3::new(x, vt.ground_height, -depth * vehicle.team.side());
            vehicle.spawn(pos, yaw_toward(pos, centre), vt);
            vehicle.kickoff_delay = 0;
        }
        self.vehicles[BOT_SLOT].kickoff_delay = self.tuning.bot.kickoff_delay_ticks;

        self.ball.reset();
        self.goal_detector.rearm();
        self.replay.clear();
        self.replay_playhead = 0;
        self.bot_mode = None;
        self.events.push(GameEvent::KickoffReset);
    }

    /// Fresh score and clock, back to kickoff
    pub fn restart(&mut self) {
        self.match_state = MatchState::new(self.tuning.match_.duration);
        self.time_ticks = 0;
        self.reset_kickoff();
        log::info!("Match restarted");
    }

    pub fn hud(&self) -> HudSnapshot {
        let human = self.human();
        HudSnapshot {
            boost_percent: human.boost / self.tuning.vehicle.boost_max * 100.0,
            clock_remaining: self.match_state.clock,
            blue_score: self.match_state.blue_score,
            orange_score: self.match_state.orange_score,
            phase: self.match_state.phase,
        }
    }

    /// Replay frame for the presentation layer while the goal pause runs
    pub fn replay_frame(&self) -> Option<&super::replay::ReplayFrame> {
        match self.match_state.phase {
            MatchPhase::GoalPause { .. } => self.replay.get(self.replay_playhead),
            _ => None,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop the oldest events beyond the pending limit
    pub(crate) fn cap_events(&mut self) {
        let excess = self.events.len().saturating_sub(MAX_PENDING_EVENTS);
        if excess > 0 {
            self.events.drain(..excess);
            log::debug!("Event queue full, dropped {excess} undrained events");
        }
    }
}
