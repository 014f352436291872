//! Bot policy
//!
//! Purely reactive: every tick's decision is a function of the current ball
//! and bot state. The only timer (kickoff delay) lives on the vehicle and is
//! counted down by the match director before the policy is consulted.

use glam::Vec3;

use super::arena::Arena;
use super::input::{ControlIntent, ControlSource, WorldView};
use super::state::{Ball, Vehicle};
use crate::heading_error;
use crate::tuning::{BotTuning, Tuning};

/// Situational behaviour, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    /// Ball heading for our goal on our half
    CriticalDefense,
    /// Ball deep in the opponent half; line up a shot
    Attack,
    /// Ball on our half; get goal-side of it
    Defend,
    /// Contest the ball and redirect it toward the opponent goal
    Midfield,
}

impl BotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotMode::CriticalDefense => "critical-defense",
            BotMode::Attack => "attack",
            BotMode::Defend => "defend",
            BotMode::Midfield => "midfield",
        }
    }
}

/// Everything the policy worked out this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotDecision {
    pub mode: BotMode,
    /// Where the bot is driving to (clamped in bounds)
    pub target: Vec3,
    pub urgency: f32,
    /// Signed angle from the bot's heading to the target (positive = left)
    pub heading_error: f32,
    pub intent: ControlIntent,
}

/// The bot driver
#[derive(Debug, Clone, Copy, Default)]
pub struct BotPolicy;

impl BotPolicy {
    pub fn decide(&self, vehicle: &Vehicle, world: &WorldView<'_>) -> BotDecision {
        let tuning = world.tuning;
        let bot = &tuning.bot;
        let ball = world.ball;
        let pos = vehicle.body.pos;

        let predicted = predict_ball(ball, pos, bot);
        let (mode, target, urgency) = select_target(vehicle, ball, predicted, world.arena, bot);
        let target = clamp_target(target, world.arena, bot).with_y(pos.y);

        let to_target = target - pos;
        let error = heading_error(vehicle.forward(), to_target);
        let distance_to_target = to_target.with_y(0.0).length();

        let mut intent = ControlIntent {
            steer: steer_toward(error, vehicle, tuning),
            ..Default::default()
        };

        if vehicle.grounded {
            let abs_error = error.abs();
            intent.throttle = if distance_to_target <= bot.arrive_distance {
                0.0
            } else if abs_error < bot.forward_cone {
                (bot.base_throttle * urgency).min(1.0)
            } else if abs_error > bot.reverse_cone {
                -bot.reverse_throttle
            } else {
                0.0
            };

            let eager = distance_to_target > bot.boost_distance || urgency >= bot.boost_urgency;
            intent.boost = eager
                && intent.throttle > 0.0
                && vehicle.boost > bot.boost_floor
                && abs_error < bot.boost_max_error;

            intent.jump_pressed = vehicle.can_jump && wants_jump(ball, pos, bot);
        }
        // Hold for the full jump; the controller bounds the duration
        intent.jump_held = vehicle.is_jumping || intent.jump_pressed;

        BotDecision {
            mode,
            target,
            urgency,
            heading_error: error,
            intent,
        }
    }
}

impl ControlSource for BotPolicy {
    fn intent(&mut self, vehicle: &Vehicle, world: &WorldView<'_>) -> ControlIntent {
        self.decide(vehicle, world).intent
    }
}

/// Ball position a short horizon ahead, never below resting height.
///
/// The horizon grows with distance (farther ball, more lead) up to a cap.
pub fn predict_ball(ball: &Ball, from: Vec3, bot: &BotTuning) -> Vec3 {
    let distance = ball.body.pos.distance(from);
    let horizon = (distance / bot.prediction_divisor).min(bot.prediction_cap);
    let mut predicted = ball.body.pos + ball.body.vel * horizon;
    predicted.y = predicted.y.max(ball.radius);
    predicted
}

/// Pick a mode and its raw target
pub fn select_target(
    vehicle: &Vehicle,
    ball: &Ball,
    predicted: Vec3,
    arena: &Arena,
    bot: &BotTuning,
) -> (BotMode, Vec3, f32) {
    let side = vehicle.team.side();
    let hl = arena.half_length();
    let ball_pos = ball.body.pos;

    // Positive when on our half / moving toward our goal
    let depth_own = ball_pos.z * side;
    let speed_toward_own = ball.body.vel.z * side;

    if speed_toward_own > bot.critical_speed && depth_own > 0.0 {
        let mut target = predicted;
        let limit = hl - bot.critical_standoff;
        target.z = side * (target.z * side).min(limit);
        return (BotMode::CriticalDefense, target, bot.urgency_critical);
    }

    if depth_own < -arena.length * bot.attack_depth_fraction {
        let mut target = ball_pos + Vec3::new(0.0, 0.0, side * bot.attack_offset);
        target.x *= bot.attack_lateral_pull;
        return (BotMode::Attack, target, bot.urgency_attack);
    }

    if depth_own > 0.0 {
        let own_goal = Vec3::new(0.0, ball_pos.y, vehicle.team.own_goal_z(arena));
        let goal_side = (own_goal - ball_pos).normalize_or(Vec3::Z * side);
        let target = ball_pos + goal_side * bot.defend_offset;
        return (BotMode::Defend, target, bot.urgency_defend);
    }

    // Approach from the far side of the opponent-goal -> ball line
    let opponent_goal = Vec3::new(0.0, predicted.y, -side * hl);
    let behind = (predicted - opponent_goal).normalize_or(Vec3::Z * side);
    let target = predicted + behind * bot.shot_offset;
    (BotMode::Midfield, target, bot.urgency_midfield)
}

/// Keep the target inside the field, away from the walls
pub fn clamp_target(target: Vec3, arena: &Arena, bot: &BotTuning) -> Vec3 {
    let max_x = (arena.half_width() - bot.margin_x).max(0.0);
    let max_z = (arena.half_length() - bot.margin_z).max(0.0);
    Vec3::new(
        target.x.clamp(-max_x, max_x),
        target.y,
        target.z.clamp(-max_z, max_z),
    )
}

/// Steering that closes at most one tick's worth of turn on the error
fn steer_toward(error: f32, vehicle: &Vehicle, tuning: &Tuning) -> f32 {
    let max_step = tuning.vehicle.turn_rate * vehicle.handicap.turn_scale;
    if max_step <= 0.0 {
        return 0.0;
    }
    (error / max_step).clamp(-1.0, 1.0)
}

/// Ball airborne and within striking distance
fn wants_jump(ball: &Ball, from: Vec3, bot: &BotTuning) -> bool {
    let airborne = ball.body.pos.y > ball.radius + bot.jump_min_height;
    let distance = ball.body.pos.distance(from);
    airborne && (bot.jump_min_distance..=bot.jump_max_distance).contains(&distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Handicap, Team};

    struct Fixture {
        arena: Arena,
        tuning: Tuning,
        ball: Ball,
        bot: Vehicle,
    }

    impl Fixture {
        fn new() -> Self {
            let tuning = Tuning::default();
            let handicap = Handicap {
                accel_scale: tuning.bot.accel_scale,
                max_speed_scale: tuning.bot.max_speed_scale,
                turn_scale: tuning.bot.turn_scale,
                min_turn_factor: 1.0,
            };
            let mut bot = Vehicle::new(Team::Orange, handicap, &tuning.vehicle);
            // Own goal at +Z, facing the opponent goal
            bot.body.pos = Vec3::new(0.0, tuning.vehicle.ground_height, 100.0);
            bot.yaw = 0.0;
            Self {
                arena: Arena::default(),
                ball: Ball::new(tuning.ball.radius),
                tuning,
                bot,
            }
        }

        fn ball(mut self, pos: Vec3, vel: Vec3) -> Self {
            self.ball.body.pos = pos;
            self.ball.body.vel = vel;
            self
        }

        fn decide(&self) -> BotDecision {
            let world = WorldView {
                ball: &self.ball,
                arena: &self.arena,
                tuning: &self.tuning,
            };
            BotPolicy.decide(&self.bot, &world)
        }
    }

    #[test]
    fn test_prediction_horizon_is_capped() {
        let bot = BotTuning::default();
        let mut ball = Ball::new(5.5);
        ball.body.pos = Vec3::new(0.0, 10.0, 0.0);
        ball.body.vel = Vec3::new(1.0, -2.0, 0.0);

        // 20 away: horizon 5
        let near = predict_ball(&ball, Vec3::new(0.0, 10.0, 20.0), &bot);
        assert!((near.x - 5.0).abs() < 1e-4);
        // 200 away: horizon capped at 15, height floored at the radius
        let far = predict_ball(&ball, Vec3::new(0.0, 10.0, 200.0), &bot);
        assert!((far.x - 15.0).abs() < 1e-4);
        assert_eq!(far.y, ball.radius);
    }

    #[test]
    fn test_critical_defense_when_ball_races_at_own_goal() {
        let f = Fixture::new().ball(Vec3::new(0.0, 6.0, 60.0), Vec3::new(0.0, 0.0, 2.5));
        let d = f.decide();
        assert_eq!(d.mode, BotMode::CriticalDefense);
        assert_eq!(d.urgency, f.tuning.bot.urgency_critical);
        // Never deeper than the standoff line
        assert!(d.target.z <= f.arena.half_length() - f.tuning.bot.critical_standoff);
    }

    #[test]
    fn test_attack_lines_up_behind_ball_toward_centre() {
        let f = Fixture::new().ball(Vec3::new(40.0, 6.0, -120.0), Vec3::ZERO);
        let d = f.decide();
        assert_eq!(d.mode, BotMode::Attack);
        // Behind the ball from the bot's side, pulled toward the middle
        assert!(d.target.z > -120.0);
        assert!((d.target.x - 28.0).abs() < 1e-4);
    }

    #[test]
    fn test_defend_gets_goal_side() {
        let f = Fixture::new().ball(Vec3::new(0.0, 6.0, 50.0), Vec3::ZERO);
        let d = f.decide();
        assert_eq!(d.mode, BotMode::Defend);
        assert!((d.target.z - 65.0).abs() < 1e-3);
    }

    #[test]
    fn test_midfield_approaches_from_behind_the_shot_line() {
        let f = Fixture::new().ball(Vec3::new(0.0, 6.0, -30.0), Vec3::ZERO);
        let d = f.decide();
        assert_eq!(d.mode, BotMode::Midfield);
        assert!((d.target.z - (-22.0)).abs() < 1e-3);
        assert!(d.target.x.abs() < 1e-3);
    }

    #[test]
    fn test_target_stays_in_bounds() {
        let f = Fixture::new().ball(Vec3::new(99.0, 6.0, -169.0), Vec3::new(3.0, 0.0, -3.0));
        let d = f.decide();
        assert!(d.target.x.abs() <= f.arena.half_width() - f.tuning.bot.margin_x);
        assert!(d.target.z.abs() <= f.arena.half_length() - f.tuning.bot.margin_z);
    }

    #[test]
    fn test_aligned_bot_drives_and_boosts_toward_far_target() {
        let f = Fixture::new().ball(Vec3::new(0.0, 6.0, -60.0), Vec3::ZERO);
        let d = f.decide();
        assert!(d.heading_error.abs() < 1e-3);
        assert!(d.intent.throttle > 0.0);
        assert!(d.intent.boost);
        assert!(d.intent.steer.abs() < 1e-3);
    }

    #[test]
    fn test_no_boost_when_meter_is_low() {
        let mut f = Fixture::new().ball(Vec3::new(0.0, 6.0, -60.0), Vec3::ZERO);
        f.bot.boost = f.tuning.bot.boost_floor;
        assert!(!f.decide().intent.boost);
    }

    #[test]
    fn test_sideways_target_turns_without_throttle() {
        let mut f = Fixture::new().ball(Vec3::new(0.0, 6.0, -30.0), Vec3::ZERO);
        // Target straight off to +X while facing -Z: 90° to the right
        f.bot.body.pos = Vec3::new(-40.0, f.tuning.vehicle.ground_height, -22.0);
        f.bot.yaw = 0.0;
        let d = f.decide();
        assert!(d.heading_error < 0.0);
        assert!(d.heading_error.abs() > f.tuning.bot.forward_cone);
        assert!(d.heading_error.abs() < f.tuning.bot.reverse_cone);
        assert_eq!(d.intent.throttle, 0.0);
        assert!(!d.intent.boost);
        assert_eq!(d.intent.steer, -1.0);
    }

    #[test]
    fn test_target_behind_reverses() {
        let mut f = Fixture::new().ball(Vec3::new(0.0, 6.0, 50.0), Vec3::ZERO);
        // Bot past the ball facing away from it
        f.bot.body.pos.z = 0.0;
        f.bot.yaw = 0.0;
        let d = f.decide();
        assert!(d.heading_error.abs() > f.tuning.bot.reverse_cone);
        assert_eq!(d.intent.throttle, -f.tuning.bot.reverse_throttle);
    }

    #[test]
    fn test_steering_is_bounded_and_signed() {
        let mut f = Fixture::new().ball(Vec3::new(0.0, 6.0, -60.0), Vec3::ZERO);
        // Small error to the right
        f.bot.yaw = 0.02;
        let d = f.decide();
        assert!(d.heading_error < 0.0);
        assert!(d.intent.steer < 0.0 && d.intent.steer > -1.0);
        // Closing exactly the error in one tick
        let step = f.tuning.vehicle.turn_rate * f.tuning.bot.turn_scale;
        assert!((d.intent.steer * step - d.heading_error).abs() < 1e-4);
    }

    #[test]
    fn test_jumps_at_airborne_ball_in_range() {
        let f = Fixture::new().ball(Vec3::new(0.0, 18.0, 80.0), Vec3::ZERO);
        let d = f.decide();
        assert!(d.intent.jump_pressed);
        assert!(d.intent.jump_held);

        // Same ball on the ground: no jump
        let f = Fixture::new().ball(Vec3::new(0.0, 6.0, 80.0), Vec3::ZERO);
        assert!(!f.decide().intent.jump_pressed);

        // Airborne but far away: no jump
        let f = Fixture::new().ball(Vec3::new(0.0, 18.0, 0.0), Vec3::ZERO);
        assert!(!f.decide().intent.jump_pressed);
    }

    #[test]
    fn test_keeps_holding_active_jump() {
        let mut f = Fixture::new().ball(Vec3::new(0.0, 6.0, -60.0), Vec3::ZERO);
        f.bot.grounded = false;
        f.bot.is_jumping = true;
        let d = f.decide();
        assert!(d.intent.jump_held);
        assert!(!d.intent.jump_pressed);
        assert!(!d.intent.boost);
        assert_eq!(d.intent.throttle, 0.0);
    }
}
