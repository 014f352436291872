//! Data-driven game balance
//!
//! All physics numbers are per-tick (one tick per rendered frame). Defaults
//! reproduce the feel of the stock game; any subset can be overridden from
//! JSON since every group is `#[serde(default)]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Vehicle handling shared by both vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Body length (also the vehicle-vehicle separation distance)
    pub length: f32,
    pub width: f32,
    /// Resting height of the vehicle origin above the floor
    pub ground_height: f32,
    /// Tolerance above ground height still counted as grounded
    pub ground_epsilon: f32,
    pub max_speed: f32,
    pub boost_max_speed: f32,
    pub acceleration: f32,
    pub boost_acceleration: f32,
    /// Multiplicative horizontal damping applied every grounded tick
    pub friction: f32,
    /// Reverse throttle strength relative to forward
    pub reverse_factor: f32,
    /// Yaw change per tick at full steer and saturated speed (radians)
    pub turn_rate: f32,
    /// Steering authority multiplier while airborne
    pub air_control: f32,
    /// Speed at which steering authority saturates
    pub turn_saturation_speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub double_jump_impulse: f32,
    /// Added to vertical velocity each tick the jump is held
    pub jump_hold_force: f32,
    /// Holding jump stops adding force above this vertical velocity
    pub jump_velocity_cap: f32,
    /// Holding jump stops adding force after this many ticks
    pub jump_hold_ticks: u32,
    /// Roll/pitch decay per grounded tick
    pub tilt_damping: f32,
    /// Distance kept from the side/end walls
    pub wall_margin: f32,
    /// Fraction of velocity kept (and inverted) on wall contact
    pub wall_bounce: f32,
    pub boost_max: f32,
    pub boost_consumption: f32,
    pub boost_regen: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            length: 6.5,
            width: 4.5,
            ground_height: 2.5,
            ground_epsilon: 0.1,
            max_speed: 3.5,
            boost_max_speed: 5.5,
            acceleration: 0.08,
            boost_acceleration: 0.15,
            friction: 0.98,
            reverse_factor: 0.7,
            turn_rate: 0.05,
            air_control: 0.5,
            turn_saturation_speed: 1.5,
            gravity: 0.05,
            jump_impulse: 1.5,
            double_jump_impulse: 1.2,
            jump_hold_force: 0.08,
            jump_velocity_cap: 2.2,
            jump_hold_ticks: 12,
            tilt_damping: 0.9,
            wall_margin: 3.0,
            wall_bounce: 0.5,
            boost_max: 100.0,
            boost_consumption: 0.5,
            boost_regen: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub radius: f32,
    pub gravity: f32,
    /// Restitution on floor/ceiling/wall contact
    pub bounce: f32,
    /// Uniform velocity decay per tick
    pub friction: f32,
    /// Extra horizontal damping on floor contact
    pub floor_damping: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            radius: 5.5,
            gravity: 0.055,
            bounce: 0.75,
            friction: 0.995,
            floor_damping: 0.98,
        }
    }
}

/// Vehicle-ball contact response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTuning {
    /// Extra push-out beyond the penetration depth
    pub margin: f32,
    /// Share of the vehicle velocity handed to the ball
    pub carry_factor: f32,
    /// Impulse per unit of vehicle speed
    pub impulse_scale: f32,
    /// Impulse floor so a parked vehicle still nudges the ball
    pub min_impulse: f32,
    /// Vertical velocity floor after a hit
    pub min_lift: f32,
}

impl Default for ContactTuning {
    fn default() -> Self {
        Self {
            margin: 0.5,
            carry_factor: 0.6,
            impulse_scale: 2.0,
            min_impulse: 1.0,
            min_lift: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTuning {
    /// Match length in seconds
    pub duration: f32,
    /// Frozen ticks after a goal before the kickoff reset
    pub goal_pause_ticks: u32,
    /// Replay ring buffer capacity (frames)
    pub replay_capacity: usize,
    /// Kickoff spawn distance in from each end wall
    pub kickoff_depth: f32,
    /// Lateral kickoff offset (diagonal spawns)
    pub kickoff_offset: f32,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            duration: 300.0,
            goal_pause_ticks: 150,
            replay_capacity: 180,
            kickoff_depth: 50.0,
            kickoff_offset: 30.0,
        }
    }
}

/// Bot behaviour and handicap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotTuning {
    /// Ticks after each kickoff before the bot starts deciding
    pub kickoff_delay_ticks: u32,
    /// Acceleration multiplier relative to the human vehicle
    pub accel_scale: f32,
    /// Max-speed multiplier relative to the human vehicle
    pub max_speed_scale: f32,
    /// Turn-rate multiplier relative to the human vehicle
    pub turn_scale: f32,
    /// Divisor turning ball distance into a prediction horizon
    pub prediction_divisor: f32,
    /// Prediction horizon cap (ticks)
    pub prediction_cap: f32,
    /// Ball speed toward own goal that triggers critical defense
    pub critical_speed: f32,
    /// Closest the critical-defense target may get to the own end wall
    pub critical_standoff: f32,
    /// How far past the centre line (fraction of length) counts as deep attack
    pub attack_depth_fraction: f32,
    pub attack_offset: f32,
    /// Lateral pull toward the centre for attack targets (1 = no pull)
    pub attack_lateral_pull: f32,
    pub defend_offset: f32,
    pub shot_offset: f32,
    pub urgency_critical: f32,
    pub urgency_attack: f32,
    pub urgency_defend: f32,
    pub urgency_midfield: f32,
    /// Throttle at urgency 1.0
    pub base_throttle: f32,
    pub reverse_throttle: f32,
    /// Target clamp margins from the side and end walls
    pub margin_x: f32,
    pub margin_z: f32,
    /// Boost when farther than this from the target
    pub boost_distance: f32,
    /// ... or when urgency is at least this
    pub boost_urgency: f32,
    /// Never boost below this reserve
    pub boost_floor: f32,
    /// Never boost with a heading error above this (radians)
    pub boost_max_error: f32,
    /// Half-angle of the forward throttle cone (radians)
    pub forward_cone: f32,
    /// Reverse when the heading error exceeds this (radians)
    pub reverse_cone: f32,
    /// Stop throttling inside this distance from the target
    pub arrive_distance: f32,
    /// Ball must be this far above its resting height to count as airborne
    pub jump_min_height: f32,
    pub jump_min_distance: f32,
    pub jump_max_distance: f32,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            kickoff_delay_ticks: 45,
            accel_scale: 0.9,
            max_speed_scale: 0.9,
            turn_scale: 0.8,
            prediction_divisor: 4.0,
            prediction_cap: 15.0,
            critical_speed: 1.0,
            critical_standoff: 25.0,
            attack_depth_fraction: 0.25,
            attack_offset: 12.0,
            attack_lateral_pull: 0.7,
            defend_offset: 15.0,
            shot_offset: 8.0,
            urgency_critical: 1.33,
            urgency_attack: 1.2,
            urgency_defend: 1.1,
            urgency_midfield: 1.0,
            base_throttle: 0.75,
            reverse_throttle: 0.5,
            margin_x: 30.0,
            margin_z: 20.0,
            boost_distance: 40.0,
            boost_urgency: 1.15,
            boost_floor: 20.0,
            boost_max_error: 0.5,
            forward_cone: std::f32::consts::FRAC_PI_3,
            reverse_cone: 2.2,
            arrive_distance: 8.0,
            jump_min_height: 4.0,
            jump_min_distance: 10.0,
            jump_max_distance: 30.0,
        }
    }
}

/// Complete tuning set for a match
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub vehicle: VehicleTuning,
    pub ball: BallTuning,
    pub contact: ContactTuning,
    #[serde(rename = "match")]
    pub match_: MatchTuning,
    pub bot: BotTuning,
}

impl Tuning {
    /// Parse (possibly partial) tuning overrides and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps or non-finite keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values that would break the clamp-on-write invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vehicle;
        positive("vehicle.length", v.length)?;
        positive("vehicle.max_speed", v.max_speed)?;
        positive("vehicle.boost_max_speed", v.boost_max_speed)?;
        positive("vehicle.boost_max", v.boost_max)?;
        non_negative("vehicle.boost_consumption", v.boost_consumption)?;
        non_negative("vehicle.boost_regen", v.boost_regen)?;
        positive("vehicle.turn_saturation_speed", v.turn_saturation_speed)?;
        unit("vehicle.friction", v.friction)?;
        unit("vehicle.wall_bounce", v.wall_bounce)?;
        unit("vehicle.tilt_damping", v.tilt_damping)?;
        unit("vehicle.air_control", v.air_control)?;

        let b = &self.ball;
        positive("ball.radius", b.radius)?;
        unit("ball.bounce", b.bounce)?;
        unit("ball.friction", b.friction)?;
        unit("ball.floor_damping", b.floor_damping)?;

        positive("match.duration", self.match_.duration)?;
        if self.match_.replay_capacity == 0 {
            return Err(ConfigError::NonPositive {
                field: "match.replay_capacity",
            });
        }

        let bot = &self.bot;
        unit("bot.accel_scale", bot.accel_scale)?;
        unit("bot.max_speed_scale", bot.max_speed_scale)?;
        positive("bot.prediction_divisor", bot.prediction_divisor)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            min: 0.0,
            max: 1.0,
        })
    }
}
