//! Boost Ball - an arcade vehicular soccer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicles, ball, collisions, goals, bot, match flow)
//! - `tuning`: Data-driven physics and bot balance
//! - `error`: Configuration errors

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use tuning::Tuning;

use glam::Vec3;

/// Simulation constants that are not part of the tunable balance
pub mod consts {
    /// Nominal frame rate the per-tick physics constants were tuned at
    pub const NOMINAL_FPS: f32 = 60.0;
    /// Nominal frame time
    pub const NOMINAL_DT: f32 = 1.0 / NOMINAL_FPS;

    /// Upper bound on elapsed time fed into a single tick (frame stall guard)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball is placed this far above its resting height at kickoff
    pub const BALL_KICKOFF_LIFT: f32 = 1.0;

    /// Undrained events kept between host frames; the oldest go first
    pub const MAX_PENDING_EVENTS: usize = 256;

    /// Vehicles are tracked in a fixed order: human first, bot second
    pub const HUMAN_SLOT: usize = 0;
    pub const BOT_SLOT: usize = 1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Horizontal forward unit vector for a yaw angle.
///
/// Yaw 0 faces -Z; positive yaw turns left (toward -X).
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Yaw that points the forward vector from `from` toward `to` (horizontal plane).
///
/// Returns 0 when the points coincide horizontally.
#[inline]
pub fn yaw_toward(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    if d.x == 0.0 && d.z == 0.0 {
        return 0.0;
    }
    (-d.x).atan2(-d.z)
}

/// Signed horizontal angle from `forward` to `to_target`, in [-π, π].
///
/// Positive means the target lies to the left (turn by increasing yaw).
#[inline]
pub fn heading_error(forward: Vec3, to_target: Vec3) -> f32 {
    let cross_y = forward.z * to_target.x - forward.x * to_target.z;
    let dot = forward.x * to_target.x + forward.z * to_target.z;
    cross_y.atan2(dot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        // 3π sits on the wrap boundary; f32 rounding may land on either end
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_forward_from_yaw() {
        let f = forward_from_yaw(0.0);
        assert!((f - Vec3::NEG_Z).length() < 1e-6);
        // Turning left by 90° faces -X
        let f = forward_from_yaw(FRAC_PI_2);
        assert!((f - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn test_yaw_toward_roundtrips_forward() {
        let from = Vec3::new(10.0, 2.5, 100.0);
        let to = Vec3::new(-20.0, 0.0, -40.0);
        let fwd = forward_from_yaw(yaw_toward(from, to));
        let dir = (to - from).with_y(0.0).normalize();
        assert!((fwd - dir).length() < 1e-5);
    }

    #[test]
    fn test_heading_error_sign() {
        let fwd = Vec3::NEG_Z;
        // Target to the left (-X) is a positive error
        assert!((heading_error(fwd, Vec3::NEG_X) - FRAC_PI_2).abs() < 1e-6);
        assert!((heading_error(fwd, Vec3::X) + FRAC_PI_2).abs() < 1e-6);
        assert!(heading_error(fwd, Vec3::NEG_Z).abs() < 1e-6);
    }
}
