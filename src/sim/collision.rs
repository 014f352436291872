//! Collision detection and response
//!
//! Discrete overlap correction after integration: vehicles are treated as
//! spheres of half their length for ball contact and as spheres of their full
//! length against each other. Nothing is swept, so a fast enough body can
//! tunnel through another within a single tick.

use glam::Vec3;

use super::state::{Ball, GameEvent, Vehicle};
use crate::tuning::{ContactTuning, VehicleTuning};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec3,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Sphere-sphere overlap test.
///
/// `fallback` is used as the normal when the centres coincide.
pub fn sphere_overlap(a: Vec3, b: Vec3, contact_distance: f32, fallback: Vec3) -> CollisionResult {
    let delta = b - a;
    let dist = delta.length();
    if dist >= contact_distance {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: delta.try_normalize().unwrap_or(fallback),
        penetration: contact_distance - dist,
    }
}

/// Push the ball out of a vehicle and launch it.
///
/// The ball takes a share of the vehicle's velocity plus an impulse along the
/// contact normal; a floor on the impulse lets a parked vehicle still nudge
/// the ball, and a floor on vertical velocity lifts flat hits.
pub fn resolve_vehicle_ball(
    vehicle: &Vehicle,
    ball: &mut Ball,
    vehicle_tuning: &VehicleTuning,
    contact: &ContactTuning,
    events: &mut Vec<GameEvent>,
) -> bool {
    let contact_distance = ball.radius + vehicle_tuning.length / 2.0;
    let result = sphere_overlap(
        vehicle.body.pos,
        ball.body.pos,
        contact_distance,
        vehicle.forward(),
    );
    if !result.hit {
        return false;
    }

    let n = result.normal;
    ball.body.pos += n * (result.penetration + contact.margin);

    let impulse = (vehicle.body.speed() * contact.impulse_scale).max(contact.min_impulse);
    ball.body.vel = vehicle.body.vel * contact.carry_factor + n * impulse;
    if ball.body.vel.y < contact.min_lift {
        ball.body.vel.y = contact.min_lift;
    }

    events.push(GameEvent::Hit {
        team: vehicle.team,
        pos: ball.body.pos,
    });
    true
}

/// Push two overlapping vehicles apart, half the overlap each.
///
/// Purely positional and horizontal; velocities are left alone.
pub fn separate_vehicles(a: &mut Vehicle, b: &mut Vehicle, vehicle_tuning: &VehicleTuning) -> bool {
    let result = sphere_overlap(a.body.pos, b.body.pos, vehicle_tuning.length, Vec3::X);
    if !result.hit {
        return false;
    }

    let n = result.normal.with_y(0.0).try_normalize().unwrap_or(Vec3::X);
    let half = result.penetration / 2.0;
    a.body.pos -= n * half;
    b.body.pos += n * half;
    true
}

/// Full post-integration pass: every vehicle against the ball, then the
/// vehicles against each other.
pub fn resolve_collisions(
    vehicles: &mut [Vehicle; 2],
    ball: &mut Ball,
    vehicle_tuning: &VehicleTuning,
    contact: &ContactTuning,
    events: &mut Vec<GameEvent>,
) {
    for vehicle in vehicles.iter() {
        resolve_vehicle_ball(vehicle, ball, vehicle_tuning, contact, events);
    }

    let [a, b] = vehicles;
    separate_vehicles(a, b, vehicle_tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Handicap, Team};

    fn setup() -> (Vehicle, Ball, VehicleTuning, ContactTuning) {
        let vt = VehicleTuning::default();
        let vehicle = Vehicle::new(Team::Blue, Handicap::FULL, &vt);
        let ball = Ball::new(5.5);
        (vehicle, ball, vt, ContactTuning::default())
    }

    #[test]
    fn test_sphere_overlap() {
        let hit = sphere_overlap(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 5.0, Vec3::Y);
        assert!(hit.hit);
        assert_eq!(hit.normal, Vec3::X);
        assert!((hit.penetration - 2.0).abs() < 1e-6);

        let miss = sphere_overlap(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 5.0, Vec3::Y);
        assert!(!miss.hit);
    }

    #[test]
    fn test_sphere_overlap_degenerate_uses_fallback() {
        let hit = sphere_overlap(Vec3::ONE, Vec3::ONE, 5.0, Vec3::Z);
        assert!(hit.hit);
        assert_eq!(hit.normal, Vec3::Z);
        assert_eq!(hit.penetration, 5.0);
    }

    #[test]
    fn test_moving_vehicle_launches_ball_forward_and_up() {
        let (mut vehicle, mut ball, vt, ct) = setup();
        // Ball at rest at centre; vehicle driving toward -Z just touching it
        ball.body.pos = Vec3::new(0.0, ball.radius + 1.0, 0.0);
        vehicle.body.pos = Vec3::new(0.0, vt.ground_height, 7.0);
        vehicle.body.vel = Vec3::new(0.0, 0.0, -3.0);

        let mut events = Vec::new();
        assert!(resolve_vehicle_ball(&vehicle, &mut ball, &vt, &ct, &mut events));

        let approach = Vec3::NEG_Z;
        assert!(ball.body.vel.dot(approach) > 0.0);
        assert!(ball.body.vel.y >= ct.min_lift);
        // Pushed clear of the contact sphere
        let dist = ball.body.pos.distance(vehicle.body.pos);
        assert!(dist >= ball.radius + vt.length / 2.0);
        assert!(matches!(events[0], GameEvent::Hit { team: Team::Blue, .. }));
    }

    #[test]
    fn test_parked_vehicle_still_nudges_ball() {
        let (mut vehicle, mut ball, vt, ct) = setup();
        vehicle.body.pos = Vec3::new(0.0, ball.radius, 6.0);
        ball.body.pos = Vec3::new(0.0, ball.radius, 0.0);

        let mut events = Vec::new();
        assert!(resolve_vehicle_ball(&vehicle, &mut ball, &vt, &ct, &mut events));
        // Flat hit: min impulse along -Z, lifted to the floor value
        assert!((ball.body.vel.z + ct.min_impulse).abs() < 1e-5);
        assert_eq!(ball.body.vel.y, ct.min_lift);
    }

    #[test]
    fn test_coincident_vehicle_and_ball_use_vehicle_forward() {
        let (vehicle, mut ball, vt, ct) = setup();
        ball.body.pos = vehicle.body.pos;
        let mut events = Vec::new();
        assert!(resolve_vehicle_ball(&vehicle, &mut ball, &vt, &ct, &mut events));
        assert!(ball.body.pos.is_finite());
        assert!(ball.body.vel.is_finite());
        assert!(ball.body.pos.z < vehicle.body.pos.z);
    }

    #[test]
    fn test_no_contact_leaves_ball_alone() {
        let (vehicle, mut ball, vt, ct) = setup();
        ball.body.pos = Vec3::new(50.0, 6.0, 50.0);
        let before = ball.body;
        let mut events = Vec::new();
        assert!(!resolve_vehicle_ball(&vehicle, &mut ball, &vt, &ct, &mut events));
        assert_eq!(ball.body, before);
        assert!(events.is_empty());
    }

    #[test]
    fn test_vehicles_pushed_apart_symmetrically() {
        let vt = VehicleTuning::default();
        let mut a = Vehicle::new(Team::Blue, Handicap::FULL, &vt);
        let mut b = Vehicle::new(Team::Orange, Handicap::FULL, &vt);
        a.body.pos = Vec3::new(0.0, vt.ground_height, 0.0);
        b.body.pos = Vec3::new(4.0, vt.ground_height, 0.0);
        a.body.vel = Vec3::new(1.0, 0.0, 0.0);

        assert!(separate_vehicles(&mut a, &mut b, &vt));
        assert!((a.body.pos.x + 1.25).abs() < 1e-5);
        assert!((b.body.pos.x - 5.25).abs() < 1e-5);
        assert!((b.body.pos.x - a.body.pos.x - vt.length).abs() < 1e-5);
        // Velocity untouched
        assert_eq!(a.body.vel, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(a.body.pos.y, vt.ground_height);
    }

    #[test]
    fn test_stacked_vehicles_separate_sideways() {
        let vt = VehicleTuning::default();
        let mut a = Vehicle::new(Team::Blue, Handicap::FULL, &vt);
        let mut b = Vehicle::new(Team::Orange, Handicap::FULL, &vt);
        b.body.pos = a.body.pos + Vec3::new(0.0, 3.0, 0.0);

        assert!(separate_vehicles(&mut a, &mut b, &vt));
        assert!(b.body.pos.x > a.body.pos.x);
        assert_eq!(a.body.pos.y, vt.ground_height);
    }
}
