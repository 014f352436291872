//! Vehicle controller
//!
//! Advances one vehicle by one tick from a `ControlIntent`. The same code
//! drives the human and the bot; they differ only in intent and `Handicap`.

use glam::Vec2;

use super::arena::Arena;
use super::input::ControlIntent;
use super::state::{GameEvent, Vehicle};
use crate::normalize_angle;
use crate::tuning::VehicleTuning;

/// Wheel rotation per unit of speed (rendering only)
const WHEEL_SPIN_RATE: f32 = 0.3;

/// Advance a vehicle by one tick.
///
/// Order: ground test, gravity and jump hold, jump initiation, steering,
/// throttle/boost (grounded only), integration, wall clamp.
pub fn step_vehicle(
    vehicle: &mut Vehicle,
    intent: &ControlIntent,
    arena: &Arena,
    tuning: &VehicleTuning,
    events: &mut Vec<GameEvent>,
) {
    update_ground_contact(vehicle, intent, tuning);
    apply_gravity_and_jump_hold(vehicle, intent, tuning);

    if intent.jump_pressed {
        try_jump(vehicle, tuning, events);
    }

    steer(vehicle, intent, tuning);

    if vehicle.grounded {
        drive(vehicle, intent, tuning, events);
    }

    let body = &mut vehicle.body;
    body.pos += body.vel;
    vehicle.wheel_spin = (vehicle.wheel_spin + body.speed() * WHEEL_SPIN_RATE) % std::f32::consts::TAU;

    clamp_to_walls(vehicle, arena, tuning);
}

/// Start a ground jump or, when airborne, a double jump.
///
/// Returns whether a jump happened.
pub fn try_jump(vehicle: &mut Vehicle, tuning: &VehicleTuning, events: &mut Vec<GameEvent>) -> bool {
    if vehicle.grounded && vehicle.can_jump {
        vehicle.body.vel.y = tuning.jump_impulse;
        vehicle.grounded = false;
        vehicle.can_jump = false;
        vehicle.can_double_jump = true;
        vehicle.is_jumping = true;
        vehicle.jump_timer = 0;
        events.push(GameEvent::Jump {
            team: vehicle.team,
            double: false,
        });
        true
    } else if !vehicle.grounded && vehicle.can_double_jump {
        vehicle.body.vel.y = tuning.double_jump_impulse;
        vehicle.can_double_jump = false;
        vehicle.is_jumping = false;
        events.push(GameEvent::Jump {
            team: vehicle.team,
            double: true,
        });
        true
    } else {
        false
    }
}

fn update_ground_contact(vehicle: &mut Vehicle, intent: &ControlIntent, tuning: &VehicleTuning) {
    let body = &mut vehicle.body;
    if body.pos.y <= tuning.ground_height + tuning.ground_epsilon {
        body.pos.y = tuning.ground_height;
        if body.vel.y < 0.0 {
            body.vel.y = 0.0;
        }
        vehicle.grounded = true;
        vehicle.roll *= tuning.tilt_damping;
        vehicle.pitch *= tuning.tilt_damping;
        vehicle.jump_timer = 0;
        vehicle.is_jumping = false;
        vehicle.can_double_jump = false;
        // A jump held through the landing must be released before it re-arms
        if !intent.jump_held {
            vehicle.can_jump = true;
        }
    } else {
        vehicle.grounded = false;
    }
}

fn apply_gravity_and_jump_hold(vehicle: &mut Vehicle, intent: &ControlIntent, tuning: &VehicleTuning) {
    if vehicle.grounded {
        return;
    }
    vehicle.body.vel.y -= tuning.gravity;

    if vehicle.is_jumping {
        let holding = intent.jump_held
            && vehicle.body.vel.y < tuning.jump_velocity_cap
            && vehicle.jump_timer < tuning.jump_hold_ticks;
        if holding {
            vehicle.body.vel.y = (vehicle.body.vel.y + tuning.jump_hold_force).min(tuning.jump_velocity_cap);
            vehicle.jump_timer += 1;
        } else {
            vehicle.is_jumping = false;
        }
    }
}

fn steer(vehicle: &mut Vehicle, intent: &ControlIntent, tuning: &VehicleTuning) {
    let steer = intent.steer.clamp(-1.0, 1.0);
    if steer == 0.0 {
        return;
    }
    let handicap = vehicle.handicap;
    let speed_factor = (vehicle.body.speed() / tuning.turn_saturation_speed)
        .min(1.0)
        .max(handicap.min_turn_factor);
    let air_factor = if vehicle.grounded { 1.0 } else { tuning.air_control };

    vehicle.yaw = normalize_angle(
        vehicle.yaw + tuning.turn_rate * handicap.turn_scale * steer * speed_factor * air_factor,
    );
}

fn drive(vehicle: &mut Vehicle, intent: &ControlIntent, tuning: &VehicleTuning, events: &mut Vec<GameEvent>) {
    let handicap = vehicle.handicap;
    let fwd = vehicle.forward();

    let (mut max_speed, mut acc) = (tuning.max_speed, tuning.acceleration);
    if intent.boost && vehicle.boost > 0.0 {
        max_speed = tuning.boost_max_speed;
        acc = tuning.boost_acceleration;
        vehicle.boost = (vehicle.boost - tuning.boost_consumption).clamp(0.0, tuning.boost_max);
        events.push(GameEvent::Boost { team: vehicle.team });
    } else if !intent.boost {
        vehicle.boost = (vehicle.boost + tuning.boost_regen).clamp(0.0, tuning.boost_max);
    }
    max_speed *= handicap.max_speed_scale;
    acc *= handicap.accel_scale;

    let throttle = intent.throttle.clamp(-1.0, 1.0);
    let body = &mut vehicle.body;
    if throttle > 0.0 {
        body.vel += fwd * acc * throttle;
    } else if throttle < 0.0 {
        body.vel += fwd * acc * tuning.reverse_factor * throttle;
    }

    let horizontal = Vec2::new(body.vel.x, body.vel.z).clamp_length_max(max_speed);
    body.vel.x = horizontal.x * tuning.friction;
    body.vel.z = horizontal.y * tuning.friction;
}

/// Soft bounce off the side and end walls
pub fn clamp_to_walls(vehicle: &mut Vehicle, arena: &Arena, tuning: &VehicleTuning) {
    let hw = arena.half_width() - tuning.wall_margin;
    let hl = arena.half_length() - tuning.wall_margin;
    let body = &mut vehicle.body;

    if body.pos.x < -hw {
        body.pos.x = -hw;
        if body.vel.x < 0.0 {
            body.vel.x *= -tuning.wall_bounce;
        }
    } else if body.pos.x > hw {
        body.pos.x = hw;
        if body.vel.x > 0.0 {
            body.vel.x *= -tuning.wall_bounce;
        }
    }

    if body.pos.z < -hl {
        body.pos.z = -hl;
        if body.vel.z < 0.0 {
            body.vel.z *= -tuning.wall_bounce;
        }
    } else if body.pos.z > hl {
        body.pos.z = hl;
        if body.vel.z > 0.0 {
            body.vel.z *= -tuning.wall_bounce;
        }
    }
}
