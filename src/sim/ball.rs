//! Ball controller
//!
//! Gravity, floor/ceiling/wall reflection and friction. The end walls are
//! open inside the goal aperture so the ball can reach the goal detector.

use super::arena::Arena;
use super::state::Ball;
use crate::tuning::BallTuning;

/// Rolling rotation per unit of horizontal velocity (rendering only)
const SPIN_RATE: f32 = 0.04;

/// Advance the ball by one tick
pub fn step_ball(ball: &mut Ball, arena: &Arena, tuning: &BallTuning) {
    let r = ball.radius;
    let body = &mut ball.body;

    body.vel.y -= tuning.gravity;

    // Floor
    if body.pos.y < r {
        body.pos.y = r;
        body.vel.y *= -tuning.bounce;
        body.vel.x *= tuning.floor_damping;
        body.vel.z *= tuning.floor_damping;
    }
    // Ceiling
    let ceiling = arena.height - r;
    if body.pos.y > ceiling {
        body.pos.y = ceiling;
        body.vel.y *= -tuning.bounce;
    }

    // Side walls
    let hw = arena.half_width() - r;
    if body.pos.x < -hw {
        body.pos.x = -hw;
        body.vel.x *= -tuning.bounce;
    } else if body.pos.x > hw {
        body.pos.x = hw;
        body.vel.x *= -tuning.bounce;
    }

    // End walls, open where the goal is
    let hl = arena.half_length() - r;
    if !arena.in_goal_aperture(body.pos.x, body.pos.y) {
        if body.pos.z < -hl {
            body.pos.z = -hl;
            body.vel.z *= -tuning.bounce;
        } else if body.pos.z > hl {
            body.pos.z = hl;
            body.vel.z *= -tuning.bounce;
        }
    }

    body.vel *= tuning.friction;
    body.pos += body.vel;

    ball.spin.x += ball.body.vel.z * SPIN_RATE;
    ball.spin.y -= ball.body.vel.x * SPIN_RATE;
}
