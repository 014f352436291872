//! Goal detection
//!
//! A goal counts once the ball centre is inside the aperture and past the
//! end-wall plane. The detector disarms itself on a goal and stays quiet until
//! the kickoff reset re-arms it, so a ball bouncing around inside the goal
//! during the pause can never score twice.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::state::{Ball, Team};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDetector {
    armed: bool,
}

impl Default for GoalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalDetector {
    pub fn new() -> Self {
        Self { armed: true }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Allow detection again (kickoff reset)
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// Test the ball; returns the scoring team at most once per arming
    pub fn check(&mut self, ball: &Ball, arena: &Arena) -> Option<Team> {
        if !self.armed {
            return None;
        }
        let scorer = breached_goal(ball, arena).map(Team::opponent)?;
        self.armed = false;
        Some(scorer)
    }
}

/// Which team's goal the ball is inside, if any
pub fn breached_goal(ball: &Ball, arena: &Arena) -> Option<Team> {
    let pos = ball.body.pos;
    if !arena.in_goal_aperture(pos.x, pos.y) {
        return None;
    }
    [Team::Blue, Team::Orange]
        .into_iter()
        .find(|team| pos.z * team.side() > arena.half_length())
}
