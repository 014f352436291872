//! Control input
//!
//! Both vehicles are driven through the same `ControlIntent`. The human's
//! intent comes from held keys; the bot's from `BotPolicy`.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::state::{Ball, Vehicle};
use crate::tuning::Tuning;

/// Currently held controls of the human vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub boost: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held controls (level state)
    pub controls: InputSnapshot,
    /// Jump was pressed since the last tick (edge; never set by key repeat)
    pub jump_pressed: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart the match (score and clock reset)
    pub restart: bool,
}

/// What a vehicle wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlIntent {
    /// -1 full reverse .. 1 full forward
    pub throttle: f32,
    /// -1 full right .. 1 full left
    pub steer: f32,
    pub boost: bool,
    /// Start a jump or double jump this tick
    pub jump_pressed: bool,
    /// Keep adding jump force (variable jump height)
    pub jump_held: bool,
}

impl ControlIntent {
    /// No throttle, no steering; friction still applies
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Read-only view of the world a control source may inspect
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub ball: &'a Ball,
    pub arena: &'a Arena,
    pub tuning: &'a Tuning,
}

/// Anything that can drive a vehicle
pub trait ControlSource {
    fn intent(&mut self, vehicle: &Vehicle, world: &WorldView<'_>) -> ControlIntent;
}

/// Human driver: maps held keys straight to an intent
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanControl {
    pub controls: InputSnapshot,
    pub jump_pressed: bool,
}

impl HumanControl {
    pub fn from_input(input: &TickInput) -> Self {
        Self {
            controls: input.controls,
            jump_pressed: input.jump_pressed,
        }
    }
}

impl ControlSource for HumanControl {
    fn intent(&mut self, _vehicle: &Vehicle, _world: &WorldView<'_>) -> ControlIntent {
        let c = &self.controls;
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        ControlIntent {
            throttle: axis(c.forward, c.backward),
            steer: axis(c.left, c.right),
            boost: c.boost,
            jump_pressed: self.jump_pressed,
            jump_held: c.jump,
        }
    }
}

/// Turns a level-only jump signal into press edges.
///
/// For hosts whose input layer only reports held state.
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpEdge {
    was_held: bool,
}

impl JumpEdge {
    /// True only on the tick the button goes down
    pub fn update(&mut self, held: bool) -> bool {
        let pressed = held && !self.was_held;
        self.was_held = held;
        pressed
    }
}
