//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick physics constants; wall-clock time only drives the match clock
//! - Seeded RNG only
//! - Fixed vehicle order (human, then bot)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod arena;
pub mod ball;
pub mod collision;
pub mod goal;
pub mod input;
pub mod replay;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use ai::{BotDecision, BotMode, BotPolicy};
pub use arena::{Arena, ArenaStyle};
pub use ball::step_ball;
pub use collision::{CollisionResult, resolve_collisions, resolve_vehicle_ball, separate_vehicles};
pub use goal::{GoalDetector, breached_goal};
pub use input::{
    ControlIntent, ControlSource, HumanControl, InputSnapshot, JumpEdge, TickInput, WorldView,
};
pub use replay::{ReplayBuffer, ReplayFrame, VehiclePose};
pub use state::{
    Ball, GameEvent, GameState, Handicap, HudSnapshot, MatchPhase, MatchResult, MatchState,
    RigidBody, RngState, Team, Vehicle, format_clock,
};
pub use tick::tick;
pub use vehicle::{step_vehicle, try_jump};
