//! Configuration errors
//!
//! The simulation itself never fails; only loading/validating tuning and
//! arena descriptors can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("goal width {goal} must be smaller than field width {field}")]
    GoalWiderThanField { goal: f32, field: f32 },
    #[error("goal height {goal} must be smaller than field height {field}")]
    GoalTallerThanField { goal: f32, field: f32 },
    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },
    #[error("`{field}` must not be negative")]
    Negative { field: &'static str },
    #[error("unknown arena `{0}` (expected stadium, neon or ice)")]
    UnknownArena(String),
    #[error("`{field}` must lie in {min}..={max}")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}
