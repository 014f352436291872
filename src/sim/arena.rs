//! Arena descriptor
//!
//! Field box and goal aperture geometry. Fixed for the duration of a match.
//! The style tag only matters to presentation; the simulation never reads it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Visual theme of an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArenaStyle {
    #[default]
    Stadium,
    Neon,
    Ice,
}

impl ArenaStyle {
    pub const ALL: [ArenaStyle; 3] = [ArenaStyle::Stadium, ArenaStyle::Neon, ArenaStyle::Ice];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaStyle::Stadium => "Stadium",
            ArenaStyle::Neon => "Neon City",
            ArenaStyle::Ice => "Ice World",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stadium" => Some(ArenaStyle::Stadium),
            "neon" | "neon city" => Some(ArenaStyle::Neon),
            "ice" | "ice world" => Some(ArenaStyle::Ice),
            _ => None,
        }
    }
}

/// Field and goal geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub style: ArenaStyle,
    /// Extent along X
    pub width: f32,
    /// Extent along Z (goals sit at both Z ends)
    pub length: f32,
    /// Ceiling height
    pub height: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    pub goal_depth: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::preset(ArenaStyle::Stadium)
    }
}

impl Arena {
    /// Built-in arenas. All share the same geometry.
    pub fn preset(style: ArenaStyle) -> Self {
        Self {
            style,
            width: 200.0,
            length: 340.0,
            height: 60.0,
            goal_width: 50.0,
            goal_height: 25.0,
            goal_depth: 20.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("arena.width", self.width),
            ("arena.length", self.length),
            ("arena.height", self.height),
            ("arena.goal_width", self.goal_width),
            ("arena.goal_height", self.goal_height),
            ("arena.goal_depth", self.goal_depth),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if self.goal_width >= self.width {
            return Err(ConfigError::GoalWiderThanField {
                goal: self.goal_width,
                field: self.width,
            });
        }
        if self.goal_height >= self.height {
            return Err(ConfigError::GoalTallerThanField {
                goal: self.goal_height,
                field: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length / 2.0
    }

    /// Whether an (x, height) pair lies inside the goal opening
    #[inline]
    pub fn in_goal_aperture(&self, x: f32, y: f32) -> bool {
        x.abs() < self.goal_width / 2.0 && y < self.goal_height
    }
}
