//! Replay ring buffer
//!
//! One pose snapshot per running tick, oldest dropped first. Presentation
//! reads it back during the goal pause; nothing here can touch live state.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    pub pos: Vec3,
    pub yaw: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub ball: Vec3,
    pub ball_spin: Vec2,
    /// Human first, bot second
    pub vehicles: [VehiclePose; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayBuffer {
    capacity: usize,
    frames: VecDeque<ReplayFrame>,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, frame: ReplayFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Frame `index` counted from the oldest
    pub fn get(&self, index: usize) -> Option<&ReplayFrame> {
        self.frames.get(index)
    }

    pub fn latest(&self) -> Option<&ReplayFrame> {
        self.frames.back()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &ReplayFrame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
