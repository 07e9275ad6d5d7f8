//! Per-frame input sampling
//!
//! Platform event handlers feed key and pointer events into an [`InputState`];
//! the frame driver takes one [`FrameInput`] snapshot per update.

use serde::{Deserialize, Serialize};

/// Horizontal paddle direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Keyboard movement, if any key is held
    pub direction: Option<Direction>,
    /// Absolute pointer x in field coordinates, if the pointer moved
    pub pointer_x: Option<f32>,
    /// Launch / continue was pressed this frame
    pub launch: bool,
    /// Slow-motion control is held
    pub slow_motion: bool,
}

/// Accumulates raw events between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Held directions in press order; the last entry wins
    held: Vec<Direction>,
    pointer_x: Option<f32>,
    launch: bool,
    slow_motion: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        self.held.retain(|&d| d != direction);
        self.held.push(direction);
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.retain(|&d| d != direction);
    }

    /// Direction currently in effect
    pub fn direction(&self) -> Option<Direction> {
        self.held.last().copied()
    }

    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn trigger_launch(&mut self) {
        self.launch = true;
    }

    pub fn set_slow_motion(&mut self, held: bool) {
        self.slow_motion = held;
    }

    /// Drop held keys, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.slow_motion = false;
    }

    /// Snapshot for this frame; one-shot events are consumed
    pub fn sample(&mut self) -> FrameInput {
        FrameInput {
            direction: self.direction(),
            pointer_x: self.pointer_x.take(),
            launch: std::mem::take(&mut self.launch),
            slow_motion: self.slow_motion,
        }
    }
}
