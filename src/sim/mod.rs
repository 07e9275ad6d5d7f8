//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Millisecond frame deltas supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (storage order, newest-first for removal passes)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod layout;
pub mod power_up;
pub mod state;
pub mod tick;

pub use body::{Body, Color, box_overlap};
pub use collision::{Axis, clamp_speed, dominant_axis, paddle_bounce, reflect};
pub use layout::{Level, LevelConfig, generate_level};
pub use state::{
    ActiveEffects, Ball, Block, Game, GameStatus, Paddle, PowerUp, PowerUpKind, PowerUpMessage,
};
