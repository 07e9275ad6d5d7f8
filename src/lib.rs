//! Brick Breaker - a Breakout engine with power-ups and level patterns
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, power-ups, level layouts)
//! - `input`: Per-frame input sampling
//! - `render`: Draw pass against an abstract `Surface`
//! - `config`: Data-driven game tuning
//! - `platform`: Browser canvas glue (wasm32 only)

pub mod config;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod render;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use input::{Direction, FrameInput, InputState};
pub use render::Surface;
pub use sim::{Game, GameStatus};

/// Game configuration constants
///
/// Times are in milliseconds, speeds in pixels per millisecond.
pub mod consts {
    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Thickness of the left, right and top walls
    pub const WALL_THICKNESS: f32 = 10.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance from the paddle top to the bottom of the field
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;
    pub const PADDLE_SPEED: f32 = 1.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    pub const BALL_INITIAL_SPEED: f32 = 0.4;
    /// Global ball speed cap
    pub const BALL_MAX_SPEED: f32 = 0.8;
    /// Speed multiplier applied on every destroyed block
    pub const BALL_SPEED_INCREASE: f32 = 1.01;
    /// Gap between a resting ball and the paddle top
    pub const BALL_REST_GAP: f32 = 2.0;
    /// Maximum paddle deflection (60 degrees)
    pub const PADDLE_MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Half-width of the random launch cone (30 degrees)
    pub const LAUNCH_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Block defaults
    pub const BLOCK_ROWS: usize = 5;
    pub const BLOCK_COLS: usize = 10;
    pub const BLOCK_WIDTH: f32 = 70.0;
    pub const BLOCK_HEIGHT: f32 = 25.0;
    pub const BLOCK_PADDING: f32 = 10.0;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 20.0;
    pub const POWER_UP_FALL_SPEED: f32 = 0.2;
    pub const POWER_UP_CHANCE: f64 = 0.2;
    pub const POWER_UP_DURATION_MS: f32 = 10_000.0;
    pub const POWER_UP_COLLECT_MS: f32 = 300.0;
    pub const POWER_UP_MESSAGE_MS: f32 = 1_500.0;
    pub const EXPAND_FACTOR: f32 = 1.5;
    pub const MULTIBALL_COUNT: usize = 2;
    pub const MULTIBALL_SPEED_FACTOR: f32 = 1.2;
    pub const SLOW_MOTION_FACTOR: f32 = 0.3;

    /// Run defaults
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LEVELS: u32 = 5;

    /// Largest frame delta the drivers feed into the simulation
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;
}
