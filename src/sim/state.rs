//! Game state and entity types
//!
//! `Game` is the aggregate root: it owns the paddle, balls, blocks and
//! power-ups, plus the run bookkeeping (level, lives, status, effects).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Color};
use super::collision::clamp_speed;
use super::layout::generate_level;
use crate::config::GameConfig;
use crate::consts::*;

/// Current status of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Active gameplay
    Playing,
    /// Lives ran out
    GameOver,
    /// Every destructible block of the level is gone
    Won,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    SlowMotion,
    ExpandPaddle,
    Multiball,
    ExtraLife,
}

impl PowerUpKind {
    pub const COUNT: usize = 4;
    pub const ALL: [PowerUpKind; Self::COUNT] = [
        PowerUpKind::SlowMotion,
        PowerUpKind::ExpandPaddle,
        PowerUpKind::Multiball,
        PowerUpKind::ExtraLife,
    ];

    /// Slot in per-kind tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Uniform pick among all kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::COUNT)]
    }

    pub fn color(self) -> Color {
        match self {
            PowerUpKind::SlowMotion => Color::LightBlue,
            PowerUpKind::ExpandPaddle => Color::Green,
            PowerUpKind::Multiball => Color::Orange,
            PowerUpKind::ExtraLife => Color::Red,
        }
    }

    /// Banner shown when the power-up is caught
    pub fn message(self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "SLOW MOTION!",
            PowerUpKind::ExpandPaddle => "EXPANDED PADDLE!",
            PowerUpKind::Multiball => "MULTI BALL!",
            PowerUpKind::ExtraLife => "EXTRA LIFE!",
        }
    }

    /// HUD label for the active-effect list
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "SLOW MOTION",
            PowerUpKind::ExpandPaddle => "EXPANDED PADDLE",
            PowerUpKind::Multiball => "MULTI BALL",
            PowerUpKind::ExtraLife => "EXTRA LIFE",
        }
    }

    /// Whether the effect runs on a countdown timer
    pub fn is_timed(self) -> bool {
        self != PowerUpKind::ExtraLife
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: Body,
    pub vel: Vec2,
    /// Free-moving (false = resting on the paddle)
    pub in_play: bool,
    /// The ball that survives resets; exactly one per game
    pub main: bool,
}

impl Ball {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            vel: Vec2::ZERO,
            in_play: false,
            main: false,
        }
    }

    /// The ball every game starts with
    pub fn main_ball(field_width: f32, field_height: f32) -> Self {
        let mut ball = Self::new(Body::new(
            Vec2::new(field_width / 2.0, field_height - 50.0),
            BALL_SIZE,
            BALL_SIZE,
            Color::White,
        ));
        ball.main = true;
        ball
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Park the ball centered just above the paddle
    pub fn rest_on(&mut self, paddle: &Paddle) {
        let p = &paddle.body;
        self.body.pos.x = p.pos.x + p.width / 2.0 - self.body.width / 2.0;
        self.body.pos.y = p.pos.y - self.body.height - BALL_REST_GAP;
    }

    /// Integrate position (in play) or follow the paddle (resting)
    pub fn update(&mut self, dt: f32, paddle: &Paddle, max_speed: f32) {
        if self.in_play {
            self.body.pos += self.vel * dt;
            self.vel = clamp_speed(self.vel, max_speed);
        } else {
            self.rest_on(paddle);
        }
    }

    /// Put the ball in play, heading upward within the launch cone
    pub fn launch(&mut self, speed: f32, max_speed: f32, rng: &mut impl Rng) {
        let angle = rng.random_range(-LAUNCH_HALF_ANGLE..=LAUNCH_HALF_ANGLE);
        self.vel = clamp_speed(Vec2::new(angle.sin(), -angle.cos()) * speed, max_speed);
        self.in_play = true;
    }

    /// Back to resting state
    pub fn reset(&mut self) {
        self.in_play = false;
        self.vel = Vec2::ZERO;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub body: Body,
    /// Horizontal velocity (y is always 0)
    pub vel: Vec2,
}

impl Paddle {
    pub fn new(field_width: f32, field_height: f32, width: f32) -> Self {
        Self {
            body: Body::new(
                Vec2::new(field_width / 2.0 - width / 2.0, field_height - PADDLE_BOTTOM_OFFSET),
                width,
                PADDLE_HEIGHT,
                Color::Blue,
            ),
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.body.pos.x + self.body.width / 2.0
    }

    /// Keep the paddle inside `[0, field_width - width]`
    pub fn clamp_to(&mut self, field_width: f32) {
        let max_x = (field_width - self.body.width).max(0.0);
        self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);
    }

    /// Move the paddle so its center sits at `x`
    pub fn center_on(&mut self, x: f32, field_width: f32) {
        self.body.pos.x = x - self.body.width / 2.0;
        self.clamp_to(field_width);
    }

    /// Change width while keeping the current center
    pub fn resize(&mut self, width: f32, field_width: f32) {
        let center = self.center_x();
        self.body.width = width;
        self.center_on(center, field_width);
    }

    pub fn update(&mut self, dt: f32, field_width: f32) {
        self.body.pos += self.vel * dt;
        self.clamp_to(field_width);
    }
}

/// A block entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub body: Body,
    /// Hit and gone; kept in storage until the level is regenerated
    pub destroyed: bool,
    /// Reflects the ball but never breaks; excluded from the win count
    pub indestructible: bool,
    /// Power-up released when the block breaks
    pub power_up: Option<PowerUpKind>,
}

impl Block {
    pub fn new(pos: Vec2, width: f32, height: f32, color: Color) -> Self {
        Self {
            body: Body::new(pos, width, height, color),
            destroyed: false,
            indestructible: false,
            power_up: None,
        }
    }

    /// Returns true if this block must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        !self.indestructible
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
    pub vel: Vec2,
    /// Caught by the paddle, playing the collect animation
    pub collected: bool,
    /// Elapsed collect animation (ms)
    pub collected_time: f32,
}

impl PowerUp {
    /// Spawn a capsule centered on `center`
    pub fn new(center: Vec2, kind: PowerUpKind) -> Self {
        let half = POWER_UP_SIZE / 2.0;
        Self {
            body: Body::new(
                center - Vec2::splat(half),
                POWER_UP_SIZE,
                POWER_UP_SIZE,
                kind.color(),
            ),
            kind,
            vel: Vec2::new(0.0, POWER_UP_FALL_SPEED),
            collected: false,
            collected_time: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.collected {
            self.collected_time += dt;
        } else {
            self.body.pos += self.vel * dt;
        }
    }

    /// Collect animation progress in [0, 1]
    pub fn collect_progress(&self) -> f32 {
        (self.collected_time / POWER_UP_COLLECT_MS).clamp(0.0, 1.0)
    }

    pub fn animation_done(&self) -> bool {
        self.collected && self.collected_time > POWER_UP_COLLECT_MS
    }
}

/// Active power-up effects, one countdown slot per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Remaining time per kind (ms); `None` = inactive
    pub timers: [Option<f32>; PowerUpKind::COUNT],
    /// Paddle width before the expand effect kicked in
    pub paddle_base_width: Option<f32>,
}

impl ActiveEffects {
    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timers[kind.index()].is_some()
    }

    #[inline]
    pub fn remaining(&self, kind: PowerUpKind) -> Option<f32> {
        self.timers[kind.index()]
    }

    /// Active kinds with their remaining time, in kind order
    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, f32)> + '_ {
        PowerUpKind::ALL
            .iter()
            .filter_map(|&kind| self.remaining(kind).map(|t| (kind, t)))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Transient banner shown after a catch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpMessage {
    pub text: &'static str,
    /// Remaining display time (ms)
    pub remaining: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Game {
    pub config: GameConfig,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    /// Destructible blocks broken this level
    pub blocks_destroyed: u32,
    /// Destructible blocks created for this level
    pub total_blocks: u32,
    pub status: GameStatus,
    pub paddle: Paddle,
    /// All balls; exactly one carries the `main` flag
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    /// Multiplier applied to physics deltas (slow motion)
    pub time_scale: f32,
    /// Player is holding the slow-motion control
    pub manual_slow_motion: bool,
    pub message: Option<PowerUpMessage>,
    pub(crate) rng: Pcg32,
}

impl Game {
    /// Create a game at level 1 with a seeded RNG
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let paddle = Paddle::new(config.field_width, config.field_height, config.paddle_width);
        let mut ball = Ball::main_ball(config.field_width, config.field_height);
        ball.rest_on(&paddle);

        let mut game = Self {
            level: 1,
            lives: config.starting_lives,
            blocks_destroyed: 0,
            total_blocks: 0,
            status: GameStatus::Playing,
            paddle,
            balls: vec![ball],
            blocks: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            time_scale: 1.0,
            manual_slow_motion: false,
            message: None,
            rng: Pcg32::seed_from_u64(seed),
            config,
        };
        game.load_level();
        game
    }

    /// Regenerate blocks for the current level
    pub fn load_level(&mut self) {
        self.blocks = generate_level(self.level, &self.config.level_config(), &mut self.rng);
        self.total_blocks = self.blocks.iter().filter(|b| b.counts_for_clear()).count() as u32;
        self.blocks_destroyed = 0;
        log::info!(
            "Level {} loaded: {} blocks ({} destructible)",
            self.level,
            self.blocks.len(),
            self.total_blocks
        );
    }

    /// The three walls: left, top, right (there is no floor)
    pub fn walls(&self) -> [Body; 3] {
        let w = self.config.field_width;
        let h = self.config.field_height;
        [
            Body::new(Vec2::ZERO, WALL_THICKNESS, h, Color::Gray),
            Body::new(Vec2::ZERO, w, WALL_THICKNESS, Color::Gray),
            Body::new(Vec2::new(w - WALL_THICKNESS, 0.0), WALL_THICKNESS, h, Color::Gray),
        ]
    }

    pub fn main_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.main)
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.config.max_levels
    }

    /// Remove a fallen ball, handing the main flag on if needed
    pub(crate) fn remove_ball(&mut self, index: usize) {
        let removed = self.balls.remove(index);
        if removed.main {
            if let Some(first) = self.balls.first_mut() {
                first.main = true;
            }
        }
    }

    /// Launch the main ball if it is resting
    pub fn launch(&mut self) {
        let speed = self.config.initial_speed;
        let max_speed = self.config.max_ball_speed;
        let Some(index) = self.balls.iter().position(|b| b.main) else {
            return;
        };
        if !self.balls[index].in_play {
            self.balls[index].launch(speed, max_speed, &mut self.rng);
            log::debug!("Ball launched");
        }
    }

    /// Restart after a loss, or advance after a win
    pub fn reset(&mut self) {
        if self.status == GameStatus::Won && self.level < self.config.max_levels {
            self.level += 1;
            log::info!("Advancing to level {}", self.level);
        } else {
            self.level = 1;
            self.lives = self.config.starting_lives;
            log::info!("Starting new run");
        }
        self.load_level();
        self.status = GameStatus::Playing;

        // Restore size first so centering uses the real width
        self.paddle.body.width = self.config.paddle_width;
        self.paddle.vel = Vec2::ZERO;
        self.paddle
            .center_on(self.config.field_width / 2.0, self.config.field_width);

        let mut main = match self.balls.iter().position(|b| b.main) {
            Some(i) => self.balls.swap_remove(i),
            None => Ball::main_ball(self.config.field_width, self.config.field_height),
        };
        main.reset();
        main.rest_on(&self.paddle);
        self.balls.clear();
        self.balls.push(main);

        self.power_ups.clear();
        self.effects.clear();
        self.time_scale = 1.0;
        self.manual_slow_motion = false;
        self.message = None;
    }
}
