//! Level layouts
//!
//! One generator per level. Block positions depend only on the
//! [`LevelConfig`]; the RNG is only used to hand out power-ups.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Color;
use super::state::{Block, PowerUpKind};
use crate::consts::*;

/// Top edge of the grid and boss layouts
const GRID_TOP: f32 = 60.0;
/// Top edge of the diamond and invader layouts
const PATTERN_TOP: f32 = 50.0;
/// Rows in the diamond (widest row has the same count)
const DIAMOND_SIZE: usize = 7;
/// Invader origin sits this far left of the field center
const INVADER_OFFSET_X: f32 = 150.0;
/// Gap between invader cells
const INVADER_GAP: f32 = 2.0;
const BOSS_COLS: usize = 8;
const BOSS_ROWS: usize = 5;

/// Layout parameters shared by every generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub field_width: f32,
    pub field_height: f32,
    /// Grid rows (level 1)
    pub rows: usize,
    /// Grid columns (level 1)
    pub cols: usize,
    pub block_width: f32,
    pub block_height: f32,
    pub padding: f32,
    /// Independent per-block chance of carrying a power-up
    pub power_up_chance: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            rows: BLOCK_ROWS,
            cols: BLOCK_COLS,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            padding: BLOCK_PADDING,
            power_up_chance: POWER_UP_CHANCE,
        }
    }
}

impl LevelConfig {
    /// Width of `n` blocks laid side by side with padding between them
    fn row_span(&self, n: usize, gap: f32) -> f32 {
        self.block_width * n as f32 + gap * (n as f32 - 1.0)
    }

    fn column_span(&self, n: usize, gap: f32) -> f32 {
        self.block_height * n as f32 + gap * (n as f32 - 1.0)
    }

    /// Smallest field every fixed layout fits in, above the paddle line
    ///
    /// The spiral drops blocks that do not fit, so it adds no constraint.
    pub fn min_field_size(&self) -> Vec2 {
        let invader_cols = INVADER[0].len();
        let invader_width = self.row_span(invader_cols, INVADER_GAP);
        // Origin is pinned to the center, so the right half must hold the overhang
        let invader_min_width = 2.0 * (invader_width - INVADER_OFFSET_X).max(INVADER_OFFSET_X);

        let width = self
            .row_span(self.cols, self.padding)
            .max(self.row_span(DIAMOND_SIZE, self.padding))
            .max(self.row_span(BOSS_COLS, self.padding))
            .max(invader_min_width);

        let bottom = (GRID_TOP + self.column_span(self.rows, self.padding))
            .max(PATTERN_TOP + self.column_span(DIAMOND_SIZE, self.padding))
            .max(PATTERN_TOP + self.column_span(INVADER.len(), INVADER_GAP))
            .max(GRID_TOP + self.column_span(BOSS_ROWS, self.padding));

        Vec2::new(width, bottom + PADDLE_BOTTOM_OFFSET)
    }
}

/// Level patterns, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Grid,
    Diamond,
    Invader,
    Spiral,
    Boss,
}

impl Level {
    /// Pattern for a 1-based level number; unknown levels use the grid
    pub fn from_number(level: u32) -> Self {
        match level {
            2 => Level::Diamond,
            3 => Level::Invader,
            4 => Level::Spiral,
            5 => Level::Boss,
            _ => Level::Grid,
        }
    }

    pub fn generate(self, cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
        match self {
            Level::Grid => grid(cfg, rng),
            Level::Diamond => diamond(cfg, rng),
            Level::Invader => invader(cfg, rng),
            Level::Spiral => spiral(cfg, rng),
            Level::Boss => boss(cfg, rng),
        }
    }
}

/// Build the blocks for a 1-based level number
pub fn generate_level(level: u32, cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
    Level::from_number(level).generate(cfg, rng)
}

/// A block with a random chance of carrying a power-up
fn make_block(pos: Vec2, color: Color, cfg: &LevelConfig, rng: &mut impl Rng) -> Block {
    let mut block = Block::new(pos, cfg.block_width, cfg.block_height, color);
    if rng.random_bool(cfg.power_up_chance.clamp(0.0, 1.0)) {
        block.power_up = Some(PowerUpKind::random(rng));
    }
    block
}

/// Level 1: centered `rows x cols` grid
pub fn grid(cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
    let pitch_x = cfg.block_width + cfg.padding;
    let pitch_y = cfg.block_height + cfg.padding;
    let row_width = cfg.row_span(cfg.cols, cfg.padding);
    let start = Vec2::new((cfg.field_width - row_width) / 2.0, GRID_TOP);

    let mut blocks = Vec::with_capacity(cfg.rows * cfg.cols);
    for row in 0..cfg.rows {
        for col in 0..cfg.cols {
            let pos = start + Vec2::new(col as f32 * pitch_x, row as f32 * pitch_y);
            let color = Color::PALETTE[row % Color::PALETTE.len()];
            blocks.push(make_block(pos, color, cfg, rng));
        }
    }
    blocks
}

/// Level 2: diamond of 1, 3, 5, 7, 5, 3, 1 blocks
pub fn diamond(cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
    let pitch_x = cfg.block_width + cfg.padding;
    let pitch_y = cfg.block_height + cfg.padding;

    let mut blocks = Vec::new();
    for row in 0..DIAMOND_SIZE {
        let in_row = if row < DIAMOND_SIZE / 2 + 1 {
            row * 2 + 1
        } else {
            (DIAMOND_SIZE - row - 1) * 2 + 1
        };
        let row_width = cfg.row_span(in_row, cfg.padding);
        let start_x = cfg.field_width / 2.0 - row_width / 2.0;
        let color = Color::PALETTE[row % Color::PALETTE.len()];

        for col in 0..in_row {
            let pos = Vec2::new(
                start_x + col as f32 * pitch_x,
                PATTERN_TOP + row as f32 * pitch_y,
            );
            blocks.push(make_block(pos, color, cfg, rng));
        }
    }
    blocks
}

/// Character pattern for level 3 (`X` = block)
const INVADER: [&str; 7] = [
    "  XXX  ",
    " XXXXX ",
    "XX X XX",
    "XXXXXXX",
    "X XXXXX",
    "X X X  ",
    "   X   ",
];

/// Level 3: space invader drawn from a character pattern
pub fn invader(cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
    let origin = Vec2::new(cfg.field_width / 2.0 - INVADER_OFFSET_X, PATTERN_TOP);

    let mut blocks = Vec::new();
    for (row, line) in INVADER.iter().enumerate() {
        let color = match row {
            0..=1 => Color::Green,
            2..=4 => Color::Red,
            _ => Color::Blue,
        };
        for (col, cell) in line.chars().enumerate() {
            if cell != 'X' {
                continue;
            }
            let pos = origin
                + Vec2::new(
                    col as f32 * (cfg.block_width + INVADER_GAP),
                    row as f32 * (cfg.block_height + INVADER_GAP),
                );
            blocks.push(make_block(pos, color, cfg, rng));
        }
    }
    blocks
}

/// Level 4: concentric rings, outermost first
///
/// Blocks that would overlap one already placed, or stick out of the
/// playable area, are skipped.
pub fn spiral(cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
    const MAX_RADIUS: u32 = 150;
    const MIN_RADIUS: u32 = 40;
    const RADIUS_STEP: u32 = 15;

    let center = Vec2::new(cfg.field_width / 2.0, cfg.field_height / 3.0);
    let half = Vec2::new(cfg.block_width / 2.0, cfg.block_height / 2.0);
    let area_max = Vec2::new(cfg.field_width, cfg.field_height - PADDLE_BOTTOM_OFFSET);

    let mut blocks: Vec<Block> = Vec::new();
    let mut radius = MAX_RADIUS;
    while radius > MIN_RADIUS {
        let r = radius as f32;
        let in_ring = (TAU * r / (cfg.block_width * 1.2)).floor() as usize;
        let color = Color::PALETTE[(radius / RADIUS_STEP) as usize % Color::PALETTE.len()];

        for i in 0..in_ring {
            let angle = i as f32 * TAU / in_ring as f32;
            let pos = center + Vec2::new(angle.cos(), angle.sin()) * r - half;
            let block = make_block(pos, color, cfg, rng);

            let fits = block.body.inside(Vec2::ZERO, area_max);
            let clear = blocks.iter().all(|b| !b.body.overlaps(&block.body));
            if fits && clear {
                blocks.push(block);
            }
        }
        radius -= RADIUS_STEP;
    }
    blocks
}

/// Level 5: a gold indestructible top row over a hollowed grid
pub fn boss(cfg: &LevelConfig, rng: &mut impl Rng) -> Vec<Block> {
    let pitch_x = cfg.block_width + cfg.padding;
    let pitch_y = cfg.block_height + cfg.padding;
    let row_width = cfg.row_span(BOSS_COLS, cfg.padding);
    let start = Vec2::new((cfg.field_width - row_width) / 2.0, GRID_TOP);

    let mut blocks = Vec::new();
    for col in 0..BOSS_COLS {
        let pos = start + Vec2::new(col as f32 * pitch_x, 0.0);
        let mut block = Block::new(pos, cfg.block_width, cfg.block_height, Color::Gold);
        block.indestructible = true;
        blocks.push(block);
    }

    for row in 1..BOSS_ROWS {
        for col in 0..BOSS_COLS {
            // Hollow 2x2 core
            if (row == 2 || row == 3) && (col == 3 || col == 4) {
                continue;
            }
            let pos = start + Vec2::new(col as f32 * pitch_x, row as f32 * pitch_y);
            let color = Color::PALETTE[(row + col) % Color::PALETTE.len()];
            blocks.push(make_block(pos, color, cfg, rng));
        }
    }
    blocks
}
