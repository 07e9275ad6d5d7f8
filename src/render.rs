//! Draw pass
//!
//! The game draws itself against an abstract [`Surface`] so the simulation
//! never touches a platform API. The wasm32 build implements `Surface` for the
//! browser canvas; tests use a recording surface.

use glam::Vec2;

use crate::sim::{Ball, Block, Body, Color, Game, GameStatus, Paddle, PowerUp};

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Minimal 2D drawing target
pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size_px: f32,
        align: TextAlign,
        color: Color,
    );
    /// Global opacity for subsequent draws, in [0, 1]
    fn set_alpha(&mut self, alpha: f32);
}

/// HUD layout
const HUD_TEXT_SIZE: f32 = 20.0;
const HUD_MARGIN: f32 = 20.0;
const HUD_BASELINE: f32 = 30.0;
const EFFECT_TEXT_SIZE: f32 = 16.0;
const EFFECT_TOP: f32 = 50.0;
const EFFECT_SPACING: f32 = 25.0;
const MESSAGE_TEXT_SIZE: f32 = 30.0;
/// Banner fades out over its last stretch
const MESSAGE_FADE_MS: f32 = 300.0;
const OVERLAY_ALPHA: f32 = 0.7;
const OVERLAY_TEXT_SIZE: f32 = 40.0;
const HINT_TEXT_SIZE: f32 = 20.0;
/// How far a collected capsule grows before vanishing
const COLLECT_GROWTH: f32 = 10.0;

/// Everything that shows up on the field, in draw order
pub enum Entity<'a> {
    Wall(Body),
    Block(&'a Block),
    Paddle(&'a Paddle),
    Ball(&'a Ball),
    PowerUp(&'a PowerUp),
}

impl Entity<'_> {
    pub fn draw(&self, surface: &mut impl Surface) {
        match self {
            Entity::Wall(body) => fill_body(surface, body),
            Entity::Block(block) => {
                let b = &block.body;
                fill_body(surface, b);
                surface.stroke_rect(b.pos.x, b.pos.y, b.width, b.height, Color::Black);
            }
            Entity::Paddle(paddle) => fill_body(surface, &paddle.body),
            Entity::Ball(ball) => {
                let b = &ball.body;
                surface.fill_circle(b.center(), b.width / 2.0, b.color);
            }
            Entity::PowerUp(power_up) => draw_power_up(surface, power_up),
        }
    }
}

fn fill_body(surface: &mut impl Surface, body: &Body) {
    surface.fill_rect(body.pos.x, body.pos.y, body.width, body.height, body.color);
}

fn draw_power_up(surface: &mut impl Surface, power_up: &PowerUp) {
    let b = &power_up.body;
    let radius = b.width / 2.0;

    if power_up.collected {
        let t = power_up.collect_progress();
        surface.set_alpha(1.0 - t);
        surface.fill_circle(b.center(), radius + COLLECT_GROWTH * t, b.color);
        surface.set_alpha(1.0);
        return;
    }

    surface.fill_circle(b.center(), radius, b.color);
    // Highlight
    surface.set_alpha(0.7);
    surface.fill_circle(b.pos + Vec2::splat(b.width / 3.0), b.width / 6.0, Color::White);
    surface.set_alpha(1.0);
}

impl Game {
    /// Field entities in draw order: walls, live blocks, paddle, balls, power-ups
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        self.walls()
            .into_iter()
            .map(Entity::Wall)
            .chain(self.blocks.iter().filter(|b| !b.destroyed).map(Entity::Block))
            .chain(std::iter::once(Entity::Paddle(&self.paddle)))
            .chain(self.balls.iter().map(Entity::Ball))
            .chain(self.power_ups.iter().map(Entity::PowerUp))
    }

    /// Draw one full frame
    pub fn draw(&self, surface: &mut impl Surface) {
        let w = self.config.field_width;
        let h = self.config.field_height;

        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, w, h, Color::Black);

        for entity in self.entities() {
            entity.draw(surface);
        }

        self.draw_hud(surface);

        match self.status {
            GameStatus::Playing => {}
            GameStatus::GameOver => draw_overlay(surface, w, h, "GAME OVER"),
            GameStatus::Won if self.is_final_level() => {
                draw_overlay(surface, w, h, "GAME COMPLETED!");
            }
            GameStatus::Won => {
                let text = format!("LEVEL {} COMPLETED!", self.level);
                draw_overlay(surface, w, h, &text);
                surface.fill_text(
                    "Press SPACE for next level",
                    w / 2.0,
                    h / 2.0 + 50.0,
                    HINT_TEXT_SIZE,
                    TextAlign::Center,
                    Color::White,
                );
            }
        }
    }

    fn draw_hud(&self, surface: &mut impl Surface) {
        let w = self.config.field_width;
        let h = self.config.field_height;

        // Active effects with whole seconds left
        let mut y = EFFECT_TOP;
        for (kind, remaining) in self.active_effects() {
            let seconds = (remaining / 1000.0).ceil() as u32;
            let text = format!("{} ({}s)", kind.label(), seconds);
            surface.fill_text(
                &text,
                w / 2.0 - 80.0,
                y,
                EFFECT_TEXT_SIZE,
                TextAlign::Left,
                Color::White,
            );
            y += EFFECT_SPACING;
        }

        let blocks = format!("Blocks: {}/{}", self.blocks_destroyed, self.total_blocks);
        let lives = format!("Lives: {}", self.lives);
        for (text, x) in [(blocks, HUD_MARGIN), (lives, w - 100.0)] {
            surface.fill_text(
                &text,
                x,
                HUD_BASELINE,
                HUD_TEXT_SIZE,
                TextAlign::Left,
                Color::White,
            );
        }

        if let Some(message) = self.power_up_message() {
            surface.set_alpha((message.remaining / MESSAGE_FADE_MS).min(1.0));
            surface.fill_text(
                message.text,
                w / 2.0,
                h / 2.0 - 100.0,
                MESSAGE_TEXT_SIZE,
                TextAlign::Center,
                Color::White,
            );
            surface.set_alpha(1.0);
        }
    }
}

/// Dim the field and show a status line
fn draw_overlay(surface: &mut impl Surface, w: f32, h: f32, text: &str) {
    surface.set_alpha(OVERLAY_ALPHA);
    surface.fill_rect(0.0, 0.0, w, h, Color::Black);
    surface.set_alpha(1.0);
    surface.fill_text(
        text,
        w / 2.0,
        h / 2.0,
        OVERLAY_TEXT_SIZE,
        TextAlign::Center,
        Color::White,
    );
}
