//! Browser platform layer
//!
//! Handles the browser side of the game:
//! - Canvas 2D drawing (`Surface` implementation)
//! - Keyboard mapping into `InputState`
//! - Pointer position in field coordinates

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use crate::input::{Direction, InputState};
use crate::render::{Surface, TextAlign};
use crate::sim::Color;

const FONT_FAMILY: &str = "Arial";

/// `Surface` over a canvas 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up the canvas by element id and size it to the field
    pub fn from_element_id(id: &str, width: f32, height: f32) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        ctx.set_text_baseline("middle");

        Ok(Self { canvas, ctx })
    }

    /// Convert a mouse event to a field x coordinate
    pub fn pointer_x(&self, event: &MouseEvent) -> f32 {
        let rect = self.canvas.get_bounding_client_rect();
        let x = event.client_x() as f64 - rect.left();
        // Canvas may be CSS-scaled
        let scale = if rect.width() > 0.0 {
            self.canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        (x * scale) as f32
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ctx.set_fill_style_str(color.as_css());
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ctx.set_stroke_style_str(color.as_css());
        self.ctx
            .stroke_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(color.as_css());
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size_px: f32,
        align: TextAlign,
        color: Color,
    ) {
        self.ctx.set_fill_style_str(color.as_css());
        self.ctx.set_font(&format!("{}px {}", size_px, FONT_FAMILY));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        if let Err(e) = self.ctx.fill_text(text, x as f64, y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }
}

/// Feed a key press into the input state; returns true if the key was used
pub fn key_down(input: &mut InputState, event: &KeyboardEvent) -> bool {
    match event.key().as_str() {
        "ArrowLeft" => input.press(Direction::Left),
        "ArrowRight" => input.press(Direction::Right),
        " " | "Spacebar" => {
            // Held space repeats; only the first press launches
            if !event.repeat() {
                input.trigger_launch();
            }
        }
        "Shift" => input.set_slow_motion(true),
        _ => return false,
    }
    true
}

/// Feed a key release into the input state
pub fn key_up(input: &mut InputState, event: &KeyboardEvent) {
    match event.key().as_str() {
        "ArrowLeft" => input.release(Direction::Left),
        "ArrowRight" => input.release(Direction::Right),
        "Shift" => input.set_slow_motion(false),
        _ => {}
    }
}
