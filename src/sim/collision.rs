//! Collision response for axis-aligned boxes
//!
//! Detection is a plain box overlap; the interesting part is the response:
//! paddle hits pick a launch angle from the contact offset, block hits flip
//! the axis along which the centers are furthest apart.

use glam::Vec2;

use super::body::Body;
use crate::consts::PADDLE_MAX_BOUNCE_ANGLE;

/// Which velocity component a wall or block reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Cap the magnitude of `vel` at `max_speed`
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    if vel.length() > max_speed {
        vel.normalize_or_zero() * max_speed
    } else {
        vel
    }
}

/// Flip one velocity component
#[inline]
pub fn reflect(vel: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::X => Vec2::new(-vel.x, vel.y),
        Axis::Y => Vec2::new(vel.x, -vel.y),
    }
}

/// Axis to reflect on when `ball` hits `block`
///
/// Horizontal-dominant center offset flips X, anything else flips Y.
pub fn dominant_axis(ball: &Body, block: &Body) -> Axis {
    let diff = ball.center() - block.center();
    if diff.x.abs() > diff.y.abs() {
        Axis::X
    } else {
        Axis::Y
    }
}

/// Contact offset of `ball` along `paddle`, normalized to [-1, 1]
///
/// 0 = paddle center, -1/+1 = left/right edge.
pub fn paddle_hit_offset(ball: &Body, paddle: &Body) -> f32 {
    let half = paddle.width / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((ball.center().x - paddle.center().x) / half).clamp(-1.0, 1.0)
}

/// Velocity after a paddle hit
///
/// Keeps the incoming speed, deflects up to 60 degrees from vertical and
/// always heads upward.
pub fn paddle_bounce(vel: Vec2, ball: &Body, paddle: &Body) -> Vec2 {
    let angle = paddle_hit_offset(ball, paddle) * PADDLE_MAX_BOUNCE_ANGLE;
    let speed = vel.length();
    Vec2::new(angle.sin() * speed, -(angle.cos() * speed).abs())
}
