//! Power-up activation, expiry and timers
//!
//! Each timed kind owns one countdown slot in [`ActiveEffects`]. Timers tick on
//! real (unscaled) time so slow motion does not extend itself.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Game, PowerUpKind, PowerUpMessage};
use super::collision::clamp_speed;
use crate::consts::*;

impl Game {
    /// Apply the effect of a caught power-up
    pub fn activate_power_up(&mut self, kind: PowerUpKind) {
        self.message = Some(PowerUpMessage {
            text: kind.message(),
            remaining: POWER_UP_MESSAGE_MS,
        });
        log::debug!("Power-up caught: {:?}", kind);

        match kind {
            PowerUpKind::SlowMotion => {
                self.time_scale = self.config.slow_motion_factor;
            }
            PowerUpKind::ExpandPaddle => {
                // A second catch only refreshes the timer
                if self.effects.paddle_base_width.is_none() {
                    let base = self.paddle.body.width;
                    self.effects.paddle_base_width = Some(base);
                    self.paddle
                        .resize(base * EXPAND_FACTOR, self.config.field_width);
                }
            }
            PowerUpKind::Multiball => self.spawn_multiball(),
            PowerUpKind::ExtraLife => self.lives += 1,
        }

        if kind.is_timed() {
            self.effects.timers[kind.index()] = Some(self.config.power_up_duration_ms);
        }
    }

    /// Undo the effect of an expired power-up
    pub fn deactivate_power_up(&mut self, kind: PowerUpKind) {
        self.effects.timers[kind.index()] = None;
        log::debug!("Power-up expired: {:?}", kind);

        match kind {
            PowerUpKind::SlowMotion => {
                if !self.manual_slow_motion {
                    self.time_scale = 1.0;
                }
            }
            PowerUpKind::ExpandPaddle => {
                if let Some(base) = self.effects.paddle_base_width.take() {
                    self.paddle.resize(base, self.config.field_width);
                }
            }
            // Extra balls stay until they fall out
            PowerUpKind::Multiball | PowerUpKind::ExtraLife => {}
        }
    }

    /// Two extra balls cloned from the first ball, each heading up and right
    fn spawn_multiball(&mut self) {
        let Some(template) = self.balls.first().map(|b| b.body.clone()) else {
            return;
        };
        let speed = self.config.initial_speed * MULTIBALL_SPEED_FACTOR;

        for _ in 0..MULTIBALL_COUNT {
            let angle = self.rng.random_range(0.0..std::f32::consts::PI);
            let mut ball = Ball::new(template.clone());
            ball.vel = clamp_speed(
                Vec2::new(angle.sin(), -angle.cos().abs()) * speed,
                self.config.max_ball_speed,
            );
            ball.in_play = true;
            self.balls.push(ball);
        }
    }

    /// Count down effect timers and the catch banner on real time
    pub(crate) fn tick_power_up_timers(&mut self, dt: f32) {
        if let Some(message) = &mut self.message {
            message.remaining -= dt;
            if message.remaining <= 0.0 {
                self.message = None;
            }
        }

        for kind in PowerUpKind::ALL {
            let Some(remaining) = self.effects.timers[kind.index()] else {
                continue;
            };
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.deactivate_power_up(kind);
            } else {
                self.effects.timers[kind.index()] = Some(remaining);
            }
        }
    }

    /// Active timed effects with their remaining time (ms)
    pub fn active_effects(&self) -> impl Iterator<Item = (PowerUpKind, f32)> + '_ {
        self.effects.iter()
    }

    /// Banner text while it is still showing
    pub fn power_up_message(&self) -> Option<&PowerUpMessage> {
        self.message.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::body::Color;

    fn game() -> Game {
        Game::new(GameConfig::default(), 11)
    }

    #[test]
    fn test_slow_motion_scales_and_restores() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::SlowMotion);
        assert_eq!(game.time_scale, SLOW_MOTION_FACTOR);
        assert_eq!(game.effects.remaining(PowerUpKind::SlowMotion), Some(POWER_UP_DURATION_MS));

        game.tick_power_up_timers(POWER_UP_DURATION_MS);
        assert_eq!(game.time_scale, 1.0);
        assert!(!game.effects.is_active(PowerUpKind::SlowMotion));
    }

    #[test]
    fn test_slow_motion_expiry_respects_manual_hold() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::SlowMotion);
        game.manual_slow_motion = true;
        game.tick_power_up_timers(POWER_UP_DURATION_MS + 1.0);
        assert_eq!(game.time_scale, SLOW_MOTION_FACTOR);
    }

    #[test]
    fn test_expand_paddle_recenters() {
        let mut game = game();
        let center = game.paddle.center_x();
        game.activate_power_up(PowerUpKind::ExpandPaddle);
        assert_eq!(game.paddle.body.width, PADDLE_WIDTH * EXPAND_FACTOR);
        assert!((game.paddle.center_x() - center).abs() < 0.001);
    }

    #[test]
    fn test_expand_expiry_restores_width_after_movement() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::ExpandPaddle);
        game.paddle.center_on(200.0, FIELD_WIDTH);

        game.tick_power_up_timers(POWER_UP_DURATION_MS);
        assert_eq!(game.paddle.body.width, PADDLE_WIDTH);
        assert!((game.paddle.center_x() - 200.0).abs() < 0.001);
        assert!(game.effects.paddle_base_width.is_none());
    }

    #[test]
    fn test_expand_near_wall_stays_in_field() {
        let mut game = game();
        game.paddle.body.pos.x = 0.0;
        game.activate_power_up(PowerUpKind::ExpandPaddle);
        assert_eq!(game.paddle.body.pos.x, 0.0);
    }

    #[test]
    fn test_expand_twice_does_not_compound() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::ExpandPaddle);
        game.tick_power_up_timers(4_000.0);
        game.activate_power_up(PowerUpKind::ExpandPaddle);
        assert_eq!(game.paddle.body.width, PADDLE_WIDTH * EXPAND_FACTOR);
        assert_eq!(game.effects.remaining(PowerUpKind::ExpandPaddle), Some(POWER_UP_DURATION_MS));

        game.tick_power_up_timers(POWER_UP_DURATION_MS);
        assert_eq!(game.paddle.body.width, PADDLE_WIDTH);
    }

    #[test]
    fn test_multiball_clones_first_ball() {
        let mut game = game();
        game.launch();
        game.activate_power_up(PowerUpKind::Multiball);

        assert_eq!(game.balls.len(), 3);
        assert!(game.balls.iter().all(|b| b.in_play));
        assert_eq!(game.balls.iter().filter(|b| b.main).count(), 1);
        let template = &game.balls[0].body;
        for ball in &game.balls[1..] {
            assert_eq!(ball.body.width, template.width);
            assert_eq!(ball.body.height, template.height);
            assert_eq!(ball.body.color, Color::White);
            assert_eq!(ball.body.pos, template.pos);
            assert!(ball.vel.y <= 0.0);
            assert!(
                (ball.speed() - BALL_INITIAL_SPEED * MULTIBALL_SPEED_FACTOR).abs() < 1e-5
            );
        }
    }

    #[test]
    fn test_multiball_balls_head_up_and_right() {
        for seed in 0..50 {
            let mut game = Game::new(GameConfig::default(), seed);
            game.activate_power_up(PowerUpKind::Multiball);
            for ball in &game.balls[1..] {
                assert!(ball.vel.x >= 0.0, "seed {seed}: vx = {}", ball.vel.x);
                assert!(ball.vel.y <= 0.0, "seed {seed}: vy = {}", ball.vel.y);
            }
        }
    }

    #[test]
    fn test_multiball_expiry_keeps_balls() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::Multiball);
        game.tick_power_up_timers(POWER_UP_DURATION_MS);
        assert_eq!(game.balls.len(), 3);
        assert!(!game.effects.is_active(PowerUpKind::Multiball));
    }

    #[test]
    fn test_extra_life_has_no_timer() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::ExtraLife);
        assert_eq!(game.lives, STARTING_LIVES + 1);
        assert!(!PowerUpKind::ExtraLife.is_timed());
        assert!(!game.effects.is_active(PowerUpKind::ExtraLife));
        assert_eq!(game.active_effects().count(), 0);
        assert_eq!(game.power_up_message().map(|m| m.text), Some("EXTRA LIFE!"));
    }

    #[test]
    fn test_message_expires() {
        let mut game = game();
        game.activate_power_up(PowerUpKind::Multiball);
        game.tick_power_up_timers(POWER_UP_MESSAGE_MS - 1.0);
        assert!(game.power_up_message().is_some());
        game.tick_power_up_timers(1.0);
        assert!(game.power_up_message().is_none());
    }
}
