//! Between-wave break
//!
//! Counts down and returns to the wave scene. The upgrade UI lives outside
//! the core; this scene only owns the timer.

use glam::Vec2;

use crate::engine::{Scene, SceneChange, SceneCommand, Session};
use crate::renderer::{BACKGROUND, Canvas};
use crate::sim::state::colors;

use super::WaveScene;

/// Seconds before the next wave starts on its own
pub const SHOP_SECONDS: f32 = 20.0;

#[derive(Debug)]
pub struct ShopScene {
    remaining: f32,
}

impl Default for ShopScene {
    fn default() -> Self {
        Self::new()
    }
}

impl ShopScene {
    pub fn new() -> Self {
        Self {
            remaining: SHOP_SECONDS,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Scene for ShopScene {
    fn name(&self) -> &'static str {
        "shop"
    }

    fn enter(&mut self, session: &mut Session) {
        self.remaining = SHOP_SECONDS;
        log::info!(
            "Shop open: {} credits, wave {} next",
            session.game.credits,
            session.game.wave
        );
    }

    fn update(&mut self, _session: &mut Session, dt: f32) -> SceneChange {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            Some(Box::new(WaveScene::new()))
        } else {
            None
        }
    }

    fn render(&self, session: &Session, canvas: &mut dyn Canvas, _alpha: f32) {
        canvas.clear(BACKGROUND);
        let hw = session.tuning.viewport.half_width();
        canvas.bar(
            Vec2::new(-hw * 0.5, 0.0),
            Vec2::new(hw, 12.0),
            self.remaining / SHOP_SECONDS,
            colors::GOLD,
        );
    }

    fn exit(&mut self, session: &mut Session) {
        session.save_settings();
    }

    fn command(&mut self, _session: &mut Session, command: SceneCommand) -> SceneChange {
        match command {
            SceneCommand::Skip => Some(Box::new(WaveScene::new())),
            SceneCommand::Restart => None,
        }
    }
}
