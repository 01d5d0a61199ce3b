//! Active play: one simulation tick per fixed step

use crate::engine::{Scene, SceneChange, Session};
use crate::renderer::{Canvas, draw_ability_hud, draw_world};
use crate::sim::{TickOutcome, tick};

use super::{GameOverScene, ShopScene};

#[derive(Debug, Default)]
pub struct WaveScene;

impl WaveScene {
    pub fn new() -> Self {
        Self
    }
}

impl Scene for WaveScene {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn enter(&mut self, session: &mut Session) {
        let Session {
            world,
            game,
            flow,
            tuning,
            ..
        } = session;
        flow.enter(world, game, tuning);
    }

    fn update(&mut self, session: &mut Session, dt: f32) -> SceneChange {
        let Session {
            world,
            game,
            flow,
            tuning,
            input,
            ..
        } = session;
        match tick(world, game, flow, tuning, input, dt) {
            TickOutcome::Continue => None,
            TickOutcome::WaveConcluded(reward) => {
                log::info!(
                    "Wave reward: {} kill credits + {} clear bonus",
                    reward.kills,
                    reward.clear
                );
                Some(Box::new(ShopScene::new()))
            }
            TickOutcome::GameOver => Some(Box::new(GameOverScene::new())),
        }
    }

    fn render(&self, session: &Session, canvas: &mut dyn Canvas, alpha: f32) {
        draw_world(canvas, &session.world, &session.game, &session.tuning, alpha);
        draw_ability_hud(canvas, &session.game, &session.tuning, &session.settings);
    }
}
