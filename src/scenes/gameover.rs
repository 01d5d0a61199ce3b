//! End of run: record the score, wait for a restart

use glam::Vec2;

use crate::engine::{Scene, SceneChange, SceneCommand, Session};
use crate::platform::now_ms;
use crate::renderer::{Canvas, draw_world};
use crate::sim::state::colors;

use super::WaveScene;

#[derive(Debug, Default)]
pub struct GameOverScene {
    /// Leaderboard position of the finished run, if it made the table
    rank: Option<usize>,
}

impl GameOverScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank(&self) -> Option<usize> {
        self.rank
    }
}

impl Scene for GameOverScene {
    fn name(&self) -> &'static str {
        "gameover"
    }

    fn enter(&mut self, session: &mut Session) {
        self.rank = session.record_run(now_ms());
        log::info!(
            "Game over: score {} (best {}), wave {}",
            session.game.score,
            session.game.best,
            session.game.wave
        );
    }

    fn update(&mut self, _session: &mut Session, _dt: f32) -> SceneChange {
        None
    }

    fn render(&self, session: &Session, canvas: &mut dyn Canvas, alpha: f32) {
        draw_world(canvas, &session.world, &session.game, &session.tuning, alpha);
        let hw = session.tuning.viewport.half_width();
        let best = session.game.best.max(1) as f32;
        canvas.bar(
            Vec2::new(-hw * 0.5, 0.0),
            Vec2::new(hw, 12.0),
            session.game.score as f32 / best,
            colors::DAMAGE,
        );
    }

    fn command(&mut self, session: &mut Session, command: SceneCommand) -> SceneChange {
        match command {
            SceneCommand::Restart => {
                let seed = session.game.seed.wrapping_add(1);
                session.restart(seed);
                Some(Box::new(WaveScene::new()))
            }
            SceneCommand::Skip => None,
        }
    }
}
