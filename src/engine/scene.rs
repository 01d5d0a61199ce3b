//! Scene switching
//!
//! A scene gets `enter`/`update`/`render`/`exit` calls with the shared
//! `Session`. Switching happens by returning the next scene from `update`
//! or `command`; the manager runs `exit` on the old scene and `enter` on the
//! new one.

use super::session::Session;
use crate::renderer::Canvas;

/// One-shot requests from the frontend to the active scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Leave the shop early
    Skip,
    /// Start a new run from the game-over screen
    Restart,
}

pub type SceneChange = Option<Box<dyn Scene>>;

pub trait Scene {
    fn name(&self) -> &'static str;

    fn enter(&mut self, _session: &mut Session) {}

    /// Advance one fixed step
    fn update(&mut self, session: &mut Session, dt: f32) -> SceneChange;

    fn render(&self, session: &Session, canvas: &mut dyn Canvas, alpha: f32);

    fn exit(&mut self, _session: &mut Session) {}

    fn command(&mut self, _session: &mut Session, _command: SceneCommand) -> SceneChange {
        None
    }
}

pub struct SceneManager {
    session: Session,
    current: Option<Box<dyn Scene>>,
}

impl SceneManager {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            current: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Name of the active scene
    pub fn scene_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|s| s.name())
    }

    pub fn set_scene(&mut self, mut scene: Box<dyn Scene>) {
        if let Some(mut old) = self.current.take() {
            old.exit(&mut self.session);
        }
        log::info!("Scene -> {}", scene.name());
        scene.enter(&mut self.session);
        self.current = Some(scene);
    }

    /// One fixed step of the active scene, then event dispatch
    pub fn update(&mut self, dt: f32) {
        let change = match self.current.as_mut() {
            Some(scene) => scene.update(&mut self.session, dt),
            None => None,
        };
        self.session.dispatch_events();
        self.session.clear_edge_inputs();
        if let Some(next) = change {
            self.set_scene(next);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, alpha: f32) {
        if let Some(scene) = self.current.as_ref() {
            scene.render(&self.session, canvas, alpha);
        }
    }

    pub fn command(&mut self, command: SceneCommand) {
        let change = match self.current.as_mut() {
            Some(scene) => scene.command(&mut self.session, command),
            None => None,
        };
        if let Some(next) = change {
            self.set_scene(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSink;
    use crate::persistence::MemoryStore;
    use crate::renderer::NullCanvas;
    use crate::tuning::Tuning;

    /// Counts its lifecycle calls in the session score and hands over to
    /// another instance after `ttl` updates
    struct Counter {
        ttl: u32,
    }

    impl Scene for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }
        fn enter(&mut self, session: &mut Session) {
            session.game.score += 100;
        }
        fn update(&mut self, session: &mut Session, _dt: f32) -> SceneChange {
            session.game.score += 1;
            self.ttl = self.ttl.saturating_sub(1);
            if self.ttl == 0 {
                Some(Box::new(Counter { ttl: 5 }))
            } else {
                None
            }
        }
        fn render(&self, _session: &Session, _canvas: &mut dyn Canvas, _alpha: f32) {}
        fn exit(&mut self, session: &mut Session) {
            session.game.score += 10;
        }
    }

    #[test]
    fn test_switch_runs_exit_then_enter() {
        let session = Session::new(1, Tuning::default(), Box::new(MemoryStore::new()), Box::new(NullSink));
        let mut manager = SceneManager::new(session);
        manager.set_scene(Box::new(Counter { ttl: 2 }));
        assert_eq!(manager.session().game.score, 100);
        manager.update(crate::consts::SIM_DT);
        manager.update(crate::consts::SIM_DT);
        // two updates, one exit, one enter
        assert_eq!(manager.session().game.score, 100 + 2 + 10 + 100);
        assert_eq!(manager.scene_name(), Some("counter"));
        manager.render(&mut NullCanvas, 0.0);
    }

    #[test]
    fn test_edge_inputs_last_one_step() {
        let session = Session::new(1, Tuning::default(), Box::new(MemoryStore::new()), Box::new(NullSink));
        let mut manager = SceneManager::new(session);
        manager.set_scene(Box::new(Counter { ttl: 100 }));
        manager.session_mut().input.trigger_cone = true;
        manager.update(crate::consts::SIM_DT);
        assert!(!manager.session().input.trigger_cone);
    }
}
