//! Everything a run needs, owned in one place and lent to the active scene

use crate::audio::{AudioManager, AudioSink};
use crate::highscores::HighScores;
use crate::persistence::{self, KeyValueStore};
use crate::settings::Settings;
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::TickInput;
use crate::sim::wave::WaveFlow;
use crate::sim::world::World;
use crate::tuning::Tuning;

/// Pending FX events kept for the frontend before the oldest are dropped
pub const MAX_PENDING_FX: usize = 256;

const BEST_KEY: &str = "best";

pub struct Session {
    pub game: GameState,
    pub world: World,
    pub flow: WaveFlow,
    pub tuning: Tuning,
    /// Latest input signals, consumed by the wave scene each step
    pub input: TickInput,
    pub settings: Settings,
    pub high_scores: HighScores,
    pub audio: AudioManager<Box<dyn AudioSink>>,
    store: Box<dyn KeyValueStore>,
    fx: Vec<GameEvent>,
}

impl Session {
    /// Build a run, loading preferences and scores from `store`
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn KeyValueStore>, sink: Box<dyn AudioSink>) -> Self {
        let settings = Settings::load(store.as_ref());
        let high_scores = HighScores::load(store.as_ref());

        let mut game = GameState::new(seed);
        game.best = persistence::load(store.as_ref(), BEST_KEY, 0u64);
        settings.apply_to(&mut game);

        let mut audio = AudioManager::new(sink);
        audio.set_muted(settings.muted);
        audio.set_master_volume(settings.master_volume);

        log::info!("Session created (seed {seed})");
        Self {
            game,
            world: World::new(seed),
            flow: WaveFlow::default(),
            tuning,
            input: TickInput::default(),
            settings,
            high_scores,
            audio,
            store,
            fx: Vec::new(),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    /// Route this step's events: sounds to the audio manager, the rest to
    /// the FX queue
    pub fn dispatch_events(&mut self) {
        for event in self.world.events.drain(..) {
            match event {
                GameEvent::Sound(effect) => self.audio.play(effect),
                other => self.fx.push(other),
            }
        }
        if self.fx.len() > MAX_PENDING_FX {
            let excess = self.fx.len() - MAX_PENDING_FX;
            self.fx.drain(..excess);
        }
    }

    /// Take the queued FX events
    pub fn take_fx(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.fx)
    }

    /// Edge-triggered inputs only live for one step
    pub fn clear_edge_inputs(&mut self) {
        self.input.trigger_radial = false;
        self.input.trigger_cone = false;
    }

    /// Persist the preferences, picking up in-game toggles first
    pub fn save_settings(&mut self) {
        self.settings.capture_from(&self.game);
        self.settings.muted = self.audio.is_muted();
        if let Err(err) = self.settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {err}");
        }
    }

    /// Record the finished run's score and the best score
    pub fn record_run(&mut self, timestamp: f64) -> Option<usize> {
        self.game.best = self.game.best.max(self.game.score);
        if let Err(err) = persistence::save(self.store.as_mut(), BEST_KEY, &self.game.best) {
            log::warn!("Failed to save best score: {err}");
        }
        let rank = self
            .high_scores
            .add_score(self.game.score, self.game.wave, timestamp);
        if rank.is_some() {
            if let Err(err) = self.high_scores.save(self.store.as_mut()) {
                log::warn!("Failed to save high scores: {err}");
            }
        }
        rank
    }

    /// Fresh run: state reset, every pool cleared
    pub fn restart(&mut self, seed: u64) {
        self.game.reset(seed);
        self.world.reset(seed);
        self.flow = WaveFlow::default();
        self.input = TickInput::default();
        self.fx.clear();
        log::info!("Run restarted (seed {seed})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullSink, SoundEffect};
    use crate::persistence::MemoryStore;

    fn session() -> Session {
        Session::new(5, Tuning::default(), Box::new(MemoryStore::new()), Box::new(NullSink))
    }

    #[test]
    fn test_dispatch_splits_sounds_from_fx() {
        let mut s = session();
        s.world.sound(SoundEffect::EnemyKill);
        s.world.emit(GameEvent::Barrier { enabled: true });
        s.dispatch_events();
        assert!(s.world.events.is_empty());
        assert_eq!(s.take_fx(), vec![GameEvent::Barrier { enabled: true }]);
        assert!(s.take_fx().is_empty());
    }

    #[test]
    fn test_fx_queue_is_bounded() {
        let mut s = session();
        for _ in 0..(MAX_PENDING_FX + 10) {
            s.world.emit(GameEvent::Barrier { enabled: false });
        }
        s.dispatch_events();
        assert_eq!(s.take_fx().len(), MAX_PENDING_FX);
    }

    #[test]
    fn test_best_score_survives_sessions() {
        let mut s = session();
        s.game.score = 1234;
        assert_eq!(s.record_run(1.0), Some(1));
        assert_eq!(s.game.best, 1234);

        let restored = persistence::load(s.store(), BEST_KEY, 0u64);
        assert_eq!(restored, 1234);
        assert_eq!(HighScores::load(s.store()).top_score(), Some(1234));
    }

    #[test]
    fn test_restart_clears_world() {
        let mut s = session();
        s.game.score = 500;
        s.world.enemies.spawn(Default::default());
        s.restart(6);
        assert_eq!(s.world.alive_enemies(), 0);
        assert_eq!(s.game.score, 0);
        assert_eq!(s.game.best, 500);
    }
}
