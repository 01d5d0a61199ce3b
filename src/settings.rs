//! Game settings and preferences
//!
//! Each preference is persisted under its own key through a
//! `KeyValueStore`, so a corrupt or missing entry only resets that one field.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StorageError};
use crate::sim::state::GameState;

/// How ability cooldowns are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AbilityUiMode {
    /// Bars in a screen corner
    #[default]
    Corner,
    /// Arc gauges around the turret
    Ring,
}

impl AbilityUiMode {
    pub fn toggled(self) -> Self {
        match self {
            AbilityUiMode::Corner => AbilityUiMode::Ring,
            AbilityUiMode::Ring => AbilityUiMode::Corner,
        }
    }
}

/// Screen corner for the corner ability UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ScreenCorner {
    pub fn is_top(self) -> bool {
        matches!(self, ScreenCorner::TopLeft | ScreenCorner::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, ScreenCorner::TopLeft | ScreenCorner::BottomLeft)
    }

    /// Clockwise from the top-left
    pub fn next(self) -> Self {
        match self {
            ScreenCorner::TopLeft => ScreenCorner::TopRight,
            ScreenCorner::TopRight => ScreenCorner::BottomRight,
            ScreenCorner::BottomRight => ScreenCorner::BottomLeft,
            ScreenCorner::BottomLeft => ScreenCorner::TopLeft,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Gameplay ===
    /// Autonomous defensive lasers
    pub laser_enabled: bool,
    /// Dev autopilot for the main weapon
    pub auto_fire: bool,
    /// Autopilot engagement range (world units)
    pub auto_range: f32,

    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === HUD ===
    pub ability_ui_mode: AbilityUiMode,
    pub ability_ui_corner: ScreenCorner,
    pub show_ability_labels: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            laser_enabled: true,
            auto_fire: false,
            auto_range: 240.0,

            muted: false,
            master_volume: 0.8,

            ability_ui_mode: AbilityUiMode::Corner,
            ability_ui_corner: ScreenCorner::BottomRight,
            show_ability_labels: true,
        }
    }
}

impl Settings {
    const LASER_ENABLED: &'static str = "laser_enabled";
    const AUTO_FIRE: &'static str = "auto_fire";
    const AUTO_RANGE: &'static str = "auto_range";
    const MUTED: &'static str = "muted";
    const MASTER_VOLUME: &'static str = "master_volume";
    const ABILITY_UI_MODE: &'static str = "ability_ui_mode";
    const ABILITY_UI_CORNER: &'static str = "ability_ui_corner";
    const SHOW_ABILITY_LABELS: &'static str = "show_ability_labels";

    /// Load every preference, defaulting the ones that are missing or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let d = Self::default();
        let settings = Self {
            laser_enabled: persistence::load(store, Self::LASER_ENABLED, d.laser_enabled),
            auto_fire: persistence::load(store, Self::AUTO_FIRE, d.auto_fire),
            auto_range: persistence::load(store, Self::AUTO_RANGE, d.auto_range),
            muted: persistence::load(store, Self::MUTED, d.muted),
            master_volume: persistence::load(store, Self::MASTER_VOLUME, d.master_volume)
                .clamp(0.0, 1.0),
            ability_ui_mode: persistence::load(store, Self::ABILITY_UI_MODE, d.ability_ui_mode),
            ability_ui_corner: persistence::load(
                store,
                Self::ABILITY_UI_CORNER,
                d.ability_ui_corner,
            ),
            show_ability_labels: persistence::load(
                store,
                Self::SHOW_ABILITY_LABELS,
                d.show_ability_labels,
            ),
        };
        log::info!("Loaded settings");
        settings
    }

    /// Persist every preference
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        persistence::save(store, Self::LASER_ENABLED, &self.laser_enabled)?;
        persistence::save(store, Self::AUTO_FIRE, &self.auto_fire)?;
        persistence::save(store, Self::AUTO_RANGE, &self.auto_range)?;
        persistence::save(store, Self::MUTED, &self.muted)?;
        persistence::save(store, Self::MASTER_VOLUME, &self.master_volume)?;
        persistence::save(store, Self::ABILITY_UI_MODE, &self.ability_ui_mode)?;
        persistence::save(store, Self::ABILITY_UI_CORNER, &self.ability_ui_corner)?;
        persistence::save(store, Self::SHOW_ABILITY_LABELS, &self.show_ability_labels)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Copy the gameplay preferences into the run state
    pub fn apply_to(&self, game: &mut GameState) {
        game.laser_enabled = self.laser_enabled;
        game.auto_fire = self.auto_fire;
        game.auto_range = self.auto_range;
    }

    /// Read gameplay preferences back from the run state (after in-game toggles)
    pub fn capture_from(&mut self, game: &GameState) {
        self.laser_enabled = game.laser_enabled;
        self.auto_fire = game.auto_fire;
        self.auto_range = game.auto_range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_store_empty() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            auto_fire: true,
            auto_range: 320.0,
            ability_ui_mode: AbilityUiMode::Ring,
            ability_ui_corner: ScreenCorner::TopLeft,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(
            store.load_raw("sp_ability_ui_corner").unwrap().as_deref(),
            Some("\"top-left\"")
        );
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_bad_field_only_resets_itself() {
        let mut store = MemoryStore::new();
        store.save_raw("sp_auto_fire", "true").unwrap();
        store.save_raw("sp_auto_range", "\"far\"").unwrap();
        let settings = Settings::load(&store);
        assert!(settings.auto_fire);
        assert_eq!(settings.auto_range, 240.0);
    }

    #[test]
    fn test_apply_to_game() {
        let mut game = GameState::new(1);
        let settings = Settings {
            laser_enabled: false,
            auto_fire: true,
            ..Settings::default()
        };
        settings.apply_to(&mut game);
        assert!(!game.laser_enabled);
        assert!(game.auto_fire);
        assert_eq!(AbilityUiMode::Corner.toggled(), AbilityUiMode::Ring);
    }

    #[test]
    fn test_corner_cycle_visits_all_four() {
        let mut corner = ScreenCorner::default();
        let mut seen = vec![corner];
        for _ in 0..3 {
            corner = corner.next();
            assert!(!seen.contains(&corner));
            seen.push(corner);
        }
        assert_eq!(corner.next(), ScreenCorner::default());
        assert!(ScreenCorner::TopLeft.is_top() && ScreenCorner::TopLeft.is_left());
        assert!(!ScreenCorner::BottomRight.is_top() && !ScreenCorner::BottomRight.is_left());
    }
}
