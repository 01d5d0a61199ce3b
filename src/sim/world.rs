//! Entity pools and per-run simulation context
//!
//! `World` owns every pool, the boss singleton and the run RNG. Subsystems
//! receive it by `&mut` together with the `GameState`; nothing holds on to a
//! slot across ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::autopilot::Autopilot;
use super::boss::Boss;
use super::elite::ColdAura;
use super::enemy::Enemy;
use super::laser_ai::LaserAi;
use super::pickup::Pickup;
use super::pool::Pool;
use super::projectiles::{Bullet, EnemyShot, Laser};
use super::state::GameEvent;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Pending Volatile explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatileBoom {
    pub pos: Vec2,
    pub radius: f32,
    pub damage: f32,
}

#[derive(Debug, Clone)]
pub struct World {
    pub bullets: Pool<Bullet>,
    pub enemy_shots: Pool<EnemyShot>,
    pub lasers: Pool<Laser>,
    pub pickups: Pool<Pickup>,
    pub enemies: Pool<Enemy>,
    pub auras: Pool<ColdAura>,
    pub boss: Boss,
    pub laser_ai: LaserAi,
    pub autopilot: Autopilot,
    pub rng: Pcg32,
    /// Seconds until the main weapon may fire again
    pub fire_cooldown: f32,
    /// Volatile deaths waiting to be resolved this tick
    pub pending_booms: Vec<VolatileBoom>,
    /// FX/audio hooks emitted this tick, drained by the frontend
    pub events: Vec<GameEvent>,
    /// Spawns dropped because a pool was full
    pub dropped_spawns: u64,
    /// Simulation ticks since reset
    pub time_ticks: u64,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            bullets: Pool::new(MAX_BULLETS),
            enemy_shots: Pool::new(MAX_ENEMY_SHOTS),
            lasers: Pool::new(MAX_LASERS),
            pickups: Pool::new(MAX_PICKUPS),
            enemies: Pool::new(MAX_ENEMIES),
            auras: Pool::new(MAX_AURAS),
            boss: Boss::default(),
            laser_ai: LaserAi::default(),
            autopilot: Autopilot::default(),
            rng: Pcg32::seed_from_u64(seed),
            fire_cooldown: 0.0,
            pending_booms: Vec::new(),
            events: Vec::new(),
            dropped_spawns: 0,
            time_ticks: 0,
        }
    }

    /// Clear every pool and timer and reseed. Idempotent.
    pub fn reset(&mut self, seed: u64) {
        self.bullets.reset();
        self.enemy_shots.reset();
        self.lasers.reset();
        self.pickups.reset();
        self.enemies.reset();
        self.auras.reset();
        self.boss = Boss::default();
        self.laser_ai.reset();
        self.autopilot = Autopilot::default();
        self.rng = Pcg32::seed_from_u64(seed);
        self.fire_cooldown = 0.0;
        self.pending_booms.clear();
        self.events.clear();
        self.dropped_spawns = 0;
        self.time_ticks = 0;
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.active_count()
    }

    /// Release every enemy shot (bomb, boss outro)
    pub fn clear_enemy_shots(&mut self) {
        self.enemy_shots.reset();
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn note_dropped_spawn(&mut self, what: &str) {
        self.dropped_spawns += 1;
        log::debug!("{what} pool full, spawn dropped ({} total)", self.dropped_spawns);
    }
}
