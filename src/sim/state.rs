//! Run-wide game state and the events the simulation emits
//!
//! `GameState` is the single cross-cutting record (score, credits, lives,
//! player stats, heat, cooldowns, power-ups). It is built once per session
//! and `reset` on restart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::consts::BOSS_EVERY;
use crate::tuning::Tuning;

/// How the arena is framed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArenaMode {
    /// Stationary turret at the origin, enemies converge from all sides
    #[default]
    Ring,
    /// Boss framing: barrier line above the player, player may move below it
    TopDown,
}

/// Player combat stats (upgraded between waves)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub damage: f32,
    /// Shots per second
    pub rate_of_fire: f32,
    pub bullet_speed: f32,
    /// Declared by the upgrade table; bullets still stop on first hit
    pub pierce: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            damage: 1.0,
            rate_of_fire: 7.0,
            bullet_speed: 900.0,
            pierce: 0,
        }
    }
}

impl PlayerStats {
    /// Ability/bomb damage: current damage rounded up, at least 1
    pub fn ability_damage(&self) -> f32 {
        self.damage.ceil().max(1.0)
    }
}

/// Weapon heat gauge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heat {
    pub value: f32,
    pub overheated: bool,
}

impl Heat {
    /// Advance the gauge one step. Value stays in `[0, max]`.
    pub fn update(&mut self, firing: bool, tuning: &crate::tuning::HeatTuning, dt: f32) {
        if self.overheated {
            self.value = (self.value - tuning.cool * dt).clamp(0.0, tuning.max);
            if self.value <= tuning.recover_at {
                self.overheated = false;
            }
        } else {
            let delta = if firing { tuning.rate } else { -tuning.cool };
            self.value = (self.value + delta * dt).clamp(0.0, tuning.max);
            if self.value >= tuning.max {
                self.overheated = true;
            }
        }
    }

    pub fn fraction(&self, max: f32) -> f32 {
        if max > 0.0 { self.value / max } else { 0.0 }
    }
}

/// Player-triggered abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    /// Radial shockwave around the player
    Radial,
    /// Forward cone along the aim direction
    Cone,
}

impl Ability {
    pub const ALL: [Ability; 2] = [Ability::Radial, Ability::Cone];
}

/// Ability cooldown timers (seconds remaining)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooldowns {
    pub radial: f32,
    pub cone: f32,
}

impl Cooldowns {
    pub fn get(&self, ability: Ability) -> f32 {
        match ability {
            Ability::Radial => self.radial,
            Ability::Cone => self.cone,
        }
    }

    pub fn set(&mut self, ability: Ability, value: f32) {
        match ability {
            Ability::Radial => self.radial = value,
            Ability::Cone => self.cone = value,
        }
    }

    /// Tick both timers down. Slot `i` of the result is `Some` when
    /// `Ability::ALL[i]` became ready during this tick.
    pub fn tick(&mut self, dt: f32) -> [Option<Ability>; 2] {
        Ability::ALL.map(|ability| {
            let prev = self.get(ability);
            let next = (prev - dt).max(0.0);
            self.set(ability, next);
            (prev > 0.0 && next == 0.0).then_some(ability)
        })
    }
}

/// Pickup / power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickupKind {
    #[default]
    Rapid,
    Spread,
    Shield,
    Slow,
    DoubleScore,
    Bomb,
}

impl PickupKind {
    pub const ALL: [PickupKind; 6] = [
        PickupKind::Rapid,
        PickupKind::Spread,
        PickupKind::Shield,
        PickupKind::Slow,
        PickupKind::DoubleScore,
        PickupKind::Bomb,
    ];

    /// Pickups needed for one activation
    pub fn stack_threshold(self) -> u32 {
        match self {
            PickupKind::Rapid => 2,
            PickupKind::Spread => 2,
            PickupKind::Shield => 3,
            PickupKind::Slow => 2,
            PickupKind::DoubleScore => 4,
            PickupKind::Bomb => 1,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Timed power-ups (seconds remaining)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    pub rapid: f32,
    pub spread: f32,
    pub shield: f32,
    pub slow: f32,
    pub double_score: f32,
}

impl PowerUps {
    pub fn rapid_active(&self) -> bool {
        self.rapid > 0.0
    }

    pub fn spread_active(&self) -> bool {
        self.spread > 0.0
    }

    pub fn shield_active(&self) -> bool {
        self.shield > 0.0
    }

    pub fn slow_active(&self) -> bool {
        self.slow > 0.0
    }

    /// Reward multiplier (2 while double-score is active)
    pub fn score_mult(&self) -> u32 {
        if self.double_score > 0.0 { 2 } else { 1 }
    }

    /// Decay every timer, floored at zero
    pub fn tick(&mut self, dt: f32) {
        for t in [
            &mut self.rapid,
            &mut self.spread,
            &mut self.shield,
            &mut self.slow,
            &mut self.double_score,
        ] {
            *t = (*t - dt).max(0.0);
        }
    }
}

/// Collected pickups toward the next activation, per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickupStacks {
    counts: [u32; 6],
}

impl PickupStacks {
    pub fn get(&self, kind: PickupKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Add one pickup; returns how many activations it completed.
    /// The stored count stays below the kind's threshold.
    pub fn add(&mut self, kind: PickupKind) -> u32 {
        let cap = kind.stack_threshold();
        let mut count = self.counts[kind.index()] + 1;
        let mut activations = 0;
        while count >= cap {
            count -= cap;
            activations += 1;
        }
        self.counts[kind.index()] = count;
        activations
    }
}

/// Reward breakdown of the last concluded wave
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub kills: u32,
    pub clear: u32,
}

impl RewardBreakdown {
    pub fn total(&self) -> u32 {
        self.kills + self.clear
    }
}

/// Complete run state (process-wide, single instance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u64,
    pub best: u64,
    pub credits: u32,
    pub lives: u8,
    /// Current wave (1-based)
    pub wave: u32,
    /// Credits earned from kills during the current wave
    pub earned_this_wave: u32,
    pub last_reward: RewardBreakdown,
    pub stats: PlayerStats,
    pub heat: Heat,
    pub cooldowns: Cooldowns,
    /// Seconds of post-hit invulnerability remaining
    pub invuln: f32,
    pub powerups: PowerUps,
    pub stacks: PickupStacks,
    pub arena: ArenaMode,
    /// Player world position (origin in ring mode)
    pub player_pos: Vec2,
    /// Autonomous defensive lasers
    pub laser_enabled: bool,
    /// Dev autopilot for the main weapon
    pub auto_fire: bool,
    pub auto_range: f32,
}

impl GameState {
    pub const STARTING_LIVES: u8 = 3;

    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            best: 0,
            credits: 0,
            lives: Self::STARTING_LIVES,
            wave: 1,
            earned_this_wave: 0,
            last_reward: RewardBreakdown::default(),
            stats: PlayerStats::default(),
            heat: Heat::default(),
            cooldowns: Cooldowns::default(),
            invuln: 0.0,
            powerups: PowerUps::default(),
            stacks: PickupStacks::default(),
            arena: ArenaMode::Ring,
            player_pos: Vec2::ZERO,
            laser_enabled: true,
            auto_fire: false,
            auto_range: 240.0,
        }
    }

    /// Start a fresh run, keeping best score and preference flags
    pub fn reset(&mut self, seed: u64) {
        let best = self.best.max(self.score);
        let (laser_enabled, auto_fire, auto_range) =
            (self.laser_enabled, self.auto_fire, self.auto_range);
        *self = Self::new(seed);
        self.best = best;
        self.laser_enabled = laser_enabled;
        self.auto_fire = auto_fire;
        self.auto_range = auto_range;
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave % BOSS_EVERY == 0
    }

    /// Credit an enemy/boss reward (already multiplied)
    pub fn grant(&mut self, score: u64, credits: u32) {
        self.score += score;
        self.credits += credits;
        self.earned_this_wave += credits;
    }

    /// Grant the wave-clear bonus, record the breakdown, advance the wave
    pub fn conclude_wave(&mut self, tuning: &Tuning) -> RewardBreakdown {
        let clear = tuning.clear_bonus(self.wave);
        let breakdown = RewardBreakdown {
            kills: self.earned_this_wave,
            clear,
        };
        self.credits += clear;
        self.last_reward = breakdown;
        self.wave += 1;
        breakdown
    }
}

/// Fire-and-forget hooks for excluded collaborators (FX, audio, camera)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Radial ability ring
    Ring { pos: Vec2 },
    /// Cone ability sweep
    Cone { pos: Vec2, angle: f32 },
    DeathBurst { pos: Vec2, color: u32 },
    ShotSpark { pos: Vec2 },
    ColdBurst { pos: Vec2 },
    Explosion { pos: Vec2 },
    ColdAura {
        pos: Vec2,
        radius: f32,
        duration: f32,
        strength: f32,
    },
    Letterbox { show: bool, duration: f32 },
    Barrier { enabled: bool },
    ScreenFlash { strength: f32, color: u32 },
    AbilityReady(Ability),
    Sound(SoundEffect),
}

/// Palette used by FX events
pub mod colors {
    pub const CYAN: u32 = 0x25d0ff;
    pub const AMBER: u32 = 0xffb63b;
    pub const GOLD: u32 = 0xffd166;
    pub const TANK: u32 = 0xff946b;
    pub const DAMAGE: u32 = 0xff6b6b;
}
