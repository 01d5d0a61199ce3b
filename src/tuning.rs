//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here.
//! Defaults match the shipped balance; `Tuning::from_json` accepts partial
//! overrides (missing fields keep their defaults).

use serde::{Deserialize, Serialize};

/// Playfield size in world units (pixels at zoom 1), centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatTuning {
    pub max: f32,
    /// Heat gained per second while firing
    pub rate: f32,
    /// Heat lost per second while not firing (and while overheated)
    pub cool: f32,
    /// Overheat clears once heat decays to this
    pub recover_at: f32,
}

impl Default for HeatTuning {
    fn default() -> Self {
        Self {
            max: 100.0,
            rate: 28.0,
            cool: 22.0,
            recover_at: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiringTuning {
    pub muzzle: f32,
    pub bullet_ttl: f32,
    pub spread_count: u32,
    pub spread_angle: f32,
    pub rapid_mul: f32,
}

impl Default for FiringTuning {
    fn default() -> Self {
        Self {
            muzzle: 28.0,
            bullet_ttl: 1.2,
            spread_count: 3,
            spread_angle: 0.15,
            rapid_mul: 1.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    /// Radial ability (pulsar)
    pub radial_max: f32,
    pub radial_radius: f32,
    pub radial_push: f32,
    /// Cone ability (EMP)
    pub cone_max: f32,
    pub cone_arc: f32,
    pub cone_range: f32,
    pub cone_push: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            radial_max: 10.0,
            radial_radius: 200.0,
            radial_push: 42.0,
            cone_max: 7.0,
            cone_arc: std::f32::consts::PI / 2.6,
            cone_range: 260.0,
            cone_push: 26.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    /// Duration added per activation
    pub rapid_add: f32,
    pub spread_add: f32,
    pub shield_add: f32,
    pub slow_add: f32,
    pub double_add: f32,
    /// Duration caps
    pub rapid_max: f32,
    pub spread_max: f32,
    pub shield_max: f32,
    pub slow_max: f32,
    pub double_max: f32,
    /// Shield seconds consumed per absorbed hit
    pub shield_hit_cost: f32,
    /// Invulnerability granted after losing a life
    pub invuln_after_hit: f32,
    /// Enemy speed factor while slow is active
    pub slow_enemy_mul: f32,
    /// Enemy shot speed factor while slow is active
    pub slow_shot_mul: f32,
    pub pickup_ttl: f32,
    pub pickup_drop_chance: f64,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            rapid_add: 7.0,
            spread_add: 7.0,
            shield_add: 10.0,
            slow_add: 6.0,
            double_add: 8.0,
            rapid_max: 15.0,
            spread_max: 15.0,
            shield_max: 15.0,
            slow_max: 12.0,
            double_max: 15.0,
            shield_hit_cost: 2.0,
            invuln_after_hit: 1.0,
            slow_enemy_mul: 0.55,
            slow_shot_mul: 0.7,
            pickup_ttl: 10.0,
            pickup_drop_chance: 0.18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessTuning {
    /// Enemies never spawn closer than this to the player
    pub min_spawn_proximity: f32,
    /// Extra distance added when a spawn is pushed out
    pub spawn_buffer: f32,
    /// Minimum seconds an enemy needs to reach the player from its spawn
    pub min_enemy_tti: f32,
    /// Minimum seconds an enemy shot needs to reach the player
    pub min_shot_tti: f32,
    /// Aim error tapers from `aim_error_max` at `aim_near` to 0 at `aim_far`
    pub aim_near: f32,
    pub aim_far: f32,
    pub aim_error_max: f32,
}

impl Default for FairnessTuning {
    fn default() -> Self {
        Self {
            min_spawn_proximity: 160.0,
            spawn_buffer: 8.0,
            min_enemy_tti: 2.0,
            min_shot_tti: 1.25,
            aim_near: 120.0,
            aim_far: 260.0,
            aim_error_max: 0.18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub quota_base: u32,
    pub quota_per_wave: u32,
    pub alive_cap_base: u32,
    pub alive_cap_per_wave: u32,
    pub alive_cap_max: u32,
    pub spawn_interval_base: f32,
    pub spawn_interval_per_wave: f32,
    pub spawn_interval_min: f32,
    /// Stage waits for the field to thin to this many enemies
    pub stage_thin_to: usize,
    pub boss_intro_delay: f32,
    pub boss_settle: f32,
    pub boss_outro: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            quota_base: 10,
            quota_per_wave: 8,
            alive_cap_base: 6,
            alive_cap_per_wave: 2,
            alive_cap_max: 20,
            spawn_interval_base: 1.2,
            spawn_interval_per_wave: 0.05,
            spawn_interval_min: 0.2,
            stage_thin_to: 2,
            boss_intro_delay: 1.0,
            boss_settle: 0.5,
            boss_outro: 0.65,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    pub kill_score: u64,
    pub clear_base: u32,
    pub clear_per_wave: u32,
    pub boss_credits_base: u32,
    pub boss_credits_per_wave: u32,
    pub boss_score: u64,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            kill_score: 100,
            clear_base: 10,
            clear_per_wave: 3,
            boss_credits_base: 15,
            boss_credits_per_wave: 4,
            boss_score: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserTuning {
    /// Shots per second
    pub base_rps: f32,
    pub rapid_mul: f32,
    pub hold_mul: f32,
    pub speed: f32,
    pub ttl: f32,
    pub muzzle: f32,
    pub max_lead: f32,
    /// Lead time = distance / lead_divisor (capped by `max_lead`)
    pub lead_divisor: f32,
    pub jitter: f32,
    pub twin_separation: f32,
}

impl Default for LaserTuning {
    fn default() -> Self {
        Self {
            base_rps: 10.0,
            rapid_mul: 1.8,
            hold_mul: 1.3,
            speed: 1650.0,
            ttl: 0.22,
            muzzle: 24.0,
            max_lead: 0.12,
            lead_divisor: 1600.0,
            jitter: std::f32::consts::PI / 90.0,
            twin_separation: 0.08,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: Viewport,
    pub heat: HeatTuning,
    pub firing: FiringTuning,
    pub abilities: AbilityTuning,
    pub powerups: PowerUpTuning,
    pub fairness: FairnessTuning,
    pub waves: WaveTuning,
    pub rewards: RewardTuning,
    pub laser: LaserTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Spawn quota for a wave (sum of enemy quota costs)
    pub fn wave_quota(&self, wave: u32) -> u32 {
        self.waves.quota_base + wave.saturating_sub(1) * self.waves.quota_per_wave
    }

    /// Maximum simultaneously alive enemies during the spawn phase
    pub fn alive_cap(&self, wave: u32) -> usize {
        (self.waves.alive_cap_base + wave * self.waves.alive_cap_per_wave)
            .min(self.waves.alive_cap_max) as usize
    }

    /// Seconds between edge spawns
    pub fn spawn_interval(&self, wave: u32) -> f32 {
        (self.waves.spawn_interval_base - wave as f32 * self.waves.spawn_interval_per_wave)
            .max(self.waves.spawn_interval_min)
    }

    /// Credits granted for clearing a wave
    pub fn clear_bonus(&self, wave: u32) -> u32 {
        self.rewards.clear_base + wave * self.rewards.clear_per_wave
    }

    /// Base credits for defeating the boss (before the double-score multiplier)
    pub fn boss_credits(&self, wave: u32) -> u32 {
        self.rewards.boss_credits_base + wave * self.rewards.boss_credits_per_wave
    }
}
