//! Spacer - simulation core of a top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, AI, collisions, wave flow)
//! - `engine`: Fixed-timestep frame loop and scene switching
//! - `scenes`: Wave, shop and game-over scenes
//! - `renderer`: Narrow drawing interface consumed by `render(alpha)`
//! - `audio`: Sound cues and the tone sink they are played through
//! - `persistence`: Key/value preference storage
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scenes;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const STEP_MS: f64 = 1000.0 / 60.0;
    /// Frame delta clamp, prevents spiral of death after tab suspension
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Player turret body radius
    pub const PLAYER_RADIUS: f32 = 22.0;
    /// Pickups within this distance of the player are collected
    pub const PICKUP_COLLECT_RADIUS: f32 = 30.0;

    /// Pool capacities
    pub const MAX_BULLETS: usize = 512;
    pub const MAX_ENEMY_SHOTS: usize = 512;
    pub const MAX_LASERS: usize = 384;
    pub const MAX_PICKUPS: usize = 64;
    pub const MAX_ENEMIES: usize = 256;
    /// Concurrent cold auras (elite death fields)
    pub const MAX_AURAS: usize = 16;

    /// Bullets further than this from the origin are released
    pub const BULLET_WORLD_BOUND: f32 = 4000.0;
    /// Enemy shots this far past the viewport edge are released
    pub const SHOT_OFFSCREEN_PAD: f32 = 32.0;
    /// Edge spawns appear this far outside the viewport
    pub const SPAWN_EDGE_PAD: f32 = 24.0;

    /// Every Nth wave is a boss wave
    pub const BOSS_EVERY: u32 = 5;
    /// Boss barrier line (world y) in top-down mode
    pub const BARRIER_Y: f32 = -90.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed shortest angular difference `a - b`, in [-π, π)
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(a - b)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of a direction vector (atan2)
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
