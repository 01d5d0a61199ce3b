//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod abilities;
pub mod autopilot;
pub mod boss;
pub mod collision;
pub mod elite;
pub mod enemy;
pub mod laser_ai;
pub mod pickup;
pub mod pool;
pub mod projectiles;
pub mod stage;
pub mod state;
pub mod tick;
pub mod wave;
pub mod world;

pub use boss::Boss;
pub use collision::{ContactOutcome, circles_overlap};
pub use elite::{Affixes, EliteAffix};
pub use enemy::{Enemy, EnemyKind};
pub use pool::{Pool, SlotId};
pub use stage::StageBeat;
pub use state::{
    Ability, ArenaMode, GameEvent, GameState, PickupKind, PlayerStats, PowerUps, RewardBreakdown,
};
pub use tick::{TickInput, TickOutcome, tick};
pub use wave::{WaveEvent, WaveFlow, WavePhase};
pub use world::World;
