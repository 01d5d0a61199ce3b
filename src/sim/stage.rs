//! Pre-boss formation beats
//!
//! Boss waves open with a fixed, ordered run of enemy formations fired on a
//! timer. Formations are laid out relative to the viewport and go through the
//! normal fair spawn path.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use super::enemy::{EnemyKind, spawn_enemy_at};
use super::state::GameState;
use super::world::World;
use crate::consts::SPAWN_EDGE_PAD;
use crate::polar_to_cartesian;
use crate::tuning::{Tuning, Viewport};

/// Time of the first beat after the stage starts
pub const FIRST_BEAT_AT: f32 = 0.5;
/// Seconds between beats
pub const BEAT_SPACING: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageBeat {
    LaneGrunts,
    WedgeStrikers,
    TurretPods,
    ZigZagStrafers,
    SpiralSwirl,
    CarriersDrones,
    MineLines,
}

impl StageBeat {
    /// Firing order
    pub const ORDER: [StageBeat; 7] = [
        StageBeat::LaneGrunts,
        StageBeat::WedgeStrikers,
        StageBeat::TurretPods,
        StageBeat::ZigZagStrafers,
        StageBeat::SpiralSwirl,
        StageBeat::CarriersDrones,
        StageBeat::MineLines,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StageBeat::LaneGrunts => "lane grunts",
            StageBeat::WedgeStrikers => "wedge strikers",
            StageBeat::TurretPods => "turret pods",
            StageBeat::ZigZagStrafers => "zig-zag strafers",
            StageBeat::SpiralSwirl => "spiral swirl",
            StageBeat::CarriersDrones => "carriers + drones",
            StageBeat::MineLines => "mine lines",
        }
    }

    /// Requested spawn points and kinds for this beat
    pub fn formation(self, viewport: &Viewport) -> Vec<(Vec2, EnemyKind)> {
        let hw = viewport.half_width();
        let hh = viewport.half_height();
        let top = -hh - SPAWN_EDGE_PAD;
        match self {
            StageBeat::LaneGrunts => (0..5)
                .map(|i| (Vec2::new(-hw * 0.6 + i as f32 * hw * 0.3, top), EnemyKind::Grunt))
                .collect(),
            StageBeat::WedgeStrikers => {
                let mut out = vec![(Vec2::new(0.0, top), EnemyKind::Striker)];
                for k in 1..=2 {
                    let back = top - 30.0 * k as f32;
                    let side = 40.0 * k as f32;
                    out.push((Vec2::new(-side, back), EnemyKind::Striker));
                    out.push((Vec2::new(side, back), EnemyKind::Striker));
                }
                out
            }
            StageBeat::TurretPods => vec![
                (Vec2::new(-hw + 80.0, -hh + 60.0), EnemyKind::Tank),
                (Vec2::new(hw - 80.0, -hh + 60.0), EnemyKind::Tank),
            ],
            StageBeat::ZigZagStrafers => (0..4)
                .map(|i| {
                    let x = if i % 2 == 0 { -hw - SPAWN_EDGE_PAD } else { hw + SPAWN_EDGE_PAD };
                    (Vec2::new(x, -hh * 0.5 + i as f32 * 60.0), EnemyKind::Striker)
                })
                .collect(),
            StageBeat::SpiralSwirl => (0..8)
                .map(|i| {
                    let angle = -FRAC_PI_2 + i as f32 * TAU / 8.0;
                    let r = hh + i as f32 * 20.0;
                    (polar_to_cartesian(r, angle), EnemyKind::Grunt)
                })
                .collect(),
            StageBeat::CarriersDrones => {
                let carrier = Vec2::new(0.0, top);
                let mut out = vec![(carrier, EnemyKind::Tank)];
                for dx in [-96.0, -48.0, 48.0, 96.0] {
                    out.push((carrier + Vec2::new(dx, -20.0), EnemyKind::Grunt));
                }
                out
            }
            StageBeat::MineLines => (0..6)
                .map(|i| {
                    let x = -hw * 0.75 + i as f32 * (hw * 1.5 / 5.0);
                    (Vec2::new(x, top), EnemyKind::Grunt)
                })
                .collect(),
        }
    }
}

/// Seconds after stage start at which beat `index` fires
pub fn beat_time(index: usize) -> f32 {
    FIRST_BEAT_AT + index as f32 * BEAT_SPACING
}

/// Progress through `StageBeat::ORDER`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSchedule {
    next: usize,
}

impl StageSchedule {
    /// Next beat whose time has come, at most one per call
    pub fn due(&mut self, elapsed: f32) -> Option<StageBeat> {
        let beat = *StageBeat::ORDER.get(self.next)?;
        if elapsed >= beat_time(self.next) {
            self.next += 1;
            Some(beat)
        } else {
            None
        }
    }

    pub fn fired(&self) -> usize {
        self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next >= StageBeat::ORDER.len()
    }
}

/// Spawn a beat's formation. Returns how many enemies actually spawned.
pub fn spawn_beat(world: &mut World, game: &GameState, tuning: &Tuning, beat: StageBeat) -> usize {
    let spawned = beat
        .formation(&tuning.viewport)
        .into_iter()
        .filter_map(|(pos, kind)| spawn_enemy_at(world, game, tuning, pos, kind))
        .count();
    log::debug!("Stage beat: {} ({spawned} spawned)", beat.name());
    spawned
}
