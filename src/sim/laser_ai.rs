//! Defensive laser turret
//!
//! Fires short bolts at the enemy shot nearest the player, leading the
//! target by a capped time proportional to its distance.

use glam::Vec2;
use rand::Rng;

use super::projectiles::spawn_laser;
use super::state::GameState;
use super::world::World;
use crate::tuning::{LaserTuning, Tuning};
use crate::{heading, polar_to_cartesian};

#[derive(Debug, Clone, Default)]
pub struct LaserAi {
    /// Seconds until the next bolt may fire
    pub cooldown: f32,
}

impl LaserAi {
    pub fn reset(&mut self) {
        self.cooldown = 0.0;
    }
}

/// Seconds between bolts
pub fn fire_interval(laser: &LaserTuning, rapid: bool, hold: bool) -> f32 {
    let rapid_mul = if rapid { laser.rapid_mul } else { 1.0 };
    let hold_mul = if hold { laser.hold_mul } else { 1.0 };
    1.0 / (laser.base_rps * rapid_mul * hold_mul)
}

/// Point to aim at: `pos` extrapolated along `vel` by the lead time for a
/// target `dist` away
pub fn lead_point(pos: Vec2, vel: Vec2, dist: f32, laser: &LaserTuning) -> Vec2 {
    let lead = (dist / laser.lead_divisor).min(laser.max_lead);
    pos + vel * lead
}

/// Run the turret for one step. Cooldown keeps ticking while disabled.
pub fn update_laser_ai(
    world: &mut World,
    game: &GameState,
    tuning: &Tuning,
    secondary_hold: bool,
    dt: f32,
) {
    world.laser_ai.cooldown = (world.laser_ai.cooldown - dt).max(0.0);
    if !game.laser_enabled || world.laser_ai.cooldown > 0.0 {
        return;
    }

    let player = game.player_pos;
    let nearest = world
        .enemy_shots
        .iter()
        .map(|(_, s)| (s.pos.distance(player), s.pos, s.vel))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    let Some((dist, pos, vel)) = nearest else {
        return;
    };

    let laser = &tuning.laser;
    let aim = lead_point(pos, vel, dist, laser);
    let jitter = world.rng.random_range(-1.0f32..=1.0) * laser.jitter;
    let angle = heading(aim - player) + jitter;
    let muzzle = player + polar_to_cartesian(laser.muzzle, angle);

    let angles: &[f32] = if game.powerups.spread_active() {
        &[angle - laser.twin_separation, angle + laser.twin_separation]
    } else {
        &[angle]
    };
    for &a in angles {
        if spawn_laser(&mut world.lasers, muzzle, a, laser.speed, game.stats.damage, laser.ttl).is_none() {
            world.note_dropped_spawn("laser");
        }
    }

    world.laser_ai.cooldown = fire_interval(laser, game.powerups.rapid_active(), secondary_hold);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectiles::EnemyShot;

    const DT: f32 = 1.0 / 60.0;

    fn shot_at(world: &mut World, pos: Vec2, vel: Vec2) {
        world.enemy_shots.spawn(EnemyShot {
            pos,
            vel,
            radius: 6.0,
            ttl: 5.0,
            color: 0,
        });
    }

    #[test]
    fn test_targets_nearest_shot() {
        let mut world = World::new(4);
        let game = GameState::new(4);
        let tuning = Tuning::default();
        shot_at(&mut world, Vec2::new(0.0, 300.0), Vec2::ZERO);
        shot_at(&mut world, Vec2::new(-100.0, 0.0), Vec2::ZERO);
        update_laser_ai(&mut world, &game, &tuning, false, DT);
        assert_eq!(world.lasers.active_count(), 1);
        let (_, l) = world.lasers.iter().next().unwrap();
        // Aimed left, within the jitter band
        assert!(crate::angle_diff(l.angle, std::f32::consts::PI).abs() <= tuning.laser.jitter + 1e-4);
        assert!((l.pos.length() - tuning.laser.muzzle).abs() < 1e-3);
        assert!((world.laser_ai.cooldown - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_twin_beams_and_boosted_rate() {
        let mut world = World::new(4);
        let mut game = GameState::new(4);
        let tuning = Tuning::default();
        game.powerups.spread = 3.0;
        game.powerups.rapid = 3.0;
        shot_at(&mut world, Vec2::new(200.0, 0.0), Vec2::ZERO);
        update_laser_ai(&mut world, &game, &tuning, true, DT);
        assert_eq!(world.lasers.active_count(), 2);
        let expected = 1.0 / (10.0 * 1.8 * 1.3);
        assert!((world.laser_ai.cooldown - expected).abs() < 1e-6);
        // Still cooling down: nothing new
        update_laser_ai(&mut world, &game, &tuning, true, DT);
        assert_eq!(world.lasers.active_count(), 2);
    }

    #[test]
    fn test_disabled_still_cools_down() {
        let mut world = World::new(4);
        let mut game = GameState::new(4);
        let tuning = Tuning::default();
        game.laser_enabled = false;
        world.laser_ai.cooldown = 0.05;
        shot_at(&mut world, Vec2::new(200.0, 0.0), Vec2::ZERO);
        update_laser_ai(&mut world, &game, &tuning, false, 0.1);
        assert_eq!(world.laser_ai.cooldown, 0.0);
        assert_eq!(world.lasers.active_count(), 0);
    }

    #[test]
    fn test_lead_is_capped() {
        let laser = LaserTuning::default();
        let p = lead_point(Vec2::new(80.0, 0.0), Vec2::new(0.0, 100.0), 80.0, &laser);
        assert!((p.y - 5.0).abs() < 1e-3);
        let p = lead_point(Vec2::new(3200.0, 0.0), Vec2::new(0.0, 100.0), 3200.0, &laser);
        assert!((p.y - 12.0).abs() < 1e-3);
    }
}
