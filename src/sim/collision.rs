//! Circle-circle collision passes
//!
//! Every pass walks pools in slot order, so which of several overlapping
//! targets absorbs a hit is decided by the lower slot index.

use glam::Vec2;

use super::boss::damage_boss;
use super::enemy::{damage_enemy, touches_player};
use super::state::{GameEvent, GameState, colors};
use super::world::World;
use crate::audio::SoundEffect;
use crate::consts::PLAYER_RADIUS;
use crate::tuning::Tuning;

/// Boundary-inclusive overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let rr = ra + rb;
    a.distance_squared(b) <= rr * rr
}

/// What a hazard touching the player did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Player was invulnerable
    Ignored,
    /// Shield time absorbed the hit
    Shielded,
    LifeLost,
}

/// Resolve one hazard reaching the player
pub fn apply_player_contact(world: &mut World, game: &mut GameState, tuning: &Tuning) -> ContactOutcome {
    if game.invuln > 0.0 {
        ContactOutcome::Ignored
    } else if game.powerups.shield_active() {
        game.powerups.shield = (game.powerups.shield - tuning.powerups.shield_hit_cost).max(0.0);
        ContactOutcome::Shielded
    } else {
        game.lives = game.lives.saturating_sub(1);
        game.invuln = tuning.powerups.invuln_after_hit;
        world.emit(GameEvent::ScreenFlash {
            strength: 0.35,
            color: colors::DAMAGE,
        });
        world.sound(SoundEffect::PlayerHit);
        log::debug!("Player hit, {} lives left", game.lives);
        ContactOutcome::LifeLost
    }
}

/// Each bullet hits at most one target: the first overlapping enemy in
/// slot order, else the boss.
pub fn bullets_vs_enemies(world: &mut World, game: &mut GameState, tuning: &Tuning) {
    for bid in 0..world.bullets.capacity() {
        let Some(b) = world.bullets.get(bid) else {
            continue;
        };
        let (pos, radius, damage) = (b.pos, b.radius, b.damage);

        let target = world
            .enemies
            .iter()
            .find(|(_, e)| circles_overlap(pos, radius, e.pos, e.radius))
            .map(|(id, _)| id);

        if let Some(eid) = target {
            damage_enemy(world, game, tuning, eid, damage);
            world.bullets.release(bid);
        } else if world.boss.active
            && circles_overlap(pos, radius, world.boss.pos, world.boss.radius)
        {
            damage_boss(world, game, tuning, damage);
            world.bullets.release(bid);
        }
    }
}

/// Lasers clear every enemy shot they touch. Returns the number cleared.
pub fn lasers_vs_enemy_shots(world: &mut World) -> usize {
    let mut cleared = 0;
    for lid in 0..world.lasers.capacity() {
        let Some(l) = world.lasers.get(lid) else {
            continue;
        };
        let (pos, radius) = (l.pos, l.radius);
        let mut hits = 0;
        for sid in 0..world.enemy_shots.capacity() {
            let spark = match world.enemy_shots.get(sid) {
                Some(s) if circles_overlap(pos, radius, s.pos, s.radius) => s.pos,
                _ => continue,
            };
            world.enemy_shots.release(sid);
            world.emit(GameEvent::ShotSpark { pos: spark });
            hits += 1;
        }
        if hits > 0 {
            world.sound(SoundEffect::LaserIntercept);
        }
        cleared += hits;
    }
    cleared
}

/// Enemies and enemy shots touching the player are consumed and resolved
pub fn hazards_vs_player(world: &mut World, game: &mut GameState, tuning: &Tuning) {
    let player = game.player_pos;
    for id in 0..world.enemies.capacity() {
        if world.enemies.get(id).is_some_and(|e| touches_player(e, player)) {
            world.enemies.release(id);
            apply_player_contact(world, game, tuning);
        }
    }
    for id in 0..world.enemy_shots.capacity() {
        let hit = world
            .enemy_shots
            .get(id)
            .is_some_and(|s| circles_overlap(s.pos, s.radius, player, PLAYER_RADIUS));
        if hit {
            world.enemy_shots.release(id);
            apply_player_contact(world, game, tuning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;
    use crate::sim::projectiles::{EnemyShot, spawn_bullet, spawn_laser};
    use proptest::prelude::*;

    fn setup() -> (World, GameState, Tuning) {
        (World::new(11), GameState::new(11), Tuning::default())
    }

    fn enemy_at(x: f32, hp: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, 0.0),
            radius: 14.0,
            hp,
            ..Enemy::default()
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(circles_overlap(Vec2::ZERO, 3.0, Vec2::new(17.0, 0.0), 14.0));
        assert!(!circles_overlap(Vec2::ZERO, 3.0, Vec2::new(17.01, 0.0), 14.0));
    }

    #[test]
    fn test_first_slot_absorbs_bullet() {
        let (mut world, mut game, tuning) = setup();
        world.enemies.spawn(enemy_at(300.0, 3.0));
        world.enemies.spawn(enemy_at(302.0, 3.0));
        spawn_bullet(&mut world.bullets, Vec2::new(301.0, 0.0), 0.0, 0.0, 1.0, 1.0);
        bullets_vs_enemies(&mut world, &mut game, &tuning);
        assert_eq!(world.enemies.get(0).unwrap().hp, 2.0);
        assert_eq!(world.enemies.get(1).unwrap().hp, 3.0);
        assert_eq!(world.bullets.active_count(), 0);
    }

    #[test]
    fn test_bullet_falls_through_to_boss() {
        let (mut world, mut game, tuning) = setup();
        game.wave = 5;
        world.boss.spawn(5);
        let at = world.boss.pos;
        spawn_bullet(&mut world.bullets, at, 0.0, 0.0, 2.0, 1.0);
        bullets_vs_enemies(&mut world, &mut game, &tuning);
        assert_eq!(world.boss.hp, 138.0);
        assert_eq!(world.bullets.active_count(), 0);
    }

    #[test]
    fn test_laser_clears_multiple_shots() {
        let (mut world, _, tuning) = setup();
        spawn_laser(&mut world.lasers, Vec2::new(100.0, 0.0), 0.0, 0.0, 1.0, tuning.laser.ttl);
        for x in [98.0, 104.0, 200.0] {
            world.enemy_shots.spawn(EnemyShot {
                pos: Vec2::new(x, 0.0),
                radius: 6.0,
                ttl: 5.0,
                ..EnemyShot::default()
            });
        }
        assert_eq!(lasers_vs_enemy_shots(&mut world), 2);
        assert_eq!(world.enemy_shots.active_count(), 1);
        assert!(world.events.contains(&GameEvent::Sound(SoundEffect::LaserIntercept)));
    }

    #[test]
    fn test_contact_outcomes_in_priority_order() {
        let (mut world, mut game, tuning) = setup();
        game.invuln = 0.5;
        game.powerups.shield = 1.0;
        assert_eq!(apply_player_contact(&mut world, &mut game, &tuning), ContactOutcome::Ignored);
        game.invuln = 0.0;
        assert_eq!(apply_player_contact(&mut world, &mut game, &tuning), ContactOutcome::Shielded);
        assert_eq!(game.powerups.shield, 0.0);
        assert_eq!(game.lives, 3);
        assert_eq!(apply_player_contact(&mut world, &mut game, &tuning), ContactOutcome::LifeLost);
        assert_eq!(game.lives, 2);
        assert_eq!(game.invuln, 1.0);
    }

    #[test]
    fn test_shield_absorbs_enemy_contact() {
        let (mut world, mut game, tuning) = setup();
        game.powerups.shield = 5.0;
        world.enemies.spawn(enemy_at(30.0, 3.0));
        hazards_vs_player(&mut world, &mut game, &tuning);
        assert_eq!(world.alive_enemies(), 0);
        assert_eq!(game.powerups.shield, 3.0);
        assert_eq!(game.lives, GameState::STARTING_LIVES);
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_distance(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 0.5f32..40.0, rb in 0.5f32..40.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let d = a.distance(b);
            let hit = circles_overlap(a, ra, b, rb);
            // Skip the float fuzz band around the boundary
            if (d - (ra + rb)).abs() > 1e-3 {
                prop_assert_eq!(hit, d <= ra + rb);
            }
            prop_assert_eq!(hit, circles_overlap(b, rb, a, ra));
        }
    }
}
