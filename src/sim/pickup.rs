//! Power-up pickups
//!
//! Pickups drop from kills, drift toward the player and are collected by
//! proximity. Each collection feeds a per-kind stack; a full stack activates
//! the power-up (or detonates a bomb).

use glam::Vec2;
use rand::Rng;

use super::enemy::damage_enemy;
use super::pool::SlotId;
use super::state::{GameEvent, GameState, PickupKind, colors};
use super::world::World;
use crate::audio::SoundEffect;
use crate::consts::PICKUP_COLLECT_RADIUS;
use crate::tuning::Tuning;

/// Base drift speed toward the player
pub const MAGNET_SPEED: f32 = 18.0;
/// Drift speeds up inside this distance
pub const MAGNET_BOOST_RANGE: f32 = 140.0;

#[derive(Debug, Clone, Default)]
pub struct Pickup {
    pub pos: Vec2,
    pub ttl: f32,
    pub kind: PickupKind,
}

/// Map a uniform roll in [0, 1) to a kind:
/// rapid 25%, spread 25%, shield 20%, slow 15%, double 10%, bomb 5%
pub fn kind_for_roll(r: f32) -> PickupKind {
    if r < 0.25 {
        PickupKind::Rapid
    } else if r < 0.5 {
        PickupKind::Spread
    } else if r < 0.7 {
        PickupKind::Shield
    } else if r < 0.85 {
        PickupKind::Slow
    } else if r < 0.95 {
        PickupKind::DoubleScore
    } else {
        PickupKind::Bomb
    }
}

pub fn spawn_pickup(world: &mut World, tuning: &Tuning, pos: Vec2) -> Option<SlotId> {
    let kind = kind_for_roll(world.rng.random());
    let id = world.pickups.spawn(Pickup {
        pos,
        ttl: tuning.powerups.pickup_ttl,
        kind,
    });
    if id.is_none() {
        world.note_dropped_spawn("pickup");
    }
    id
}

/// Drift speed at distance `d` from the player
pub fn magnet_speed(d: f32) -> f32 {
    let boost = if d < MAGNET_BOOST_RANGE {
        1.2 + (1.0 - d / MAGNET_BOOST_RANGE) * 1.1
    } else {
        1.0
    };
    MAGNET_SPEED * boost
}

pub fn update_pickups(world: &mut World, player: Vec2, dt: f32) {
    world.pickups.retain(|p| {
        p.ttl -= dt;
        if p.ttl <= 0.0 {
            return false;
        }
        let to_player = player - p.pos;
        let d = to_player.length();
        if d > 1.0 {
            p.pos += to_player / d * magnet_speed(d) * dt;
        }
        true
    });
}

/// Collect pickups touching the player and apply their stacks
pub fn collect_pickups(world: &mut World, game: &mut GameState, tuning: &Tuning) {
    let player = game.player_pos;
    for id in 0..world.pickups.capacity() {
        let kind = match world.pickups.get(id) {
            Some(p) if p.pos.distance(player) <= PICKUP_COLLECT_RADIUS => p.kind,
            _ => continue,
        };
        world.pickups.release(id);
        apply_pickup(world, game, tuning, kind);
    }
}

/// Add one pickup of `kind` to its stack, activating on each full stack
pub fn apply_pickup(world: &mut World, game: &mut GameState, tuning: &Tuning, kind: PickupKind) {
    let activations = game.stacks.add(kind);
    for _ in 0..activations {
        activate(world, game, tuning, kind);
    }
    if activations > 0 {
        world.sound(SoundEffect::StackActivate);
    }
}

fn activate(world: &mut World, game: &mut GameState, tuning: &Tuning, kind: PickupKind) {
    if kind == PickupKind::Bomb {
        trigger_bomb(world, game, tuning);
        return;
    }
    let t = &tuning.powerups;
    let p = &mut game.powerups;
    match kind {
        PickupKind::Rapid => p.rapid = (p.rapid + t.rapid_add).min(t.rapid_max),
        PickupKind::Spread => p.spread = (p.spread + t.spread_add).min(t.spread_max),
        PickupKind::Shield => p.shield = (p.shield + t.shield_add).min(t.shield_max),
        PickupKind::Slow => p.slow = (p.slow + t.slow_add).min(t.slow_max),
        PickupKind::DoubleScore => {
            p.double_score = (p.double_score + t.double_add).min(t.double_max)
        }
        PickupKind::Bomb => {}
    }
}

/// Heavy damage to every enemy, and every enemy shot cleared
pub fn trigger_bomb(world: &mut World, game: &mut GameState, tuning: &Tuning) {
    let damage = (game.stats.damage * 2.0).ceil().max(2.0);
    for id in 0..world.enemies.capacity() {
        if world.enemies.is_active(id) {
            damage_enemy(world, game, tuning, id, damage);
        }
    }
    world.clear_enemy_shots();
    world.sound(SoundEffect::Bomb);
    world.emit(GameEvent::Ring {
        pos: game.player_pos,
    });
    world.emit(GameEvent::ScreenFlash {
        strength: 0.6,
        color: colors::DAMAGE,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;
    use crate::sim::projectiles::spawn_enemy_shot;

    #[test]
    fn test_roll_weights() {
        assert_eq!(kind_for_roll(0.0), PickupKind::Rapid);
        assert_eq!(kind_for_roll(0.3), PickupKind::Spread);
        assert_eq!(kind_for_roll(0.69), PickupKind::Shield);
        assert_eq!(kind_for_roll(0.8), PickupKind::Slow);
        assert_eq!(kind_for_roll(0.9), PickupKind::DoubleScore);
        assert_eq!(kind_for_roll(0.99), PickupKind::Bomb);
    }

    #[test]
    fn test_magnet_pulls_and_expires() {
        let mut world = World::new(1);
        world.pickups.spawn(Pickup {
            pos: Vec2::new(100.0, 0.0),
            ttl: 1.0,
            kind: PickupKind::Rapid,
        });
        update_pickups(&mut world, Vec2::ZERO, 0.5);
        let (_, p) = world.pickups.iter().next().unwrap();
        assert!(p.pos.x < 100.0);
        update_pickups(&mut world, Vec2::ZERO, 0.6);
        assert_eq!(world.pickups.active_count(), 0);
        assert!(magnet_speed(10.0) > magnet_speed(139.0));
        assert_eq!(magnet_speed(500.0), MAGNET_SPEED);
    }

    #[test]
    fn test_stack_activation_caps_duration() {
        let mut world = World::new(1);
        let mut game = GameState::new(1);
        let tuning = Tuning::default();
        game.powerups.rapid = 12.0;
        apply_pickup(&mut world, &mut game, &tuning, PickupKind::Rapid);
        assert_eq!(game.powerups.rapid, 12.0);
        apply_pickup(&mut world, &mut game, &tuning, PickupKind::Rapid);
        assert_eq!(game.powerups.rapid, 15.0);
        assert!(world.events.contains(&GameEvent::Sound(SoundEffect::StackActivate)));
    }

    #[test]
    fn test_collect_by_proximity() {
        let mut world = World::new(1);
        let mut game = GameState::new(1);
        let tuning = Tuning::default();
        world.pickups.spawn(Pickup {
            pos: Vec2::new(20.0, 0.0),
            ttl: 5.0,
            kind: PickupKind::Slow,
        });
        world.pickups.spawn(Pickup {
            pos: Vec2::new(60.0, 0.0),
            ttl: 5.0,
            kind: PickupKind::Slow,
        });
        collect_pickups(&mut world, &mut game, &tuning);
        assert_eq!(world.pickups.active_count(), 1);
        assert_eq!(game.stacks.get(PickupKind::Slow), 1);
    }

    #[test]
    fn test_bomb_damages_and_clears() {
        let mut world = World::new(1);
        let mut game = GameState::new(1);
        let tuning = Tuning::default();
        world.enemies.spawn(Enemy {
            pos: Vec2::new(300.0, 0.0),
            hp: 2.0,
            ..Enemy::default()
        });
        world.enemies.spawn(Enemy {
            pos: Vec2::new(-300.0, 0.0),
            hp: 6.0,
            ..Enemy::default()
        });
        spawn_enemy_shot(
            &mut world.enemy_shots,
            Vec2::new(200.0, 0.0),
            0.0,
            200.0,
            0,
            Vec2::ZERO,
            false,
            &tuning,
        );
        apply_pickup(&mut world, &mut game, &tuning, PickupKind::Bomb);
        assert_eq!(world.alive_enemies(), 1);
        let (_, e) = world.enemies.iter().next().unwrap();
        assert_eq!(e.hp, 4.0);
        assert_eq!(world.enemy_shots.active_count(), 0);
        assert_eq!(game.score, 100);
    }
}
