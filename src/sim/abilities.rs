//! Player-triggered area abilities
//!
//! Radial: damage and knockback around the player, clearing nearby shots.
//! Cone: the same along the aim direction within an arc and range.
//! Both are no-ops while their cooldown is running.

use glam::Vec2;

use super::enemy::damage_enemy;
use super::state::{Ability, GameEvent, GameState};
use super::world::World;
use crate::audio::SoundEffect;
use crate::tuning::Tuning;
use crate::{angle_diff, heading};

/// Area an ability affects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityArea {
    Circle { center: Vec2, radius: f32 },
    Cone {
        apex: Vec2,
        angle: f32,
        half_arc: f32,
        range: f32,
    },
}

impl AbilityArea {
    pub fn contains(&self, p: Vec2) -> bool {
        match *self {
            // Strictly inside
            AbilityArea::Circle { center, radius } => p.distance(center) < radius,
            AbilityArea::Cone {
                apex,
                angle,
                half_arc,
                range,
            } => {
                let d = p.distance(apex);
                d <= range && angle_diff(heading(p - apex), angle).abs() <= half_arc
            }
        }
    }

    fn origin(&self) -> Vec2 {
        match *self {
            AbilityArea::Circle { center, .. } => center,
            AbilityArea::Cone { apex, .. } => apex,
        }
    }
}

/// Trigger `ability` if it is off cooldown. Returns false on a no-op.
pub fn trigger(
    world: &mut World,
    game: &mut GameState,
    tuning: &Tuning,
    ability: Ability,
    aim_angle: f32,
) -> bool {
    if game.cooldowns.get(ability) > 0.0 {
        return false;
    }
    let t = &tuning.abilities;
    let player = game.player_pos;
    let (area, push, max) = match ability {
        Ability::Radial => (
            AbilityArea::Circle {
                center: player,
                radius: t.radial_radius,
            },
            t.radial_push,
            t.radial_max,
        ),
        Ability::Cone => (
            AbilityArea::Cone {
                apex: player,
                angle: aim_angle,
                half_arc: t.cone_arc * 0.5,
                range: t.cone_range,
            },
            t.cone_push,
            t.cone_max,
        ),
    };

    strike(world, game, tuning, &area, push);

    match ability {
        Ability::Radial => {
            world.emit(GameEvent::Ring { pos: player });
            world.sound(SoundEffect::Radial);
        }
        Ability::Cone => {
            world.emit(GameEvent::Cone {
                pos: player,
                angle: aim_angle,
            });
            world.sound(SoundEffect::Cone);
        }
    }
    game.cooldowns.set(ability, max);
    true
}

/// Damage and push enemies inside `area`, and clear enemy shots in it
fn strike(world: &mut World, game: &mut GameState, tuning: &Tuning, area: &AbilityArea, push: f32) {
    let damage = game.stats.ability_damage();
    let origin = area.origin();

    for id in 0..world.enemies.capacity() {
        if !world.enemies.get(id).is_some_and(|e| area.contains(e.pos)) {
            continue;
        }
        if damage_enemy(world, game, tuning, id, damage) {
            continue;
        }
        if let Some(e) = world.enemies.get_mut(id) {
            let away = (e.pos - origin).normalize_or_zero();
            e.pos += away * push;
        }
    }

    for id in 0..world.enemy_shots.capacity() {
        if world.enemy_shots.get(id).is_some_and(|s| area.contains(s.pos)) {
            world.enemy_shots.release(id);
        }
    }
}
