//! Auto-aim/auto-fire for the "auto fire" dev setting
//!
//! Rewrites the step's input: aims at the nearest enemy, fires while it is in
//! range and the gun is cool enough, and fires abilities under pressure.

use std::f32::consts::PI;

use super::enemy::EnemyKind;
use super::state::GameState;
use super::tick::TickInput;
use super::world::World;
use crate::tuning::Tuning;
use crate::{angle_diff, heading};

/// Stop firing above this heat fraction
pub const HEAT_BACKOFF: f32 = 0.92;
/// Dump heat with the radial ability above this fraction
pub const HEAT_PANIC: f32 = 0.97;
const NEAR_ENEMY_RADIUS: f32 = 200.0;
const NEAR_SHOT_RADIUS: f32 = 170.0;
const FORWARD_ARC: f32 = PI / 3.0;
const FORWARD_ENEMY_RANGE: f32 = 260.0;
const FORWARD_SHOT_RANGE: f32 = 240.0;
const RADIAL_DELAY: f32 = 0.4;
const CONE_DELAY: f32 = 0.35;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Seconds before the autopilot may fire another ability
    pub ability_delay: f32,
}

/// Local pressure around the player, measured along `aim`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pressure {
    pub near_enemies: usize,
    pub near_tanks: usize,
    pub forward_enemies: usize,
    pub near_shots: usize,
    pub forward_shots: usize,
}

impl Pressure {
    pub fn measure(world: &World, player: glam::Vec2, aim: f32) -> Self {
        let mut p = Pressure::default();
        let ahead = |pos: glam::Vec2| angle_diff(heading(pos - player), aim).abs() <= FORWARD_ARC * 0.5;
        for (_, e) in world.enemies.iter() {
            let d = e.pos.distance(player);
            if d < NEAR_ENEMY_RADIUS {
                p.near_enemies += 1;
                if e.kind == EnemyKind::Tank {
                    p.near_tanks += 1;
                }
            }
            if d <= FORWARD_ENEMY_RANGE && ahead(e.pos) {
                p.forward_enemies += 1;
            }
        }
        for (_, s) in world.enemy_shots.iter() {
            let d = s.pos.distance(player);
            if d < NEAR_SHOT_RADIUS {
                p.near_shots += 1;
            }
            if d <= FORWARD_SHOT_RANGE && ahead(s.pos) {
                p.forward_shots += 1;
            }
        }
        p
    }
}

/// Override `input` for this step when auto fire is enabled
pub fn drive(world: &mut World, game: &GameState, tuning: &Tuning, input: &mut TickInput, dt: f32) {
    if !game.auto_fire {
        return;
    }
    let player = game.player_pos;
    let nearest = world
        .enemies
        .iter()
        .map(|(_, e)| (e.pos.distance(player), e.pos))
        .min_by(|a, b| a.0.total_cmp(&b.0));

    if let Some((_, pos)) = nearest {
        input.aim_angle = heading(pos - player);
    }
    let heat = game.heat.fraction(tuning.heat.max);
    let in_range = nearest.is_some_and(|(d, _)| d <= game.auto_range);
    input.firing = heat <= HEAT_BACKOFF && in_range;

    let pilot = &mut world.autopilot;
    pilot.ability_delay = (pilot.ability_delay - dt).max(0.0);
    if pilot.ability_delay > 0.0 {
        return;
    }

    let p = Pressure::measure(world, player, input.aim_angle);
    let swarmed = p.near_enemies >= 3 || p.near_tanks >= 1 || p.near_shots >= 5 || heat > HEAT_PANIC;
    let cluster_ahead = p.forward_enemies >= 2 || p.forward_shots >= 4;
    if game.cooldowns.radial == 0.0 && swarmed {
        input.trigger_radial = true;
        world.autopilot.ability_delay = RADIAL_DELAY;
    } else if game.cooldowns.cone == 0.0 && cluster_ahead {
        input.trigger_cone = true;
        world.autopilot.ability_delay = CONE_DELAY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;
    use glam::Vec2;

    fn setup() -> (World, GameState, Tuning) {
        let mut game = GameState::new(9);
        game.auto_fire = true;
        (World::new(9), game, Tuning::default())
    }

    fn enemy(world: &mut World, pos: Vec2, kind: EnemyKind) {
        world.enemies.spawn(Enemy {
            pos,
            radius: 14.0,
            hp: 3.0,
            kind,
            ..Enemy::default()
        });
    }

    #[test]
    fn test_aims_at_nearest_and_gates_on_range() {
        let (mut world, game, tuning) = setup();
        enemy(&mut world, Vec2::new(0.0, 300.0), EnemyKind::Grunt);
        enemy(&mut world, Vec2::new(-230.0, 0.0), EnemyKind::Grunt);
        let mut input = TickInput::default();
        drive(&mut world, &game, &tuning, &mut input, 1.0 / 60.0);
        assert!(crate::angle_diff(input.aim_angle, PI).abs() < 1e-5);
        assert!(input.firing);
        assert!(!input.trigger_radial && !input.trigger_cone);
    }

    #[test]
    fn test_backs_off_when_hot() {
        let (mut world, mut game, tuning) = setup();
        game.heat.value = 95.0;
        enemy(&mut world, Vec2::new(220.0, 0.0), EnemyKind::Grunt);
        let mut input = TickInput::default();
        drive(&mut world, &game, &tuning, &mut input, 1.0 / 60.0);
        assert!(!input.firing);
    }

    #[test]
    fn test_radial_when_tank_close_then_delay() {
        let (mut world, game, tuning) = setup();
        enemy(&mut world, Vec2::new(150.0, 0.0), EnemyKind::Tank);
        let mut input = TickInput::default();
        drive(&mut world, &game, &tuning, &mut input, 1.0 / 60.0);
        assert!(input.trigger_radial);
        assert_eq!(world.autopilot.ability_delay, RADIAL_DELAY);

        let mut input = TickInput::default();
        drive(&mut world, &game, &tuning, &mut input, 0.1);
        assert!(!input.trigger_radial);
    }

    #[test]
    fn test_cone_for_cluster_ahead() {
        let (mut world, mut game, tuning) = setup();
        game.cooldowns.radial = 5.0;
        enemy(&mut world, Vec2::new(230.0, 0.0), EnemyKind::Grunt);
        enemy(&mut world, Vec2::new(250.0, 10.0), EnemyKind::Grunt);
        let mut input = TickInput::default();
        drive(&mut world, &game, &tuning, &mut input, 1.0 / 60.0);
        assert!(input.trigger_cone);
        assert!(!input.trigger_radial);
    }

    #[test]
    fn test_disabled_leaves_input_alone() {
        let (mut world, mut game, tuning) = setup();
        game.auto_fire = false;
        enemy(&mut world, Vec2::new(100.0, 0.0), EnemyKind::Tank);
        let mut input = TickInput {
            aim_angle: 1.0,
            ..TickInput::default()
        };
        drive(&mut world, &game, &tuning, &mut input, 1.0 / 60.0);
        assert_eq!(input.aim_angle, 1.0);
        assert!(!input.firing && !input.trigger_radial);
    }
}
