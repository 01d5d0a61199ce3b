//! Fixed timestep simulation tick
//!
//! Advances one wave-scene step. Subsystems run in a fixed order:
//! abilities and cooldowns, heat, firing, wave flow, pool updates,
//! collisions, power-up timers, end check.

use glam::Vec2;

use super::abilities;
use super::autopilot;
use super::boss::update_boss;
use super::collision::{bullets_vs_enemies, hazards_vs_player, lasers_vs_enemy_shots};
use super::elite::update_auras;
use super::enemy::{resolve_booms, update_enemies};
use super::laser_ai::update_laser_ai;
use super::pickup::{collect_pickups, update_pickups};
use super::projectiles::{spawn_bullet, update_bullets, update_enemy_shots, update_lasers};
use super::state::{Ability, ArenaMode, GameEvent, GameState, RewardBreakdown, colors};
use super::wave::WaveFlow;
use super::world::World;
use crate::consts::{BARRIER_Y, MAX_FRAME_MS, PLAYER_RADIUS};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Top-down movement speed (units/s)
pub const PLAYER_MOVE_SPEED: f32 = 220.0;

/// Input signals for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim direction in radians
    pub aim_angle: f32,
    pub firing: bool,
    /// Boosts the defensive laser cadence
    pub secondary_hold: bool,
    /// Movement intent (top-down arena only), length ≤ 1 after clamping
    pub move_intent: Vec2,
    /// Edge-triggered ability requests
    pub trigger_radial: bool,
    pub trigger_cone: bool,
}

/// What the step ended with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Continue,
    /// Wave finished; the shop should take over
    WaveConcluded(RewardBreakdown),
    /// Lives ran out
    GameOver,
}

/// Advance the run by one fixed timestep
pub fn tick(
    world: &mut World,
    game: &mut GameState,
    flow: &mut WaveFlow,
    tuning: &Tuning,
    input: &TickInput,
    dt: f32,
) -> TickOutcome {
    let dt = dt.clamp(0.0, (MAX_FRAME_MS / 1000.0) as f32);
    world.time_ticks += 1;

    let mut input = input.clone();
    autopilot::drive(world, game, tuning, &mut input, dt);

    // Abilities, then cooldowns and invulnerability
    if input.trigger_radial {
        abilities::trigger(world, game, tuning, Ability::Radial, input.aim_angle);
    }
    if input.trigger_cone {
        abilities::trigger(world, game, tuning, Ability::Cone, input.aim_angle);
    }
    for ability in game.cooldowns.tick(dt).into_iter().flatten() {
        let color = match ability {
            Ability::Radial => colors::CYAN,
            Ability::Cone => colors::AMBER,
        };
        world.emit(GameEvent::AbilityReady(ability));
        world.emit(GameEvent::ScreenFlash {
            strength: 0.18,
            color,
        });
    }
    game.invuln = (game.invuln - dt).max(0.0);

    game.heat.update(input.firing, &tuning.heat, dt);
    fire_weapon(world, game, tuning, &input, dt);
    move_player(game, tuning, input.move_intent, dt);

    // Wave flow runs before anything moves
    if let Some(breakdown) = flow.advance(world, game, tuning, dt) {
        return TickOutcome::WaveConcluded(breakdown);
    }

    update_bullets(&mut world.bullets, dt);
    update_enemies(world, game, tuning, dt);
    update_enemy_shots(&mut world.enemy_shots, &tuning.viewport, dt);
    update_laser_ai(world, game, tuning, input.secondary_hold, dt);
    update_lasers(&mut world.lasers, dt);
    update_boss(world, game, tuning, dt);
    update_pickups(world, game.player_pos, dt);
    update_auras(&mut world.auras, dt);

    bullets_vs_enemies(world, game, tuning);
    lasers_vs_enemy_shots(world);
    hazards_vs_player(world, game, tuning);
    collect_pickups(world, game, tuning);
    resolve_booms(world, game, tuning);

    game.powerups.tick(dt);

    if game.lives == 0 {
        log::info!("Game over on wave {} with score {}", game.wave, game.score);
        return TickOutcome::GameOver;
    }
    TickOutcome::Continue
}

/// Main weapon: one bullet, or a fan while spread is active
fn fire_weapon(world: &mut World, game: &GameState, tuning: &Tuning, input: &TickInput, dt: f32) {
    world.fire_cooldown = (world.fire_cooldown - dt).max(0.0);
    if game.heat.overheated || !input.firing || world.fire_cooldown > 0.0 {
        return;
    }
    let f = &tuning.firing;
    let muzzle = game.player_pos + polar_to_cartesian(f.muzzle, input.aim_angle);
    let count = if game.powerups.spread_active() {
        f.spread_count.max(1)
    } else {
        1
    };
    let center = (count - 1) as f32 * 0.5;
    for i in 0..count {
        let angle = input.aim_angle + (i as f32 - center) * f.spread_angle;
        let spawned = spawn_bullet(
            &mut world.bullets,
            muzzle,
            angle,
            game.stats.bullet_speed,
            game.stats.damage,
            f.bullet_ttl,
        );
        if spawned.is_none() {
            world.note_dropped_spawn("bullet");
        }
    }
    let rapid_mul = if game.powerups.rapid_active() {
        f.rapid_mul
    } else {
        1.0
    };
    world.fire_cooldown = 1.0 / game.stats.rate_of_fire / rapid_mul;
}

/// Top-down arena: move below the barrier, inside the viewport
fn move_player(game: &mut GameState, tuning: &Tuning, intent: Vec2, dt: f32) {
    if game.arena != ArenaMode::TopDown {
        return;
    }
    let step = intent.clamp_length_max(1.0) * PLAYER_MOVE_SPEED * dt;
    let hw = tuning.viewport.half_width() - PLAYER_RADIUS;
    let hh = tuning.viewport.half_height() - PLAYER_RADIUS;
    let p = game.player_pos + step;
    game.player_pos = Vec2::new(p.x.clamp(-hw, hw), p.y.clamp(BARRIER_Y + PLAYER_RADIUS, hh));
}
