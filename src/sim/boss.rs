//! Boss controller
//!
//! A singleton with hp-gated phases and three independent attack timers:
//! ring volleys of strikers, a telegraphed sweep that drops minions along
//! its arc, and periodic add summons. Phase only ever escalates.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::enemy::{EnemyKind, spawn_enemy_at};
use super::state::{GameEvent, GameState, colors};
use super::world::World;
use crate::audio::SoundEffect;
use crate::tuning::Tuning;
use crate::{heading, polar_to_cartesian};

pub const BOSS_RADIUS: f32 = 36.0;
pub const SPAWN_POS: Vec2 = Vec2::new(0.0, -220.0);
pub const FIRST_RING_DELAY: f32 = 0.0;
pub const FIRST_SUMMON_DELAY: f32 = 2.5;
pub const RING_RADIUS: f32 = 180.0;
pub const SUMMON_RADIUS: f32 = 260.0;
pub const SWEEP_TELEGRAPH: f32 = 0.8;
pub const SWEEP_FIRE: f32 = 1.0;
/// Per-tick chance an idle sweep starts telegraphing
pub const SWEEP_START_CHANCE: f64 = 0.012;
/// Per-tick chance a firing sweep drops a minion volley
pub const SWEEP_DROP_CHANCE: f64 = 0.25;

/// Base hp on `wave`
pub fn max_hp_for_wave(wave: u32) -> f32 {
    60.0 + wave.max(1).saturating_sub(1) as f32 * 20.0
}

/// Phase implied by an hp fraction
pub fn phase_for_fraction(frac: f32) -> u8 {
    if frac <= 0.3 {
        3
    } else if frac <= 0.6 {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepState {
    #[default]
    Idle,
    Telegraph,
    Fire,
}

impl SweepState {
    /// Transition for elapsed time `t` in the current state; `start` is the
    /// idle roll result.
    pub fn next(self, t: f32, start: bool) -> SweepState {
        match self {
            SweepState::Idle if start => SweepState::Telegraph,
            SweepState::Telegraph if t >= SWEEP_TELEGRAPH => SweepState::Fire,
            SweepState::Fire if t >= SWEEP_FIRE => SweepState::Idle,
            s => s,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sweep {
    pub state: SweepState,
    /// Seconds in the current state
    pub t: f32,
    /// Center angle of the sweep
    pub angle: f32,
    /// +1 or -1
    pub dir: f32,
}

impl Sweep {
    /// Current beam angle while firing (linear across the arc)
    pub fn current_angle(&self, half_arc: f32) -> f32 {
        let progress = (self.t / SWEEP_FIRE).min(1.0);
        self.angle + self.dir * half_arc * (progress * 2.0 - 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Boss {
    pub active: bool,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub phase: u8,
    /// Seconds since spawn
    pub t: f32,
    pub ring_timer: f32,
    pub summon_timer: f32,
    pub sweep: Sweep,
}

impl Boss {
    pub fn spawn(&mut self, wave: u32) {
        let max_hp = max_hp_for_wave(wave);
        *self = Boss {
            active: true,
            pos: SPAWN_POS,
            radius: BOSS_RADIUS,
            hp: max_hp,
            max_hp,
            phase: 1,
            t: 0.0,
            ring_timer: FIRST_RING_DELAY,
            summon_timer: FIRST_SUMMON_DELAY,
            sweep: Sweep {
                angle: PI / 2.0,
                dir: 1.0,
                ..Sweep::default()
            },
        };
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 }
    }

    /// Escalate phase from the current hp; never de-escalates
    pub fn update_phase(&mut self) {
        self.phase = self.phase.max(phase_for_fraction(self.hp_fraction()));
    }

    pub fn ring_cooldown(&self) -> f32 {
        match self.phase {
            1 => 2.0,
            2 => 1.6,
            _ => 1.2,
        }
    }

    pub fn ring_count(&self) -> usize {
        match self.phase {
            1 => 5,
            2 => 6,
            _ => 8,
        }
    }

    /// Half-width of the sweep arc
    pub fn sweep_half_arc(&self) -> f32 {
        if self.phase >= 3 { 0.9 } else { 0.7 }
    }

    pub fn summon_cooldown(&self) -> f32 {
        if self.phase >= 3 { 6.0 } else { 7.5 }
    }

    fn hover(&mut self) {
        self.pos = Vec2::new(
            (self.t * 0.6).sin() * 120.0,
            -200.0 + (self.t * 0.5).cos() * 20.0,
        );
    }
}

pub fn spawn_boss(world: &mut World, game: &GameState) {
    world.boss.spawn(game.wave);
    world.sound(SoundEffect::BossSpawn);
    log::info!("Boss spawned on wave {} with {} hp", game.wave, world.boss.max_hp);
}

/// Advance motion, phase and all three attack timers
pub fn update_boss(world: &mut World, game: &GameState, tuning: &Tuning, dt: f32) {
    if !world.boss.active {
        return;
    }
    let boss = &mut world.boss;
    boss.t += dt;
    boss.update_phase();
    boss.hover();

    // Ring volley
    boss.ring_timer -= dt;
    if boss.ring_timer <= 0.0 {
        let (center, count, offset) = (boss.pos, boss.ring_count(), boss.t * 0.7);
        boss.ring_timer = boss.ring_cooldown();
        for i in 0..count {
            let a = offset + i as f32 / count as f32 * PI * 2.0;
            let pos = center + polar_to_cartesian(RING_RADIUS, a);
            spawn_enemy_at(world, game, tuning, pos, EnemyKind::Striker);
        }
    }

    update_sweep(world, game, tuning, dt);

    let boss = &mut world.boss;
    boss.summon_timer -= dt;
    if boss.summon_timer <= 0.0 {
        boss.summon_timer = boss.summon_cooldown();
        summon_adds(world, game, tuning);
    }
}

fn update_sweep(world: &mut World, game: &GameState, tuning: &Tuning, dt: f32) {
    let state = world.boss.sweep.state;
    let start = state == SweepState::Idle && world.rng.random_bool(SWEEP_START_CHANCE);
    if state != SweepState::Idle {
        world.boss.sweep.t += dt;
    }

    if state == SweepState::Fire {
        let boss = &world.boss;
        let angle = boss.sweep.current_angle(boss.sweep_half_arc());
        let (center, phase) = (boss.pos, boss.phase);
        if world.rng.random_bool(SWEEP_DROP_CHANCE) {
            let step = polar_to_cartesian(30.0, angle);
            spawn_enemy_at(world, game, tuning, center + step, EnemyKind::Grunt);
            spawn_enemy_at(world, game, tuning, center + step * 1.6, EnemyKind::Grunt);
            if phase >= 2 {
                spawn_enemy_at(world, game, tuning, center + step * 2.2, EnemyKind::Tank);
            }
        }
    }

    let next = state.next(world.boss.sweep.t, start);
    if next != state {
        let sweep = &mut world.boss.sweep;
        sweep.state = next;
        sweep.t = 0.0;
        if next == SweepState::Telegraph {
            // Aim biased toward the player
            sweep.dir = if world.rng.random_bool(0.5) { -1.0 } else { 1.0 };
            sweep.angle = heading(game.player_pos - world.boss.pos)
                + world.rng.random_range(-0.3f32..0.3);
        }
    }
}

/// Fixed three-enemy formation near the screen edge
fn summon_adds(world: &mut World, game: &GameState, tuning: &Tuning) {
    let formation = [
        (EnemyKind::Grunt, PI * 0.85),
        (EnemyKind::Striker, PI * 1.15),
        (EnemyKind::Grunt, PI * 0.5),
    ];
    for (kind, angle) in formation {
        spawn_enemy_at(world, game, tuning, polar_to_cartesian(SUMMON_RADIUS, angle), kind);
    }
}

/// Flat damage to the boss. Returns true when it dies.
pub fn damage_boss(world: &mut World, game: &mut GameState, tuning: &Tuning, damage: f32) -> bool {
    if !world.boss.active {
        return false;
    }
    world.boss.hp -= damage;
    if world.boss.hp <= 0.0 {
        world.boss.hp = 0.0;
        kill_boss(world, game, tuning);
        true
    } else {
        false
    }
}

fn kill_boss(world: &mut World, game: &mut GameState, tuning: &Tuning) {
    let pos = world.boss.pos;
    world.boss.active = false;
    let mult = game.powerups.score_mult();
    game.grant(
        tuning.rewards.boss_score * u64::from(mult),
        tuning.boss_credits(game.wave) * mult,
    );
    world.emit(GameEvent::DeathBurst {
        pos,
        color: colors::DAMAGE,
    });
    world.sound(SoundEffect::BossDeath);
    log::info!("Boss defeated on wave {}", game.wave);
}
