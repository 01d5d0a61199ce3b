//! Enemies: spawning under fairness floors, homing movement, telegraphed
//! fire, damage and kill rewards.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::elite::{self, Affixes, DeathEffect, EliteStats};
use super::pickup;
use super::pool::SlotId;
use super::projectiles::spawn_enemy_shot;
use super::state::{ArenaMode, GameEvent, GameState, colors};
use super::world::{VolatileBoom, World};
use crate::audio::SoundEffect;
use crate::consts::{BARRIER_Y, PLAYER_RADIUS, SPAWN_EDGE_PAD};
use crate::tuning::{FairnessTuning, Tuning, Viewport};
use crate::heading;

/// Length of the pre-shot warning
pub const TELEGRAPH_TIME: f32 = 0.25;
/// Soft clamp slack before an enemy is pulled back in bounds
pub const CLAMP_TOLERANCE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Grunt,
    Striker,
    Tank,
}

/// Per-kind base stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyBase {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    pub fire_cooldown: f32,
    pub fire_timer: f32,
    /// Cost against the wave spawn quota
    pub quota: u32,
}

impl EnemyKind {
    pub fn base(self) -> EnemyBase {
        match self {
            EnemyKind::Grunt => EnemyBase {
                radius: 14.0,
                hp: 3.0,
                speed: 60.0,
                fire_cooldown: 2.4,
                fire_timer: 1.4,
                quota: 1,
            },
            EnemyKind::Striker => EnemyBase {
                radius: 12.0,
                hp: 2.0,
                speed: 95.0,
                fire_cooldown: 1.8,
                fire_timer: 1.2,
                quota: 1,
            },
            EnemyKind::Tank => EnemyBase {
                radius: 16.0,
                hp: 6.0,
                speed: 40.0,
                fire_cooldown: 1.2,
                fire_timer: 0.6,
                quota: 2,
            },
        }
    }

    /// Nominal projectile speed
    pub fn shot_speed(self) -> f32 {
        match self {
            EnemyKind::Grunt => 200.0,
            EnemyKind::Striker => 240.0,
            EnemyKind::Tank => 180.0,
        }
    }

    pub fn shot_color(self) -> u32 {
        match self {
            EnemyKind::Tank => colors::TANK,
            _ => colors::AMBER,
        }
    }

    pub fn kill_credits(self) -> u32 {
        match self {
            EnemyKind::Tank => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    pub kind: EnemyKind,
    /// Countdown to the next telegraph/shot
    pub fire_timer: f32,
    pub fire_cooldown: f32,
    /// Remaining telegraph time (> 0 while warning)
    pub telegraph: f32,
    pub quota: u32,
    pub affixes: Affixes,
}

/// Move `requested` away from `player` until both floors hold:
/// at least `min_spawn_proximity` away (pushed to proximity + buffer), and
/// at least `speed * min_enemy_tti` away.
///
/// With a `ceiling` (top-down arena) the point never ends up below that y:
/// a push that would cross it slides sideways along the ceiling row instead.
/// `fallback_dir` is used when the point coincides with the player.
pub fn fair_spawn_point(
    requested: Vec2,
    player: Vec2,
    speed: f32,
    fairness: &FairnessTuning,
    fallback_dir: Vec2,
    ceiling: Option<f32>,
) -> Vec2 {
    let requested = match ceiling {
        Some(c) => Vec2::new(requested.x, requested.y.min(c)),
        None => requested,
    };
    let offset = requested - player;
    let dist = offset.length();
    let mut required = dist;
    if dist < fairness.min_spawn_proximity {
        required = fairness.min_spawn_proximity + fairness.spawn_buffer;
    }
    required = required.max(speed * fairness.min_enemy_tti);
    if required <= dist {
        return requested;
    }
    let dir = if dist > 1e-3 {
        offset / dist
    } else {
        fallback_dir.normalize_or(Vec2::X)
    };
    let pushed = player + dir * required;
    match ceiling {
        Some(c) if pushed.y > c => {
            let side = if offset.x.abs() > 1e-3 {
                offset.x.signum()
            } else if fallback_dir.x < 0.0 {
                -1.0
            } else {
                1.0
            };
            let dy = player.y - requested.y;
            let dx = (required * required - dy * dy).max(0.0).sqrt();
            Vec2::new(player.x + side * dx, requested.y)
        }
        _ => pushed,
    }
}

/// Random point just outside a screen edge
pub fn edge_spawn_point<R: Rng>(rng: &mut R, viewport: &Viewport) -> Vec2 {
    let hw = viewport.half_width();
    let hh = viewport.half_height();
    let pad = SPAWN_EDGE_PAD;
    let along_x = || (-hw + pad, hw - pad);
    let along_y = || (-hh + pad, hh - pad);
    match rng.random_range(0..4) {
        0 => {
            let (lo, hi) = along_x();
            Vec2::new(rng.random_range(lo..hi), -hh - pad)
        }
        1 => {
            let (lo, hi) = along_y();
            Vec2::new(hw + pad, rng.random_range(lo..hi))
        }
        2 => {
            let (lo, hi) = along_x();
            Vec2::new(rng.random_range(lo..hi), hh + pad)
        }
        _ => {
            let (lo, hi) = along_y();
            Vec2::new(-hw - pad, rng.random_range(lo..hi))
        }
    }
}

/// Enemy type mix for edge spawns: grunts early, strikers from wave 2,
/// tanks from wave 4.
pub fn roll_kind<R: Rng>(rng: &mut R, wave: u32) -> EnemyKind {
    let r: f32 = rng.random();
    if wave >= 4 && r < 0.15 {
        EnemyKind::Tank
    } else if wave >= 2 && r < 0.3 {
        EnemyKind::Striker
    } else {
        EnemyKind::Grunt
    }
}

/// Spawn an enemy at (or pushed out from) `pos`.
///
/// Returns `None` when the enemy pool is full; the spawn is dropped.
pub fn spawn_enemy_at(
    world: &mut World,
    game: &GameState,
    tuning: &Tuning,
    pos: Vec2,
    kind: EnemyKind,
) -> Option<SlotId> {
    if world.enemies.is_full() {
        world.note_dropped_spawn("enemy");
        return None;
    }
    let base = kind.base();
    let rng = &mut world.rng;
    // Desync cadence so simultaneous spawns don't volley together
    let fire_cooldown = base.fire_cooldown * rng.random_range(0.9..1.15);
    let fire_timer = base.fire_timer * rng.random_range(0.6..1.4);

    let affixes = elite::roll_affixes(rng, game.wave);
    let mut stats = EliteStats {
        hp: base.hp,
        speed: base.speed,
        radius: base.radius,
    };
    for affix in affixes.iter() {
        affix.apply(&mut stats);
    }

    let fallback = crate::polar_to_cartesian(1.0, rng.random_range(-std::f32::consts::PI..std::f32::consts::PI));
    // Stay inside the band update_enemies clamps to
    let y_limit = tuning.viewport.half_height() + SPAWN_EDGE_PAD;
    let pos = Vec2::new(pos.x, pos.y.clamp(-y_limit, y_limit));
    let ceiling = (game.arena == ArenaMode::TopDown).then_some(BARRIER_Y);
    let pos = fair_spawn_point(pos, game.player_pos, stats.speed, &tuning.fairness, fallback, ceiling);

    world.enemies.spawn(Enemy {
        pos,
        radius: stats.radius,
        hp: stats.hp,
        speed: stats.speed,
        kind,
        fire_timer,
        fire_cooldown,
        telegraph: 0.0,
        quota: base.quota,
        affixes,
    })
}

/// Spawn just outside a random screen edge
pub fn spawn_enemy_from_edge(
    world: &mut World,
    game: &GameState,
    tuning: &Tuning,
    kind: EnemyKind,
) -> Option<SlotId> {
    let pos = edge_spawn_point(&mut world.rng, &tuning.viewport);
    spawn_enemy_at(world, game, tuning, pos, kind)
}

/// Aim error (radians) for a shooter `dist` away from the player
pub fn aim_error_bound(dist: f32, fairness: &FairnessTuning) -> f32 {
    if dist >= fairness.aim_far {
        return 0.0;
    }
    let t = ((fairness.aim_far - dist) / (fairness.aim_far - fairness.aim_near)).clamp(0.0, 1.0);
    fairness.aim_error_max * t
}

/// Move every enemy toward the player and run its fire telegraph
pub fn update_enemies(world: &mut World, game: &GameState, tuning: &Tuning, dt: f32) {
    let player = game.player_pos;
    let slow_mul = if game.powerups.slow_active() {
        tuning.powerups.slow_enemy_mul
    } else {
        1.0
    };
    let slow = game.powerups.slow_active();
    let y_bound = tuning.viewport.half_height() + SPAWN_EDGE_PAD + CLAMP_TOLERANCE;
    let top_down = game.arena == ArenaMode::TopDown;

    for id in 0..world.enemies.capacity() {
        let cold_mul = match world.enemies.get(id) {
            Some(e) => elite::cold_multiplier(&world.auras, e.pos),
            None => continue,
        };
        let Some(e) = world.enemies.get_mut(id) else {
            continue;
        };

        let to_player = player - e.pos;
        let dist = to_player.length();
        if dist > 1.0 {
            e.pos += to_player / dist * e.speed * slow_mul * cold_mul * dt;
        }

        // Soft clamps
        e.pos.y = e.pos.y.clamp(-y_bound, y_bound);
        if top_down && e.pos.y > BARRIER_Y + CLAMP_TOLERANCE {
            e.pos.y = BARRIER_Y + CLAMP_TOLERANCE;
        }

        e.fire_timer -= dt;
        if e.fire_timer <= 0.0 {
            if e.telegraph <= 0.0 {
                e.telegraph = TELEGRAPH_TIME;
                e.fire_timer = TELEGRAPH_TIME;
            } else {
                let (from, kind) = (e.pos, e.kind);
                e.fire_timer = e.fire_cooldown;
                e.telegraph = 0.0;

                let aim_dist = from.distance(player);
                let max_err = aim_error_bound(aim_dist, &tuning.fairness);
                let mut angle = heading(player - from);
                if max_err > 0.0 {
                    angle += world.rng.random_range(-1.0f32..=1.0) * max_err;
                }
                spawn_enemy_shot(
                    &mut world.enemy_shots,
                    from,
                    angle,
                    kind.shot_speed(),
                    kind.shot_color(),
                    player,
                    slow,
                    tuning,
                );
            }
        } else if e.telegraph > 0.0 {
            e.telegraph = (e.telegraph - dt).max(0.0);
        }
    }
}

/// Apply damage; kills (with rewards) at zero hp. Returns true on kill.
pub fn damage_enemy(
    world: &mut World,
    game: &mut GameState,
    tuning: &Tuning,
    id: SlotId,
    damage: f32,
) -> bool {
    let Some(e) = world.enemies.get_mut(id) else {
        return false;
    };
    e.hp -= damage;
    if e.hp <= 0.0 {
        kill_enemy(world, game, tuning, id);
        true
    } else {
        false
    }
}

/// Release an enemy and grant its reward, FX, drop roll and death hooks
pub fn kill_enemy(world: &mut World, game: &mut GameState, tuning: &Tuning, id: SlotId) {
    let Some(e) = world.enemies.get(id) else {
        return;
    };
    let (pos, kind, affixes) = (e.pos, e.kind, e.affixes);
    world.enemies.release(id);

    let mult = game.powerups.score_mult();
    game.grant(
        tuning.rewards.kill_score * u64::from(mult),
        kind.kill_credits() * mult,
    );

    let color = if kind == EnemyKind::Tank {
        colors::TANK
    } else {
        colors::GOLD
    };
    world.emit(GameEvent::DeathBurst { pos, color });
    world.sound(SoundEffect::EnemyKill);

    if world.rng.random_bool(tuning.powerups.pickup_drop_chance) {
        pickup::spawn_pickup(world, tuning, pos);
    }

    for affix in affixes.iter() {
        match affix.on_death(pos) {
            Some(DeathEffect::ColdAura {
                pos,
                radius,
                duration,
                strength,
            }) => {
                world.emit(GameEvent::ColdBurst { pos });
                world.emit(GameEvent::ColdAura {
                    pos,
                    radius,
                    duration,
                    strength,
                });
                let aura = elite::ColdAura {
                    pos,
                    radius,
                    remaining: duration,
                    strength,
                };
                if world.auras.spawn(aura).is_none() {
                    world.note_dropped_spawn("aura");
                }
            }
            Some(DeathEffect::Volatile { pos, radius, damage }) => {
                world.emit(GameEvent::Explosion { pos });
                world.pending_booms.push(VolatileBoom { pos, radius, damage });
            }
            None => {}
        }
    }
}

/// Resolve queued Volatile explosions, including chains they set off
pub fn resolve_booms(world: &mut World, game: &mut GameState, tuning: &Tuning) {
    while !world.pending_booms.is_empty() {
        let booms = std::mem::take(&mut world.pending_booms);
        for boom in booms {
            for id in 0..world.enemies.capacity() {
                let hit = world
                    .enemies
                    .get(id)
                    .is_some_and(|e| e.pos.distance_squared(boom.pos) <= boom.radius * boom.radius);
                if hit {
                    damage_enemy(world, game, tuning, id, boom.damage);
                }
            }
        }
    }
}

/// True when an enemy body touches the player circle
pub fn touches_player(e: &Enemy, player: Vec2) -> bool {
    super::collision::circles_overlap(e.pos, e.radius, player, PLAYER_RADIUS)
}
