//! Player bullets, enemy shots and defensive lasers
//!
//! Plain-data slot records plus their spawn/update routines. Kinematics are
//! straight-line; every kind expires on a time-to-live and on leaving its
//! world bound.

use glam::Vec2;

use super::pool::{Pool, SlotId};
use crate::consts::{BULLET_WORLD_BOUND, SHOT_OFFSCREEN_PAD};
use crate::polar_to_cartesian;
use crate::tuning::{Tuning, Viewport};

pub const BULLET_RADIUS: f32 = 3.0;
pub const ENEMY_SHOT_RADIUS: f32 = 6.0;
pub const ENEMY_SHOT_TTL: f32 = 7.0;
pub const LASER_RADIUS: f32 = 2.0;

/// Player bullet
#[derive(Debug, Clone, Default)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub ttl: f32,
    pub damage: f32,
}

/// Enemy projectile
#[derive(Debug, Clone, Default)]
pub struct EnemyShot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub ttl: f32,
    pub color: u32,
}

/// Defensive laser bolt
#[derive(Debug, Clone, Default)]
pub struct Laser {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub ttl: f32,
    pub damage: f32,
}

pub fn spawn_bullet(
    pool: &mut Pool<Bullet>,
    pos: Vec2,
    angle: f32,
    speed: f32,
    damage: f32,
    ttl: f32,
) -> Option<SlotId> {
    pool.spawn(Bullet {
        pos,
        vel: polar_to_cartesian(speed, angle),
        radius: BULLET_RADIUS,
        ttl,
        damage,
    })
}

pub fn update_bullets(pool: &mut Pool<Bullet>, dt: f32) {
    pool.retain(|b| {
        b.pos += b.vel * dt;
        b.ttl -= dt;
        b.ttl > 0.0
            && b.pos.x.abs() <= BULLET_WORLD_BOUND
            && b.pos.y.abs() <= BULLET_WORLD_BOUND
    });
}

/// Launch speed for an enemy shot fired from `from` at `target`.
///
/// Slow scales the nominal speed down, then the result is capped so the
/// shot needs at least `min_shot_tti` seconds to cover the distance.
pub fn fair_shot_speed(nominal: f32, from: Vec2, target: Vec2, slow: bool, tuning: &Tuning) -> f32 {
    let slowed = if slow {
        nominal * tuning.powerups.slow_shot_mul
    } else {
        nominal
    };
    let max_speed = from.distance(target) / tuning.fairness.min_shot_tti;
    slowed.min(max_speed)
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_enemy_shot(
    pool: &mut Pool<EnemyShot>,
    pos: Vec2,
    angle: f32,
    nominal_speed: f32,
    color: u32,
    player_pos: Vec2,
    slow: bool,
    tuning: &Tuning,
) -> Option<SlotId> {
    let speed = fair_shot_speed(nominal_speed, pos, player_pos, slow, tuning);
    pool.spawn(EnemyShot {
        pos,
        vel: polar_to_cartesian(speed, angle),
        radius: ENEMY_SHOT_RADIUS,
        ttl: ENEMY_SHOT_TTL,
        color,
    })
}

/// Advance enemy shots; releases expired ones and those past the screen pad
pub fn update_enemy_shots(pool: &mut Pool<EnemyShot>, viewport: &Viewport, dt: f32) {
    let max_x = viewport.half_width() + SHOT_OFFSCREEN_PAD;
    let max_y = viewport.half_height() + SHOT_OFFSCREEN_PAD;
    pool.retain(|s| {
        s.pos += s.vel * dt;
        s.ttl -= dt;
        s.ttl > 0.0 && s.pos.x.abs() <= max_x && s.pos.y.abs() <= max_y
    });
}

pub fn spawn_laser(
    pool: &mut Pool<Laser>,
    pos: Vec2,
    angle: f32,
    speed: f32,
    damage: f32,
    ttl: f32,
) -> Option<SlotId> {
    pool.spawn(Laser {
        pos,
        vel: polar_to_cartesian(speed, angle),
        angle,
        radius: LASER_RADIUS,
        ttl,
        damage,
    })
}

pub fn update_lasers(pool: &mut Pool<Laser>, dt: f32) {
    pool.retain(|l| {
        l.pos += l.vel * dt;
        l.ttl -= dt;
        l.ttl > 0.0
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_expire_on_ttl_and_bound() {
        let mut pool = Pool::new(4);
        spawn_bullet(&mut pool, Vec2::ZERO, 0.0, 900.0, 1.0, 0.05);
        spawn_bullet(&mut pool, Vec2::new(3995.0, 0.0), 0.0, 900.0, 1.0, 5.0);
        spawn_bullet(&mut pool, Vec2::ZERO, 0.0, 900.0, 1.0, 5.0);
        update_bullets(&mut pool, 0.1);
        let ids: Vec<SlotId> = pool.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_enemy_shot_speed_capped_by_time_to_impact() {
        let tuning = Tuning::default();
        // 100 units away: 200 u/s would land in 0.5s, capped to 80 u/s
        let speed = fair_shot_speed(200.0, Vec2::new(100.0, 0.0), Vec2::ZERO, false, &tuning);
        assert!((speed - 80.0).abs() < 1e-4);
        // Far away: nominal speed, scaled by slow
        let speed = fair_shot_speed(200.0, Vec2::new(600.0, 0.0), Vec2::ZERO, true, &tuning);
        assert!((speed - 140.0).abs() < 1e-4);
    }

    #[test]
    fn test_enemy_shots_leave_screen() {
        let viewport = Viewport::default();
        let mut pool = Pool::new(4);
        pool.spawn(EnemyShot {
            pos: Vec2::new(viewport.half_width() + 30.0, 0.0),
            vel: Vec2::new(300.0, 0.0),
            radius: ENEMY_SHOT_RADIUS,
            ttl: ENEMY_SHOT_TTL,
            color: 0,
        });
        pool.spawn(EnemyShot {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            radius: ENEMY_SHOT_RADIUS,
            ttl: ENEMY_SHOT_TTL,
            color: 0,
        });
        update_enemy_shots(&mut pool, &viewport, 1.0 / 60.0);
        assert_eq!(pool.active_count(), 1);
        assert!(pool.get(1).is_some());
    }

    #[test]
    fn test_lasers_are_short_lived() {
        let tuning = Tuning::default();
        let mut pool = Pool::new(2);
        spawn_laser(&mut pool, Vec2::ZERO, 0.0, tuning.laser.speed, 1.0, tuning.laser.ttl);
        for _ in 0..13 {
            update_lasers(&mut pool, 1.0 / 60.0);
        }
        assert_eq!(pool.active_count(), 1);
        update_lasers(&mut pool, 1.0 / 60.0);
        assert_eq!(pool.active_count(), 0);
    }
}
