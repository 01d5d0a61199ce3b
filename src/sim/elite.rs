//! Elite affixes
//!
//! A closed set of named modifiers. Each affix mutates base stats when
//! attached and may produce a death effect. Affixes are stored inline on the
//! enemy slot (no allocation) and applied in roll order.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::Pool;

/// Most affixes a single enemy can carry
pub const MAX_AFFIXES: usize = 2;
/// Wave from which a second affix may roll
pub const DOUBLE_AFFIX_WAVE: u32 = 8;

pub const COLD_AURA_RADIUS: f32 = 180.0;
pub const COLD_AURA_DURATION: f32 = 3.0;
pub const COLD_AURA_STRENGTH: f32 = 0.45;
pub const VOLATILE_RADIUS: f32 = 140.0;
pub const VOLATILE_DAMAGE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliteAffix {
    /// Extra hit points
    Shielded,
    /// Faster movement
    Swift,
    /// Larger and much tougher
    Juggernaut,
    /// Leaves a slowing aura on death
    Cold,
    /// Explodes on death, damaging nearby enemies
    Volatile,
}

impl EliteAffix {
    pub const ALL: [EliteAffix; 5] = [
        EliteAffix::Shielded,
        EliteAffix::Swift,
        EliteAffix::Juggernaut,
        EliteAffix::Cold,
        EliteAffix::Volatile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EliteAffix::Shielded => "Shielded",
            EliteAffix::Swift => "Swift",
            EliteAffix::Juggernaut => "Juggernaut",
            EliteAffix::Cold => "Cold",
            EliteAffix::Volatile => "Volatile",
        }
    }

    /// Relative roll weight
    pub fn weight(self) -> u32 {
        match self {
            EliteAffix::Shielded | EliteAffix::Swift => 3,
            EliteAffix::Juggernaut | EliteAffix::Cold => 2,
            EliteAffix::Volatile => 1,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            EliteAffix::Shielded => 0x5cc2ff,
            EliteAffix::Swift => 0x9eff6b,
            EliteAffix::Juggernaut => 0xff9e6b,
            EliteAffix::Cold => 0xb6d7ff,
            EliteAffix::Volatile => 0xffb63b,
        }
    }

    /// Stat changes applied at spawn
    pub fn apply(self, stats: &mut EliteStats) {
        match self {
            EliteAffix::Shielded => stats.hp = (stats.hp * 1.8).ceil(),
            EliteAffix::Swift => stats.speed = (stats.speed * 1.25).round(),
            EliteAffix::Juggernaut => {
                stats.radius += 2.0;
                stats.hp = (stats.hp * 2.3).ceil();
            }
            EliteAffix::Cold | EliteAffix::Volatile => {}
        }
    }

    /// Effect triggered where the carrier died
    pub fn on_death(self, pos: Vec2) -> Option<DeathEffect> {
        match self {
            EliteAffix::Cold => Some(DeathEffect::ColdAura {
                pos,
                radius: COLD_AURA_RADIUS,
                duration: COLD_AURA_DURATION,
                strength: COLD_AURA_STRENGTH,
            }),
            EliteAffix::Volatile => Some(DeathEffect::Volatile {
                pos,
                radius: VOLATILE_RADIUS,
                damage: VOLATILE_DAMAGE,
            }),
            _ => None,
        }
    }
}

/// The stats an affix may touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EliteStats {
    pub hp: f32,
    pub speed: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathEffect {
    ColdAura {
        pos: Vec2,
        radius: f32,
        duration: f32,
        strength: f32,
    },
    Volatile {
        pos: Vec2,
        radius: f32,
        damage: f32,
    },
}

/// Inline affix list, in roll order, without duplicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affixes {
    slots: [Option<EliteAffix>; MAX_AFFIXES],
}

impl Affixes {
    pub fn is_elite(&self) -> bool {
        self.slots[0].is_some()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_elite()
    }

    pub fn contains(&self, affix: EliteAffix) -> bool {
        self.iter().any(|a| a == affix)
    }

    pub fn iter(&self) -> impl Iterator<Item = EliteAffix> + '_ {
        self.slots.iter().map_while(|a| *a)
    }

    /// Append an affix; rejects duplicates and overflow
    pub fn push(&mut self, affix: EliteAffix) -> bool {
        if self.contains(affix) {
            return false;
        }
        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => {
                *slot = Some(affix);
                true
            }
            None => false,
        }
    }

    /// Outline color (first affix wins)
    pub fn color(&self) -> Option<u32> {
        self.slots[0].map(EliteAffix::color)
    }

    /// "Swift + Cold"
    pub fn label(&self) -> String {
        self.iter().map(EliteAffix::name).collect::<Vec<_>>().join(" + ")
    }
}

/// Probability that a spawn on `wave` rolls any affix
pub fn elite_chance(wave: u32) -> f64 {
    (0.04 + 0.01 * wave as f64).min(0.25)
}

pub fn max_affixes(wave: u32) -> usize {
    if wave >= DOUBLE_AFFIX_WAVE { MAX_AFFIXES } else { 1 }
}

fn weighted_pick<R: Rng>(rng: &mut R, candidates: &[EliteAffix]) -> Option<EliteAffix> {
    let total: u32 = candidates.iter().map(|a| a.weight()).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for &affix in candidates {
        let w = affix.weight();
        if roll < w {
            return Some(affix);
        }
        roll -= w;
    }
    candidates.last().copied()
}

/// Roll the affixes for a fresh spawn
pub fn roll_affixes<R: Rng>(rng: &mut R, wave: u32) -> Affixes {
    let chance = elite_chance(wave);
    let mut affixes = Affixes::default();
    if !rng.random_bool(chance) {
        return affixes;
    }
    if let Some(first) = weighted_pick(rng, &EliteAffix::ALL) {
        affixes.push(first);
    }
    // Each extra stack passes a weaker gate
    let extra_gate = (chance * 0.5).max(0.15);
    while affixes.len() < max_affixes(wave) {
        if !rng.random_bool(extra_gate) {
            break;
        }
        let mut remaining = [EliteAffix::Shielded; 5];
        let mut n = 0;
        for affix in EliteAffix::ALL {
            if !affixes.contains(affix) {
                remaining[n] = affix;
                n += 1;
            }
        }
        match weighted_pick(rng, &remaining[..n]) {
            Some(next) => {
                affixes.push(next);
            }
            None => break,
        }
    }
    affixes
}

/// Slowing field left by a Cold elite
#[derive(Debug, Clone, Default)]
pub struct ColdAura {
    pub pos: Vec2,
    pub radius: f32,
    pub remaining: f32,
    pub strength: f32,
}

pub fn update_auras(pool: &mut Pool<ColdAura>, dt: f32) {
    pool.retain(|a| {
        a.remaining -= dt;
        a.remaining > 0.0
    });
}

/// Movement factor at `pos`: the strongest overlapping aura wins
pub fn cold_multiplier(pool: &Pool<ColdAura>, pos: Vec2) -> f32 {
    let strongest = pool
        .iter()
        .filter(|(_, a)| a.pos.distance_squared(pos) <= a.radius * a.radius)
        .map(|(_, a)| a.strength)
        .fold(0.0f32, f32::max);
    (1.0 - strongest).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stat_modifiers_stack_in_order() {
        let mut stats = EliteStats {
            hp: 3.0,
            speed: 60.0,
            radius: 14.0,
        };
        EliteAffix::Shielded.apply(&mut stats);
        assert_eq!(stats.hp, 6.0);
        EliteAffix::Juggernaut.apply(&mut stats);
        assert_eq!(stats.hp, 14.0);
        assert_eq!(stats.radius, 16.0);
        EliteAffix::Swift.apply(&mut stats);
        assert_eq!(stats.speed, 75.0);
    }

    #[test]
    fn test_affixes_reject_duplicates_and_overflow() {
        let mut affixes = Affixes::default();
        assert!(!affixes.is_elite());
        assert!(affixes.push(EliteAffix::Cold));
        assert!(!affixes.push(EliteAffix::Cold));
        assert!(affixes.push(EliteAffix::Swift));
        assert!(!affixes.push(EliteAffix::Volatile));
        assert_eq!(affixes.label(), "Cold + Swift");
        assert_eq!(affixes.color(), Some(0xb6d7ff));
    }

    #[test]
    fn test_chance_scales_and_caps() {
        assert!((elite_chance(1) - 0.05).abs() < 1e-9);
        assert!((elite_chance(30) - 0.25).abs() < 1e-9);
        assert_eq!(max_affixes(7), 1);
        assert_eq!(max_affixes(8), 2);
    }

    #[test]
    fn test_rolls_respect_wave_stack_limit() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut elites = 0;
        for _ in 0..2000 {
            let early = roll_affixes(&mut rng, 3);
            assert!(early.len() <= 1);
            let late = roll_affixes(&mut rng, 20);
            assert!(late.len() <= 2);
            if late.is_elite() {
                elites += 1;
            }
        }
        // 25% chance at wave 20
        assert!((350..650).contains(&elites));
    }

    #[test]
    fn test_cold_multiplier_uses_strongest_aura() {
        let mut pool = Pool::new(4);
        pool.spawn(ColdAura {
            pos: Vec2::ZERO,
            radius: 100.0,
            remaining: 1.0,
            strength: 0.2,
        });
        pool.spawn(ColdAura {
            pos: Vec2::new(50.0, 0.0),
            radius: 100.0,
            remaining: 1.0,
            strength: 0.45,
        });
        assert!((cold_multiplier(&pool, Vec2::new(10.0, 0.0)) - 0.55).abs() < 1e-6);
        assert!((cold_multiplier(&pool, Vec2::new(-90.0, 0.0)) - 0.8).abs() < 1e-6);
        assert_eq!(cold_multiplier(&pool, Vec2::new(500.0, 0.0)), 1.0);
        update_auras(&mut pool, 1.5);
        assert_eq!(pool.active_count(), 0);
    }
}
