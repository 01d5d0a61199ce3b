//! Narrow drawing interface
//!
//! Scenes draw through the `Canvas` trait: filled circles, progress bars,
//! progress rings and short labels in world units, with the origin at the screen center. Projectiles are
//! extrapolated by the loop's leftover `alpha` so motion stays smooth between
//! fixed steps.

use glam::Vec2;

use crate::consts::{PLAYER_RADIUS, SIM_DT};
use crate::settings::{AbilityUiMode, Settings};
use crate::sim::boss::Boss;
use crate::sim::state::{Ability, GameState, PickupKind, colors};
use crate::sim::world::World;
use crate::tuning::Tuning;

#[cfg(target_arch = "wasm32")]
mod canvas2d;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;

pub const BACKGROUND: u32 = 0x0a0d12;
pub const PLAYER: u32 = 0x0e1b2b;
pub const BULLET: u32 = 0xb7f3ff;
pub const LASER: u32 = 0x7cf7ff;
pub const BOSS: u32 = 0xc77dff;
pub const TELEGRAPH: u32 = 0xffffff;
pub const HUD_TRACK: u32 = 0x1e2f45;

const HUD_PAD: f32 = 12.0;
const HUD_GAP: f32 = 6.0;
const COOLDOWN_BAR: Vec2 = Vec2::new(140.0, 6.0);
/// Cooldown ring radii around the player, radial then cone
const COOLDOWN_RINGS: [f32; 2] = [48.0, 54.0];
/// Top edge of the heat gauge, measured up from the bottom of the view
const HEAT_GAUGE_TOP: f32 = 24.0;

/// Drawing surface
pub trait Canvas {
    fn clear(&mut self, color: u32);
    fn circle(&mut self, pos: Vec2, radius: f32, color: u32);
    /// Horizontal bar at `pos` (top-left) filled to `fill` in [0, 1]
    fn bar(&mut self, pos: Vec2, size: Vec2, fill: f32, color: u32);
    /// Circle outline with a progress arc filled clockwise from the top
    fn ring(&mut self, center: Vec2, radius: f32, fill: f32, color: u32);
    /// Short text with its baseline at `pos`
    fn label(&mut self, pos: Vec2, text: &str, color: u32);
}

/// Discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn clear(&mut self, _color: u32) {}
    fn circle(&mut self, _pos: Vec2, _radius: f32, _color: u32) {}
    fn bar(&mut self, _pos: Vec2, _size: Vec2, _fill: f32, _color: u32) {}
    fn ring(&mut self, _center: Vec2, _radius: f32, _fill: f32, _color: u32) {}
    fn label(&mut self, _pos: Vec2, _text: &str, _color: u32) {}
}

/// Heat gauge color: cyan when cool, through yellow, to red at the cap
pub fn heat_color(fraction: f32) -> u32 {
    let t = fraction.clamp(0.0, 1.0);
    let (r, g, b) = if t < 0.5 {
        let u = t / 0.5;
        (0.15 + 0.85 * u, 0.8, 1.0 - 0.8 * u)
    } else {
        let u = (t - 0.5) / 0.5;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };
    pack_rgb(r, g, b)
}

fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (c(r) << 16) | (c(g) << 8) | c(b)
}

pub fn pickup_color(kind: PickupKind) -> u32 {
    match kind {
        PickupKind::Rapid => colors::AMBER,
        PickupKind::Spread => colors::CYAN,
        PickupKind::Shield => 0x6bff9e,
        PickupKind::Slow => 0x8fb3ff,
        PickupKind::DoubleScore => colors::GOLD,
        PickupKind::Bomb => colors::DAMAGE,
    }
}

/// Draw the whole playfield
pub fn draw_world(canvas: &mut dyn Canvas, world: &World, game: &GameState, tuning: &Tuning, alpha: f32) {
    let lead = alpha.clamp(0.0, 1.0) * SIM_DT;
    canvas.clear(BACKGROUND);

    for (_, p) in world.pickups.iter() {
        canvas.circle(p.pos, 8.0, pickup_color(p.kind));
    }
    for (_, e) in world.enemies.iter() {
        let color = e.affixes.color().unwrap_or_else(|| e.kind.shot_color());
        canvas.circle(e.pos, e.radius, color);
        if e.telegraph > 0.0 {
            canvas.circle(e.pos, e.radius * 0.4, TELEGRAPH);
        }
    }
    if world.boss.active {
        draw_boss(canvas, &world.boss, tuning);
    }
    for (_, s) in world.enemy_shots.iter() {
        canvas.circle(s.pos + s.vel * lead, s.radius, s.color);
    }
    for (_, b) in world.bullets.iter() {
        canvas.circle(b.pos + b.vel * lead, b.radius, BULLET);
    }
    for (_, l) in world.lasers.iter() {
        canvas.circle(l.pos + l.vel * lead, l.radius, LASER);
    }

    let player_color = if game.powerups.shield_active() {
        0x6bff9e
    } else {
        PLAYER
    };
    canvas.circle(game.player_pos, PLAYER_RADIUS, player_color);

    // Heat gauge along the bottom edge
    let hw = tuning.viewport.half_width();
    let hh = tuning.viewport.half_height();
    let heat = game.heat.fraction(tuning.heat.max);
    canvas.bar(
        Vec2::new(-hw + 20.0, hh - HEAT_GAUGE_TOP),
        Vec2::new(200.0, 8.0),
        heat,
        heat_color(heat),
    );
}

/// How far an ability has recharged, 1.0 when ready
pub fn ability_readiness(game: &GameState, tuning: &Tuning, ability: Ability) -> f32 {
    let max = match ability {
        Ability::Radial => tuning.abilities.radial_max,
        Ability::Cone => tuning.abilities.cone_max,
    };
    let remaining = game.cooldowns.get(ability);
    if remaining <= 0.0 || max <= 0.0 {
        1.0
    } else {
        (1.0 - remaining / max).clamp(0.0, 1.0)
    }
}

fn ability_hud(ability: Ability) -> (&'static str, u32) {
    match ability {
        Ability::Radial => ("Q", colors::CYAN),
        Ability::Cone => ("E", colors::AMBER),
    }
}

/// Ability cooldown gauges, laid out the way the player chose in `settings`
pub fn draw_ability_hud(canvas: &mut dyn Canvas, game: &GameState, tuning: &Tuning, settings: &Settings) {
    match settings.ability_ui_mode {
        AbilityUiMode::Corner => {
            let hw = tuning.viewport.half_width();
            let hh = tuning.viewport.half_height();
            let corner = settings.ability_ui_corner;
            let x = if corner.is_left() {
                -hw + HUD_PAD
            } else {
                hw - HUD_PAD - COOLDOWN_BAR.x
            };
            // Bottom corners stack above the heat gauge
            let stack = COOLDOWN_BAR.y * 2.0 + HUD_GAP;
            let top = if corner.is_top() {
                -hh + HUD_PAD
            } else {
                hh - HEAT_GAUGE_TOP - HUD_PAD - stack
            };
            for (i, ability) in Ability::ALL.into_iter().enumerate() {
                let (name, color) = ability_hud(ability);
                let pos = Vec2::new(x, top + i as f32 * (COOLDOWN_BAR.y + HUD_GAP));
                canvas.bar(pos, COOLDOWN_BAR, ability_readiness(game, tuning, ability), color);
                if settings.show_ability_labels {
                    let label_x = if corner.is_left() {
                        x + COOLDOWN_BAR.x + HUD_GAP
                    } else {
                        x - HUD_GAP - 10.0
                    };
                    canvas.label(Vec2::new(label_x, pos.y + COOLDOWN_BAR.y), name, color);
                }
            }
        }
        AbilityUiMode::Ring => {
            for (ability, radius) in Ability::ALL.into_iter().zip(COOLDOWN_RINGS) {
                let (name, color) = ability_hud(ability);
                canvas.ring(game.player_pos, radius, ability_readiness(game, tuning, ability), color);
                if settings.show_ability_labels {
                    // Q to the left of the rings, E to the right
                    let outer = COOLDOWN_RINGS[1] + HUD_GAP;
                    let x = match ability {
                        Ability::Radial => -outer - 10.0,
                        Ability::Cone => outer,
                    };
                    canvas.label(game.player_pos + Vec2::new(x, 4.0), name, color);
                }
            }
        }
    }
}

fn draw_boss(canvas: &mut dyn Canvas, boss: &Boss, tuning: &Tuning) {
    canvas.circle(boss.pos, boss.radius, BOSS);
    let hw = tuning.viewport.half_width();
    let hh = tuning.viewport.half_height();
    canvas.bar(
        Vec2::new(-hw * 0.5, -hh + 16.0),
        Vec2::new(hw, 10.0),
        boss.hp_fraction(),
        BOSS,
    );
}
