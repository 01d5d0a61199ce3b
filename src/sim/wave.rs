//! Wave flow state machine
//!
//! ```text
//! spawn -> clear -> end                                   (regular waves)
//! spawn -> clear -> stage -> bossIntro -> bossFight -> bossOutro -> end
//! ```
//!
//! `WavePhase::transition` is the pure transition function; `WaveFlow` holds
//! the timers and runs each phase's side effects.

use glam::Vec2;

use super::boss::spawn_boss;
use super::enemy::{roll_kind, spawn_enemy_from_edge};
use super::stage::{StageSchedule, spawn_beat};
use super::state::{ArenaMode, GameEvent, GameState, RewardBreakdown};
use super::world::World;
use crate::audio::SoundEffect;
use crate::consts::BARRIER_Y;
use crate::tuning::Tuning;

/// Player position while the arena is in top-down mode
pub const TOP_DOWN_START: Vec2 = Vec2::new(0.0, BARRIER_Y + 40.0);
const LETTERBOX_IN: f32 = 0.8;
const LETTERBOX_OUT: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePhase {
    #[default]
    Spawn,
    Clear,
    Stage,
    BossIntro,
    BossFight,
    BossOutro,
    End,
}

/// Conditions that move the flow forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveEvent {
    QuotaMet,
    FieldCleared,
    StageDone,
    BossSettled,
    BossDefeated,
    OutroDone,
}

impl WavePhase {
    /// Next phase for `event`. Events that don't apply leave the phase as is.
    pub fn transition(self, event: WaveEvent, boss_wave: bool) -> WavePhase {
        use WaveEvent::*;
        use WavePhase::*;
        match (self, event) {
            (Spawn, QuotaMet) => Clear,
            (Clear, FieldCleared) if boss_wave => Stage,
            (Clear, FieldCleared) => End,
            (Stage, StageDone) => BossIntro,
            (BossIntro, BossSettled) => BossFight,
            (BossFight, BossDefeated) => BossOutro,
            (BossOutro, OutroDone) => End,
            (phase, _) => phase,
        }
    }
}

/// Per-wave flow context, rebuilt by `enter` at the start of each wave
#[derive(Debug, Clone, Default)]
pub struct WaveFlow {
    pub phase: WavePhase,
    /// Seconds spent in the current phase
    pub elapsed: f32,
    pub spawn_timer: f32,
    /// Quota cost to spawn this wave
    pub quota: u32,
    /// Quota cost spawned so far
    pub spawned: u32,
    pub boss_wave: bool,
    pub stage: StageSchedule,
    /// Phase time at which the boss appeared
    boss_spawned_at: Option<f32>,
}

impl WaveFlow {
    /// Start the current wave
    pub fn enter(&mut self, world: &mut World, game: &mut GameState, tuning: &Tuning) {
        *self = WaveFlow {
            quota: tuning.wave_quota(game.wave),
            boss_wave: game.is_boss_wave(),
            ..WaveFlow::default()
        };
        game.earned_this_wave = 0;
        game.last_reward = RewardBreakdown::default();
        game.arena = ArenaMode::Ring;
        game.player_pos = Vec2::ZERO;
        world.fire_cooldown = 0.0;
        world.laser_ai.reset();
        world.autopilot.ability_delay = 0.0;
        if !self.boss_wave {
            world.boss.active = false;
        }
        log::info!(
            "Wave {} start (quota {}{})",
            game.wave,
            self.quota,
            if self.boss_wave { ", boss wave" } else { "" }
        );
    }

    /// Advance one step. Returns the reward breakdown when the wave concludes.
    pub fn advance(
        &mut self,
        world: &mut World,
        game: &mut GameState,
        tuning: &Tuning,
        dt: f32,
    ) -> Option<RewardBreakdown> {
        self.elapsed += dt;
        let alive = world.alive_enemies();

        let event = match self.phase {
            WavePhase::Spawn => {
                self.run_spawner(world, game, tuning, alive, dt);
                (self.spawned >= self.quota).then_some(WaveEvent::QuotaMet)
            }
            WavePhase::Clear => (alive == 0).then_some(WaveEvent::FieldCleared),
            WavePhase::Stage => {
                if let Some(beat) = self.stage.due(self.elapsed) {
                    spawn_beat(world, game, tuning, beat);
                }
                let thinned = world.alive_enemies() <= tuning.waves.stage_thin_to;
                (self.stage.is_finished() && thinned).then_some(WaveEvent::StageDone)
            }
            WavePhase::BossIntro => self.run_intro(world, game, tuning),
            WavePhase::BossFight => (!world.boss.active).then_some(WaveEvent::BossDefeated),
            WavePhase::BossOutro => {
                (self.elapsed >= tuning.waves.boss_outro).then_some(WaveEvent::OutroDone)
            }
            WavePhase::End => None,
        };

        let event = event?;
        let next = self.phase.transition(event, self.boss_wave);
        if next == self.phase {
            return None;
        }
        self.phase = next;
        self.elapsed = 0.0;
        self.on_enter_phase(world, game, tuning)
    }

    fn run_spawner(&mut self, world: &mut World, game: &GameState, tuning: &Tuning, alive: usize, dt: f32) {
        self.spawn_timer -= dt;
        if self.spawned >= self.quota || self.spawn_timer > 0.0 || alive >= tuning.alive_cap(game.wave) {
            return;
        }
        let kind = roll_kind(&mut world.rng, game.wave);
        if let Some(id) = spawn_enemy_from_edge(world, game, tuning, kind) {
            self.spawned += world.enemies.get(id).map_or(0, |e| e.quota);
        }
        self.spawn_timer = tuning.spawn_interval(game.wave);
    }

    fn run_intro(&mut self, world: &mut World, game: &GameState, tuning: &Tuning) -> Option<WaveEvent> {
        let waves = &tuning.waves;
        match self.boss_spawned_at {
            None if self.elapsed >= waves.boss_intro_delay => {
                spawn_boss(world, game);
                self.boss_spawned_at = Some(self.elapsed);
                None
            }
            None => None,
            Some(at) => {
                let settled = self.elapsed - at >= waves.boss_settle;
                (settled || !world.boss.active).then_some(WaveEvent::BossSettled)
            }
        }
    }

    fn on_enter_phase(
        &mut self,
        world: &mut World,
        game: &mut GameState,
        tuning: &Tuning,
    ) -> Option<RewardBreakdown> {
        match self.phase {
            WavePhase::BossIntro => {
                world.emit(GameEvent::Letterbox {
                    show: true,
                    duration: LETTERBOX_IN,
                });
                world.emit(GameEvent::Barrier { enabled: true });
                game.arena = ArenaMode::TopDown;
                game.player_pos = TOP_DOWN_START;
                None
            }
            WavePhase::BossOutro => {
                world.emit(GameEvent::Letterbox {
                    show: false,
                    duration: LETTERBOX_OUT,
                });
                world.emit(GameEvent::Barrier { enabled: false });
                world.clear_enemy_shots();
                game.arena = ArenaMode::Ring;
                game.player_pos = Vec2::ZERO;
                None
            }
            WavePhase::End => {
                let wave = game.wave;
                let breakdown = game.conclude_wave(tuning);
                world.sound(SoundEffect::WaveClear);
                log::info!(
                    "Wave {wave} cleared: {} kill credits + {} clear bonus",
                    breakdown.kills,
                    breakdown.clear
                );
                Some(breakdown)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;

    const DT: f32 = 1.0 / 60.0;

    fn setup(wave: u32) -> (World, GameState, Tuning, WaveFlow) {
        let mut world = World::new(21);
        let mut game = GameState::new(21);
        game.wave = wave;
        let tuning = Tuning::default();
        let mut flow = WaveFlow::default();
        flow.enter(&mut world, &mut game, &tuning);
        (world, game, tuning, flow)
    }

    #[test]
    fn test_transition_table() {
        use WaveEvent::*;
        use WavePhase::*;
        assert_eq!(Spawn.transition(QuotaMet, false), Clear);
        assert_eq!(Clear.transition(FieldCleared, false), End);
        assert_eq!(Clear.transition(FieldCleared, true), Stage);
        assert_eq!(Stage.transition(StageDone, true), BossIntro);
        assert_eq!(BossIntro.transition(BossSettled, true), BossFight);
        assert_eq!(BossFight.transition(BossDefeated, true), BossOutro);
        assert_eq!(BossOutro.transition(OutroDone, true), End);
        // Out-of-place events are ignored
        assert_eq!(Spawn.transition(BossDefeated, true), Spawn);
        assert_eq!(End.transition(QuotaMet, false), End);
    }

    #[test]
    fn test_spawner_respects_cap_and_meets_quota() {
        let (mut world, mut game, tuning, mut flow) = setup(1);
        assert_eq!(flow.quota, 10);
        let mut last = 0;
        let mut steps = 0;
        while flow.phase == WavePhase::Spawn && steps < 10_000 {
            flow.advance(&mut world, &mut game, &tuning, DT);
            assert!(flow.spawned >= last);
            last = flow.spawned;
            assert!(world.alive_enemies() <= tuning.alive_cap(1));
            // Keep the field thin so the cap never stalls the spawner
            if world.alive_enemies() >= 4 {
                world.enemies.reset();
            }
            steps += 1;
        }
        assert_eq!(flow.phase, WavePhase::Clear);
        assert_eq!(flow.spawned, 10);
    }

    #[test]
    fn test_regular_wave_concludes_when_cleared() {
        let (mut world, mut game, tuning, mut flow) = setup(1);
        flow.phase = WavePhase::Clear;
        world.enemies.spawn(Enemy::default());
        assert_eq!(flow.advance(&mut world, &mut game, &tuning, DT), None);
        world.enemies.reset();
        let reward = flow.advance(&mut world, &mut game, &tuning, DT);
        assert_eq!(reward, Some(RewardBreakdown { kills: 0, clear: 13 }));
        assert_eq!(flow.phase, WavePhase::End);
        assert_eq!(game.wave, 2);
        assert_eq!(game.credits, 13);
    }

    #[test]
    fn test_boss_path() {
        let (mut world, mut game, tuning, mut flow) = setup(5);
        assert!(flow.boss_wave);
        flow.phase = WavePhase::Clear;
        flow.advance(&mut world, &mut game, &tuning, DT);
        assert_eq!(flow.phase, WavePhase::Stage);

        // Run the stage while clearing whatever it spawns
        let mut steps = 0;
        while flow.phase == WavePhase::Stage && steps < 2000 {
            flow.advance(&mut world, &mut game, &tuning, DT);
            world.enemies.reset();
            steps += 1;
        }
        assert_eq!(flow.phase, WavePhase::BossIntro);
        assert!(flow.stage.is_finished());
        assert_eq!(game.arena, ArenaMode::TopDown);
        assert_eq!(game.player_pos, TOP_DOWN_START);
        assert!(world.events.contains(&GameEvent::Barrier { enabled: true }));

        while flow.phase == WavePhase::BossIntro && steps < 4000 {
            flow.advance(&mut world, &mut game, &tuning, DT);
            steps += 1;
        }
        assert_eq!(flow.phase, WavePhase::BossFight);
        assert!(world.boss.active);
        assert_eq!(world.boss.max_hp, 140.0);

        world.boss.active = false;
        flow.advance(&mut world, &mut game, &tuning, DT);
        assert_eq!(flow.phase, WavePhase::BossOutro);
        assert_eq!(game.arena, ArenaMode::Ring);
        assert_eq!(world.enemy_shots.active_count(), 0);

        let mut reward = None;
        while reward.is_none() && steps < 5000 {
            reward = flow.advance(&mut world, &mut game, &tuning, DT);
            steps += 1;
        }
        assert_eq!(flow.phase, WavePhase::End);
        assert_eq!(game.wave, 6);
        assert!(world.events.contains(&GameEvent::Sound(SoundEffect::WaveClear)));
    }

    #[test]
    fn test_enter_resets_flow() {
        let (mut world, mut game, tuning, mut flow) = setup(3);
        flow.phase = WavePhase::Clear;
        flow.spawned = 26;
        game.earned_this_wave = 9;
        flow.enter(&mut world, &mut game, &tuning);
        assert_eq!(flow.phase, WavePhase::Spawn);
        assert_eq!(flow.spawned, 0);
        assert_eq!(flow.quota, 26);
        assert_eq!(game.earned_this_wave, 0);
    }
}
