//! Whole-run scenarios driven through the scene manager

use glam::Vec2;
use rand::Rng;

use spacer::audio::NullSink;
use spacer::consts::SIM_DT;
use spacer::engine::{SceneCommand, SceneManager, Session};
use spacer::persistence::MemoryStore;
use spacer::scenes::WaveScene;
use spacer::sim::abilities;
use spacer::sim::boss::{damage_boss, spawn_boss};
use spacer::sim::collision::hazards_vs_player;
use spacer::sim::enemy::{kill_enemy, spawn_enemy_at};
use spacer::sim::projectiles::EnemyShot;
use spacer::sim::{Ability, EnemyKind, GameEvent, WavePhase};
use spacer::tuning::Tuning;

fn session(seed: u64) -> Session {
    Session::new(seed, Tuning::default(), Box::new(MemoryStore::new()), Box::new(NullSink))
}

fn wave_manager(seed: u64) -> SceneManager {
    let mut s = session(seed);
    s.game.laser_enabled = false;
    let mut m = SceneManager::new(s);
    m.set_scene(Box::new(WaveScene::new()));
    m
}

fn shot_on(pos: Vec2) -> EnemyShot {
    EnemyShot {
        pos,
        vel: Vec2::ZERO,
        radius: 6.0,
        ttl: 7.0,
        color: 0xffffff,
    }
}

#[test]
fn test_first_wave_clear_pays_out_and_opens_shop() {
    let mut m = wave_manager(21);
    {
        let Session {
            world, game, flow, tuning, ..
        } = m.session_mut();
        assert_eq!(flow.quota, 10);
        for i in 0..10 {
            let pos = Vec2::new(-450.0 + 100.0 * i as f32, -300.0);
            let id = spawn_enemy_at(world, game, tuning, pos, EnemyKind::Grunt).unwrap();
            flow.spawned += world.enemies.get(id).unwrap().quota;
        }
        assert_eq!(flow.spawned, 10);
        for id in 0..world.enemies.capacity() {
            kill_enemy(world, game, tuning, id);
        }
        assert_eq!(game.earned_this_wave, 10);
    }

    m.update(SIM_DT);
    assert_eq!(m.session().flow.phase, WavePhase::Clear);
    m.update(SIM_DT);

    let game = &m.session().game;
    assert_eq!(m.scene_name(), Some("shop"));
    assert_eq!(game.wave, 2);
    assert_eq!(game.last_reward.kills, 10);
    assert_eq!(game.last_reward.clear, 13);
    assert_eq!(game.credits, 10 + 13);
}

#[test]
fn test_fifth_wave_boss_reward_doubles_under_double_score() {
    let mut m = wave_manager(22);
    m.session_mut().game.wave = 5;
    m.set_scene(Box::new(WaveScene::new()));
    let Session {
        world, game, flow, tuning, ..
    } = m.session_mut();
    assert!(flow.boss_wave);

    spawn_boss(world, game);
    assert_eq!(world.boss.max_hp, 140.0);
    game.powerups.double_score = 3.0;
    assert!(!damage_boss(world, game, tuning, 139.0));
    assert!(damage_boss(world, game, tuning, 5.0));
    assert!(!world.boss.active);
    assert_eq!(game.credits, 35 * 2);
    assert_eq!(game.earned_this_wave, 35 * 2);
    assert_eq!(game.score, 2000 * 2);
}

#[test]
fn test_ability_cooldown_gates_retrigger() {
    let mut s = session(23);
    let Session { world, game, tuning, .. } = &mut s;
    assert!(abilities::trigger(world, game, tuning, Ability::Radial, 0.0));
    assert_eq!(game.cooldowns.radial, 10.0);
    assert!(!abilities::trigger(world, game, tuning, Ability::Radial, 0.0));
    // The cone has its own timer
    assert!(abilities::trigger(world, game, tuning, Ability::Cone, 0.0));
    assert_eq!(game.cooldowns.cone, 7.0);

    let ready = game.cooldowns.tick(10.0);
    assert_eq!(ready, [Some(Ability::Radial), Some(Ability::Cone)]);
    assert!(abilities::trigger(world, game, tuning, Ability::Radial, 0.0));
}

#[test]
fn test_shield_absorbs_hit_without_losing_a_life() {
    let mut s = session(24);
    let Session { world, game, tuning, .. } = &mut s;
    game.powerups.shield = 5.0;
    world.enemy_shots.spawn(shot_on(game.player_pos)).unwrap();
    hazards_vs_player(world, game, tuning);
    assert_eq!(game.powerups.shield, 3.0);
    assert_eq!(game.lives, 3);
    assert_eq!(game.invuln, 0.0);
    assert_eq!(world.enemy_shots.active_count(), 0);
}

#[test]
fn test_restart_is_idempotent() {
    let mut s = session(25);
    s.game.score = 4200;
    s.game.stacks.add(spacer::sim::PickupKind::Rapid);
    s.world.enemy_shots.spawn(shot_on(Vec2::new(50.0, 0.0))).unwrap();

    s.restart(7);
    let first_game = serde_json::to_string(&s.game).unwrap();
    let first_roll: u64 = s.world.rng.clone().random();
    s.restart(7);
    assert_eq!(serde_json::to_string(&s.game).unwrap(), first_game);
    assert_eq!(s.world.rng.clone().random::<u64>(), first_roll);
    assert_eq!(s.world.enemy_shots.active_count(), 0);
    assert_eq!(s.game.stacks.get(spacer::sim::PickupKind::Rapid), 0);
    assert_eq!(s.game.best, 4200);
}

#[test]
fn test_last_life_lost_ends_run_and_restart_recovers() {
    let mut m = wave_manager(26);
    {
        let s = m.session_mut();
        s.game.lives = 1;
        s.game.score = 777;
        let player = s.game.player_pos;
        s.world.enemy_shots.spawn(shot_on(player)).unwrap();
    }
    m.update(SIM_DT);
    assert_eq!(m.scene_name(), Some("gameover"));
    assert_eq!(m.session().game.lives, 0);
    assert_eq!(m.session().game.best, 777);
    assert_eq!(m.session().high_scores.top_score(), Some(777));
    assert!(
        m.session_mut()
            .take_fx()
            .iter()
            .any(|e| matches!(e, GameEvent::ScreenFlash { .. }))
    );

    m.command(SceneCommand::Restart);
    assert_eq!(m.scene_name(), Some("wave"));
    assert_eq!(m.session().game.lives, 3);
    assert_eq!(m.session().game.score, 0);
    assert_eq!(m.session().flow.phase, WavePhase::Spawn);
}
