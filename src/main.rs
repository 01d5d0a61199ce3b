//! Spacer entry point
//!
//! Browser builds drive the scene manager from `requestAnimationFrame`.
//! Native builds run a headless autopilot session and log the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use spacer::audio::{AudioSink, WebAudioSink};
    use spacer::engine::{FrameLoop, SceneCommand, SceneManager, Session};
    use spacer::heading;
    use spacer::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
    use spacer::platform::now_ms;
    use spacer::renderer::Canvas2d;
    use spacer::scenes::WaveScene;
    use spacer::tuning::Tuning;

    /// Held direction keys
    #[derive(Default)]
    struct MoveKeys {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    }

    impl MoveKeys {
        fn set(&mut self, key: &str, down: bool) -> bool {
            let slot = match key {
                "ArrowUp" | "w" | "W" => &mut self.up,
                "ArrowDown" | "s" | "S" => &mut self.down,
                "ArrowLeft" | "a" | "A" => &mut self.left,
                "ArrowRight" | "d" | "D" => &mut self.right,
                _ => return false,
            };
            *slot = down;
            true
        }

        fn intent(&self) -> Vec2 {
            let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
            Vec2::new(axis(self.left, self.right), axis(self.up, self.down)).normalize_or_zero()
        }
    }

    struct App {
        manager: SceneManager,
        frame_loop: FrameLoop,
        canvas: Canvas2d,
        keys: MoveKeys,
    }

    impl App {
        fn on_key(&mut self, key: &str) {
            let session = self.manager.session_mut();
            match key {
                "q" | "Q" => session.input.trigger_radial = true,
                "e" | "E" => session.input.trigger_cone = true,
                "f" | "F" => {
                    session.game.auto_fire = !session.game.auto_fire;
                    log::info!("Auto fire: {}", session.game.auto_fire);
                    session.save_settings();
                }
                "l" | "L" => {
                    session.game.laser_enabled = !session.game.laser_enabled;
                    log::info!("Defensive lasers: {}", session.game.laser_enabled);
                    session.save_settings();
                }
                "m" | "M" => {
                    let muted = !session.audio.is_muted();
                    session.audio.set_muted(muted);
                    session.save_settings();
                }
                "u" | "U" => {
                    session.settings.ability_ui_mode = session.settings.ability_ui_mode.toggled();
                    log::info!("Ability HUD: {:?}", session.settings.ability_ui_mode);
                    session.save_settings();
                }
                "c" | "C" => {
                    session.settings.ability_ui_corner = session.settings.ability_ui_corner.next();
                    session.save_settings();
                }
                "k" | "K" => {
                    session.settings.show_ability_labels = !session.settings.show_ability_labels;
                    session.save_settings();
                }
                " " | "Enter" => {
                    let command = match self.manager.scene_name() {
                        Some("gameover") => SceneCommand::Restart,
                        _ => SceneCommand::Skip,
                    };
                    self.manager.command(command);
                }
                _ => {}
            }
        }

        /// Aim from the player toward the pointer
        fn aim_at(&mut self, offset_x: i32, offset_y: i32) {
            let (w, h) = self.canvas.size();
            let pointer = Vec2::new(offset_x as f32 - w * 0.5, offset_y as f32 - h * 0.5);
            let session = self.manager.session_mut();
            session.input.aim_angle = heading(pointer - session.game.player_pos);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Spacer starting...");

        let Some(canvas) = Canvas2d::new("canvas") else {
            log::error!("No 2D canvas with id 'canvas'");
            return;
        };

        let store: Box<dyn KeyValueStore> = match LocalStorageStore::new() {
            Ok(store) => Box::new(store),
            Err(err) => {
                log::warn!("LocalStorage unavailable ({err}), settings will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let sink: Box<dyn AudioSink> = Box::new(WebAudioSink::new());

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, Tuning::default(), store, sink);
        let mut manager = SceneManager::new(session);
        manager.set_scene(Box::new(WaveScene::new()));

        let mut frame_loop = FrameLoop::new();
        frame_loop.start(now_ms());

        let app = Rc::new(RefCell::new(App {
            manager,
            frame_loop,
            canvas,
            keys: MoveKeys::default(),
        }));

        setup_input_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Spacer running (seed {seed})");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Aim follows the pointer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().aim_at(event.offset_x(), event.offset_y());
            });
            let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Left button fires, right button boosts the lasers
        for (name, down) in [("mousedown", true), ("mouseup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let input = &mut a.manager.session_mut().input;
                match event.button() {
                    0 => input.firing = down,
                    2 => input.secondary_hold = down,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let key = event.key();
                if a.keys.set(&key, true) {
                    let intent = a.keys.intent();
                    a.manager.session_mut().input.move_intent = intent;
                } else if !event.repeat() {
                    a.on_key(&key);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.keys.set(&event.key(), false) {
                    let intent = a.keys.intent();
                    a.manager.session_mut().input.move_intent = intent;
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = {
            let mut guard = app.borrow_mut();
            let App {
                manager,
                frame_loop,
                canvas,
                ..
            } = &mut *guard;
            match frame_loop.frame(time, |dt| manager.update(dt)) {
                Some(alpha) => {
                    manager.render(canvas, alpha);
                    true
                }
                None => false,
            }
        };

        if running {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spacer::audio::NullSink;
    use spacer::consts::STEP_MS;
    use spacer::engine::{FrameLoop, SceneCommand, SceneManager, Session};
    use spacer::persistence::MemoryStore;
    use spacer::renderer::NullCanvas;
    use spacer::scenes::WaveScene;
    use spacer::tuning::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);
    log::info!("Spacer (native) headless autopilot run: seed {seed}, {seconds}s");

    let mut session = Session::new(seed, Tuning::default(), Box::new(MemoryStore::new()), Box::new(NullSink));
    session.game.auto_fire = true;
    let mut manager = SceneManager::new(session);
    manager.set_scene(Box::new(WaveScene::new()));

    let mut frame_loop = FrameLoop::new();
    frame_loop.start(0.0);
    let mut canvas = NullCanvas;
    let frames = (seconds * 1000.0 / STEP_MS) as u64;
    for frame in 1..=frames {
        let Some(alpha) = frame_loop.frame(frame as f64 * STEP_MS, |dt| manager.update(dt)) else {
            break;
        };
        manager.render(&mut canvas, alpha);
        match manager.scene_name() {
            Some("shop") => manager.command(SceneCommand::Skip),
            Some("gameover") => break,
            _ => {}
        }
    }

    let session = manager.session();
    log::info!(
        "Finished on wave {} in scene {}: score {}, credits {}, lives {}, dropped spawns {}",
        session.game.wave,
        manager.scene_name().unwrap_or("none"),
        session.game.score,
        session.game.credits,
        session.game.lives,
        session.world.dropped_spawns
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is wasm_main
}
