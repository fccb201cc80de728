//! Ninja Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ninja_dash::audio::{AudioManager, Sequencer, SoundEffect};
    use ninja_dash::consts::*;
    use ninja_dash::renderer::CanvasRenderer;
    use ninja_dash::settings::{Settings, Variant};
    use ninja_dash::sim::{GameEvent, GameMode, GamePhase, TickInput, WorldState, tick};

    /// Joystick drag must exceed this before it moves the player
    const STICK_DEAD_ZONE: f64 = 20.0;
    /// Visual knob travel limit in px
    const STICK_LIMIT: f64 = 40.0;
    /// Upward drag distance that triggers a jump
    const STICK_JUMP_THRESHOLD: f64 = -30.0;

    /// Game instance holding all state
    struct Game {
        world: WorldState,
        renderer: Option<CanvasRenderer>,
        audio: Rc<RefCell<AudioManager>>,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        settings: Settings,
        /// Anchor of the active joystick drag
        touch_origin: Option<(f64, f64)>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, width: f32, height: f32) -> Self {
            Self {
                world: WorldState::new(seed, settings.variant.mode(), width, height),
                renderer: None,
                audio: Rc::new(RefCell::new(AudioManager::new())),
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                settings,
                touch_origin: None,
            }
        }

        /// Run simulation ticks for the elapsed wall-clock time
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.world, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;
                self.input.fire = false;

                // Game events become sound effects
                let audio = self.audio.borrow();
                for event in self.world.drain_events() {
                    let effect = match event {
                        GameEvent::Jumped => SoundEffect::Jump,
                        GameEvent::Fired => SoundEffect::Shoot,
                        GameEvent::AdversaryHit => SoundEffect::Hit,
                        GameEvent::AdversaryDestroyed => SoundEffect::Explosion,
                        GameEvent::GameOver => SoundEffect::GameOver,
                    };
                    audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.world);
            }
        }

        /// Push score/health readouts and screen visibility to the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("player-hp") {
                el.set_text_content(Some(&self.world.player.hp.to_string()));
            }
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.world.score.to_string()));
            }

            // Game over screen receives the latched final score
            if let Some(el) = document.get_element_by_id("game-over-screen") {
                if self.world.phase == GamePhase::GameOver {
                    let _ = el.class_list().remove_1("hidden");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.world.score.to_string()));
                    }
                } else {
                    let _ = el.class_list().add_1("hidden");
                }
            }
        }

        /// Full session replacement; never patches the previous world
        fn restart(&mut self, seed: u64) {
            let field = self.world.field;
            self.world = WorldState::new(
                seed,
                self.settings.variant.mode(),
                field.width,
                field.height,
            );
            self.world.start();
            self.accumulator = 0.0;
            self.input = TickInput::default();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ninja Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let mut settings = Settings::load();
        // URL override of the stored preference, e.g. ?variant=racer
        if let Some(variant) = window.location().search().ok().and_then(|query| {
            query
                .trim_start_matches('?')
                .split('&')
                .find_map(|kv| kv.strip_prefix("variant="))
                .and_then(Variant::from_str)
        }) {
            settings.variant = variant;
        }
        if let Some(el) = document.get_element_by_id("variant-label") {
            el.set_text_content(Some(settings.variant.as_str()));
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            settings,
            width as f32,
            height as f32,
        )));

        {
            let mut g = game.borrow_mut();
            g.renderer = CanvasRenderer::new(&canvas);
            if g.renderer.is_none() {
                log::error!("Failed to acquire 2d canvas context");
            }
            let muted = g.settings.muted;
            let volume = g.settings.master_volume;
            let mut audio = g.audio.borrow_mut();
            audio.set_muted(muted);
            audio.set_master_volume(volume);
        }

        log::info!("Game initialized with seed: {}", seed);

        let sequencer = {
            let g = game.borrow();
            Rc::new(RefCell::new(Sequencer::new(
                g.audio.clone(),
                g.settings.variant.step_ms(),
            )))
        };

        setup_resize_handler(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_touch_controls(game.clone());
        setup_buttons(game.clone(), sequencer.clone());

        request_animation_frame(game);

        log::info!("Ninja Dash running!");
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(800.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(600.0);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            // Ground line and movement bounds follow the new size
            game.borrow_mut()
                .world
                .resize(width as f32, height as f32);
        });
        let _ = web_sys::window()
            .unwrap()
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let racer = g.world.mode == GameMode::Racer;
                match event.code().as_str() {
                    "ArrowRight" => g.input.move_x = 1.0,
                    "ArrowLeft" => g.input.move_x = -1.0,
                    "ArrowUp" => {
                        if racer {
                            g.input.move_y = -1.0;
                        } else {
                            g.input.jump = true;
                        }
                    }
                    "ArrowDown" => {
                        if racer {
                            g.input.move_y = 1.0;
                        }
                    }
                    "Space" => {
                        if racer {
                            g.input.jump = true;
                        } else {
                            g.input.fire = true;
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowRight" | "ArrowLeft" => g.input.move_x = 0.0,
                    "ArrowUp" | "ArrowDown" => g.input.move_y = 0.0,
                    _ => {}
                }
            });
            let _ = web_sys::window()
                .unwrap()
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Virtual stick plus a discrete attack button
    fn setup_touch_controls(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let Some(joystick_area) = document.get_element_by_id("joystick-area") else {
            return;
        };

        // Drag anchor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    game.borrow_mut().touch_origin =
                        Some((touch.client_x() as f64, touch.client_y() as f64));
                }
            });
            let _ = joystick_area
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Displacement, clamped to a dead-zone and a max radius, maps to
        // velocity; an up-drag triggers a jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let Some((ox, oy)) = g.touch_origin else {
                    return;
                };
                let dx = touch.client_x() as f64 - ox;
                let dy = touch.client_y() as f64 - oy;

                move_knob(dx.clamp(-STICK_LIMIT, STICK_LIMIT), dy.clamp(-STICK_LIMIT, STICK_LIMIT));

                g.input.move_x = if dx > STICK_DEAD_ZONE {
                    1.0
                } else if dx < -STICK_DEAD_ZONE {
                    -1.0
                } else {
                    0.0
                };
                if g.world.mode == GameMode::Racer {
                    g.input.move_y = if dy > STICK_DEAD_ZONE {
                        1.0
                    } else if dy < -STICK_DEAD_ZONE {
                        -1.0
                    } else {
                        0.0
                    };
                } else if dy < STICK_JUMP_THRESHOLD {
                    g.input.jump = true;
                }
            });
            let _ = joystick_area
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release zeroes velocity and resets the knob
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.move_x = 0.0;
                g.input.move_y = 0.0;
                g.touch_origin = None;
                move_knob(0.0, 0.0);
            });
            let _ = joystick_area
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Attack button: fire (runner) or jump (racer), once per press
        if let Some(attack_btn) = document.get_element_by_id("attack-btn") {
            let press = {
                let game = game.clone();
                move || {
                    let mut g = game.borrow_mut();
                    if g.world.mode == GameMode::Racer {
                        g.input.jump = true;
                    } else {
                        g.input.fire = true;
                    }
                }
            };
            {
                let press = press.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    press();
                });
                let _ = attack_btn.add_event_listener_with_callback(
                    "touchstart",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    press();
                });
                let _ = attack_btn.add_event_listener_with_callback(
                    "mousedown",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }
    }

    /// Move the joystick knob visual; purely cosmetic
    fn move_knob(dx: f64, dy: f64) {
        let Some(knob) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("joystick-knob"))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let transform = format!("translate(calc(-50% + {dx}px), calc(-50% + {dy}px))");
        let _ = knob.style().set_property("transform", &transform);
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, sequencer: Rc<RefCell<Sequencer>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Start: Idle -> Running, also wakes the audio context (user gesture)
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let sequencer = sequencer.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("start-screen") {
                    let _ = el.class_list().add_1("hidden");
                }
                let mut g = game.borrow_mut();
                g.audio.borrow().resume();
                g.world.start();
                let mut seq = sequencer.borrow_mut();
                seq.reset();
                seq.start();
                log::info!("Session started");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart: Terminal -> fresh session via the same reset path
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let sequencer = sequencer.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("game-over-screen") {
                    let _ = el.class_list().add_1("hidden");
                }
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                let mut seq = sequencer.borrow_mut();
                seq.reset();
                seq.start();
                log::info!("Session restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mute toggle gates synthesis and pauses/resumes the sequencer timer
        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let muted = !g.settings.muted;
                g.settings.muted = muted;
                g.settings.save();
                g.audio.borrow_mut().set_muted(muted);
                let mut seq = sequencer.borrow_mut();
                if muted {
                    seq.stop();
                } else {
                    seq.start();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
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
    env_logger::init();
    log::info!("Ninja Dash (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning collision smoke check...");
    smoke_check_collision();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_check_collision() {
    use glam::Vec2;
    use ninja_dash::sim::Aabb;

    let player = Aabb::from_pos_size(Vec2::new(100.0, 450.0), Vec2::new(50.0, 50.0));
    let adversary = Aabb::from_pos_size(Vec2::new(130.0, 450.0), Vec2::new(50.0, 50.0));
    assert!(player.overlaps(&adversary), "Overlap should be detected");
    println!("✓ Collision smoke check passed!");
}
