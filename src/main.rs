//! Circle Blast entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use circle_blast::audio::{AudioManager, SoundEffect};
    use circle_blast::consts::*;
    use circle_blast::render::CanvasRenderer;
    use circle_blast::sim::{GameEvent, GamePhase, GameState, TickInput, Viewport, tick};
    use circle_blast::Settings;
    use glam::Vec2;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer, viewport: Viewport) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(viewport, seed),
                renderer,
                audio,
                settings,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.shoot = None;
                self.input.restart = false;
            }
        }

        /// React to simulation events: sounds, floating labels, game-over UI
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Shot => self.audio.play(SoundEffect::Shoot),
                    GameEvent::EnemyHit { pos, hue, score } => {
                        self.audio.play(SoundEffect::Damage);
                        spawn_score_label(pos, hue, score);
                    }
                    GameEvent::EnemyKilled { pos, hue, score } => {
                        self.audio.play(SoundEffect::Explode);
                        spawn_score_label(pos, hue, score);
                    }
                    GameEvent::PowerUpCollected => self.audio.play(SoundEffect::PowerUp),
                    GameEvent::GameOver => {
                        self.audio.play(SoundEffect::Death);
                        show_game_over(self.state.score);
                    }
                }
            }
        }

        /// Update the score readout in the DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
        }
    }

    /// Floating "+N" label at a hit position, removed after a short delay
    fn spawn_score_label(pos: Vec2, hue: f32, score: u64) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let Some(body) = document.body() else { return };

        let Ok(label) = document.create_element("div") else {
            return;
        };
        let _ = label.set_attribute("class", "score-label");
        let _ = label.set_attribute(
            "style",
            &format!(
                "position:absolute;left:{}px;top:{}px;color:hsl({}, 50%, 50%);pointer-events:none",
                pos.x, pos.y, hue
            ),
        );
        label.set_text_content(Some(&format!("+{score}")));
        let _ = body.append_child(&label);

        let remove = Closure::once_into_js(move || {
            label.remove();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(remove.unchecked_ref(), 750);
    }

    /// Reveal the end-of-game board with the final score
    fn show_game_over(score: u64) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id("game-over") {
            let _ = el.set_attribute("class", "");
        }
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn hide_menus() {
        let document = web_sys::window().unwrap().document().unwrap();
        for id in ["start-menu", "game-over"] {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Circle Blast starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fill the window
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

        let ctx: web_sys::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let renderer = CanvasRenderer::new(ctx, width, height);
        let viewport = Viewport::new(width as f32, height as f32);
        let game = Rc::new(RefCell::new(Game::new(seed, renderer, viewport)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_visibility_pause(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Circle Blast running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click fires toward the pointer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let target = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                g.input.shoot = Some(target);
                g.input.pointer = target;
                // Browsers only allow audio after a user gesture
                g.audio.start_background();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Track the pointer for machine-gun aim
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.pointer =
                    Vec2::new(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: tap shoots, drag aims
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let target = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    let mut g = game.borrow_mut();
                    g.input.shoot = Some(target);
                    g.input.pointer = target;
                    g.audio.start_background();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    game.borrow_mut().input.pointer = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard movement, held keys
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.input.up = true,
                    "s" | "S" | "ArrowDown" => g.input.down = true,
                    "a" | "A" | "ArrowLeft" => g.input.left = true,
                    "d" | "D" | "ArrowRight" => g.input.right = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.input.up = false,
                    "s" | "S" | "ArrowDown" => g.input.down = false,
                    "a" | "A" | "ArrowLeft" => g.input.left = false,
                    "d" | "D" | "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["start-button", "restart-button"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.input.restart = true;
                    g.audio.play(SoundEffect::Select);
                    hide_menus();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Mute toggles
        if let Some(btn) = document.get_element_by_id("volume-off") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.muted = true;
                g.audio.set_muted(true);
                g.settings.save();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        if let Some(btn) = document.get_element_by_id("volume-on") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.muted = false;
                g.audio.set_muted(false);
                g.settings.save();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Freeze the spawn timers while the tab is hidden so a backgrounded
    /// session does not fill with enemies.
    fn setup_visibility_pause(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            game.borrow_mut().state.spawners_paused = hidden;
            log::info!("Spawners paused: {}", hidden);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Window resizes restart the session on the new viewport, matching the
    /// start-screen sizing; a game that has never started just resizes.
    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
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

            let mut g = game.borrow_mut();
            g.renderer.resize(width, height);
            let viewport = Viewport::new(width as f32, height as f32);
            if g.state.phase == GamePhase::NotStarted {
                g.state.viewport = viewport;
            } else {
                g.state.restart_with_viewport(viewport);
            }
        });
        let _ =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
            g.handle_events();
            g.renderer.render(&g.state);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo session for native builds. Runs a fixed number of ticks
/// with synthetic input and reports the outcome.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use circle_blast::consts::TICK_HZ;
    use circle_blast::sim::{GamePhase, GameState, TickInput, Viewport, tick};
    use glam::Vec2;

    env_logger::init();
    log::info!("Circle Blast (native headless) starting...");

    let viewport = Viewport::new(1024.0, 768.0);
    let mut state = GameState::new(viewport, 0xC1BC1E);
    state.start();

    let mut input = TickInput {
        pointer: Vec2::new(900.0, 100.0),
        ..TickInput::default()
    };

    // 30 seconds of play, shooting at the spawn ring twice a second
    for frame in 0..(30 * TICK_HZ as u64) {
        input.shoot = if frame % 30 == 0 {
            Some(Vec2::new(
                900.0 + (frame % 7) as f32 * 10.0,
                100.0 + (frame % 11) as f32 * 40.0,
            ))
        } else {
            None
        };
        tick(&mut state, &input);
        state.drain_events();
        if state.phase == GamePhase::Ended {
            break;
        }
    }

    log::info!(
        "Session over after {} ticks: score={} enemies={} projectiles={}",
        state.ticks,
        state.score,
        state.enemies.len(),
        state.projectiles.len()
    );
    println!("final score: {}", state.score);
}
