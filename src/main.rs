//! Brick Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! - wasm32: canvas game driven by requestAnimationFrame
//! - native: headless autopilot run that logs a summary

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use brick_breaker::consts::MAX_FRAME_DELTA_MS;
    use brick_breaker::platform::{self, CanvasSurface};
    use brick_breaker::{Game, GameConfig, InputState};

    /// Everything the frame loop touches
    struct App {
        game: Game,
        input: InputState,
        surface: CanvasSurface,
        last_time: Option<f64>,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            // Clamp delta so a backgrounded tab doesn't teleport the ball
            let dt = match self.last_time {
                Some(last) => ((time - last) as f32).clamp(0.0, MAX_FRAME_DELTA_MS),
                None => 0.0,
            };
            self.last_time = Some(time);

            let input = self.input.sample();
            self.game.apply_input(&input);
            self.game.update(dt);
            self.game.draw(&mut self.surface);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brick Breaker starting...");

        let config = GameConfig::load();
        let surface =
            CanvasSurface::from_element_id("canvas", config.field_width, config.field_height)
                .expect("canvas setup failed");

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(config, seed),
            input: InputState::new(),
            surface,
            last_time: None,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Brick Breaker running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if platform::key_down(&mut app.borrow_mut().input, &event) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                platform::key_up(&mut app.borrow_mut().input, &event);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse steers the paddle directly
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let x = a.surface.pointer_x(&event);
                a.input.pointer_moved(x);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drop held keys when focus is lost, or they stick
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().input.release_all();
                log::debug!("Window blur, input released");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_breaker::{Game, GameConfig, GameStatus};

    /// Fixed frame delta for the headless run (60 Hz)
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Brick Breaker (native) starting...");
    log::info!("Native mode runs a headless autopilot game - build for wasm32 to play");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_from_path(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load config from {}: {}; using defaults", path, e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = Game::new(config, seed);
    log::info!("Game initialized with seed: {}", seed);

    let mut frames = 0;
    while frames < MAX_FRAMES {
        // Stop instead of restarting on a finished run
        let finished = match game.status {
            GameStatus::GameOver => true,
            GameStatus::Won => game.is_final_level(),
            GameStatus::Playing => false,
        };
        if finished {
            break;
        }

        let input = game.autopilot_input();
        game.apply_input(&input);
        game.update(FRAME_MS);
        frames += 1;
    }

    log::info!(
        "Run ended after {:.1}s: {:?} on level {} ({}/{} blocks, {} lives)",
        frames as f32 * FRAME_MS / 1000.0,
        game.status,
        game.level,
        game.blocks_destroyed,
        game.total_blocks,
        game.lives
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
