//! Brick Mender entry point
//!
//! The browser build wires DOM events, audio and WebGPU to the scene director.
//! The native build plays a short scripted session headlessly and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use brick_mender::audio::{AudioManager, SoundEffect};
    use brick_mender::consts::SIM_DT;
    use brick_mender::platform::KeyboardState;
    use brick_mender::renderer::{RenderState, build_scene, clear_color};
    use brick_mender::scene::SceneDirector;
    use brick_mender::sim::{GameEvent, GamePhase};
    use brick_mender::{GameConfig, Settings};

    /// Game instance holding all host state
    struct Game {
        director: SceneDirector,
        settings: Settings,
        keyboard: KeyboardState,
        audio: AudioManager,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Set once the first key press has unlocked audio
        audio_unlocked: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, config: GameConfig, canvas: HtmlCanvasElement) -> Self {
            let GameConfig { settings, tuning } = config;
            Self {
                director: SceneDirector::standard(seed, tuning),
                audio: AudioManager::new(&settings),
                settings,
                keyboard: KeyboardState::new(),
                render_state: None,
                canvas,
                last_time: 0.0,
                audio_unlocked: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one animation frame: simulate, play sounds, draw
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let input = self.keyboard.snapshot();
            if let Err(err) = self.director.frame(&input, dt) {
                log::error!("Frame failed: {}", err);
            }

            for event in self.director.drain_events() {
                self.handle_event(&event);
            }

            self.track_fps(time);
            self.render(time);
        }

        fn handle_event(&mut self, event: &GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            match event {
                GameEvent::GameOver => self.audio.stop_music(),
                GameEvent::Restarted if self.audio_unlocked => self.audio.start_music(),
                _ => {}
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&mut self, time: f64) {
            let Some(state) = self.director.game_state() else {
                return;
            };
            let vertices =
                match build_scene(state, self.director.assets(), &self.settings, (time / 1000.0) as f32) {
                    Ok(v) => v,
                    Err(err) => {
                        log::error!("Scene build failed: {}", err);
                        return;
                    }
                };

            let Some(render_state) = &mut self.render_state else {
                return;
            };
            let width = self.canvas.width();
            let height = self.canvas.height();
            render_state.resize(width, height);

            match render_state.render(&vertices, clear_color(self.settings.high_contrast)) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(err) => log::warn!("Render error: {:?}", err),
            }
        }

        /// First key press counts as the user gesture browsers need for audio
        fn unlock_audio(&mut self) {
            if self.audio_unlocked {
                return;
            }
            self.audio_unlocked = true;
            self.audio.resume();
            let playing = self
                .director
                .game_state()
                .is_some_and(|s| s.phase != GamePhase::GameOver);
            if playing {
                self.audio.start_music();
            }
        }

        /// Update HUD DOM elements
        fn update_hud(&self, document: &Document) {
            let Some(state) = self.director.game_state() else {
                return;
            };

            set_text(document, "bricks-remaining", &state.bricks.len().to_string());
            set_text(document, "bricks-repaired", &state.stats.bricks_repaired.to_string());

            let repairing = state.hero.is_some() && state.repair.progress > 0.0;
            if repairing {
                let tuning = &state.tuning;
                let done = (state.repair.progress / tuning.repair_increment).round() as u32;
                set_text(
                    document,
                    "repair-progress",
                    &format!("{}/{}", done, tuning.presses_per_repair()),
                );
            }
            set_visible(document, "hud-repair", repairing);

            set_visible(document, "fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(document, "fps", &format!("{} FPS", self.fps));
            }

            set_visible(document, "pause-menu", state.phase == GamePhase::Paused);

            set_visible(document, "game-over", state.phase == GamePhase::GameOver);
            set_visible(document, "restart-hint", state.can_restart());
            if state.phase == GamePhase::GameOver {
                set_text(
                    document,
                    "final-destroyed",
                    &state.stats.bricks_destroyed.to_string(),
                );
                set_text(
                    document,
                    "final-repaired",
                    &state.stats.bricks_repaired.to_string(),
                );
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Brick Mender starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        set_visible(&document, "loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> on the page");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, config, canvas.clone())));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(err) => log::error!("Failed to create device: {}", err),
                        }
                    }
                    Err(err) => log::error!("Failed to get adapter: {}", err),
                }
            }
            Err(err) => log::error!("Failed to create surface: {}", err),
        }

        setup_keyboard(&window, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        set_visible(&document, "hud", true);

        request_animation_frame(game);

        log::info!("Brick Mender running!");
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.unlock_audio();
                if g.keyboard.key_down(&event.code(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause when the page is hidden or loses focus. Keyups get lost while
    /// unfocused, so held keys are dropped too.
    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        fn focus_lost(g: &mut Game, reason: &str) {
            g.keyboard.release_all();
            let playing = g
                .director
                .game_state()
                .is_some_and(|s| s.phase == GamePhase::Playing);
            if playing {
                g.keyboard.request_pause();
                log::info!("Auto-paused ({})", reason);
            }
            if g.settings.mute_on_blur {
                g.audio.set_muted(true);
            }
        }

        fn focus_gained(g: &mut Game) {
            if g.settings.mute_on_blur {
                g.audio.set_muted(false);
            }
        }

        // Tab switch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = web_sys::window()
                    .and_then(|w| w.document())
                    .is_some_and(|d| d.visibility_state() == web_sys::VisibilityState::Hidden);
                let mut g = game.borrow_mut();
                if hidden {
                    focus_lost(&mut g, "tab hidden");
                } else {
                    focus_gained(&mut g);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                focus_lost(&mut game.borrow_mut(), "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                focus_gained(&mut game.borrow_mut());
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Mender (native) starting...");
    log::info!("Rendering needs the browser build; playing a scripted session instead");

    if let Err(err) = headless::run(30 * 60) {
        log::error!("Session failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted play without a window: the hero walks to the middle of the grid
/// and keeps hammering repair while the ball does its thing.
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brick_mender::consts::SIM_DT;
    use brick_mender::scene::SceneDirector;
    use brick_mender::sim::{GameEvent, GamePhase, GridCell, TickInput};
    use brick_mender::{GameConfig, GameResult};

    pub fn run(frames: u32) -> GameResult<()> {
        let config = GameConfig::load();
        let seed = rand::random::<u64>();
        let mut director = SceneDirector::standard(seed, config.tuning);
        let goal = GridCell::new(4, 4).center();
        let mut repaired = 0;

        for frame in 0..frames {
            let mut input = TickInput::default();
            if let Some(hero) = director.game_state().and_then(|s| s.hero.as_ref()) {
                let delta = goal - hero.pos;
                input.left = delta.x < -4.0;
                input.right = delta.x > 4.0;
                input.up = delta.y < -4.0;
                input.down = delta.y > 4.0;
                input.repair = frame % 6 == 0;
            }
            if director
                .game_state()
                .is_some_and(|s| s.phase == GamePhase::GameOver && s.can_restart())
            {
                log::info!("Session over at frame {}", frame);
                break;
            }

            director.frame(&input, SIM_DT)?;

            for event in director.drain_events() {
                if let GameEvent::BrickRepaired { cell, .. } = event {
                    repaired += 1;
                    log::info!("Repaired brick at ({}, {})", cell.col, cell.row);
                }
            }
        }

        if let Some(state) = director.game_state() {
            log::info!(
                "Finished: {} bricks standing, {} destroyed, {} repaired ({} seen), {} balls lost",
                state.bricks.len(),
                state.stats.bricks_destroyed,
                state.stats.bricks_repaired,
                repaired,
                state.stats.balls_lost
            );
        }
        Ok(())
    }
}
