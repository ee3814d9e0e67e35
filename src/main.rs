//! Skyflap entry point
//!
//! Browser: sets up WebGPU, DOM input and the frame loop around a single
//! [`skyflap::Game`]. Native: runs a headless autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, TouchEvent};

    use skyflap::audio::{AudioManager, SoundEffect};
    use skyflap::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
    use skyflap::renderer::{RenderState, build_scene};
    use skyflap::sim::{GameEvent, GamePhase};
    use skyflap::{Action, Game, Tuning};

    const STORAGE_PREFIX: &str = "skyflap";

    type Shared = Rc<RefCell<App>>;

    /// Everything the page owns
    struct App {
        game: Game<Box<dyn KeyValueStore>>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        document: Document,
        /// Current run beat the stored best
        new_best: bool,
    }

    impl App {
        /// One animation frame. Returns whether to request another.
        fn frame(&mut self) -> bool {
            let keep_going = self.game.frame();
            self.play_sounds();
            self.render();
            self.update_hud();
            keep_going
        }

        fn press(&mut self, action: Action) -> bool {
            self.audio.resume();
            self.game.press(action)
        }

        fn play_sounds(&mut self) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::Started => self.new_best = false,
                    GameEvent::NewHighScore(_) => self.new_best = true,
                    _ => {}
                }
                let effect = match event {
                    GameEvent::Crashed(_) if self.new_best => Some(SoundEffect::NewHighScore),
                    ref other => SoundEffect::for_event(other),
                };
                if let Some(effect) = effect {
                    self.audio.play(effect);
                }
            }
            if !self.game.drain_new_unlocks().is_empty() {
                self.audio.play(SoundEffect::Unlock);
            }
        }

        fn render(&mut self) {
            let skin = self.game.next_skin_color();
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(self.game.state(), self.game.tuning(), skin);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn update_hud(&self) {
            let state = self.game.state();
            self.set_text("hud-score", &state.score.to_string());
            self.set_text("hud-best", &self.game.high_score().to_string());
            self.set_text(
                "hud-mode",
                if state.hard_mode { "HARD" } else { "NORMAL" },
            );

            self.set_visible("idle-prompt", state.phase == GamePhase::Idle);
            self.set_visible("pause-menu", state.phase == GamePhase::Paused);
            self.set_visible("game-over", state.phase == GamePhase::GameOver);
            if state.phase == GamePhase::GameOver {
                self.set_text("final-score", &state.score.to_string());
            }

            match self.game.notices().last() {
                Some(notice) => {
                    self.set_text("unlock-notice", &format!("Unlocked: {}", notice.cosmetic.name));
                    self.set_visible("unlock-notice", true);
                }
                None => self.set_visible("unlock-notice", false),
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorageStore::open(STORAGE_PREFIX) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), progress will not be saved", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    async fn create_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        playfield: (f32, f32),
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Rendering disabled: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Skyflap starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(Tuning::default(), open_store(), seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        let playfield = (game.tuning().bounds_width, game.tuning().bounds_height);
        let render_state = create_renderer(&canvas, width, height, playfield).await;
        let audio = AudioManager::new(game.settings());

        let app = Rc::new(RefCell::new(App {
            game,
            render_state,
            audio,
            document: document.clone(),
            new_best: false,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_focus_handlers(app.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.class_list().remove_1("hidden");
        }

        request_animation_frame(app);

        log::info!("Skyflap running!");
    }

    /// Deliver an action; re-arm the frame loop if it had stopped
    fn dispatch(app: &Shared, action: Action) {
        let rearm = app.borrow_mut().press(action);
        if rearm {
            request_animation_frame(app.clone());
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Shared) {
        // Touch / click: flap
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&app, Action::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                dispatch(&app, Action::Flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            match event.key().as_str() {
                " " | "Enter" | "ArrowUp" => {
                    event.prevent_default();
                    dispatch(&app, Action::Flap);
                }
                "Escape" | "p" | "P" => dispatch(&app, Action::PauseToggle),
                "r" | "R" => dispatch(&app, Action::Restart),
                "h" | "H" => {
                    let mut a = app.borrow_mut();
                    let hard_mode = !a.game.settings().hard_mode;
                    if let Err(e) = a.game.set_hard_mode(hard_mode) {
                        log::info!("{}", e);
                    }
                    a.update_hud();
                }
                "m" | "M" => {
                    let mut guard = app.borrow_mut();
                    let a = &mut *guard;
                    let enabled = !a.game.settings().sound_enabled;
                    a.game.set_sound_enabled(enabled);
                    a.audio.apply_settings(a.game.settings());
                }
                "c" | "C" => {
                    let mut a = app.borrow_mut();
                    match a.game.cycle_cosmetic() {
                        Ok(cosmetic) => log::info!("Cosmetic: {}", cosmetic.name),
                        Err(e) => log::info!("{}", e),
                    }
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_handlers(app: Shared) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Tab hidden
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    dispatch(&app, Action::FocusLost);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur / focus
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                dispatch(&app, Action::FocusLost);
                let mut a = app.borrow_mut();
                if a.game.settings().mute_on_blur {
                    a.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().audio.set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Shared) {
        let keep_going = app.borrow_mut().frame();
        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use skyflap::persistence::{FileStore, KeyValueStore, MemoryStore};
    use skyflap::sim::{GameEvent, GameState};
    use skyflap::{Action, Game, Tuning};

    /// Give up after this many frames (about ten minutes at 60 fps)
    const MAX_FRAMES: u64 = 36_000;

    pub struct Options {
        pub store_path: Option<String>,
        pub tuning_path: Option<String>,
        pub seed: u64,
        pub hard_mode: bool,
    }

    impl Options {
        pub fn from_args(args: impl Iterator<Item = String>) -> Self {
            let mut options = Options {
                store_path: None,
                tuning_path: None,
                seed: clock_seed(),
                hard_mode: false,
            };
            let mut args = args.skip(1);
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--hard" => options.hard_mode = true,
                    "--tuning" => options.tuning_path = args.next(),
                    "--seed" => match args.next().map(|s| s.parse()) {
                        Some(Ok(seed)) => options.seed = seed,
                        _ => log::warn!("--seed needs an integer"),
                    },
                    path => options.store_path = Some(path.to_string()),
                }
            }
            options
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    fn open_store(path: Option<&str>) -> Box<dyn KeyValueStore> {
        match path.map(FileStore::open) {
            Some(Ok(store)) => Box::new(store),
            Some(Err(e)) => {
                log::warn!("Could not open store ({}), using memory", e);
                Box::new(MemoryStore::new())
            }
            None => Box::new(MemoryStore::new()),
        }
    }

    /// Jump when the bird sinks close to the bottom of the next gap
    fn should_flap(state: &GameState, tuning: &Tuning) -> bool {
        let bird = &state.bird;
        let target = state
            .obstacles()
            .iter()
            .find(|o| o.x + tuning.pipe_width >= bird.x)
            .map(|o| o.gap_bottom() - 20.0)
            .unwrap_or(tuning.bounds_height * 0.6);
        bird.velocity >= 0.0 && bird.bottom() >= target
    }

    fn load_tuning(path: Option<&str>) -> Option<Tuning> {
        let Some(path) = path else {
            return Some(Tuning::default());
        };
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to read {}: {}", path, e);
                return None;
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => Some(tuning),
            Err(e) => {
                log::error!("{}: {}", path, e);
                None
            }
        }
    }

    pub fn run(options: Options) {
        let Some(tuning) = load_tuning(options.tuning_path.as_deref()) else {
            return;
        };
        let store = open_store(options.store_path.as_deref());
        let mut game = match Game::new(tuning, store, options.seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        if let Err(e) = game.set_hard_mode(options.hard_mode) {
            log::warn!("{}", e);
        }

        log::info!("Autopilot run, seed {}", options.seed);
        game.press(Action::Flap);

        let mut frames = 0;
        let mut flaps = 0;
        while frames < MAX_FRAMES && game.frame() {
            frames += 1;
            if should_flap(game.state(), game.tuning()) {
                game.press(Action::Flap);
            }
            for event in game.drain_events() {
                match event {
                    GameEvent::Flapped => flaps += 1,
                    GameEvent::ThemeChanged(theme) => log::info!("Theme {}", theme),
                    _ => {}
                }
            }
            for cosmetic in game.drain_new_unlocks() {
                println!("Unlocked {}", cosmetic.name);
            }
        }

        let state = game.state();
        println!(
            "{:?} after {} frames: score {}, best {}, speed {:.1}, {} flaps",
            state.phase,
            frames,
            state.score,
            game.high_score(),
            state.pipe_speed,
            flaps
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyflap (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    headless::run(headless::Options::from_args(std::env::args()));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
