//! Neon Raid entry point
//!
//! In the browser this wires DOM events, the frame loop, the canvas renderer
//! and Web Audio around the simulation. Natively it runs a headless
//! autopilot, for soak testing tuning files.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use neon_raid::audio::{self, AudioSink, WebAudioSink};
    use neon_raid::platform::{
        HostAction, control_for_button, control_for_key, host_action_for_key, suppresses_default,
    };
    use neon_raid::renderer::{CanvasRenderer, Frame, Renderer};
    use neon_raid::sim::{
        Control, GameEvent, GamePhase, InputState, ScoreTracker, SimulationClock, SimulationState, tick,
    };
    use neon_raid::{Settings, Tuning};

    /// Seconds a wave banner stays up
    const BANNER_TIME: f64 = 1.6;

    /// Game instance holding all state
    struct Game {
        state: SimulationState,
        clock: SimulationClock,
        input: InputState,
        settings: Settings,
        renderer: Option<CanvasRenderer>,
        audio: WebAudioSink,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Banner text and the rAF time it expires
        banner: Option<(String, f64)>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let tuning = Tuning::default();
            let clock = SimulationClock::new(tuning.clock.max_delta);
            let mut state = SimulationState::new(seed, tuning);
            state.effects.set_max_particles(settings.max_particles());
            Self {
                state,
                clock,
                input: InputState::new(),
                audio: WebAudioSink::new(settings.effective_volume()),
                settings,
                renderer: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                banner: None,
            }
        }

        /// Run one simulation tick for this animation frame
        fn update(&mut self, time: f64) {
            let dt = self.clock.advance(time);
            let input = self.input.take_tick_input();
            tick(&mut self.state, &input, dt);

            let cues = self.state.effects.drain_cues();
            audio::play_cues(&mut self.audio, &cues);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::WaveStarted { wave } => {
                        self.banner = Some((format!("WAVE {}", wave), time + BANNER_TIME * 1000.0));
                    }
                    GameEvent::OverdriveReady => {
                        self.banner = Some(("OVERDRIVE READY".to_string(), time + BANNER_TIME * 1000.0));
                    }
                    GameEvent::GameOver(summary) => {
                        log::info!("Final score {} on wave {}", summary.score, summary.wave);
                    }
                    _ => {}
                }
            }
            if self.banner.as_ref().is_some_and(|(_, until)| time >= *until) {
                self.banner = None;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                let frame = Frame::capture(&self.state, &self.settings);
                renderer.draw(&frame);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let tracker = &self.state.tracker;
            let player = &self.state.pools.player;
            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set_text("#hud-score .hud-value", &tracker.score.to_string());
            set_text("#hud-wave .hud-value", &self.state.director.wave.to_string());
            set_text("#hud-multiplier .hud-value", &format!("x{}", tracker.multiplier));
            set_text(
                "#hud-shield .hud-value",
                &format!("{:.0}", player.shield.max(0.0)),
            );
            if self.settings.show_fps {
                set_text("#hud-fps .hud-value", &self.fps.to_string());
            }

            // Meter bars are plain width percentages
            if let Some(el) = document.get_element_by_id("shield-bar") {
                let pct = (player.shield / player.max_shield.max(1.0) * 100.0).clamp(0.0, 100.0);
                let _ = el.set_attribute("style", &format!("width: {:.0}%", pct));
            }
            if let Some(el) = document.get_element_by_id("overdrive-bar") {
                let cap = ScoreTracker::overdrive_cap(&self.state.tuning.scoring);
                let pct = tracker.overdrive_charge.min(cap) * 100 / cap;
                let _ = el.set_attribute("style", &format!("width: {}%", pct));
                let class = if tracker.overdrive_ready { "bar ready" } else { "bar" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("banner") {
                match &self.banner {
                    Some((text, _)) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Tab hidden or window blurred
        fn auto_pause(&mut self, reason: &str) {
            // Keys released while unfocused never send keyup
            self.input.clear();
            if self.settings.pause_on_blur && self.state.phase == GamePhase::Playing {
                self.input.press(Control::Pause);
                self.input.release(Control::Pause);
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn apply_host_action(&mut self, action: HostAction) {
            match action {
                HostAction::ToggleMute => {
                    let muted = self.settings.toggle_mute();
                    self.audio.set_volume(self.settings.effective_volume());
                    self.settings.save();
                    log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Neon Raid starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        match CanvasRenderer::new(&canvas) {
            Some(renderer) => game.borrow_mut().renderer = Some(renderer),
            None => log::error!("Canvas 2D context unavailable - rendering disabled"),
        }
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, &canvas, game.clone())?;
        setup_auto_pause(&window, &document, game.clone())?;
        setup_resize(&window, canvas, game.clone())?;

        request_animation_frame(game);

        log::info!("Neon Raid running!");
        Ok(())
    }

    /// Match the backing store to the CSS size
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if let Some(action) = host_action_for_key(&key) {
                    if !event.repeat() {
                        game.borrow_mut().apply_host_action(action);
                    }
                    return;
                }
                let Some(control) = control_for_key(&key) else {
                    return;
                };
                if suppresses_default(&key) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                // Browsers need a gesture before audio starts
                g.audio.resume();
                g.input.press(control);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(control) = control_for_key(&event.key()) {
                    game.borrow_mut().input.release(control);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer held over the playfield fires
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if let Some(control) = control_for_button(event.button()) {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.input.press(control);
                }
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        for name in ["pointerup", "pointerleave", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.release(Control::PointerFire);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.auto_pause("tab hidden");
                } else {
                    // Don't count the hidden stretch as frame time
                    g.clock.resume();
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = fit_canvas(&window_clone, &canvas);
            if let Some(renderer) = game.borrow_mut().renderer.as_mut() {
                renderer.resize(w, h);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if window.request_animation_frame(closure.as_ref().unchecked_ref()).is_err() {
            log::error!("requestAnimationFrame failed - frame loop stopped");
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use neon_raid::audio::{self, SilentSink};
    use neon_raid::renderer::{Frame, HeadlessRenderer, Renderer};
    use neon_raid::sim::{GameEvent, GamePhase, SimulationState, TickInput, tick};
    use neon_raid::{Settings, Tuning};

    const DT: f32 = 1.0 / 60.0;

    #[derive(Debug)]
    pub struct Args {
        pub seed: u64,
        pub seconds: f32,
        pub tuning: Option<PathBuf>,
    }

    impl Args {
        /// `[seed] [seconds] [--tuning path]`
        pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
            let mut parsed = Args {
                seed: 1,
                seconds: 120.0,
                tuning: None,
            };
            let mut positional = 0;
            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                if arg == "--tuning" {
                    let path = args.next().ok_or("--tuning needs a path")?;
                    parsed.tuning = Some(PathBuf::from(path));
                    continue;
                }
                match positional {
                    0 => parsed.seed = arg.parse().map_err(|e| format!("bad seed {:?}: {}", arg, e))?,
                    1 => {
                        parsed.seconds = arg
                            .parse()
                            .map_err(|e| format!("bad duration {:?}: {}", arg, e))?
                    }
                    _ => return Err(format!("unexpected argument {:?}", arg)),
                }
                positional += 1;
            }
            Ok(parsed)
        }
    }

    pub fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        Tuning::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Chase the nearest enemy's column, dodge close fire, spend overdrive
    fn autopilot(state: &SimulationState) -> TickInput {
        let player = &state.pools.player;
        let target = state
            .pools
            .enemies
            .iter()
            .filter(|e| e.pos.y > 0.0)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .total_cmp(&b.pos.distance_squared(player.pos))
            });
        let threat = state
            .pools
            .enemy_lasers
            .iter()
            .any(|l| l.pos.distance(player.pos) < player.radius * 4.0);

        let mut input = TickInput {
            fire: true,
            dash: threat,
            overdrive: state.tracker.overdrive_ready,
            ..Default::default()
        };
        if let Some(enemy) = target {
            let dx = enemy.pos.x - player.pos.x;
            input.left = dx < -4.0;
            input.right = dx > 4.0;
        }
        input
    }

    pub fn run(args: &Args, tuning: Tuning) -> SimulationState {
        let settings = Settings::load();
        let mut state = SimulationState::new(args.seed, tuning);
        state.effects.set_max_particles(settings.max_particles());
        let mut sink = SilentSink;
        let mut renderer = HeadlessRenderer::default();

        tick(&mut state, &TickInput { start: true, ..Default::default() }, DT);
        let ticks = (args.seconds.max(0.0) / DT) as u64;
        for i in 0..ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, DT);
            audio::play_cues(&mut sink, &state.effects.drain_cues());

            for event in state.drain_events() {
                match event {
                    GameEvent::WaveStarted { wave } => log::info!(
                        "t={:.1}s wave {} (score {})",
                        state.elapsed,
                        wave,
                        state.tracker.score
                    ),
                    GameEvent::OverdriveTriggered { kills } => log::info!("Overdrive cleared {} enemies", kills),
                    GameEvent::PlayerHit { source, damage, shield } => {
                        log::debug!("Hit by {:?} for {:.0}, shield {:.0}", source, damage, shield)
                    }
                    _ => {}
                }
            }
            if i % 60 == 0 {
                renderer.draw(&Frame::capture(&state, &settings));
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        log::info!("Rendered {} HUD snapshots", renderer.frames);
        state
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Result<Args, String> {
            Args::parse(list.iter().map(|s| s.to_string()))
        }

        #[test]
        fn test_parse_args() {
            let parsed = args(&["42", "30", "--tuning", "balance.json"]).unwrap();
            assert_eq!(parsed.seed, 42);
            assert_eq!(parsed.seconds, 30.0);
            assert_eq!(parsed.tuning, Some(PathBuf::from("balance.json")));

            let defaults = args(&[]).unwrap();
            assert_eq!(defaults.seed, 1);
            assert!(defaults.tuning.is_none());

            assert!(args(&["nope"]).is_err());
            assert!(args(&["1", "2", "3"]).is_err());
            assert!(args(&["--tuning"]).is_err());
        }

        #[test]
        fn test_headless_run_is_reproducible() {
            let parsed = args(&["7", "20"]).unwrap();
            let a = run(&parsed, Tuning::default());
            let b = run(&parsed, Tuning::default());
            assert_eq!(a.tracker, b.tracker);
            assert_eq!(a.time_ticks, b.time_ticks);
            assert!(a.time_ticks > 0);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use neon_raid::sim::GameOverSummary;

    env_logger::init();
    log::info!("Neon Raid (headless) starting...");

    let args = match headless::Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: neon-raid [seed] [seconds] [--tuning path.json]");
            return std::process::ExitCode::from(2);
        }
    };
    let tuning = match headless::load_tuning(args.tuning.as_ref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("Failed to load tuning: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let state = headless::run(&args, tuning);
    let summary = state.summary.unwrap_or(GameOverSummary {
        score: state.tracker.score,
        wave: state.director.wave,
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize summary: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    }
    std::process::ExitCode::SUCCESS
}
