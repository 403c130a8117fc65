//! Sky Hopper entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

    use sky_hopper::consts::*;
    use sky_hopper::highscores::{self, HighScores, MAX_HIGH_SCORES};
    use sky_hopper::input::{KeyMap, bindings, is_game_key};
    use sky_hopper::persistence::{LocalStorage, MemoryStorage, Storage};
    use sky_hopper::scene::{Banner, SceneKind, build_scene, hud, shake_offset};
    use sky_hopper::settings::Settings;
    use sky_hopper::sim::{GameEvent, GamePhase, GameState, tick};

    fn css(color: u32) -> String {
        format!("#{:06x}", color & 0xFF_FFFF)
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        keys: KeyMap,
        settings: Settings,
        high_scores: HighScores,
        storage: Box<dyn Storage>,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
        /// Set by focus loss, applied on the next tick
        auto_pause: bool,
        banner: Option<Banner>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            let storage: Box<dyn Storage> = match LocalStorage::open() {
                Ok(storage) => Box::new(storage),
                Err(err) => {
                    log::warn!("{}; scores will not persist", err);
                    Box::new(MemoryStorage::new())
                }
            };
            let settings = Settings::load(storage.as_ref());
            let high_scores = HighScores::load(storage.as_ref(), MAX_HIGH_SCORES);

            let mut state = GameState::new(seed);
            state.max_particles = settings.max_particles();

            Self {
                state,
                keys: KeyMap::new(),
                settings,
                high_scores,
                storage,
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                auto_pause: false,
                banner: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let mut input = self.keys.take_tick_input();
                if std::mem::take(&mut self.auto_pause) && self.state.phase == GamePhase::Playing {
                    input.pause = true;
                }
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                self.handle_events();
            }
            // Drop backlog we could not simulate this frame
            self.accumulator = self.accumulator.min(SIM_DT);

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

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                if let Some(banner) = Banner::for_event(&event, self.state.time_ticks) {
                    self.banner = Some(banner);
                }
                match event {
                    GameEvent::LevelComplete { level } => {
                        log::info!("Level {} complete (score {})", level + 1, self.state.score)
                    }
                    GameEvent::PlayerDied => log::info!("Player died"),
                    GameEvent::GameOver { score, level } => {
                        self.record_score(score, level as u32 + 1)
                    }
                    GameEvent::GameComplete { score } => {
                        log::info!("All levels complete!");
                        self.record_score(score, self.state.level_count() as u32);
                    }
                    GameEvent::PlayerHurt { health } => {
                        log::debug!("Hurt, {} health left", health)
                    }
                    GameEvent::PowerUpCollected { kind } => {
                        log::info!("Power-up: {}", kind.label())
                    }
                    _ => {}
                }
            }
        }

        /// Step to the next quality preset and persist it
        fn cycle_quality(&mut self) {
            self.settings.quality = self.settings.quality.next();
            self.state.max_particles = self.settings.max_particles();
            let max = self.state.max_particles;
            self.state.particles.truncate(max);
            log::info!("Quality: {}", self.settings.quality);
            if let Err(err) = self.settings.save(self.storage.as_mut()) {
                log::warn!("Could not save settings: {}", err);
            }
        }

        /// Offer a leaderboard slot for a finished run
        fn record_score(&mut self, score: u64, level: u32) {
            if !self.high_scores.is_high_score(score) {
                return;
            }
            // Held keys would be stuck while the prompt has focus
            self.keys.release_all();
            let name = web_sys::window()
                .and_then(|w| {
                    w.prompt_with_message_and_default(
                        &format!("New high score: {}! Enter your name:", score),
                        highscores::DEFAULT_NAME,
                    )
                    .ok()
                    .flatten()
                })
                .unwrap_or_default();
            let date = highscores::today();
            if let Some(rank) =
                self.high_scores
                    .add_score(self.storage.as_mut(), &name, score, level, &date)
            {
                log::info!("High score #{}: {} points", rank + 1, score);
            }
        }

        /// Draw the current frame
        fn render(&self) {
            let ctx = &self.ctx;
            let summary = hud(&self.state);

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str(&css(summary.theme.background()));
            ctx.fill_rect(0.0, 0.0, WORLD_WIDTH as f64, WORLD_HEIGHT as f64);

            ctx.save();
            if self.settings.effective_screen_shake() {
                let offset = shake_offset(&self.state);
                let _ = ctx.translate(offset.x as f64, offset.y as f64);
            }

            for item in build_scene(&self.state) {
                if item.kind == SceneKind::Particle && !self.settings.particles {
                    continue;
                }
                let alpha = if item.kind == SceneKind::Player && self.settings.reduced_motion {
                    1.0
                } else {
                    item.alpha
                };
                ctx.set_global_alpha(alpha as f64);
                ctx.set_fill_style_str(&css(item.color));
                ctx.fill_rect(
                    item.rect.x as f64,
                    item.rect.y as f64,
                    item.rect.w as f64,
                    item.rect.h as f64,
                );
            }
            ctx.restore();

            self.render_overlay(summary.phase);
        }

        fn render_overlay(&self, phase: GamePhase) {
            let (title, subtitle) = match phase {
                GamePhase::Playing => {
                    self.render_banner();
                    return;
                }
                GamePhase::Menu => (
                    "SKY HOPPER".to_string(),
                    "Press Enter to start".to_string(),
                ),
                GamePhase::Paused => ("PAUSED".to_string(), "Press P to resume".to_string()),
                GamePhase::LevelCleared => (
                    "LEVEL CLEAR!".to_string(),
                    format!("Score: {}", self.state.score),
                ),
                GamePhase::GameOver => (
                    "GAME OVER".to_string(),
                    format!("Score: {}  -  Press Enter to retry", self.state.score),
                ),
                GamePhase::Victory => (
                    "YOU WIN!".to_string(),
                    format!("Score: {}  -  Press Enter to play again", self.state.score),
                ),
            };

            let ctx = &self.ctx;
            let cx = WORLD_WIDTH as f64 / 2.0;
            let cy = WORLD_HEIGHT as f64 / 2.0;
            ctx.set_global_alpha(0.5);
            ctx.set_fill_style_str("#000000");
            ctx.fill_rect(0.0, cy - 70.0, WORLD_WIDTH as f64, 120.0);

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_text_align("center");
            ctx.set_font("bold 40px sans-serif");
            let _ = ctx.fill_text(&title, cx, cy - 15.0);
            ctx.set_font("20px sans-serif");
            let _ = ctx.fill_text(&subtitle, cx, cy + 25.0);

            if phase == GamePhase::Menu
                && let Some(best) = self.high_scores.scores().first()
            {
                ctx.set_font("16px sans-serif");
                let _ = ctx.fill_text(
                    &format!("Best: {} ({})", best.score, best.name),
                    cx,
                    cy + 80.0,
                );
            }
        }

        fn render_banner(&self) {
            let Some(banner) = &self.banner else {
                return;
            };
            if !banner.is_visible(self.state.time_ticks) {
                return;
            }
            let ctx = &self.ctx;
            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_text_align("center");
            ctx.set_font("bold 24px sans-serif");
            let _ = ctx.fill_text(&banner.text, WORLD_WIDTH as f64 / 2.0, 80.0);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let summary = hud(&self.state);
            let set = |id: &str, text: &str| {
                if let Some(el) = document
                    .query_selector(&format!("#{} .hud-value", id))
                    .ok()
                    .flatten()
                {
                    el.set_text_content(Some(text));
                }
            };

            set("hud-score", &summary.score.to_string());
            set(
                "hud-health",
                &format!("{}/{}", summary.health, summary.max_health),
            );
            set("hud-level", &format!("{} - {}", summary.level, summary.level_name));
            set(
                "hud-coins",
                &format!(
                    "{}/{}",
                    summary.coins_required.saturating_sub(summary.coins_left),
                    summary.coins_required
                ),
            );
            let effects: Vec<String> = summary
                .effects
                .iter()
                .map(|e| format!("{} {:.0}s", e.kind.label(), e.secs_left.ceil()))
                .collect();
            set("hud-effects", &effects.join(" "));
            let message = self
                .banner
                .as_ref()
                .filter(|b| b.is_visible(self.state.time_ticks))
                .map_or("", |b| b.text.as_str());
            set("hud-message", message);

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    set("hud-fps", &self.fps.to_string());
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Sky Hopper starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into()?;
        canvas.set_width(WORLD_WIDTH as u32);
        canvas.set_height(WORLD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        log::info!("Seed: {}", seed);
        let game = Rc::new(RefCell::new(Game::new(seed, ctx)));

        setup_keyboard(&window, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        request_animation_frame(&window, game);

        Ok(())
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let code = event.code();
                if is_game_key(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                if !event.repeat() && bindings::QUALITY.contains(&code.as_str()) {
                    g.cycle_quality();
                }
                g.keys.key_down(&code);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            game.borrow_mut().keys.key_up(&event.code());
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(window: &Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.keys.release_all();
                    if g.state.phase == GamePhase::Playing {
                        g.auto_pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.keys.release_all();
            if g.state.phase == GamePhase::Playing {
                g.auto_pause = true;
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = window.document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(&window, game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
use sky_hopper::QualityPreset;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Hopper (native) starting...");
    log::info!("The playable build targets the browser; running a headless demo run");

    let arg = std::env::args().nth(1);
    let quality = match arg.map(|arg| arg.parse::<QualityPreset>()) {
        Some(Ok(preset)) => preset,
        Some(Err(err)) => {
            log::warn!("{}, using Medium", err);
            QualityPreset::Medium
        }
        None => QualityPreset::Medium,
    };
    demo::run(0x5EED, quality);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless run: walk right, hop periodically, record the result
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use sky_hopper::consts::SIM_DT;
    use sky_hopper::highscores::{self, HighScores};
    use sky_hopper::persistence::MemoryStorage;
    use sky_hopper::scene::hud;
    use sky_hopper::settings::{QualityPreset, Settings};
    use sky_hopper::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Two minutes of simulated play
    const DEMO_TICKS: u64 = 60 * 120;

    pub fn run(seed: u64, quality: QualityPreset) {
        let mut storage = MemoryStorage::new();
        let settings = Settings::from_preset(quality);
        if let Err(err) = settings.save(&mut storage) {
            log::warn!("Could not save settings: {}", err);
        }
        let mut high_scores = HighScores::load(&storage, highscores::MAX_HIGH_SCORES);

        let mut state = GameState::new(seed);
        state.max_particles = Settings::load(&storage).max_particles();
        log::info!("{} quality, up to {} particles", quality, state.max_particles);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );

        for t in 0..DEMO_TICKS {
            // Sweep right for four seconds, then back left, hopping every second
            let going_right = (t / 240) % 2 == 0;
            let input = TickInput {
                right: going_right,
                left: !going_right,
                jump: t % 60 < 10,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);

            for event in state.drain_events() {
                log::info!("tick {}: {:?}", state.time_ticks, event);
                let finished = match event {
                    GameEvent::GameOver { score, level } => Some((score, level as u32 + 1)),
                    GameEvent::GameComplete { score } => Some((score, state.level_count() as u32)),
                    _ => None,
                };
                if let Some((score, level)) = finished
                    && high_scores.is_high_score(score)
                {
                    high_scores.add_score(&mut storage, "Demo", score, level, &highscores::today());
                }
            }

            if matches!(state.phase, GamePhase::GameOver | GamePhase::Victory) {
                break;
            }
        }

        let summary = hud(&state);
        println!(
            "\nDemo finished in {:?} after {} ticks",
            summary.phase, state.time_ticks
        );
        println!(
            "Level {} ({}), score {}, health {}/{}",
            summary.level, summary.level_name, summary.score, summary.health, summary.max_health
        );
        println!("\nHigh scores:");
        for (rank, record) in high_scores.scores().iter().enumerate() {
            println!(
                "{:>2}. {:<15} {:>6}  level {}  {}",
                rank + 1,
                record.name,
                record.score,
                record.level,
                record.date
            );
        }
    }
}
