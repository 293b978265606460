//! Shift Maze entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, Response};

    use shift_maze::consts::SIM_DT;
    use shift_maze::renderer::{RenderState, scene_vertices};
    use shift_maze::sim::TickInput;
    use shift_maze::{Session, SessionEvent, Settings};

    /// Wait before asking for a level again after a failed load (ms)
    const LEVEL_RETRY_MS: f64 = 2000.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        last_time: f64,
        /// A level fetch is in flight
        loading: bool,
        /// Frame time before which a failed level is not requested again
        retry_after: f64,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            Self {
                session: Session::new(settings),
                render_state: None,
                last_time: 0.0,
                loading: false,
                retry_after: 0.0,
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(state) = self.session.state() else {
                return;
            };
            let vertices = scene_vertices(state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    /// Fetch a text resource relative to the page
    async fn fetch_text(url: &str) -> Result<String, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        let text = JsFuture::from(response.text()?).await?;
        text.as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }

    /// Fetch and build a level off to the side, then swap it in between frames
    fn load_level(game: Rc<RefCell<Game>>, index: usize) {
        let url = {
            let mut g = game.borrow_mut();
            if g.loading {
                return;
            }
            g.loading = true;
            g.session.settings.level_url(index)
        };

        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Fetching level {} from {}", index, url);
            let fetched = fetch_text(&url).await;

            let mut g = game.borrow_mut();
            g.loading = false;
            let loaded = match fetched {
                // Build errors are logged by the session
                Ok(json) => g.session.load_level_json(&json, index).is_ok(),
                Err(e) => {
                    log::error!("Failed to fetch level {}: {:?}", index, e);
                    false
                }
            };
            if !loaded {
                g.retry_after = g.last_time + LEVEL_RETRY_MS;
                log::warn!("Retrying level {} in {} ms", index, LEVEL_RETRY_MS);
            }
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Shift Maze starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no canvas");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let arena = settings.arena();
        let first_level = settings.first_level;
        let game = Rc::new(RefCell::new(Game::new(settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
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
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, arena).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(game.clone());
        // Picked up by the first frame
        game.borrow_mut().session.request_level(first_level);

        // Start game loop
        request_animation_frame(game);

        log::info!("Shift Maze running!");
    }

    /// Map a key to its direction flag
    fn key_flag<'a>(input: &'a mut TickInput, key: &str) -> Option<&'a mut bool> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(&mut input.left),
            "ArrowRight" | "d" | "D" => Some(&mut input.right),
            "ArrowUp" | "w" | "W" => Some(&mut input.up),
            "ArrowDown" | "s" | "S" => Some(&mut input.down),
            _ => None,
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(flag) = key_flag(&mut g.session.input, &event.key()) {
                    *flag = pressed;
                    // Keep arrow keys from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup never arrives for keys held while focus leaves the page
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.input = TickInput::default();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        let events = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let events = g.session.update(dt);
            g.render();
            events
        };

        for event in events {
            if let SessionEvent::Finished { level_index } = event {
                log::info!("All levels cleared (last was {})", level_index);
            }
        }

        // New level requests and retries of failed ones
        let wanted = {
            let g = game.borrow();
            g.session
                .pending_level()
                .filter(|_| !g.loading && time >= g.retry_after)
        };
        if let Some(next) = wanted {
            load_level(game.clone(), next);
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
mod headless {
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use shift_maze::sim::{GamePhase, GameState, TickInput};
    use shift_maze::{Session, SessionEvent, Settings};

    /// Headless run: steer toward each checkpoint and report how far it got
    #[derive(Debug, Parser)]
    #[command(name = "shift-maze", about = "Run Shift Maze levels headless")]
    pub struct Cli {
        /// Ticks to simulate before giving up (10 ms each)
        #[arg(
            short,
            long,
            value_name = "N",
            default_value_t = 3000,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        pub ticks: u64,

        /// Level files, played in order
        #[arg(value_name = "LEVEL.json", default_value = "demos/levels/level-0.json")]
        pub levels: Vec<PathBuf>,
    }

    /// Head for the checkpoint along whichever axes are still off
    fn autopilot(state: &GameState) -> TickInput {
        let player = state.player.rect.center();
        let goal = state.checkpoint.rect.center();
        let slack = state.player.speed;

        TickInput {
            left: goal.x < player.x - slack,
            right: goal.x > player.x + slack,
            up: goal.y < player.y - slack,
            down: goal.y > player.y + slack,
        }
    }

    fn load(session: &mut Session, path: &Path, index: usize) -> Result<(), String> {
        let json =
            std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        session
            .load_level_json(&json, index)
            .map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn run(cli: Cli) -> Result<(), String> {
        let settings = Settings {
            level_count: cli.levels.len(),
            ..Settings::load()
        };
        let mut session = Session::new(settings);
        load(&mut session, &cli.levels[0], 0)?;

        for t in 0..cli.ticks {
            let Some(state) = session.state() else {
                break;
            };
            let input = autopilot(state);
            if !input.any() && state.phase == GamePhase::Playing {
                log::warn!("Tick {}: autopilot has nowhere to go", t);
                break;
            }
            session.input = input;

            for event in session.step() {
                match event {
                    SessionEvent::LevelComplete { level_index, next } => {
                        log::info!("Tick {}: level {} cleared", t, level_index);
                        load(&mut session, &cli.levels[next], next)?;
                    }
                    SessionEvent::Finished { level_index } => {
                        log::info!("Tick {}: final level {} cleared", t, level_index);
                        return Ok(());
                    }
                }
            }
        }

        if let Some(state) = session.state() {
            let p = &state.player.rect;
            log::info!(
                "Stopped on level {} after {} ticks at ({:.1}, {:.1}), phase {:?}",
                state.level_index,
                state.time_ticks,
                p.x,
                p.y,
                state.phase
            );
            if state.phase == GamePhase::Playing {
                log::warn!("Autopilot did not reach the checkpoint");
            }
            for wall in state.walls.iter().filter(|w| !w.shift.is_static()).take(4) {
                log::info!(
                    "  dynamic wall at ({}, {}): {}",
                    wall.rect.x,
                    wall.rect.y,
                    wall.color.to_css()
                );
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_numeric_file_name_is_a_level() {
            let cli = Cli::try_parse_from(["shift-maze", "100"]).unwrap();
            assert_eq!(cli.ticks, 3000);
            assert_eq!(cli.levels, vec![PathBuf::from("100")]);
        }

        #[test]
        fn test_ticks_flag_and_defaults() {
            let cli = Cli::try_parse_from(["shift-maze", "--ticks", "5", "a.json", "b.json"])
                .unwrap();
            assert_eq!(cli.ticks, 5);
            assert_eq!(cli.levels.len(), 2);

            let cli = Cli::try_parse_from(["shift-maze"]).unwrap();
            assert_eq!(cli.levels, vec![PathBuf::from("demos/levels/level-0.json")]);

            assert!(Cli::try_parse_from(["shift-maze", "-t", "0"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let cli = headless::Cli::parse();
    env_logger::init();
    log::info!("Shift Maze (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    if let Err(e) = headless::run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
