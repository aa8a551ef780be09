use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use spidertoy::{HunterPose, SimConfig, SimEvent, Simulation, Viewport};

/// Max frame delta fed to the simulation (prevents huge jumps after a stall).
const MAX_FRAME_DT: f64 = 0.25;
/// Seconds between summary log lines.
const SUMMARY_INTERVAL: f64 = 5.0;
/// Environment variable naming an optional JSON config file.
const CONFIG_ENV: &str = "SPIDERTOY_CONFIG";
/// Clicks closer than this to the hunter poke it.
const POKE_RADIUS: f32 = 24.0;
/// Fallback surface when no monitor reports a size.
const FALLBACK_SIZE: (u32, u32) = (1280, 720);

// ---------------------------------------------------------------------------
// Periodic summary
// ---------------------------------------------------------------------------

/// What happened since the last summary line: frame pacing plus a tally of
/// simulation events.
struct Summary {
    since: Instant,
    frames: u32,
    slowest_frame: f64,
    prey_caught: u32,
    webs: u32,
    pointer_catches: u32,
}

impl Summary {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            frames: 0,
            slowest_frame: 0.0,
            prey_caught: 0,
            webs: 0,
            pointer_catches: 0,
        }
    }

    fn count(&mut self, event: &SimEvent) {
        match event {
            SimEvent::PreyCaught { .. } => self.prey_caught += 1,
            SimEvent::WebPlaced { .. } => self.webs += 1,
            SimEvent::PointerCaught { .. } => self.pointer_catches += 1,
            SimEvent::AttackCompleted { .. } | SimEvent::HunterPoked { .. } => {}
        }
    }

    /// Log and reset once `SUMMARY_INTERVAL` has passed.
    fn frame_done(&mut self, dt: f64, sim: &Simulation) {
        self.frames += 1;
        self.slowest_frame = self.slowest_frame.max(dt);

        let elapsed = self.since.elapsed().as_secs_f64();
        if elapsed < SUMMARY_INTERVAL {
            return;
        }
        log::info!(
            "{:.0} fps (worst {:.1}ms) | hunter {} | {} prey | caught {} | webs {} | pointer {}",
            f64::from(self.frames) / elapsed,
            self.slowest_frame * 1000.0,
            sim.hunter_state_tag().label(),
            sim.prey_count(),
            self.prey_caught,
            self.webs,
            self.pointer_catches,
        );
        *self = Self::new();
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn load_config() -> SimConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return SimConfig::default();
    };
    match SimConfig::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            log::warn!("Ignoring config {}: {e}; using defaults", path);
            SimConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    config: SimConfig,
    sim: Option<Simulation>,

    last_frame_time: Option<Instant>,
    summary: Summary,
    cursor: Option<Vec2>,
    hidden: bool,
}

impl App {
    fn new(config: SimConfig) -> Self {
        Self {
            window: None,
            config,
            sim: None,
            last_frame_time: None,
            summary: Summary::new(),
            cursor: None,
            hidden: false,
        }
    }

    /// Tick the simulation with the wall-clock delta and report what happened.
    fn run_frame(&mut self, dt: f64) {
        let Some(sim) = &mut self.sim else {
            return;
        };
        sim.tick(dt.min(MAX_FRAME_DT) as f32);

        for event in sim.drain_events() {
            self.summary.count(&event);
            match event {
                SimEvent::PreyCaught { id, pos } => {
                    log::debug!("Prey {:?} caught at ({:.0}, {:.0})", id, pos.x, pos.y)
                }
                SimEvent::PointerCaught { outcome } => log::info!("Pointer caught: {:?}", outcome),
                SimEvent::WebPlaced { pos, size, duration } => log::debug!(
                    "Web {:.0}px at ({:.0}, {:.0}) for {:.1}s",
                    size,
                    pos.x,
                    pos.y,
                    duration
                ),
                SimEvent::AttackCompleted { hits } => log::debug!("Attack done, {} hits", hits),
                SimEvent::HunterPoked { duration } => {
                    log::info!("Hunter poked, sulking for {:.1}s", duration)
                }
            }
        }
        self.summary.frame_done(dt, sim);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let screen_size = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .map(|m| m.size())
            .unwrap_or_else(|| FALLBACK_SIZE.into());

        let attrs = WindowAttributes::default()
            .with_title("SpiderToy")
            .with_decorations(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(screen_size)
            .with_position(winit::dpi::PhysicalPosition::new(0, 0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let viewport = Viewport::new(size.width as f32, size.height as f32);
        match Simulation::new(
            self.config.clone(),
            viewport,
            HunterPose::default(),
            fastrand::Rng::new(),
        ) {
            Ok(sim) => self.sim = Some(sim),
            Err(e) => {
                log::error!("Invalid simulation config: {e}");
                event_loop.exit();
                return;
            }
        }

        // Continuous game loop
        event_loop.set_control_flow(ControlFlow::Poll);
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    log::info!("ESC pressed, exiting");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(sim) = &mut self.sim {
                    sim.set_viewport(new_size.width as f32, new_size.height as f32);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = Some(cursor);
                if let Some(sim) = &mut self.sim {
                    sim.set_pointer(cursor);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let (Some(sim), Some(cursor)) = (&mut self.sim, self.cursor) {
                    if cursor.distance(sim.hunter_pose().pos) < POKE_RADIUS {
                        sim.poke_hunter();
                    }
                }
            }
            WindowEvent::Occluded(occluded) => {
                if self.hidden && !occluded {
                    if let Some(sim) = &mut self.sim {
                        sim.resume_after_hidden();
                    }
                    // Don't feed the hidden stretch into the next tick.
                    self.last_frame_time = None;
                }
                self.hidden = occluded;
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    self.run_frame(dt);
                }
                self.last_frame_time = Some(now);
            }
            _ => {}
        }
    }
}

/// Entry point: create the event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config();
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
