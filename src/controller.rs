//! Render loop controller.
//!
//! Owns the active simulation and drives one clear + step per display frame.
//! The "run before next repaint" primitive is injected as a [`FrameScheduler`]
//! so the loop runs the same under `requestAnimationFrame`, a native timer, or
//! a test calling [`RenderLoop::on_frame`] by hand.
//!
//! State machine: `Idle -> Running <-> Paused -> Idle`. While mounted the
//! scheduler keeps firing in both Running and Paused; pausing only skips the
//! clear and step.

use crate::compute::{SimRng, Simulation};
use crate::registry::{self, RegistryEntry};
use crate::render::Surface;
use crate::schema::BackdropConfig;

/// Schedules the next frame callback.
pub trait FrameScheduler {
    /// Ask for one more frame callback.
    fn request_frame(&mut self);

    /// Drop any pending request.
    fn cancel(&mut self);
}

/// Scheduler that only records requests. The owner delivers frames itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
    cancels: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total requests made.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn cancels(&self) -> u64 {
        self.cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel(&mut self) {
        self.pending = false;
        self.cancels += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Paused,
}

pub struct RenderLoop<S: FrameScheduler> {
    scheduler: S,
    config: BackdropConfig,
    state: LoopState,
    width: f32,
    height: f32,
    active: &'static RegistryEntry,
    simulation: Option<Box<dyn Simulation>>,
    /// Simulations constructed so far; offsets the fixed seed per build.
    builds: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S, config: BackdropConfig) -> Self {
        Self {
            scheduler,
            config,
            state: LoopState::Idle,
            width: 0.0,
            height: 0.0,
            active: registry::default_entry(),
            simulation: None,
            builds: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Id of the selected animation.
    pub fn active_id(&self) -> &'static str {
        self.active.id
    }

    /// Live surface size, updated on every resize.
    pub fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn simulation(&self) -> Option<&dyn Simulation> {
        self.simulation.as_deref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Start the loop on a surface of the given size.
    pub fn mount(&mut self, width: f32, height: f32) {
        if self.state != LoopState::Idle {
            log::warn!("render loop already mounted");
            return;
        }
        self.width = width;
        self.height = height;
        self.simulation = Some(self.build());
        self.state = LoopState::Running;
        log::info!(
            "mounted {} on {}x{} surface",
            self.active.id,
            width,
            height
        );
        self.scheduler.request_frame();
    }

    /// Stop scheduling and drop the simulation.
    pub fn unmount(&mut self) {
        if self.state == LoopState::Idle {
            return;
        }
        self.scheduler.cancel();
        self.simulation = None;
        self.state = LoopState::Idle;
        log::info!("unmounted render loop");
    }

    /// Handle one display frame.
    pub fn on_frame(&mut self, surface: &mut dyn Surface) {
        match self.state {
            LoopState::Idle => return,
            LoopState::Running => {
                surface.clear();
                if let Some(simulation) = self.simulation.as_mut() {
                    simulation.step(surface);
                }
            }
            LoopState::Paused => {}
        }
        self.scheduler.request_frame();
    }

    /// Record a new surface size. The active simulation keeps the dimensions
    /// it was built with until the next switch.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        log::debug!("surface resized to {width}x{height}");
    }

    /// Replace the active simulation. Unknown ids select the default entry.
    ///
    /// Returns the id actually selected. While idle only the selection is
    /// recorded; the next mount builds it.
    pub fn switch_to(&mut self, id: &str) -> &'static str {
        self.active = registry::lookup(id);
        if self.state != LoopState::Idle {
            self.simulation = Some(self.build());
            log::info!(
                "switched to {} on {}x{} surface",
                self.active.id,
                self.width,
                self.height
            );
        }
        self.active.id
    }

    /// Flip between running and paused. Returns whether the loop is now playing.
    pub fn toggle_play(&mut self) -> bool {
        self.state = match self.state {
            LoopState::Running => LoopState::Paused,
            LoopState::Paused => LoopState::Running,
            LoopState::Idle => LoopState::Idle,
        };
        self.is_playing()
    }

    /// Forward a click given in client coordinates; `origin` is the surface's
    /// top-left corner in the same space. Dropped unless running, and dropped
    /// when the point falls outside the surface.
    pub fn click(&mut self, client_x: f32, client_y: f32, origin: (f32, f32)) {
        if self.state != LoopState::Running {
            return;
        }
        let (x, y) = (client_x - origin.0, client_y - origin.1);
        if !(0.0..self.width).contains(&x) || !(0.0..self.height).contains(&y) {
            log::trace!("click at ({x}, {y}) outside the surface");
            return;
        }
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.interact(x, y);
        }
    }

    fn build(&mut self) -> Box<dyn Simulation> {
        let rng = match self.config.rng_seed {
            Some(seed) => SimRng::new(seed.wrapping_add(self.builds)),
            None => SimRng::random(),
        };
        self.builds += 1;
        self.active.init(self.width, self.height, &self.config, rng)
    }
}
