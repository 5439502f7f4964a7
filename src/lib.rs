//! Portfolio backdrop - Generative canvas animations behind a page.
//!
//! This crate provides three step-simulated systems (a coloured Game of Life,
//! a flock of boids, and particles drifting through moving attractor fields)
//! plus the registry and render loop that drive whichever one is selected.
//!
//! # Architecture
//!
//! - `schema`: Configuration types and colours
//! - `render`: The `Surface` drawing abstraction and its implementations
//! - `compute`: The `Simulation` trait and the three simulations
//! - `registry`: Ordered id → constructor table
//! - `controller`: Frame loop, play/pause, switching and click forwarding
//!
//! # Example
//!
//! ```rust,no_run
//! use portfolio_backdrop::{
//!     controller::{ManualScheduler, RenderLoop},
//!     render::RecordingSurface,
//!     schema::BackdropConfig,
//! };
//!
//! let mut surface = RecordingSurface::new(1280.0, 720.0);
//! let mut looper = RenderLoop::new(ManualScheduler::new(), BackdropConfig::default());
//!
//! looper.mount(1280.0, 720.0);
//! looper.switch_to("flockingBoids");
//!
//! // Ten seconds at 60 fps
//! for _ in 0..600 {
//!     if !looper.scheduler_mut().take() {
//!         break;
//!     }
//!     looper.on_frame(&mut surface);
//! }
//!
//! println!("Boids: {}", looper.simulation().map_or(0, |s| s.population()));
//! ```

pub mod compute;
pub mod controller;
pub mod registry;
pub mod render;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{CellularAutomaton, FieldSimulation, FlockSimulation, SimRng, Simulation};
pub use controller::{FrameScheduler, LoopState, ManualScheduler, RenderLoop};
pub use render::{RecordingSurface, Surface};
pub use schema::{BackdropConfig, ConfigError};
