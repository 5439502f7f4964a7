//! Compute module - The step-simulated systems behind the backdrop.
//!
//! Each simulation owns all of its state, reads the surface dimensions once at
//! construction, and is driven through the [`Simulation`] trait.

mod automaton;
mod field;
mod flock;
mod rng;

pub use automaton::*;
pub use field::*;
pub use flock::*;
pub use rng::SimRng;

use crate::render::Surface;

/// Lifecycle contract shared by every animation.
pub trait Simulation {
    /// Advance the state by one drawn frame.
    fn advance(&mut self);

    /// Draw the current state. Never clears the surface.
    fn draw(&self, surface: &mut dyn Surface);

    /// Perturb the state at surface-local pixel coordinates.
    ///
    /// Coordinates outside the surface are tolerated.
    fn interact(&mut self, x: f32, y: f32);

    /// Number of live entities (cells, boids or particles).
    fn population(&self) -> usize;

    /// One frame: advance, then draw.
    fn step(&mut self, surface: &mut dyn Surface) {
        self.advance();
        self.draw(surface);
    }
}
