//! Drawing surfaces.
//!
//! Simulations draw through the [`Surface`] trait, a minimal 2D immediate-mode
//! API in pixel coordinates with the origin at the top-left. The browser
//! binding implements it over a canvas 2D context; [`RecordingSurface`] keeps
//! the commands in memory for tests and the headless runner.

mod recording;

#[cfg(target_arch = "wasm32")]
mod canvas;

pub use recording::{DrawCommand, RecordingSurface};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::schema::Hsla;

/// 2D immediate-mode drawing target.
pub trait Surface {
    /// Current surface size in pixels.
    fn size(&self) -> (f32, f32);

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Fill colour for subsequent shapes.
    fn set_fill(&mut self, color: Hsla);

    /// Global alpha multiplied into every subsequent fill.
    fn set_alpha(&mut self, alpha: f32);

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32);

    /// Axis-aligned ellipse in the current transform.
    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32);

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32);

    /// Push the transform and alpha state.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);

    /// Rotate the current transform by `angle` radians.
    fn rotate(&mut self, angle: f32);
}
