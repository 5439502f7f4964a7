//! Canvas 2D context surface for the browser build.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::schema::Hsla;

/// [`Surface`] backed by an HTML canvas element.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store.
    pub fn set_size(&self, width: u32, height: u32) {
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }
}

/// Canvas path calls only fail on invalid geometry (negative radii).
fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("canvas call rejected: {e:?}");
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn set_fill(&mut self, color: Hsla) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
        let r = (radius as f64).min(w / 2.0).min(h / 2.0).max(0.0);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        report(ctx.arc_to(x + w, y, x + w, y + h, r));
        report(ctx.arc_to(x + w, y + h, x, y + h, r));
        report(ctx.arc_to(x, y + h, x, y, r));
        report(ctx.arc_to(x, y, x + w, y, r));
        ctx.close_path();
        ctx.fill();
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.ctx.begin_path();
        report(self.ctx.ellipse(
            cx as f64, cy as f64, rx as f64, ry as f64, 0.0, 0.0, TAU,
        ));
        self.ctx.fill();
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.ctx.begin_path();
        report(self.ctx.arc(cx as f64, cy as f64, r as f64, 0.0, TAU));
        self.ctx.fill();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        report(self.ctx.translate(x as f64, y as f64));
    }

    fn rotate(&mut self, angle: f32) {
        report(self.ctx.rotate(angle as f64));
    }
}
