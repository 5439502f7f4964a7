//! In-memory surface that records draw commands.

use super::Surface;
use crate::schema::Hsla;

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill(Hsla),
    Alpha(f32),
    RoundRect { x: f32, y: f32, w: f32, h: f32, radius: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Circle { cx: f32, cy: f32, r: f32 },
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
}

impl DrawCommand {
    /// Whether this command paints pixels.
    #[inline]
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            DrawCommand::RoundRect { .. } | DrawCommand::Ellipse { .. } | DrawCommand::Circle { .. }
        )
    }
}

/// Surface that appends every call to a command list.
///
/// `clear` empties the list before recording itself, so after a frame the list
/// holds exactly that frame's commands.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    /// Depth of unmatched `save` calls.
    depth: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            depth: 0,
        }
    }

    /// Change the reported size, as a viewport resize would.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of painted shapes since the last clear.
    pub fn shape_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_shape()).count()
    }

    /// Unmatched `save` depth. Zero after a well-formed frame.
    pub fn save_depth(&self) -> usize {
        self.depth
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_fill(&mut self, color: Hsla) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha(alpha));
    }

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.commands.push(DrawCommand::RoundRect { x, y, w, h, radius });
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.commands.push(DrawCommand::Ellipse { cx, cy, rx, ry });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.commands.push(DrawCommand::Circle { cx, cy, r });
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate(angle));
    }
}
