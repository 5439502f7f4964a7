//! HSL colour type shared by the simulations and drawing surfaces.

use serde::{Deserialize, Serialize};

/// Colour in HSL space with an alpha channel.
///
/// Hue is in degrees, saturation and lightness in percent, alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    /// Create a colour with explicit alpha.
    #[inline]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Create an opaque colour.
    #[inline]
    pub const fn opaque(h: f32, s: f32, l: f32) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Same hue, saturation and lightness with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Whether two colours share hue, saturation and lightness (alpha ignored).
    #[inline]
    pub fn same_hsl(&self, other: &Self) -> bool {
        self.h == other.h && self.s == other.s && self.l == other.l
    }

    /// CSS `hsla(...)` representation for canvas fill styles.
    pub fn to_css(&self) -> String {
        format!("hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
    }
}

/// Colours handed out to user-injected automaton patterns.
pub const GLIDER_PALETTE: [Hsla; 8] = [
    Hsla::opaque(0.0, 70.0, 50.0),   // red
    Hsla::opaque(30.0, 70.0, 50.0),  // orange
    Hsla::opaque(60.0, 70.0, 50.0),  // yellow
    Hsla::opaque(120.0, 70.0, 50.0), // green
    Hsla::opaque(180.0, 70.0, 50.0), // cyan
    Hsla::opaque(240.0, 70.0, 50.0), // blue
    Hsla::opaque(270.0, 70.0, 50.0), // purple
    Hsla::opaque(300.0, 70.0, 50.0), // magenta
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_format() {
        let c = Hsla::new(180.0, 60.0, 50.0, 0.6);
        assert_eq!(c.to_css(), "hsla(180, 60%, 50%, 0.6)");
    }

    #[test]
    fn test_same_hsl_ignores_alpha() {
        let a = GLIDER_PALETTE[3];
        assert!(a.same_hsl(&a.with_alpha(0.2)));
        assert!(!a.same_hsl(&GLIDER_PALETTE[4]));
    }
}
