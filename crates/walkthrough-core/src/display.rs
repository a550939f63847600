//! Outline display settings.

use crate::defaults;

/// How outlined objects are drawn
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSettings {
    /// Outline thickness in pixels.
    pub thickness: f32,
    /// Outline color (RGB).
    pub color: [f32; 3],
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            thickness: defaults::OUTLINE_THICKNESS,
            color: defaults::OUTLINE_COLOR,
        }
    }
}

impl OutlineSettings {
    pub fn new(thickness: f32, color: [f32; 3]) -> Self {
        Self {
            thickness: thickness.max(0.0),
            color,
        }
    }

    /// Set the outline thickness, clamped to be non-negative.
    pub fn set_thickness(&mut self, thickness: f32) {
        self.thickness = thickness.max(0.0);
    }

    /// Set the outline color.
    pub fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }
}
