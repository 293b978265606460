//! Axis-aligned rectangle geometry
//!
//! Everything lives in canvas pixel space: origin at the top-left corner,
//! y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict AABB overlap. Touching edges do not count. A zero-area rect
    /// overlaps only when it lies strictly inside the other.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// The canvas extent. Fixed for a session; normalizes the shift math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Average extent, used as the range of the diagonal shift
    #[inline]
    pub fn diagonal(&self) -> f32 {
        (self.width + self.height) / 2.0
    }

    /// Clamp a rect's position so it lies fully inside the arena
    pub fn clamp_rect(&self, rect: &mut Rect) {
        if rect.x < 0.0 {
            rect.x = 0.0;
        } else if rect.x > self.width - rect.width {
            rect.x = self.width - rect.width;
        }
        if rect.y < 0.0 {
            rect.y = 0.0;
        } else if rect.y > self.height - rect.height {
            rect.y = self.height - rect.height;
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(crate::consts::CANVAS_WIDTH, crate::consts::CANVAS_HEIGHT)
    }
}
