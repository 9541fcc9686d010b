use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Height of the overlap between this rect's vertical extent and the
    /// band `[top, top + height)`.
    pub fn vertical_overlap(&self, top: f64, height: f64) -> f64 {
        let lo = self.y.max(top);
        let hi = self.bottom().min(top + height);
        (hi - lo).max(0.0)
    }
}

/// An opaque RGB color, used where a renderer needs a concrete value
/// rather than a [`crate::ThemeToken`] (e.g. the raster background).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS-style `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The visible window onto the vertically scrolling deck canvas, in design
/// units (one slide is `width` × `height`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scroll offset from the top of the canvas.
    pub scroll_top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_top,
            width,
            height,
        }
    }
}
