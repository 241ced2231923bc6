//! Plain geometry in document user units.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    /// The footprint after rotating by `degrees`: quarter turns swap sides.
    pub fn rotated(self, degrees: f64) -> Self {
        let quarter_turns = (degrees / 90.0).round() as i64;
        let is_quarter = (degrees - quarter_turns as f64 * 90.0).abs() < 1e-9;
        if is_quarter && quarter_turns.rem_euclid(2) == 1 {
            Size::new(self.height, self.width)
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    /// Shrink by `margin` on every side.
    pub fn inset(self, margin: f64) -> Self {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.w - margin * 2.0,
            self.h - margin * 2.0,
        )
    }
}
