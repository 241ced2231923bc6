//! Registration marks: short cut guides drawn around a filled box at every
//! column and row edge of the counters placed in it.
use super::geometry::Rect;
use serde::Serialize;

/// A straight line in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Line { x1, y1, x2, y2 }
    }
}

/// Edge offsets recorded for one box, relative to the box origin. Both
/// sets start out holding 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationMarks {
    pub area: Rect,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl RegistrationMarks {
    pub fn new(area: Rect) -> Self {
        RegistrationMarks {
            area,
            xs: vec![0.0],
            ys: vec![0.0],
        }
    }

    pub fn add_x(&mut self, x: f64) {
        insert_sorted(&mut self.xs, x);
    }

    pub fn add_y(&mut self, y: f64) {
        insert_sorted(&mut self.ys, y);
    }

    /// Anything beyond the initial 0 offsets.
    pub fn has_marks(&self) -> bool {
        self.xs.len() > 1 || self.ys.len() > 1
    }

    /// Ticks of length `len` above and left of the box at every offset, and
    /// the same ticks mirrored below the lowest and right of the rightmost
    /// offset. Lengths below 1 draw nothing.
    pub fn lines(&self, len: f64) -> Vec<Line> {
        if len < 1.0 {
            return Vec::new();
        }
        let Rect { x, y, .. } = self.area;
        let max_x = self.xs.iter().copied().fold(0.0, f64::max);
        let max_y = self.ys.iter().copied().fold(0.0, f64::max);
        let mut lines = Vec::with_capacity(2 * (self.xs.len() + self.ys.len()));
        lines.extend(self.xs.iter().map(|&mx| Line::new(x + mx, y - len, x + mx, y)));
        lines.extend(self.ys.iter().map(|&my| Line::new(x - len, y + my, x, y + my)));
        lines.extend(
            self.xs
                .iter()
                .map(|&mx| Line::new(x + mx, y + max_y, x + mx, y + max_y + len)),
        );
        lines.extend(
            self.ys
                .iter()
                .map(|&my| Line::new(x + max_x, y + my, x + max_x + len, y + my)),
        );
        lines
    }
}

fn insert_sorted(values: &mut Vec<f64>, value: f64) {
    if let Err(i) = values.binary_search_by(|v| v.total_cmp(&value)) {
        values.insert(i, value);
    }
}
