use serde::{Deserialize, Serialize};

/// Axis-aligned box `(x0, y0)`–`(x1, y1)` with `x0 <= x1`, `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Half-open containment, matching quadrant assignment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Quadrant `i` using the `(y >= ym) << 1 | (x >= xm)` numbering.
    pub fn quadrant(&self, i: usize) -> BBox {
        let (xm, ym) = self.center();
        let (x0, x1) = if i & 1 == 0 { (self.x0, xm) } else { (xm, self.x1) };
        let (y0, y1) = if i & 2 == 0 { (self.y0, ym) } else { (ym, self.y1) };
        BBox::new(x0, y0, x1, y1)
    }

    /// Index of the quadrant that holds `(x, y)`.
    pub fn quadrant_of(&self, x: f64, y: f64) -> usize {
        let (xm, ym) = self.center();
        (usize::from(y >= ym) << 1) | usize::from(x >= xm)
    }

    pub fn rounded(&self, digits: i32) -> BBox {
        BBox::new(
            round_to(self.x0, digits),
            round_to(self.y0, digits),
            round_to(self.x1, digits),
            round_to(self.y1, digits),
        )
    }

    /// `[[x0, y0], [x1, y1]]`, the corner-pair form viewers read.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.x0, self.y0], [self.x1, self.y1]]
    }
}

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Min and max of a non-empty slice; `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
