//! 2-D geometry primitives shared by the diagram model, the layout engine
//! and the line router.
//!
//! All diagram geometry is center-based: a [`Rect`] is a center point plus a
//! width and height, matching how glyph positions are stored in pathway
//! documents. Edges of the box are derived on demand.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Center-based bounding box of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
        }
    }

    /// Build from a top-left corner plus dimensions (the convention used by
    /// the SBML layout extension).
    pub fn from_top_left(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            cx: x + width / 2.0,
            cy: y + height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn left(&self) -> f64 {
        self.cx - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.cx + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.cy - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.cy + self.height / 2.0
    }

    /// Half-diagonal of the box. Used by the layout engine as the glyph's
    /// effective radius when sizing spring rest lengths.
    pub fn radius(&self) -> f64 {
        hypot(self.width / 2.0, self.height / 2.0)
    }
}

/// Length of the hypotenuse for legs `a` and `b`.
pub fn hypot(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}
