//! Plane geometry primitives shared by the editor, validity rules and scene
//! projection.

use serde::{Deserialize, Serialize};

/// A point in plan coordinates (x to the right, y down the canvas).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Rotates the point by `degrees` around `center`.
    pub fn rotated_around(&self, center: &Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Axis-aligned box enclosing a `width × height` rectangle at `(x, y)`
    /// rotated by `degrees` around its centre.
    pub fn from_rotated_rect(x: f64, y: f64, width: f64, height: f64, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let half_w = (width / 2.0 * cos).abs() + (height / 2.0 * sin).abs();
        let half_h = (width / 2.0 * sin).abs() + (height / 2.0 * cos).abs();
        let cx = x + width / 2.0;
        let cy = y + height / 2.0;
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Separation between the two boxes along each axis, zero when they
    /// overlap on that axis.
    pub fn gap(&self, other: &Bounds) -> (f64, f64) {
        let gap_x = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let gap_y = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        (gap_x, gap_y)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

/// Rounds `value` to the nearest multiple of `grid`.
///
/// A non-positive grid leaves the value untouched.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 || !grid.is_finite() {
        return value;
    }
    (value / grid).round() * grid
}

pub fn snap_point(point: Point, grid: f64) -> Point {
    Point::new(snap_to_grid(point.x, grid), snap_to_grid(point.y, grid))
}

/// Folds any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// Angle in degrees of the vector from `center` to `point`, in `[0, 360)`.
///
/// Zero points right, angles grow clockwise on screen (y down).
pub fn angle_from(center: &Point, point: &Point) -> f64 {
    normalize_degrees((point.y - center.y).atan2(point.x - center.x).to_degrees())
}
