//! Viewport and coordinate transformation for the 2D canvas.
//!
//! Converts between screen coordinates (pixels, origin top-left of the canvas
//! widget) and plan coordinates. Both axes point the same way, so there is no
//! axis flip: `plan = (screen - offset) / zoom`.

use std::fmt;

use crate::geometry::{Bounds, Point};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Zoom and pan state of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the widget resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.offset_x = x;
        self.offset_y = y;
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn screen_to_plan(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.offset_x) / self.zoom,
            (screen_y - self.offset_y) / self.zoom,
        )
    }

    pub fn plan_to_screen(&self, point: &Point) -> (f64, f64) {
        (
            point.x * self.zoom + self.offset_x,
            point.y * self.zoom + self.offset_y,
        )
    }

    /// Converts a screen distance (e.g. a handle radius) to plan units.
    pub fn screen_distance_to_plan(&self, distance: f64) -> f64 {
        distance / self.zoom
    }

    /// Zooms to `zoom` keeping the plan point under `(screen_x, screen_y)` fixed.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, zoom: f64) {
        let anchor = self.screen_to_plan(screen_x, screen_y);
        self.set_zoom(zoom);
        self.offset_x = screen_x - anchor.x * self.zoom;
        self.offset_y = screen_y - anchor.y * self.zoom;
    }

    /// Centres the canvas on a plan point.
    pub fn center_on(&mut self, point: &Point) {
        self.offset_x = self.canvas_width / 2.0 - point.x * self.zoom;
        self.offset_y = self.canvas_height / 2.0 - point.y * self.zoom;
    }

    /// Fits `bounds` into the canvas leaving `padding` (fraction per side).
    pub fn fit_to_bounds(&mut self, bounds: &Bounds, padding: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let usable = (1.0 - padding * 2.0).max(0.1);
        let zoom_x = self.canvas_width * usable / bounds.width();
        let zoom_y = self.canvas_height * usable / bounds.height();
        self.set_zoom(zoom_x.min(zoom_y));
        self.center_on(&bounds.center());
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.0}% | Offset: ({:.1}, {:.1})",
            self.zoom * 100.0,
            self.offset_x,
            self.offset_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
