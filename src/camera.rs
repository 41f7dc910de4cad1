#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM, STEP_ZOOM_FACTOR};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sparse camera update applied via [`Camera::apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraPatch {
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
    pub zoom: Option<f64>,
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in screen pixels, `zoom` is a scale factor
/// clamped to `[MIN_ZOOM, MAX_ZOOM]`. The transform convention is
/// `screen = world * zoom + pan` everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Translate the camera by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan_x += delta.x;
        self.pan_y += delta.y;
    }

    /// Multiply the zoom by `factor`, keeping the world point under the
    /// screen-space `anchor` fixed.
    ///
    /// Non-finite or non-positive factors are rejected as no-ops, as is a
    /// factor whose clamped result equals the current zoom.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if !new_zoom.is_finite() || new_zoom <= 0.0 || new_zoom == self.zoom {
            return;
        }

        let world = self.screen_to_world(anchor);
        self.zoom = new_zoom;
        self.pan_x = anchor.x - world.x * new_zoom;
        self.pan_y = anchor.y - world.y * new_zoom;
    }

    /// Step zoom in, anchored at the given viewport center.
    pub fn zoom_in_step(&mut self, viewport_center: Point) {
        self.zoom_at(viewport_center, STEP_ZOOM_FACTOR);
    }

    /// Step zoom out, anchored at the given viewport center.
    pub fn zoom_out_step(&mut self, viewport_center: Point) {
        self.zoom_at(viewport_center, 1.0 / STEP_ZOOM_FACTOR);
    }

    /// Restore the origin pan and 1.0 zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply a sparse update. Zoom values are clamped to the valid range;
    /// non-finite components are ignored.
    pub fn apply(&mut self, patch: CameraPatch) {
        if let Some(x) = patch.pan_x
            && x.is_finite()
        {
            self.pan_x = x;
        }
        if let Some(y) = patch.pan_y
            && y.is_finite()
        {
            self.pan_y = y;
        }
        if let Some(z) = patch.zoom
            && z.is_finite()
            && z > 0.0
        {
            self.zoom = z.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }
}
