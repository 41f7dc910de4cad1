//! Spatial queries: point/rect tests, z-ordered picking, viewport
//! culling, and resize-handle geometry.
//!
//! All tests here operate in world coordinates. Screen-constant sizes
//! (pointer slop, handle radius) are converted by the caller via
//! `px / zoom` so that hit targets keep a constant on-screen size
//! regardless of zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{HANDLE_RADIUS_PX, HIT_TOLERANCE_PX};
use crate::item::{CanvasItem, ShapeKind};

/// An axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Closed containment test (edges count as inside).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Open overlap test (shared edges do not count as overlap).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.right() <= other.x
            || self.x >= other.right()
            || self.bottom() <= other.y
            || self.y >= other.bottom())
    }
}

/// The item's world-space bounding box.
#[must_use]
pub fn item_bounds(item: &CanvasItem) -> Rect {
    Rect::new(item.left, item.top, item.width, item.height)
}

/// Normalized-distance containment test for an ellipse. Degenerate radii
/// contain nothing.
#[must_use]
pub fn point_in_ellipse(point: Point, cx: f64, cy: f64, rx: f64, ry: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (point.x - cx) / rx;
    let dy = (point.y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

/// Exact shape containment: AABB for rectangles, normalized distance for
/// ellipses.
#[must_use]
pub fn point_in_item(point: Point, item: &CanvasItem) -> bool {
    match item.kind {
        ShapeKind::Rectangle => item_bounds(item).contains(point),
        ShapeKind::Ellipse => point_in_ellipse(
            point,
            item.center_x(),
            item.center_y(),
            item.width / 2.0,
            item.height / 2.0,
        ),
    }
}

/// Containment with a world-space tolerance band around the shape.
#[must_use]
pub fn point_in_item_with_tolerance(point: Point, item: &CanvasItem, tolerance: f64) -> bool {
    match item.kind {
        ShapeKind::Rectangle => Rect::new(
            item.left - tolerance,
            item.top - tolerance,
            item.width + tolerance * 2.0,
            item.height + tolerance * 2.0,
        )
        .contains(point),
        ShapeKind::Ellipse => point_in_ellipse(
            point,
            item.center_x(),
            item.center_y(),
            item.width / 2.0 + tolerance,
            item.height / 2.0 + tolerance,
        ),
    }
}

/// Bounding-box overlap between a rectangle and an item. Ellipses use
/// their bounding box here; box-selection is intentionally box-accurate,
/// not shape-accurate.
#[must_use]
pub fn rect_intersects_item(rect: &Rect, item: &CanvasItem) -> bool {
    rect.intersects(&item_bounds(item))
}

/// All items whose bounding boxes overlap `rect`, in input order.
#[must_use]
pub fn find_in_rect<'a>(rect: &Rect, items: &[&'a CanvasItem]) -> Vec<&'a CanvasItem> {
    items.iter().copied().filter(|item| rect_intersects_item(rect, item)).collect()
}

/// Items at least partially inside the visible world rectangle. Items
/// touching the viewport edge still count as visible.
#[must_use]
pub fn visible_items<'a>(
    items: impl Iterator<Item = &'a CanvasItem>,
    viewport: &Rect,
) -> Vec<&'a CanvasItem> {
    items
        .filter(|item| {
            !(item.right() < viewport.x
                || item.left > viewport.right()
                || item.bottom() < viewport.y
                || item.top > viewport.bottom())
        })
        .collect()
}

/// Sort items into ascending draw order: explicit `z_index` first (items
/// without one sort as 0), insertion order as the stable tie-break. The
/// last element draws on top and is picked first by hit-testing.
#[must_use]
pub fn z_order<'a>(items: impl Iterator<Item = &'a CanvasItem>) -> Vec<&'a CanvasItem> {
    let mut ordered: Vec<&CanvasItem> = items.collect();
    ordered.sort_by_key(|item| item.z_index.unwrap_or(0));
    ordered
}

/// The topmost item under `point`, given items in ascending draw order.
///
/// Two passes: exact containment first, then a second pass with a pointer
/// tolerance of `2 px / zoom` so small items stay clickable when zoomed
/// out.
#[must_use]
pub fn find_top_item_at<'a>(
    point: Point,
    items_by_z: &[&'a CanvasItem],
    zoom: f64,
) -> Option<&'a CanvasItem> {
    if let Some(item) = items_by_z.iter().rev().find(|item| point_in_item(point, item)) {
        return Some(item);
    }
    let tolerance = HIT_TOLERANCE_PX / zoom;
    items_by_z
        .iter()
        .rev()
        .find(|item| point_in_item_with_tolerance(point, item, tolerance))
        .copied()
}

/// Compass position of a resize handle on an item's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl ResizeHandle {
    /// All eight handles in clockwise order from the top-left corner.
    pub const ALL: [Self; 8] = [
        Self::Nw,
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
    ];
}

/// World-space center of each resize handle for the given bounds.
#[must_use]
pub fn handle_positions(bounds: &Rect) -> [(ResizeHandle, Point); 8] {
    let cx = bounds.x + bounds.width / 2.0;
    let cy = bounds.y + bounds.height / 2.0;
    [
        (ResizeHandle::Nw, Point::new(bounds.x, bounds.y)),
        (ResizeHandle::N, Point::new(cx, bounds.y)),
        (ResizeHandle::Ne, Point::new(bounds.right(), bounds.y)),
        (ResizeHandle::E, Point::new(bounds.right(), cy)),
        (ResizeHandle::Se, Point::new(bounds.right(), bounds.bottom())),
        (ResizeHandle::S, Point::new(cx, bounds.bottom())),
        (ResizeHandle::Sw, Point::new(bounds.x, bounds.bottom())),
        (ResizeHandle::W, Point::new(bounds.x, cy)),
    ]
}

/// The resize handle under `point`, if any. Handles are squares with a
/// screen-constant half-size of `8 px / zoom`.
#[must_use]
pub fn find_handle_at(point: Point, item: &CanvasItem, zoom: f64) -> Option<ResizeHandle> {
    let radius = HANDLE_RADIUS_PX / zoom;
    handle_positions(&item_bounds(item))
        .into_iter()
        .find(|(_, pos)| (point.x - pos.x).abs() <= radius && (point.y - pos.y).abs() <= radius)
        .map(|(handle, _)| handle)
}
