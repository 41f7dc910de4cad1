//! Snapping: corrects a dragged item's candidate position to align with
//! neighboring items' edges and centers, with an optional grid fallback.
//!
//! The two axes are resolved independently. On each axis the nearest
//! alignment target within the threshold wins; exact-distance ties
//! resolve to the first target enumerated (stable in neighbor order).
//! The grid only applies to an axis that found no item-based snap.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::hit::Rect;
use crate::item::CanvasItem;

/// Alignment guide lines recorded during a snapped drag, consumed by the
/// renderer. Coordinates are world-space.
#[derive(Debug, Clone, Default)]
pub struct SnapGuides {
    /// X coordinates of vertical guide lines.
    pub vertical: Vec<f64>,
    /// Y coordinates of horizontal guide lines.
    pub horizontal: Vec<f64>,
}

impl SnapGuides {
    pub fn clear(&mut self) {
        self.vertical.clear();
        self.horizontal.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Outcome of a snap query for one candidate bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Corrected left edge (unchanged if no snap applied on that axis).
    pub left: f64,
    /// Corrected top edge.
    pub top: f64,
    /// Vertical guide line to display, when an item-based x snap landed.
    pub guide_x: Option<f64>,
    /// Horizontal guide line to display, when an item-based y snap landed.
    pub guide_y: Option<f64>,
}

/// One alignment target on an axis: the edge value the dragged box should
/// take, plus the world coordinate of the line both boxes align on.
#[derive(Debug, Clone, Copy)]
struct AxisTarget {
    pos: f64,
    guide: f64,
}

/// Compute the snapped position for a candidate bounding box against the
/// given neighbors (the caller excludes the dragged/selected items).
///
/// `grid` enables rounding an un-snapped axis to the nearest grid
/// multiple. Grid snaps produce no guide line.
#[must_use]
pub fn snap_position(
    candidate: &Rect,
    neighbors: &[&CanvasItem],
    threshold: f64,
    grid: Option<f64>,
) -> SnapResult {
    let mut x_targets = Vec::with_capacity(neighbors.len() * 5);
    let mut y_targets = Vec::with_capacity(neighbors.len() * 5);

    for other in neighbors {
        // Edge and center alignment, then touching (left-to-right,
        // right-to-left; top-to-bottom, bottom-to-top).
        x_targets.push(AxisTarget { pos: other.left, guide: other.left });
        x_targets.push(AxisTarget {
            pos: other.center_x() - candidate.width / 2.0,
            guide: other.center_x(),
        });
        x_targets.push(AxisTarget { pos: other.right() - candidate.width, guide: other.right() });
        x_targets.push(AxisTarget { pos: other.right(), guide: other.right() });
        x_targets.push(AxisTarget { pos: other.left - candidate.width, guide: other.left });

        y_targets.push(AxisTarget { pos: other.top, guide: other.top });
        y_targets.push(AxisTarget {
            pos: other.center_y() - candidate.height / 2.0,
            guide: other.center_y(),
        });
        y_targets.push(AxisTarget { pos: other.bottom() - candidate.height, guide: other.bottom() });
        y_targets.push(AxisTarget { pos: other.bottom(), guide: other.bottom() });
        y_targets.push(AxisTarget { pos: other.top - candidate.height, guide: other.top });
    }

    let x_snap = nearest_target(candidate.x, &x_targets, threshold);
    let y_snap = nearest_target(candidate.y, &y_targets, threshold);

    let mut left = x_snap.map_or(candidate.x, |t| t.pos);
    let mut top = y_snap.map_or(candidate.y, |t| t.pos);

    if let Some(grid_size) = grid
        && grid_size > 0.0
    {
        if x_snap.is_none() {
            left = (left / grid_size).round() * grid_size;
        }
        if y_snap.is_none() {
            top = (top / grid_size).round() * grid_size;
        }
    }

    SnapResult {
        left,
        top,
        guide_x: x_snap.map(|t| t.guide),
        guide_y: y_snap.map(|t| t.guide),
    }
}

/// Round a single coordinate to the nearest grid multiple.
#[must_use]
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size > 0.0 {
        (value / grid_size).round() * grid_size
    } else {
        value
    }
}

/// The closest target within `threshold` of `value`. Strictly-closer
/// wins; at equal distance the earlier target is kept.
fn nearest_target(value: f64, targets: &[AxisTarget], threshold: f64) -> Option<AxisTarget> {
    let mut best: Option<AxisTarget> = None;
    let mut best_dist = threshold + 1.0;
    for target in targets {
        let dist = (value - target.pos).abs();
        if dist <= threshold && dist < best_dist {
            best_dist = dist;
            best = Some(*target);
        }
    }
    best
}
