#![allow(clippy::float_cmp)]

use super::*;

fn item(id: &str, left: f64, top: f64, width: f64, height: f64) -> CanvasItem {
    CanvasItem {
        id: id.to_owned(),
        left,
        top,
        width,
        height,
        kind: crate::item::ShapeKind::Rectangle,
        fill_color: String::new(),
        box_code: String::new(),
        equip_id: String::new(),
        box_name: String::new(),
        show_name: String::new(),
        z_index: None,
    }
}

const THRESHOLD: f64 = 10.0;

// --- Edge alignment ---

#[test]
fn snaps_left_edge_to_neighbor_left_edge() {
    let neighbor = item("n", 100.0, 0.0, 40.0, 40.0);
    let candidate = Rect::new(96.0, 200.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 100.0);
    assert_eq!(result.guide_x, Some(100.0));
    // Y is far from everything and stays put.
    assert_eq!(result.top, 200.0);
    assert_eq!(result.guide_y, None);
}

#[test]
fn snaps_right_edge_to_neighbor_right_edge() {
    let neighbor = item("n", 100.0, 0.0, 40.0, 40.0);
    // Candidate right edge at 138, neighbor right edge at 140.
    let candidate = Rect::new(98.0, 200.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 100.0);
}

#[test]
fn snaps_top_edge_to_neighbor_top_edge() {
    let neighbor = item("n", 0.0, 50.0, 40.0, 40.0);
    let candidate = Rect::new(300.0, 53.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.top, 50.0);
    assert_eq!(result.guide_y, Some(50.0));
}

// --- Center alignment ---

#[test]
fn snaps_centers_on_x() {
    let neighbor = item("n", 100.0, 0.0, 40.0, 40.0); // center_x = 120
    let candidate = Rect::new(103.0, 200.0, 30.0, 30.0); // center would be 118
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 105.0); // 120 - 30/2
    assert_eq!(result.guide_x, Some(120.0));
}

// --- Touching ---

#[test]
fn snaps_to_touch_neighbor_right_edge() {
    let neighbor = item("n", 0.0, 0.0, 40.0, 40.0);
    // Dropping just short of touching: left edge to neighbor right (40).
    // Offset by 60 on y so edge alignments there don't interfere.
    let candidate = Rect::new(43.0, 100.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 40.0);
    assert_eq!(result.guide_x, Some(40.0));
}

#[test]
fn snaps_to_touch_neighbor_left_edge() {
    let neighbor = item("n", 200.0, 0.0, 40.0, 40.0);
    // Candidate right edge near neighbor left edge (200).
    let candidate = Rect::new(163.0, 100.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 160.0);
    assert_eq!(result.guide_x, Some(200.0));
}

#[test]
fn drag_toward_neighbor_lands_flush() {
    // Two 40x40 items: one at 0, the dragged one released at 38 overlaps
    // slightly and must land flush at 40, not on top of the neighbor.
    let neighbor = item("n", 0.0, 0.0, 40.0, 40.0);
    let candidate = Rect::new(38.0, 0.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 40.0);
    assert_eq!(result.top, 0.0);
}

// --- Threshold ---

#[test]
fn snap_at_exact_threshold_applies() {
    let neighbor = item("n", 100.0, 0.0, 40.0, 40.0);
    let candidate = Rect::new(110.0, 300.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 100.0);
}

#[test]
fn snap_beyond_threshold_does_not_apply() {
    let neighbor = item("n", 100.0, 0.0, 40.0, 40.0);
    let candidate = Rect::new(111.0, 300.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, None);
    assert_eq!(result.left, 111.0);
    assert_eq!(result.guide_x, None);
}

#[test]
fn equal_distance_tie_goes_to_first_neighbor() {
    let first = item("first", 100.0, 0.0, 40.0, 40.0);
    let second = item("second", 108.0, 300.0, 40.0, 40.0);
    // Candidate left at 104: 4 units from both neighbors' left edges.
    let candidate = Rect::new(104.0, 600.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&first, &second], THRESHOLD, None);
    assert_eq!(result.left, 100.0);
}

// --- Axis independence ---

#[test]
fn axes_snap_independently() {
    let x_neighbor = item("x", 100.0, 1000.0, 40.0, 40.0);
    let y_neighbor = item("y", 1000.0, 50.0, 40.0, 40.0);
    let candidate = Rect::new(97.0, 53.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&x_neighbor, &y_neighbor], THRESHOLD, None);
    assert_eq!(result.left, 100.0);
    assert_eq!(result.top, 50.0);
    assert_eq!(result.guide_x, Some(100.0));
    assert_eq!(result.guide_y, Some(50.0));
}

// --- Grid fallback ---

#[test]
fn grid_applies_only_to_unsnapped_axis() {
    let neighbor = item("n", 100.0, 1000.0, 40.0, 40.0);
    // X snaps to the neighbor; y has no item snap and rounds to the grid.
    let candidate = Rect::new(97.0, 53.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[&neighbor], THRESHOLD, Some(50.0));
    assert_eq!(result.left, 100.0);
    assert_eq!(result.top, 50.0);
    assert_eq!(result.guide_y, None);
}

#[test]
fn grid_rounds_to_nearest_multiple() {
    let candidate = Rect::new(53.0, 77.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[], THRESHOLD, Some(50.0));
    assert_eq!(result.left, 50.0);
    assert_eq!(result.top, 100.0);
}

#[test]
fn no_grid_and_no_neighbors_leaves_position_unchanged() {
    let candidate = Rect::new(53.0, 77.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[], THRESHOLD, None);
    assert_eq!(result.left, 53.0);
    assert_eq!(result.top, 77.0);
    assert_eq!(result.guide_x, None);
    assert_eq!(result.guide_y, None);
}

#[test]
fn zero_grid_size_is_ignored() {
    let candidate = Rect::new(53.0, 77.0, 40.0, 40.0);
    let result = snap_position(&candidate, &[], THRESHOLD, Some(0.0));
    assert_eq!(result.left, 53.0);
}

// --- snap_to_grid ---

#[test]
fn snap_to_grid_rounds_half_up() {
    assert_eq!(snap_to_grid(25.0, 50.0), 50.0);
    assert_eq!(snap_to_grid(24.9, 50.0), 0.0);
    assert_eq!(snap_to_grid(-25.0, 50.0), -50.0);
}

#[test]
fn snap_to_grid_disabled_for_non_positive_size() {
    assert_eq!(snap_to_grid(33.0, 0.0), 33.0);
    assert_eq!(snap_to_grid(33.0, -5.0), 33.0);
}

// --- SnapGuides ---

#[test]
fn guides_clear_and_is_empty() {
    let mut guides = SnapGuides::default();
    assert!(guides.is_empty());
    guides.vertical.push(10.0);
    guides.horizontal.push(20.0);
    assert!(!guides.is_empty());
    guides.clear();
    assert!(guides.is_empty());
}
