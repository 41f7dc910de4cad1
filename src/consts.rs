//! Shared numeric constants for the layout canvas engine.

// ── Camera ──────────────────────────────────────────────────────

/// Lower bound for the camera zoom factor.
pub const MIN_ZOOM: f64 = 0.2;

/// Upper bound for the camera zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Multiplicative zoom step for the toolbar zoom-in/out buttons,
/// anchored at the viewport center.
pub const STEP_ZOOM_FACTOR: f64 = 1.2;

/// Multiplicative zoom step per wheel notch, anchored at the pointer.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;

// ── Geometry ────────────────────────────────────────────────────

/// Minimum item width/height in world units; resize clamps here.
pub const MIN_ITEM_SIZE: f64 = 10.0;

/// Neighbor-alignment snap threshold in world units.
pub const SNAP_THRESHOLD: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space pointer slop in pixels for the second, tolerant hit pass.
pub const HIT_TOLERANCE_PX: f64 = 2.0;

/// Screen-space half-size in pixels of a resize handle's hit square.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// A box-selection rectangle must exceed this size on both axes
/// (world units) before it selects anything.
pub const BOX_SELECT_MIN_SIZE: f64 = 3.0;

// ── Keyboard ────────────────────────────────────────────────────

/// Arrow-key nudge distance in world units.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_SHIFT: f64 = 10.0;

// ── Rendering ───────────────────────────────────────────────────

/// Label font size in screen pixels (divided by zoom when drawing).
pub const BASE_FONT_PX: f64 = 12.0;

/// Dash segment length in screen pixels for selection and guide lines.
pub const DASH_PX: f64 = 5.0;

/// Grid line color and opacity.
pub const GRID_COLOR: &str = "#aaaaaa";
pub const GRID_ALPHA: f64 = 0.2;

/// Item stroke colors.
pub const STROKE_COLOR: &str = "#000000";
pub const STROKE_COLOR_SELECTED: &str = "#0000ff";

/// Box-selection rectangle colors.
pub const SELECTION_STROKE: &str = "#0066cc";
pub const SELECTION_FILL: &str = "rgba(0, 102, 204, 0.1)";

/// Snap-alignment guide line color.
pub const GUIDE_COLOR: &str = "#FF0000";

/// Resize handle fill and outline.
pub const HANDLE_FILL: &str = "#ffffff";
pub const HANDLE_STROKE: &str = "#0066cc";
