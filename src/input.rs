//! Input model: buttons, modifier keys, wheel deltas, and the gesture
//! state machine data.
//!
//! `Mode` is the single current interaction mode; each active variant
//! carries the transient context needed to compute incremental deltas.
//! That context exists only while the gesture is live and is discarded on
//! the transition back to `Idle`. The engine is the only component that
//! transitions modes or mutates state in response to these types.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::hit::{Rect, ResizeHandle};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// A keyboard key, named as reported by the browser (e.g. `"Delete"`,
/// `"Escape"`, `"ArrowLeft"`, `"w"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Direction for fast-insert adjacent duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The current interaction mode. At most one gesture is active at a time.
#[derive(Debug, Clone, Default)]
pub enum Mode {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas with the secondary button.
    Panning {
        /// Screen-space pointer position at the previous event, used to
        /// compute the pan delta.
        last_screen: Point,
    },
    /// The user is moving the selected items.
    DraggingItems {
        /// World-space pointer position where the drag started.
        origin_world: Point,
        /// The item used as the snap reference for the whole selection.
        primary_id: String,
        /// Each selected item's `(left, top)` at the start of the drag.
        start_positions: HashMap<String, Point>,
    },
    /// The user is sweeping out a selection rectangle over empty canvas.
    BoxSelecting {
        /// World-space corner where the sweep started.
        origin_world: Point,
        /// Current normalized selection rectangle (min corner + abs size).
        rect: Rect,
    },
    /// The user is resizing the single selected item by one of its eight
    /// handles.
    Resizing {
        /// Id of the item being resized.
        id: String,
        /// Which handle is being dragged.
        handle: ResizeHandle,
        /// The item's bounding box at the start of the resize.
        orig: Rect,
        /// World-space pointer position at the start of the resize.
        origin_world: Point,
    },
}

impl Mode {
    /// Whether no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
