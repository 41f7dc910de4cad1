//! Canvas spatial-interaction engine for the 2D layout editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns
//! the full lifecycle of the editing canvas: translating raw DOM input
//! events into item mutations, maintaining camera state for pan/zoom,
//! hit-testing items and resize handles, snapping dragged items to their
//! neighbors and the grid, and rendering the scene into a double-buffered
//! canvas. The host layer is responsible only for wiring DOM events to
//! the engine and persisting documents through the JSON interchange
//! helpers in [`item`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`item`] | Canvas item types, the insertion-ordered store, selection |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing, z-order, culling, resize-handle geometry |
//! | [`snap`] | Neighbor-alignment and grid snapping |
//! | [`settings`] | Host-provided editor settings |
//! | [`render`] | Scene rendering and the frame loop |
//! | [`consts`] | Shared numeric constants (zoom limits, thresholds, colors) |

pub mod camera;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod item;
pub mod render;
pub mod settings;
pub mod snap;
