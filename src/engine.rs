//! Top-level engine: the interaction state machine and the external
//! read/write contract.
//!
//! [`EngineCore`] owns every piece of mutable editor state — item store,
//! selection, camera, settings, interaction mode — and is the only
//! component that mutates any of them in response to input. It has no
//! browser dependency and is tested natively. [`Engine`] wraps a core
//! together with the visible canvas element and an off-screen buffer and
//! adds drawing on top.
//!
//! Everything here runs single-threaded and synchronously inside event
//! handlers or the frame callback; readers (renderer, property panels)
//! never observe a half-applied mutation.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use crate::camera::{Camera, CameraPatch, Point};
use crate::consts::{BOX_SELECT_MIN_SIZE, MIN_ITEM_SIZE, NUDGE_STEP, NUDGE_STEP_SHIFT, SNAP_THRESHOLD, WHEEL_ZOOM_FACTOR};
use crate::hit::{self, Rect, ResizeHandle};
use crate::input::{Button, Direction, Key, Mode, Modifiers, WheelDelta};
use crate::item::{self, CanvasItem, ImportError, ItemStore, PartialItem, Selection};
use crate::render;
use crate::settings::{Settings, SettingsPatch};
use crate::snap::{self, SnapGuides};

/// Core engine state — all logic that doesn't depend on the canvas
/// element. Separated from [`Engine`] so it can be tested without
/// WASM/browser dependencies.
pub struct EngineCore {
    pub store: ItemStore,
    pub selection: Selection,
    pub camera: Camera,
    pub settings: Settings,
    pub mode: Mode,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    guides: SnapGuides,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: ItemStore::new(),
            selection: Selection::new(),
            camera: Camera::default(),
            settings: Settings::default(),
            mode: Mode::Idle,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            guides: SnapGuides::default(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        if width.is_finite() && height.is_finite() {
            self.viewport_width = width.max(0.0);
            self.viewport_height = height.max(0.0);
        }
        if dpr.is_finite() && dpr > 0.0 {
            self.dpr = dpr;
        }
    }

    /// Screen-space center of the viewport.
    #[must_use]
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// The world rectangle currently visible through the camera.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        let top_left = self.camera.screen_to_world(Point::new(0.0, 0.0));
        Rect::new(
            top_left.x,
            top_left.y,
            self.viewport_width / self.camera.zoom,
            self.viewport_height / self.camera.zoom,
        )
    }

    /// Alignment guides recorded by the current drag, if any.
    #[must_use]
    pub fn guides(&self) -> &SnapGuides {
        &self.guides
    }

    // --- External contract: items ---

    /// Snapshot of all items.
    #[must_use]
    pub fn get_all_items(&self) -> Vec<CanvasItem> {
        self.store.all()
    }

    /// Snapshot of the selected live items.
    #[must_use]
    pub fn get_selected_items(&self) -> Vec<CanvasItem> {
        self.selection.selected_items(&self.store).into_iter().cloned().collect()
    }

    /// Insert an item (id assigned when absent). Returns the final id.
    pub fn insert_item(&mut self, item: CanvasItem) -> String {
        self.store.insert(item)
    }

    /// Merge fields into one item; unknown ids are a no-op.
    pub fn update_item(&mut self, id: &str, fields: &PartialItem) {
        self.store.update(id, fields);
    }

    /// Merge the same fields into many items as one transition.
    pub fn update_items(&mut self, ids: &[String], fields: &PartialItem) {
        self.store.update_many(ids, fields);
    }

    /// Remove items and drop them from the selection.
    pub fn remove_items(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        self.store.remove_many(ids);
        for id in ids {
            self.selection.remove(id);
        }
    }

    /// Replace the whole document. All-or-nothing: an invalid payload
    /// leaves the store, selection and id counter untouched. On success
    /// the selection is emptied and the id counter re-derived from the
    /// maximum numeric id present.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the item set fails [`item::validate_items`].
    pub fn set_all_items(&mut self, items: Vec<CanvasItem>) -> Result<(), ImportError> {
        if let Err(err) = item::validate_items(&items) {
            log::warn!("rejected document import: {err}");
            return Err(err);
        }
        self.store.set_all(items);
        self.selection.clear();
        self.mode = Mode::Idle;
        self.guides.clear();
        log::debug!("document replaced, {} items", self.store.len());
        Ok(())
    }

    // --- External contract: selection ---

    pub fn select_item(&mut self, id: &str, additive: bool) {
        self.selection.select(id, additive);
    }

    pub fn select_items(&mut self, ids: Vec<String>) {
        self.selection.select_many(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- External contract: camera ---

    #[must_use]
    pub fn get_camera(&self) -> Camera {
        self.camera
    }

    /// Apply a sparse camera update (zoom clamped as usual).
    pub fn set_camera(&mut self, patch: CameraPatch) {
        self.camera.apply(patch);
    }

    /// Select an item and re-center the camera on it at the current zoom.
    /// Unknown ids are a no-op.
    pub fn focus_on(&mut self, id: &str) {
        let Some(item) = self.store.get(id) else {
            return;
        };
        let center_x = item.center_x();
        let center_y = item.center_y();
        self.selection.select(id, false);
        let zoom = self.camera.zoom;
        self.camera.pan_x = self.viewport_width / 2.0 - center_x * zoom;
        self.camera.pan_y = self.viewport_height / 2.0 - center_y * zoom;
    }

    /// Toolbar zoom in, anchored at the viewport center.
    pub fn zoom_in(&mut self) {
        let center = self.viewport_center();
        self.camera.zoom_in_step(center);
    }

    /// Toolbar zoom out, anchored at the viewport center.
    pub fn zoom_out(&mut self) {
        let center = self.viewport_center();
        self.camera.zoom_out_step(center);
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    // --- Settings ---

    /// Merge a host settings update.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
    }

    // --- Pointer events ---

    /// Pointer-down: starts a pan (secondary button), a resize (handle of
    /// the single selected item), a drag (over an item), or a box-select
    /// (over empty canvas).
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) {
        if matches!(self.mode, Mode::Resizing { .. }) {
            return;
        }
        if button == Button::Secondary {
            self.mode = Mode::Panning { last_screen: screen };
            return;
        }
        if button != Button::Primary {
            return;
        }

        let world = self.camera.screen_to_world(screen);

        // Resize handles take priority when exactly one item is selected.
        let selected = self.selection.selected_items(&self.store);
        if let [single] = selected[..]
            && let Some(handle) = hit::find_handle_at(world, single, self.camera.zoom)
        {
            self.mode = Mode::Resizing {
                id: single.id.clone(),
                handle,
                orig: hit::item_bounds(single),
                origin_world: world,
            };
            return;
        }

        let by_z = hit::z_order(self.store.iter());
        let hit_id = hit::find_top_item_at(world, &by_z, self.camera.zoom).map(|i| i.id.clone());

        match hit_id {
            Some(id) => {
                if modifiers.ctrl || modifiers.meta {
                    self.selection.select(&id, true);
                } else if !self.selection.contains(&id) {
                    self.selection.select(&id, false);
                }

                let selected = self.selection.selected_items(&self.store);
                if selected.is_empty() {
                    // Additive toggle removed the last selected item;
                    // nothing left to drag.
                    return;
                }
                let primary_id = if self.selection.contains(&id) {
                    id
                } else {
                    selected[0].id.clone()
                };
                let start_positions = selected
                    .iter()
                    .map(|item| (item.id.clone(), Point::new(item.left, item.top)))
                    .collect();
                self.mode = Mode::DraggingItems { origin_world: world, primary_id, start_positions };
            }
            None => {
                self.selection.clear();
                self.mode = Mode::BoxSelecting {
                    origin_world: world,
                    rect: Rect::new(world.x, world.y, 0.0, 0.0),
                };
            }
        }
    }

    /// Pointer-move: advances whichever gesture is active.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) {
        match &self.mode {
            Mode::Idle => {}
            Mode::Panning { last_screen } => {
                let delta = Point::new(screen.x - last_screen.x, screen.y - last_screen.y);
                self.camera.pan_by(delta);
                self.mode = Mode::Panning { last_screen: screen };
            }
            Mode::DraggingItems { origin_world, primary_id, start_positions } => {
                let origin = *origin_world;
                let primary = primary_id.clone();
                let starts: Vec<(String, Point)> =
                    start_positions.iter().map(|(id, p)| (id.clone(), *p)).collect();
                let world = self.camera.screen_to_world(screen);
                self.drag_items_by(&primary, &starts, world.x - origin.x, world.y - origin.y);
            }
            Mode::BoxSelecting { origin_world, .. } => {
                let origin = *origin_world;
                let world = self.camera.screen_to_world(screen);
                let rect = Rect::new(
                    origin.x.min(world.x),
                    origin.y.min(world.y),
                    (world.x - origin.x).abs(),
                    (world.y - origin.y).abs(),
                );
                self.mode = Mode::BoxSelecting { origin_world: origin, rect };
            }
            Mode::Resizing { id, handle, orig, origin_world } => {
                let id = id.clone();
                let (handle, orig, origin) = (*handle, *orig, *origin_world);
                let world = self.camera.screen_to_world(screen);
                self.resize_item_to(&id, handle, &orig, world.x - origin.x, world.y - origin.y);
            }
        }
    }

    /// Pointer-up: commits or discards the active gesture and returns to
    /// idle. Box-selection applies only when the swept rectangle exceeds
    /// the minimum size on both axes.
    pub fn on_pointer_up(&mut self, _screen: Point, _button: Button) {
        match std::mem::take(&mut self.mode) {
            Mode::Idle => {}
            Mode::Panning { .. } | Mode::Resizing { .. } => {}
            Mode::DraggingItems { .. } => {
                self.guides.clear();
            }
            Mode::BoxSelecting { rect, .. } => {
                if rect.width > BOX_SELECT_MIN_SIZE && rect.height > BOX_SELECT_MIN_SIZE {
                    let items: Vec<&CanvasItem> = self.store.iter().collect();
                    let ids: Vec<String> = hit::find_in_rect(&rect, &items)
                        .iter()
                        .map(|item| item.id.clone())
                        .collect();
                    if !ids.is_empty() {
                        self.selection.select_many(ids);
                    }
                }
            }
        }
    }

    /// Wheel: zoom toward the pointer. Does not change the interaction
    /// mode.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) {
        let factor = if delta.dy < 0.0 { WHEEL_ZOOM_FACTOR } else { 1.0 / WHEEL_ZOOM_FACTOR };
        self.camera.zoom_at(screen, factor);
    }

    // --- Keyboard events ---

    /// Keyboard handler. The host must not forward events while a text
    /// input has focus; the engine assumes every key it sees is meant for
    /// the canvas.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) {
        let step = if modifiers.shift { NUDGE_STEP_SHIFT } else { NUDGE_STEP };
        match key.0.as_str() {
            "Delete" => {
                let ids: Vec<String> = self.selection.ids().iter().cloned().collect();
                self.remove_items(&ids);
            }
            "Escape" => {
                self.mode = Mode::Idle;
                self.guides.clear();
                self.selection.clear();
            }
            "ArrowLeft" => self.nudge_selected(-step, 0.0),
            "ArrowRight" => self.nudge_selected(step, 0.0),
            "ArrowUp" => self.nudge_selected(0.0, -step),
            "ArrowDown" => self.nudge_selected(0.0, step),
            "w" | "W" => self.fast_insert(Direction::Up),
            "a" | "A" => self.fast_insert(Direction::Left),
            "s" | "S" => self.fast_insert(Direction::Down),
            "d" | "D" => self.fast_insert(Direction::Right),
            _ => {}
        }
    }

    /// Clone an item next to its source, offset by exactly one item
    /// width/height in the given direction, and select the clone.
    /// Returns the new id, or `None` for an unknown source.
    pub fn add_adjacent_item(&mut self, source_id: &str, direction: Direction) -> Option<String> {
        let source = self.store.get(source_id)?.clone();
        let (left, top) = match direction {
            Direction::Up => (source.left, source.top - source.height),
            Direction::Down => (source.left, source.top + source.height),
            Direction::Left => (source.left - source.width, source.top),
            Direction::Right => (source.left + source.width, source.top),
        };
        let clone = CanvasItem { id: String::new(), left, top, ..source };
        let id = self.store.insert(clone);
        self.selection.select(&id, false);
        Some(id)
    }

    // --- Gesture internals ---

    fn drag_items_by(&mut self, primary_id: &str, starts: &[(String, Point)], dx: f64, dy: f64) {
        self.guides.clear();
        let mut snap_dx = 0.0;
        let mut snap_dy = 0.0;

        if self.settings.auto_snap
            && let Some(primary) = self.store.get(primary_id)
            && let Some((_, start)) = starts.iter().find(|(id, _)| id == primary_id)
        {
            let candidate = Rect::new(start.x + dx, start.y + dy, primary.width, primary.height);
            let neighbors: Vec<&CanvasItem> = self
                .store
                .iter()
                .filter(|item| !self.selection.contains(&item.id))
                .collect();
            let grid = (self.settings.snap_to_grid && self.settings.grid_size > 0.0)
                .then_some(self.settings.grid_size);
            let result = snap::snap_position(&candidate, &neighbors, SNAP_THRESHOLD, grid);
            snap_dx = result.left - candidate.x;
            snap_dy = result.top - candidate.y;
            if let Some(x) = result.guide_x {
                self.guides.vertical.push(x);
            }
            if let Some(y) = result.guide_y {
                self.guides.horizontal.push(y);
            }
        }

        let updates: Vec<(String, PartialItem)> = starts
            .iter()
            .map(|(id, start)| {
                (id.clone(), PartialItem::at(start.x + dx + snap_dx, start.y + dy + snap_dy))
            })
            .collect();
        self.store.batch_update(&updates);
    }

    fn resize_item_to(&mut self, id: &str, handle: ResizeHandle, orig: &Rect, dx: f64, dy: f64) {
        let mut left = orig.x;
        let mut top = orig.y;
        let mut width = orig.width;
        let mut height = orig.height;

        match handle {
            ResizeHandle::Nw => {
                left += dx;
                top += dy;
                width -= dx;
                height -= dy;
            }
            ResizeHandle::N => {
                top += dy;
                height -= dy;
            }
            ResizeHandle::Ne => {
                top += dy;
                width += dx;
                height -= dy;
            }
            ResizeHandle::E => {
                width += dx;
            }
            ResizeHandle::Se => {
                width += dx;
                height += dy;
            }
            ResizeHandle::S => {
                height += dy;
            }
            ResizeHandle::Sw => {
                left += dx;
                width -= dx;
                height += dy;
            }
            ResizeHandle::W => {
                left += dx;
                width -= dx;
            }
        }

        // Clamp to the minimum size by moving only the dragged edge; the
        // opposite edge stays fixed.
        if width < MIN_ITEM_SIZE {
            if matches!(handle, ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw) {
                left = orig.x + orig.width - MIN_ITEM_SIZE;
            }
            width = MIN_ITEM_SIZE;
        }
        if height < MIN_ITEM_SIZE {
            if matches!(handle, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne) {
                top = orig.y + orig.height - MIN_ITEM_SIZE;
            }
            height = MIN_ITEM_SIZE;
        }

        let fields = PartialItem {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
            ..PartialItem::default()
        };
        self.store.update(id, &fields);
    }

    fn nudge_selected(&mut self, dx: f64, dy: f64) {
        let grid_snap = self.settings.snap_to_grid && self.settings.grid_size > 0.0;
        let grid = self.settings.grid_size;
        let updates: Vec<(String, PartialItem)> = self
            .selection
            .selected_items(&self.store)
            .iter()
            .map(|item| {
                let mut left = item.left + dx;
                let mut top = item.top + dy;
                if grid_snap {
                    left = snap::snap_to_grid(left, grid);
                    top = snap::snap_to_grid(top, grid);
                }
                (item.id.clone(), PartialItem::at(left, top))
            })
            .collect();
        self.store.batch_update(&updates);
    }

    fn fast_insert(&mut self, direction: Direction) {
        if !self.settings.fast_mode {
            return;
        }
        let selected = self.selection.selected_items(&self.store);
        let [source] = selected[..] else {
            return;
        };
        let source_id = source.id.clone();
        self.add_adjacent_item(&source_id, direction);
    }
}

/// The full canvas engine. Wraps [`EngineCore`] and owns the visible
/// canvas element plus the off-screen buffer it composes frames into.
pub struct Engine {
    canvas: HtmlCanvasElement,
    buffer: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the off-screen buffer canvas cannot be created.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let buffer = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("buffer element is not a canvas"))?;
        Ok(Self { canvas, buffer, core: EngineCore::new() })
    }

    // --- Delegated input events ---

    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        self.core.set_viewport(width, height, dpr);
    }

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) {
        self.core.on_pointer_down(screen, button, modifiers);
    }

    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        self.core.on_pointer_move(screen, modifiers);
    }

    pub fn on_pointer_up(&mut self, screen: Point, button: Button) {
        self.core.on_pointer_up(screen, button);
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) {
        self.core.on_wheel(screen, delta);
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) {
        self.core.on_key_down(key, modifiers);
    }

    // --- Render ---

    /// Compose the current frame into the off-screen buffer, then blit it
    /// to the visible canvas. A zero-sized viewport skips the frame.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let core = &self.core;
        if core.viewport_width <= 0.0 || core.viewport_height <= 0.0 {
            return Ok(());
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px_w = (core.viewport_width * core.dpr) as u32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px_h = (core.viewport_height * core.dpr) as u32;
        if px_w == 0 || px_h == 0 {
            return Ok(());
        }
        for canvas in [&self.buffer, &self.canvas] {
            if canvas.width() != px_w {
                canvas.set_width(px_w);
            }
            if canvas.height() != px_h {
                canvas.set_height(px_h);
            }
        }

        let buffer_ctx = render::context_2d(&self.buffer)?;
        render::draw(&buffer_ctx, core)?;

        let ctx = render::context_2d(&self.canvas)?;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, f64::from(px_w), f64::from(px_h));
        ctx.draw_image_with_html_canvas_element(&self.buffer, 0.0, 0.0)?;
        Ok(())
    }
}
