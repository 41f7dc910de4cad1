//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only view of engine state and produces pixels — it
//! does not mutate any application state.
//!
//! Frame composition order: clear, camera transform, grid, items in
//! z-order (labels included), box-selection rectangle, snap guides,
//! resize handles. All fallible `Canvas2D` calls propagate errors via
//! `Result<(), JsValue>`; the top-level caller
//! ([`crate::engine::Engine::render`]) handles the result.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{
    BASE_FONT_PX, DASH_PX, GRID_ALPHA, GRID_COLOR, GUIDE_COLOR, HANDLE_FILL, HANDLE_RADIUS_PX,
    HANDLE_STROKE, SELECTION_FILL, SELECTION_STROKE, STROKE_COLOR, STROKE_COLOR_SELECTED,
};
use crate::engine::{Engine, EngineCore};
use crate::hit::{self, Rect};
use crate::input::Mode;
use crate::item::{CanvasItem, ShapeKind};
use crate::settings::Settings;

/// Obtain the 2D context for a canvas element.
///
/// # Errors
///
/// Returns `Err` when the element has no 2D context.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("unexpected rendering context type"))
}

/// Draw the full scene for the current engine state.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let camera = core.camera;

    // Layer 1: clear and set up transforms.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    let view = core.visible_world_rect();

    // Layer 2: grid.
    if core.settings.grid_size > 0.0 {
        draw_grid(ctx, &view, core.settings.grid_size, camera.zoom)?;
    }

    // Layer 3: visible items in z-order (bottom first).
    let visible = hit::visible_items(core.store.iter(), &view);
    for item in hit::z_order(visible.into_iter()) {
        let selected = core.selection.contains(&item.id);
        draw_item(ctx, item, selected, camera.zoom, &core.settings)?;
    }

    // Layer 4: interaction UI.
    if let Mode::BoxSelecting { rect, .. } = &core.mode {
        draw_selection_rect(ctx, rect, camera.zoom)?;
    }
    if !core.guides().is_empty() {
        draw_guides(ctx, core, &view)?;
    }
    if let [single] = core.selection.selected_items(&core.store)[..] {
        draw_handles(ctx, &hit::item_bounds(single), camera.zoom)?;
    }

    Ok(())
}

// =============================================================
// Grid
// =============================================================

fn draw_grid(
    ctx: &CanvasRenderingContext2d,
    view: &Rect,
    grid_size: f64,
    zoom: f64,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_global_alpha(GRID_ALPHA);
    ctx.set_line_width(1.0 / zoom);

    let start_x = (view.x / grid_size).floor() * grid_size;
    let start_y = (view.y / grid_size).floor() * grid_size;

    ctx.begin_path();
    let mut x = start_x;
    while x <= view.right() {
        ctx.move_to(x, view.y);
        ctx.line_to(x, view.bottom());
        x += grid_size;
    }
    let mut y = start_y;
    while y <= view.bottom() {
        ctx.move_to(view.x, y);
        ctx.line_to(view.right(), y);
        y += grid_size;
    }
    ctx.stroke();

    ctx.restore();
    Ok(())
}

// =============================================================
// Items
// =============================================================

fn draw_item(
    ctx: &CanvasRenderingContext2d,
    item: &CanvasItem,
    selected: bool,
    zoom: f64,
    settings: &Settings,
) -> Result<(), JsValue> {
    let (stroke, line_width) = if selected {
        (STROKE_COLOR_SELECTED, 2.0 / zoom)
    } else {
        (STROKE_COLOR, 1.0 / zoom)
    };

    ctx.set_fill_style_str(&item.fill_color);
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(line_width);

    ctx.begin_path();
    match item.kind {
        ShapeKind::Rectangle => {
            ctx.rect(item.left, item.top, item.width, item.height);
        }
        ShapeKind::Ellipse => {
            ctx.ellipse(
                item.center_x(),
                item.center_y(),
                item.width / 2.0,
                item.height / 2.0,
                0.0,
                0.0,
                2.0 * PI,
            )?;
        }
    }
    ctx.fill();
    ctx.stroke();

    draw_labels(ctx, item, zoom, settings)
}

/// Enabled, non-empty labels stacked at even vertical intervals inside
/// the item. Text keeps a constant on-screen size and is clipped to the
/// item width.
fn draw_labels(
    ctx: &CanvasRenderingContext2d,
    item: &CanvasItem,
    zoom: f64,
    settings: &Settings,
) -> Result<(), JsValue> {
    let labels: Vec<&str> = [
        (settings.show_box_code, item.box_code.as_str()),
        (settings.show_equip_id, item.equip_id.as_str()),
        (settings.show_box_name, item.box_name.as_str()),
    ]
    .iter()
    .filter(|(enabled, text)| *enabled && !text.is_empty())
    .map(|(_, text)| *text)
    .collect();

    if labels.is_empty() {
        return Ok(());
    }

    #[allow(clippy::cast_precision_loss)]
    let spacing = item.height / (labels.len() as f64 + 1.0);
    let font_size = BASE_FONT_PX / zoom;

    ctx.save();
    ctx.set_fill_style_str(STROKE_COLOR);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{font_size}px Arial"));

    for (idx, text) in labels.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = item.top + spacing * (idx as f64 + 1.0);
        ctx.fill_text_with_max_width(text, item.center_x(), y, item.width)?;
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Interaction UI
// =============================================================

fn draw_selection_rect(ctx: &CanvasRenderingContext2d, rect: &Rect, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, zoom)?;
    ctx.set_stroke_style_str(SELECTION_STROKE);
    ctx.set_fill_style_str(SELECTION_FILL);
    ctx.set_line_width(1.0 / zoom);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

fn draw_guides(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    view: &Rect,
) -> Result<(), JsValue> {
    let zoom = core.camera.zoom;

    ctx.save();
    set_dash(ctx, zoom)?;
    ctx.set_stroke_style_str(GUIDE_COLOR);
    ctx.set_line_width(1.0 / zoom);

    ctx.begin_path();
    for &x in &core.guides().vertical {
        ctx.move_to(x, view.y);
        ctx.line_to(x, view.bottom());
    }
    for &y in &core.guides().horizontal {
        ctx.move_to(view.x, y);
        ctx.line_to(view.right(), y);
    }
    ctx.stroke();

    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

fn draw_handles(ctx: &CanvasRenderingContext2d, bounds: &Rect, zoom: f64) -> Result<(), JsValue> {
    let half = HANDLE_RADIUS_PX / zoom;

    ctx.save();
    ctx.set_fill_style_str(HANDLE_FILL);
    ctx.set_stroke_style_str(HANDLE_STROKE);
    ctx.set_line_width(1.0 / zoom);

    for (_, pos) in hit::handle_positions(bounds) {
        ctx.fill_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
        ctx.stroke_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
    }

    ctx.restore();
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, zoom: f64) -> Result<(), JsValue> {
    let dash_world = DASH_PX / zoom;
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash_world.into());
    dash_array.push(&dash_world.into());
    ctx.set_line_dash(&dash_array)
}

// =============================================================
// Frame loop
// =============================================================

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Continuous `requestAnimationFrame` render loop for an engine.
///
/// Each frame renders the engine and re-arms itself. Dropping the loop
/// (or calling [`RenderLoop::stop`]) cancels the pending frame and
/// releases the callback.
pub struct RenderLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    closure: FrameClosure,
}

impl RenderLoop {
    /// Start rendering `engine` every animation frame.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `requestAnimationFrame` is unavailable.
    pub fn start(engine: Rc<RefCell<Engine>>) -> Result<Self, JsValue> {
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let closure: FrameClosure = Rc::new(RefCell::new(None));

        let frame_raf = Rc::clone(&raf_id);
        let frame_closure = Rc::clone(&closure);
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if frame_raf.get().is_none() {
                // Stopped between scheduling and firing.
                return;
            }
            if let Err(err) = engine.borrow().render() {
                log::warn!("dropped frame: {err:?}");
            }
            frame_raf.set(request_frame(&frame_closure));
        }) as Box<dyn FnMut()>));

        raf_id.set(request_frame(&closure));
        if raf_id.get().is_none() {
            return Err(JsValue::from_str("requestAnimationFrame unavailable"));
        }
        Ok(Self { raf_id, closure })
    }

    /// Cancel the pending frame and release the callback. Idempotent.
    pub fn stop(&self) {
        if let Some(id) = self.raf_id.take()
            && let Some(window) = web_sys::window()
        {
            let _ = window.cancel_animation_frame(id);
        }
        self.closure.borrow_mut().take();
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(closure: &FrameClosure) -> Option<i32> {
    let window = web_sys::window()?;
    let slot = closure.borrow();
    let callback = slot.as_ref()?;
    window.request_animation_frame(callback.as_ref().unchecked_ref()).ok()
}
