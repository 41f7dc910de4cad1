//! Item model: canvas items, the insertion-ordered store, and selection.
//!
//! This module defines the core data types that describe what is on the
//! canvas (`CanvasItem`, `ShapeKind`), a sparse-update type for incremental
//! edits (`PartialItem`), the runtime store that owns all live items
//! (`ItemStore`), the selection set (`Selection`), and the session id
//! factory (`IdGen`).
//!
//! Data flows into this layer from JSON import and from the interaction
//! engine (mutations). The renderer reads from `ItemStore` in z-order to
//! determine draw order. The store is the sole owner of item records; all
//! other components hold ids or transient clones.

#[cfg(test)]
#[path = "item_test.rs"]
mod item_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The shape drawn for a canvas item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed within the bounding box.
    Ellipse,
}

/// A placed shape as stored in the document and in interchange JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasItem {
    /// Unique identifier, immutable after creation.
    pub id: String,
    /// Left edge of the bounding box in world coordinates.
    pub left: f64,
    /// Top edge of the bounding box in world coordinates.
    pub top: f64,
    /// Width of the bounding box in world coordinates (> 0).
    pub width: f64,
    /// Height of the bounding box in world coordinates (> 0).
    pub height: f64,
    /// Shape drawn within the bounding box.
    #[serde(rename = "shapeKind", default)]
    pub kind: ShapeKind,
    /// Fill color as a CSS color string.
    #[serde(default)]
    pub fill_color: String,
    /// Free-text label: business code.
    #[serde(default)]
    pub box_code: String,
    /// Free-text label: equipment id.
    #[serde(default)]
    pub equip_id: String,
    /// Free-text label: display name.
    #[serde(default)]
    pub box_name: String,
    /// Free-text label: alternate display name.
    #[serde(default)]
    pub show_name: String,
    /// Stacking order; items without one stack in insertion order.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub z_index: Option<i64>,
}

impl CanvasItem {
    /// Right edge of the bounding box.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge of the bounding box.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal center of the bounding box.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical center of the bounding box.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Sparse update for a canvas item. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialItem {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<f64>,
    #[serde(rename = "shapeKind", skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub box_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub equip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub box_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub z_index: Option<i64>,
}

impl PartialItem {
    /// A partial that moves an item to `(left, top)`.
    #[must_use]
    pub fn at(left: f64, top: f64) -> Self {
        Self { left: Some(left), top: Some(top), ..Self::default() }
    }
}

/// Why a bulk import was rejected. Nothing is applied on failure.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload was not valid JSON for an item array.
    #[error("malformed item payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// An item had an empty id.
    #[error("item with empty id")]
    EmptyId,
    /// Two items shared the same id.
    #[error("duplicate item id {0:?}")]
    DuplicateId(String),
    /// A position or size was NaN or infinite.
    #[error("non-finite geometry on item {0:?}")]
    NonFinite(String),
    /// A width or height was zero or negative.
    #[error("non-positive size on item {0:?}")]
    NonPositiveSize(String),
}

/// Validate an item set for bulk import: non-empty unique ids, finite
/// geometry, positive sizes. All-or-nothing; the first violation wins.
pub fn validate_items(items: &[CanvasItem]) -> Result<(), ImportError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.id.is_empty() {
            return Err(ImportError::EmptyId);
        }
        if !seen.insert(item.id.as_str()) {
            return Err(ImportError::DuplicateId(item.id.clone()));
        }
        let nums = [item.left, item.top, item.width, item.height];
        if nums.iter().any(|n| !n.is_finite()) {
            return Err(ImportError::NonFinite(item.id.clone()));
        }
        if item.width <= 0.0 || item.height <= 0.0 {
            return Err(ImportError::NonPositiveSize(item.id.clone()));
        }
    }
    Ok(())
}

/// Parse an item array from interchange JSON.
///
/// # Errors
///
/// Returns `Err` if the payload is malformed or fails [`validate_items`].
pub fn items_from_json(json: &str) -> Result<Vec<CanvasItem>, ImportError> {
    let items: Vec<CanvasItem> = serde_json::from_str(json)?;
    validate_items(&items)?;
    Ok(items)
}

/// Serialize an item array to interchange JSON.
///
/// # Errors
///
/// Returns `Err` if serialization fails.
pub fn items_to_json(items: &[CanvasItem]) -> Result<String, ImportError> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Session-unique id factory: a monotonic counter rendered as a decimal
/// string. [`IdGen::observe`] fast-forwards past numeric ids seen in
/// imported data so new ids never collide with them.
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Produce the next fresh id.
    pub fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    /// Advance the counter past any numeric ids in `ids`. Non-numeric ids
    /// are tolerated and do not advance it.
    pub fn observe<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if let Ok(n) = id.parse::<u64>()
                && n >= self.next
            {
                self.next = n + 1;
            }
        }
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store of canvas items, insertion-ordered and id-unique.
///
/// Every mutating call bumps a structural version counter exactly once
/// (batches included), so readers can key caches or repaints on
/// [`ItemStore::version`].
pub struct ItemStore {
    items: HashMap<String, CanvasItem>,
    order: Vec<String>,
    id_gen: IdGen,
    version: u64,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
            id_gen: IdGen::new(),
            version: 0,
        }
    }

    /// Insert an item, assigning a fresh id when the item carries none.
    /// Inserting an id that already exists overwrites that record in place
    /// (an update, not a duplicate). Returns the final id.
    ///
    /// Explicit numeric ids advance the id counter so later generated ids
    /// never collide with them.
    pub fn insert(&mut self, mut item: CanvasItem) -> String {
        if item.id.is_empty() {
            item.id = self.id_gen.next_id();
        } else {
            self.id_gen.observe([item.id.as_str()]);
        }
        item.left = item.left.round();
        item.top = item.top.round();
        let id = item.id.clone();
        if self.items.insert(id.clone(), item).is_none() {
            self.order.push(id.clone());
        }
        self.version += 1;
        id
    }

    /// Merge a sparse update into an existing item. Unknown ids are a
    /// no-op, since callers may race with deletion. Positions are rounded
    /// to whole units on write.
    pub fn update(&mut self, id: &str, partial: &PartialItem) {
        if self.apply_partial(id, partial) {
            self.version += 1;
        }
    }

    /// Apply the same sparse update to many items as one state transition.
    pub fn update_many(&mut self, ids: &[String], partial: &PartialItem) {
        let mut changed = false;
        for id in ids {
            changed |= self.apply_partial(id, partial);
        }
        if changed {
            self.version += 1;
        }
    }

    /// Apply per-item sparse updates as one state transition.
    pub fn batch_update(&mut self, updates: &[(String, PartialItem)]) {
        let mut changed = false;
        for (id, partial) in updates {
            changed |= self.apply_partial(id, partial);
        }
        if changed {
            self.version += 1;
        }
    }

    fn apply_partial(&mut self, id: &str, partial: &PartialItem) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        if let Some(left) = partial.left {
            item.left = left;
        }
        if let Some(top) = partial.top {
            item.top = top;
        }
        if let Some(width) = partial.width {
            item.width = width;
        }
        if let Some(height) = partial.height {
            item.height = height;
        }
        if let Some(kind) = partial.kind {
            item.kind = kind;
        }
        if let Some(ref color) = partial.fill_color {
            item.fill_color = color.clone();
        }
        if let Some(ref code) = partial.box_code {
            item.box_code = code.clone();
        }
        if let Some(ref equip) = partial.equip_id {
            item.equip_id = equip.clone();
        }
        if let Some(ref name) = partial.box_name {
            item.box_name = name.clone();
        }
        if let Some(ref name) = partial.show_name {
            item.show_name = name.clone();
        }
        if let Some(z) = partial.z_index {
            item.z_index = Some(z);
        }
        item.left = item.left.round();
        item.top = item.top.round();
        true
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<CanvasItem> {
        let removed = self.items.remove(id);
        if removed.is_some() {
            self.order.retain(|o| o != id);
            self.version += 1;
        }
        removed
    }

    /// Remove many items as one state transition.
    pub fn remove_many(&mut self, ids: &[String]) {
        let mut changed = false;
        for id in ids {
            if self.items.remove(id).is_some() {
                changed = true;
            }
        }
        if changed {
            self.order.retain(|o| self.items.contains_key(o));
            self.version += 1;
        }
    }

    /// Replace all items with a new set, re-deriving the id counter from
    /// the maximum numeric id present. Callers are expected to validate
    /// the set first (see [`validate_items`]).
    pub fn set_all(&mut self, items: Vec<CanvasItem>) {
        self.items.clear();
        self.order.clear();
        self.id_gen = IdGen::new();
        self.id_gen.observe(items.iter().map(|i| i.id.as_str()));
        for item in items {
            let id = item.id.clone();
            if self.items.insert(id.clone(), item).is_none() {
                self.order.push(id);
            }
        }
        self.version += 1;
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CanvasItem> {
        self.items.get(id)
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Snapshot of all items in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<CanvasItem> {
        self.iter().cloned().collect()
    }

    /// Structural version, bumped once per mutating call.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an id refers to a live item.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The set of selected item ids.
///
/// Ids may go stale when items are deleted out from under the selection;
/// reads through [`Selection::selected_items`] filter them out.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single id, or toggle its membership when `additive`.
    pub fn select(&mut self, id: &str, additive: bool) {
        if additive {
            if !self.ids.remove(id) {
                self.ids.insert(id.to_owned());
            }
        } else {
            self.ids.clear();
            self.ids.insert(id.to_owned());
        }
    }

    /// Replace the selection with exactly the given ids.
    pub fn select_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop a single id from the selection, if present.
    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The raw id set, stale ids included.
    #[must_use]
    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    /// Selected live items in store insertion order; stale ids are
    /// silently skipped.
    #[must_use]
    pub fn selected_items<'a>(&self, store: &'a ItemStore) -> Vec<&'a CanvasItem> {
        store.iter().filter(|item| self.ids.contains(&item.id)).collect()
    }

    /// Whether more than one live item is selected.
    #[must_use]
    pub fn has_multiple(&self, store: &ItemStore) -> bool {
        self.selected_items(store).len() > 1
    }
}
