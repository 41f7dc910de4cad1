#![allow(clippy::float_cmp)]

use super::*;

fn item(id: &str, left: f64, top: f64, width: f64, height: f64) -> CanvasItem {
    CanvasItem {
        id: id.to_owned(),
        left,
        top,
        width,
        height,
        kind: ShapeKind::Rectangle,
        fill_color: "#cccccc".to_owned(),
        box_code: String::new(),
        equip_id: String::new(),
        box_name: String::new(),
        show_name: String::new(),
        z_index: None,
    }
}

// --- CanvasItem geometry ---

#[test]
fn edges_and_centers() {
    let it = item("a", 10.0, 20.0, 30.0, 40.0);
    assert_eq!(it.right(), 40.0);
    assert_eq!(it.bottom(), 60.0);
    assert_eq!(it.center_x(), 25.0);
    assert_eq!(it.center_y(), 40.0);
}

// --- Serde ---

#[test]
fn item_json_uses_camel_case_and_shape_kind() {
    let mut it = item("a", 0.0, 0.0, 10.0, 10.0);
    it.kind = ShapeKind::Ellipse;
    it.box_code = "BC-1".to_owned();
    let json = serde_json::to_string(&it).unwrap();
    assert!(json.contains("\"shapeKind\":\"ellipse\""));
    assert!(json.contains("\"boxCode\":\"BC-1\""));
    assert!(json.contains("\"fillColor\""));
    assert!(!json.contains("zIndex"));
}

#[test]
fn item_json_missing_optional_fields_use_defaults() {
    let json = r#"{"id":"x","left":1,"top":2,"width":3,"height":4}"#;
    let it: CanvasItem = serde_json::from_str(json).unwrap();
    assert_eq!(it.kind, ShapeKind::Rectangle);
    assert!(it.fill_color.is_empty());
    assert_eq!(it.z_index, None);
}

// --- validate_items ---

#[test]
fn validate_accepts_good_items() {
    let items = vec![item("a", 0.0, 0.0, 10.0, 10.0), item("b", 5.0, 5.0, 1.0, 1.0)];
    assert!(validate_items(&items).is_ok());
}

#[test]
fn validate_rejects_empty_id() {
    let items = vec![item("", 0.0, 0.0, 10.0, 10.0)];
    assert!(matches!(validate_items(&items), Err(ImportError::EmptyId)));
}

#[test]
fn validate_rejects_duplicate_id() {
    let items = vec![item("a", 0.0, 0.0, 10.0, 10.0), item("a", 5.0, 5.0, 10.0, 10.0)];
    assert!(matches!(validate_items(&items), Err(ImportError::DuplicateId(id)) if id == "a"));
}

#[test]
fn validate_rejects_non_finite_geometry() {
    let items = vec![item("a", f64::NAN, 0.0, 10.0, 10.0)];
    assert!(matches!(validate_items(&items), Err(ImportError::NonFinite(_))));
}

#[test]
fn validate_rejects_non_positive_size() {
    let items = vec![item("a", 0.0, 0.0, 0.0, 10.0)];
    assert!(matches!(validate_items(&items), Err(ImportError::NonPositiveSize(_))));
}

#[test]
fn items_from_json_rejects_malformed_payload() {
    assert!(matches!(items_from_json("not json"), Err(ImportError::Parse(_))));
}

#[test]
fn items_json_round_trip() {
    let items = vec![item("7", 1.0, 2.0, 3.0, 4.0)];
    let json = items_to_json(&items).unwrap();
    let back = items_from_json(&json).unwrap();
    assert_eq!(items, back);
}

// --- IdGen ---

#[test]
fn id_gen_is_monotonic_from_one() {
    let mut id_gen = IdGen::new();
    assert_eq!(id_gen.next_id(), "1");
    assert_eq!(id_gen.next_id(), "2");
}

#[test]
fn id_gen_observe_advances_past_numeric_ids() {
    let mut id_gen = IdGen::new();
    id_gen.observe(["3", "17", "not-a-number"]);
    assert_eq!(id_gen.next_id(), "18");
}

// --- ItemStore: insert ---

#[test]
fn insert_assigns_fresh_id_when_empty() {
    let mut store = ItemStore::new();
    let id = store.insert(item("", 0.0, 0.0, 10.0, 10.0));
    assert_eq!(id, "1");
    assert!(store.contains("1"));
}

#[test]
fn generated_ids_skip_past_explicit_numeric_ids() {
    let mut store = ItemStore::new();
    store.insert(item("1", 0.0, 0.0, 10.0, 10.0));
    let id = store.insert(item("", 50.0, 0.0, 10.0, 10.0));
    // A fresh id must not collide with the explicit "1" and overwrite it.
    assert_eq!(id, "2");
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("1").unwrap().left, 0.0);
}

#[test]
fn generated_ids_skip_past_large_explicit_id() {
    let mut store = ItemStore::new();
    store.insert(item("40", 0.0, 0.0, 10.0, 10.0));
    let id = store.insert(item("", 50.0, 0.0, 10.0, 10.0));
    assert_eq!(id, "41");
}

#[test]
fn insert_rounds_position() {
    let mut store = ItemStore::new();
    let id = store.insert(item("", 10.4, 10.6, 10.0, 10.0));
    let it = store.get(&id).unwrap();
    assert_eq!(it.left, 10.0);
    assert_eq!(it.top, 11.0);
}

#[test]
fn insert_existing_id_overwrites_in_place() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("b", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("a", 99.0, 99.0, 20.0, 20.0));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("a").unwrap().left, 99.0);
    // Order is preserved: "a" still comes first.
    let ids: Vec<&str> = store.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

// --- ItemStore: update ---

#[test]
fn update_merges_present_fields_only() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.update("a", &PartialItem { width: Some(50.0), ..PartialItem::default() });
    let it = store.get("a").unwrap();
    assert_eq!(it.width, 50.0);
    assert_eq!(it.left, 0.0);
    assert_eq!(it.height, 10.0);
}

#[test]
fn update_unknown_id_is_noop() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    let version = store.version();
    store.update("ghost", &PartialItem::at(5.0, 5.0));
    assert_eq!(store.version(), version);
}

#[test]
fn update_rounds_position() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.update("a", &PartialItem::at(3.4, 3.5));
    let it = store.get("a").unwrap();
    assert_eq!(it.left, 3.0);
    assert_eq!(it.top, 4.0);
}

#[test]
fn batch_update_bumps_version_once() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("b", 0.0, 0.0, 10.0, 10.0));
    let version = store.version();
    store.batch_update(&[
        ("a".to_owned(), PartialItem::at(1.0, 1.0)),
        ("b".to_owned(), PartialItem::at(2.0, 2.0)),
    ]);
    assert_eq!(store.version(), version + 1);
}

#[test]
fn update_many_applies_same_fields_to_all() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("b", 0.0, 0.0, 10.0, 10.0));
    let partial = PartialItem { fill_color: Some("#ff0000".to_owned()), ..PartialItem::default() };
    store.update_many(&["a".to_owned(), "b".to_owned()], &partial);
    assert_eq!(store.get("a").unwrap().fill_color, "#ff0000");
    assert_eq!(store.get("b").unwrap().fill_color, "#ff0000");
}

// --- ItemStore: remove ---

#[test]
fn remove_returns_the_item() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    let removed = store.remove("a").unwrap();
    assert_eq!(removed.id, "a");
    assert!(store.is_empty());
}

#[test]
fn remove_many_keeps_order_of_survivors() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("b", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("c", 0.0, 0.0, 10.0, 10.0));
    store.remove_many(&["b".to_owned()]);
    let ids: Vec<&str> = store.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);
}

// --- ItemStore: set_all ---

#[test]
fn set_all_replaces_everything() {
    let mut store = ItemStore::new();
    store.insert(item("old", 0.0, 0.0, 10.0, 10.0));
    store.set_all(vec![item("a", 0.0, 0.0, 10.0, 10.0), item("b", 1.0, 1.0, 10.0, 10.0)]);
    assert_eq!(store.len(), 2);
    assert!(!store.contains("old"));
}

#[test]
fn set_all_rederives_id_counter() {
    let mut store = ItemStore::new();
    store.set_all(vec![item("41", 0.0, 0.0, 10.0, 10.0), item("7", 1.0, 1.0, 10.0, 10.0)]);
    let id = store.insert(item("", 0.0, 0.0, 10.0, 10.0));
    assert_eq!(id, "42");
}

#[test]
fn set_all_bumps_version_once() {
    let mut store = ItemStore::new();
    let version = store.version();
    store.set_all(vec![item("a", 0.0, 0.0, 10.0, 10.0), item("b", 1.0, 1.0, 10.0, 10.0)]);
    assert_eq!(store.version(), version + 1);
}

// --- Selection ---

#[test]
fn select_replaces_by_default() {
    let mut sel = Selection::new();
    sel.select("a", false);
    sel.select("b", false);
    assert!(!sel.contains("a"));
    assert!(sel.contains("b"));
    assert_eq!(sel.len(), 1);
}

#[test]
fn select_additive_toggles_membership() {
    let mut sel = Selection::new();
    sel.select("a", false);
    sel.select("b", true);
    assert!(sel.contains("a"));
    assert!(sel.contains("b"));
    sel.select("b", true);
    assert!(!sel.contains("b"));
    assert!(sel.contains("a"));
}

#[test]
fn select_many_replaces_the_set() {
    let mut sel = Selection::new();
    sel.select("old", false);
    sel.select_many(["a".to_owned(), "b".to_owned()]);
    assert_eq!(sel.len(), 2);
    assert!(!sel.contains("old"));
}

#[test]
fn selected_items_skips_stale_ids_and_keeps_store_order() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    store.insert(item("b", 0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select_many(["b".to_owned(), "a".to_owned(), "ghost".to_owned()]);
    let items = sel.selected_items(&store);
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[test]
fn has_multiple_counts_live_items_only() {
    let mut store = ItemStore::new();
    store.insert(item("a", 0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select_many(["a".to_owned(), "ghost".to_owned()]);
    assert!(!sel.has_multiple(&store));
}
