use super::*;

// --- Button ---

#[test]
fn button_variants_distinct() {
    assert_ne!(Button::Primary, Button::Secondary);
    assert_ne!(Button::Primary, Button::Middle);
    assert_ne!(Button::Middle, Button::Secondary);
}

// --- Modifiers ---

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

// --- Key ---

#[test]
fn key_new_wraps_name() {
    assert_eq!(Key::new("Escape"), Key("Escape".to_owned()));
    assert_ne!(Key::new("w"), Key::new("W"));
}

// --- Direction ---

#[test]
fn direction_variants_distinct() {
    let all = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
    for (i, a) in all.iter().enumerate() {
        for (j, b) in all.iter().enumerate() {
            if i == j {
                assert_eq!(a, b);
            } else {
                assert_ne!(a, b);
            }
        }
    }
}

// --- Mode ---

#[test]
fn mode_default_is_idle() {
    assert!(Mode::default().is_idle());
}

#[test]
fn mode_active_variants_are_not_idle() {
    let panning = Mode::Panning { last_screen: Point::new(0.0, 0.0) };
    assert!(!panning.is_idle());

    let dragging = Mode::DraggingItems {
        origin_world: Point::new(0.0, 0.0),
        primary_id: "1".to_owned(),
        start_positions: HashMap::new(),
    };
    assert!(!dragging.is_idle());

    let boxing = Mode::BoxSelecting {
        origin_world: Point::new(0.0, 0.0),
        rect: Rect::new(0.0, 0.0, 0.0, 0.0),
    };
    assert!(!boxing.is_idle());

    let resizing = Mode::Resizing {
        id: "1".to_owned(),
        handle: ResizeHandle::Se,
        orig: Rect::new(0.0, 0.0, 10.0, 10.0),
        origin_world: Point::new(0.0, 0.0),
    };
    assert!(!resizing.is_idle());
}

#[test]
fn mode_take_resets_to_idle() {
    let mut mode = Mode::Panning { last_screen: Point::new(1.0, 2.0) };
    let taken = std::mem::take(&mut mode);
    assert!(!taken.is_idle());
    assert!(mode.is_idle());
}
