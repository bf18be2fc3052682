use dashgrid::registry::{GridPos, LayoutRegistry, PanelLayout, SizeClass, Widget};
use dashgrid::render::Renderable;
use dashgrid::{DragController, ViewState};
use eframe::egui::{pos2, vec2, Rect};
use std::collections::HashMap;

struct NullContent;

impl Renderable for NullContent {
    fn ui(&mut self, _ui: &mut eframe::egui::Ui) {}
}

fn widget(id: &str, x: u8, y: u8) -> Widget {
    Widget::new(id, id, Box::new(NullContent), SizeClass::Medium, GridPos::new(x, y))
}

fn registry() -> LayoutRegistry {
    LayoutRegistry::new(vec![
        widget("w1", 0, 0),
        widget("w2", 1, 0),
        widget("w3", 0, 1),
        widget("w4", 1, 1),
    ])
    .unwrap()
}

fn screen_bounds() -> HashMap<String, Rect> {
    let mut map = HashMap::new();
    map.insert("w1".into(), Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 100.0)));
    map.insert("w2".into(), Rect::from_min_size(pos2(400.0, 0.0), vec2(200.0, 100.0)));
    map.insert("w3".into(), Rect::from_min_size(pos2(0.0, 400.0), vec2(200.0, 100.0)));
    map.insert("w4".into(), Rect::from_min_size(pos2(400.0, 400.0), vec2(200.0, 100.0)));
    map
}

fn layouts(reg: &LayoutRegistry) -> Vec<PanelLayout> {
    reg.list().iter().map(PanelLayout::from).collect()
}

#[test]
fn drag_over_a_neighbor_swaps_on_drop() {
    let mut reg = registry();
    let bounds = screen_bounds();
    let mut drag = DragController::default();

    drag.start(&reg, "w1", vec2(200.0, 100.0));
    drag.update_pointer(&reg, &bounds, pos2(500.0, 50.0));
    assert_eq!(drag.highlighted_target(), Some("w2"));
    assert!(drag.drop(&mut reg));

    assert_eq!(reg.get("w1").unwrap().position, GridPos::new(1, 0));
    assert_eq!(reg.get("w2").unwrap().position, GridPos::new(0, 0));
    assert_eq!(drag.dragged_id(), None);
    assert_eq!(drag.highlighted_target(), None);
}

#[test]
fn drop_away_from_every_widget_changes_nothing() {
    let mut reg = registry();
    let bounds = screen_bounds();
    let before = layouts(&reg);
    let mut drag = DragController::default();

    drag.start(&reg, "w1", vec2(200.0, 100.0));
    drag.update_pointer(&reg, &bounds, pos2(5000.0, 5000.0));
    assert_eq!(drag.highlighted_target(), None);
    assert!(!drag.drop(&mut reg));

    assert_eq!(layouts(&reg), before);
    assert!(!drag.is_dragging());
}

#[test]
fn hidden_widget_disappears_but_reset_brings_it_back() {
    let mut reg = registry();
    reg.toggle_visible("w3");
    assert!(!reg.get("w3").unwrap().visible);
    reg.reset();
    assert!(reg.get("w3").unwrap().visible);
}

#[test]
fn reset_restores_the_compiled_snapshot_after_any_sequence() {
    let mut reg = registry();
    let bounds = screen_bounds();
    let initial = layouts(&reg);
    let mut drag = DragController::default();

    drag.start(&reg, "w1", vec2(200.0, 100.0));
    drag.update_pointer(&reg, &bounds, pos2(500.0, 50.0));
    drag.drop(&mut reg);
    reg.swap_positions("w3", "w4");
    reg.toggle_visible("w2");
    reg.set_minimized("w4", true);

    reg.reset();
    assert_eq!(layouts(&reg), initial);
    reg.reset();
    assert_eq!(layouts(&reg), initial);
}

#[test]
fn expand_and_collapse_leave_the_registry_alone() {
    let reg = registry();
    let before = layouts(&reg);
    let mut view = ViewState::default();

    view.expand(&reg, "w4");
    assert!(view.is_expanded("w4"));
    view.collapse();
    assert_eq!(view.expanded(), None);
    assert_eq!(layouts(&reg), before);

    // Expansion state is orthogonal to drag state.
    let mut drag = DragController::default();
    drag.start(&reg, "w1", vec2(200.0, 100.0));
    view.expand(&reg, "w2");
    drag.cancel();
    assert!(view.is_expanded("w2"));
    assert_eq!(layouts(&reg), before);
}

#[test]
fn one_gesture_at_a_time() {
    let reg = registry();
    let bounds = screen_bounds();
    let mut drag = DragController::default();

    drag.start(&reg, "w1", vec2(200.0, 100.0));
    drag.start(&reg, "w2", vec2(200.0, 100.0));
    assert_eq!(drag.dragged_id(), Some("w1"));

    drag.update_pointer(&reg, &bounds, pos2(500.0, 50.0));
    drag.end();
    // A fresh gesture starts clean.
    drag.start(&reg, "w2", vec2(200.0, 100.0));
    assert_eq!(drag.dragged_id(), Some("w2"));
    assert_eq!(drag.highlighted_target(), None);
    drag.cancel();
}
