use crate::collision;
use crate::registry::LayoutRegistry;
use eframe::egui::{Pos2, Rect, Vec2};
use std::collections::HashMap;

/// External source of on-screen widget rectangles. The core never computes
/// page geometry itself.
pub trait BoundsProvider {
    fn bounds(&self, id: &str) -> Option<Rect>;
}

impl BoundsProvider for HashMap<String, Rect> {
    fn bounds(&self, id: &str) -> Option<Rect> {
        self.get(id).copied()
    }
}

/// One in-flight drag gesture. Created on drag start, destroyed on
/// drop, drag-end or cancel.
#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    dragged_id: String,
    origin_dims: Vec2,
    highlighted: Option<String>,
}

/// State machine coordinating a single drag. `Idle` is `session == None`.
pub struct DragController {
    session: Option<DragSession>,
    padding: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(collision::DEFAULT_PADDING)
    }
}

impl DragController {
    pub fn new(padding: f32) -> Self {
        Self {
            session: None,
            padding,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.dragged_id.as_str())
    }

    pub fn highlighted_target(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.highlighted.as_deref())
    }

    /// Begin a gesture. The widget's box dimensions are captured once here;
    /// the live drag preview rectangle is not queryable later. A no-op while
    /// another drag is in flight or when the id is unknown or hidden.
    pub fn start(&mut self, registry: &LayoutRegistry, id: &str, dims: Vec2) {
        if self.session.is_some() {
            tracing::debug!(%id, "drag start ignored, gesture already in flight");
            return;
        }
        match registry.get(id) {
            Some(widget) if widget.visible => {
                self.session = Some(DragSession {
                    dragged_id: id.to_string(),
                    origin_dims: dims,
                    highlighted: None,
                });
                tracing::debug!(%id, "drag started");
            }
            _ => tracing::debug!(%id, "drag start ignored, unknown or hidden widget"),
        }
    }

    /// Re-evaluate the collision winner for the current pointer position.
    /// Candidates are all visible widgets except the dragged one; the dragged
    /// rectangle is centered on the pointer with the origin dimensions.
    pub fn update_pointer(
        &mut self,
        registry: &LayoutRegistry,
        bounds: &dyn BoundsProvider,
        pointer: Pos2,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mut candidates: Vec<(&str, Rect)> = Vec::new();
        for widget in registry.list() {
            if !widget.visible || widget.id == session.dragged_id {
                continue;
            }
            if let Some(rect) = bounds.bounds(&widget.id) {
                candidates.push((widget.id.as_str(), rect));
            }
        }
        session.highlighted =
            collision::hit_test(pointer, session.origin_dims, &candidates, self.padding)
                .map(str::to_owned);
    }

    /// Release over the drop surface. Swaps with the highlighted target when
    /// one exists; a targetless drop is a cancellation, not an error. Always
    /// ends the session. Returns whether a swap happened.
    pub fn drop(&mut self, registry: &mut LayoutRegistry) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        let swapped = match session.highlighted {
            Some(target) if target != session.dragged_id => {
                registry.swap_positions(&session.dragged_id, &target)
            }
            _ => false,
        };
        tracing::debug!(id = %session.dragged_id, swapped, "drag dropped");
        swapped
    }

    /// Pointer released outside any recognized drop surface. Discards the
    /// session without mutation.
    pub fn end(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("drag ended without a drop target");
        }
    }

    /// Abort the gesture from any state.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{GridPos, SizeClass, Widget};
    use crate::render::Renderable;
    use eframe::egui::{pos2, vec2};

    struct NullContent;

    impl Renderable for NullContent {
        fn ui(&mut self, _ui: &mut eframe::egui::Ui) {}
    }

    fn widget(id: &str, x: u8, y: u8) -> Widget {
        Widget::new(id, id, Box::new(NullContent), SizeClass::Small, GridPos::new(x, y))
    }

    fn registry() -> LayoutRegistry {
        LayoutRegistry::new(vec![widget("w1", 0, 0), widget("w2", 1, 0), widget("w3", 2, 0)])
            .unwrap()
    }

    fn bounds() -> HashMap<String, Rect> {
        let mut map = HashMap::new();
        map.insert("w1".into(), Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 100.0)));
        map.insert("w2".into(), Rect::from_min_size(pos2(400.0, 0.0), vec2(200.0, 100.0)));
        map.insert("w3".into(), Rect::from_min_size(pos2(800.0, 0.0), vec2(200.0, 100.0)));
        map
    }

    #[test]
    fn drop_on_target_swaps_positions() {
        let mut reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        assert!(drag.is_dragging());
        drag.update_pointer(&reg, &boxes, pos2(500.0, 50.0));
        assert_eq!(drag.highlighted_target(), Some("w2"));
        assert!(drag.drop(&mut reg));

        assert_eq!(reg.get("w1").unwrap().position, GridPos::new(1, 0));
        assert_eq!(reg.get("w2").unwrap().position, GridPos::new(0, 0));
        assert!(!drag.is_dragging());
        assert_eq!(drag.dragged_id(), None);
        assert_eq!(drag.highlighted_target(), None);
    }

    #[test]
    fn targetless_drop_is_a_cancellation() {
        let mut reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.update_pointer(&reg, &boxes, pos2(5000.0, 5000.0));
        assert_eq!(drag.highlighted_target(), None);
        assert!(!drag.drop(&mut reg));

        assert_eq!(reg.get("w1").unwrap().position, GridPos::new(0, 0));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn collision_never_reports_the_dragged_widget() {
        let reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        // Pointer directly over the dragged widget's own box.
        drag.update_pointer(&reg, &boxes, pos2(100.0, 50.0));
        assert_ne!(drag.highlighted_target(), Some("w1"));
    }

    #[test]
    fn nested_start_is_ignored() {
        let reg = registry();
        let mut drag = DragController::default();

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.start(&reg, "w2", vec2(10.0, 10.0));
        assert_eq!(drag.dragged_id(), Some("w1"));
    }

    #[test]
    fn unknown_or_hidden_widget_cannot_start_a_drag() {
        let mut reg = registry();
        let mut drag = DragController::default();

        drag.start(&reg, "missing", vec2(200.0, 100.0));
        assert!(!drag.is_dragging());

        reg.set_visible("w1", false);
        drag.start(&reg, "w1", vec2(200.0, 100.0));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn hidden_widgets_are_not_drop_targets() {
        let mut reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();

        reg.set_visible("w2", false);
        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.update_pointer(&reg, &boxes, pos2(500.0, 50.0));
        assert_eq!(drag.highlighted_target(), None);
    }

    #[test]
    fn target_hidden_mid_gesture_means_no_swap() {
        let mut reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.update_pointer(&reg, &boxes, pos2(500.0, 50.0));
        assert_eq!(drag.highlighted_target(), Some("w2"));
        reg.set_visible("w2", false);
        assert!(!drag.drop(&mut reg));
        assert_eq!(reg.get("w1").unwrap().position, GridPos::new(0, 0));
    }

    #[test]
    fn end_and_cancel_leave_the_registry_untouched() {
        let mut reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.update_pointer(&reg, &boxes, pos2(500.0, 50.0));
        drag.end();
        assert!(!drag.is_dragging());
        assert_eq!(drag.highlighted_target(), None);
        assert_eq!(reg.get("w1").unwrap().position, GridPos::new(0, 0));

        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.cancel();
        assert!(!drag.is_dragging());
        assert_eq!(reg.get("w1").unwrap().position, GridPos::new(0, 0));

        // Cancel from idle is fine too.
        drag.cancel();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn update_pointer_without_a_session_is_a_no_op() {
        let reg = registry();
        let boxes = bounds();
        let mut drag = DragController::default();
        drag.update_pointer(&reg, &boxes, pos2(500.0, 50.0));
        assert_eq!(drag.highlighted_target(), None);
    }

    #[test]
    fn missing_bounds_are_skipped() {
        let reg = registry();
        let mut drag = DragController::default();
        // No geometry reported yet for any widget.
        let empty: HashMap<String, Rect> = HashMap::new();
        drag.start(&reg, "w1", vec2(200.0, 100.0));
        drag.update_pointer(&reg, &empty, pos2(500.0, 50.0));
        assert_eq!(drag.highlighted_target(), None);
    }
}
