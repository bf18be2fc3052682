use eframe::egui::{Pos2, Rect, Vec2};
use std::cmp::Ordering;

/// Margin added to both rectangles before the overlap test so near-misses
/// still register as collisions.
pub const DEFAULT_PADDING: f32 = 80.0;

fn virtual_drag_rect(pointer: Pos2, drag_dims: Vec2, padding: f32) -> Rect {
    Rect::from_center_size(pointer, drag_dims).expand(padding)
}

fn has_geometry(rect: &Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}

/// Ids of all candidates whose padded box intersects the pointer-centered
/// drag rectangle. Zero-area candidates have no geometry yet and are skipped.
pub fn collisions<'a>(
    pointer: Pos2,
    drag_dims: Vec2,
    candidates: &[(&'a str, Rect)],
    padding: f32,
) -> Vec<&'a str> {
    let dragged = virtual_drag_rect(pointer, drag_dims, padding);
    candidates
        .iter()
        .filter(|(_, rect)| has_geometry(rect))
        .filter(|(_, rect)| rect.expand(padding).intersects(dragged))
        .map(|(id, _)| *id)
        .collect()
}

/// Single collision winner. When several candidates collide at once the one
/// whose box center is nearest the pointer wins; exact distance ties go to
/// the lexicographically smaller id, so the result never depends on input
/// order.
pub fn hit_test<'a>(
    pointer: Pos2,
    drag_dims: Vec2,
    candidates: &[(&'a str, Rect)],
    padding: f32,
) -> Option<&'a str> {
    let dragged = virtual_drag_rect(pointer, drag_dims, padding);
    candidates
        .iter()
        .filter(|(_, rect)| has_geometry(rect))
        .filter(|(_, rect)| rect.expand(padding).intersects(dragged))
        .min_by(|(id_a, a), (id_b, b)| {
            let da = a.center().distance_sq(pointer);
            let db = b.center().distance_sq(pointer);
            da.partial_cmp(&db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| id_a.cmp(id_b))
        })
        .map(|(id, _)| *id)
}
