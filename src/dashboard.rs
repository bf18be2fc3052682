use crate::config::DashboardConfig;
use crate::drag::{BoundsProvider, DragController};
use crate::registry::{LayoutRegistry, Widget};
use crate::render::RenderableRegistry;
use crate::view::ViewState;
use eframe::egui;
use std::collections::HashMap;

/// Slot rectangles captured while painting a frame. They feed the drag
/// controller as the bounding-box source on the following pointer events.
#[derive(Default)]
struct FrameBounds(HashMap<String, egui::Rect>);

impl BoundsProvider for FrameBounds {
    fn bounds(&self, id: &str) -> Option<egui::Rect> {
        self.0.get(id).copied()
    }
}

enum HeaderOp {
    ToggleMinimized(String),
    Hide(String),
    Expand(String),
}

enum PointerOp {
    Start { id: String, dims: egui::Vec2 },
    Move(egui::Pos2),
    Drop,
}

/// The rearrangeable widget grid. Owns the layout registry, the drag state
/// machine and the expand overlay for one mounted dashboard view; dropped
/// together with the view.
pub struct Dashboard {
    pub config: DashboardConfig,
    registry: LayoutRegistry,
    drag: DragController,
    view: ViewState,
    bounds: FrameBounds,
    pub warnings: Vec<String>,
}

impl Dashboard {
    /// Compile the configuration into widget records using the host-supplied
    /// renderable registry. Panels with unregistered widget kinds are dropped
    /// with a warning; duplicate panel ids are an error.
    pub fn new(
        mut config: DashboardConfig,
        renderables: &RenderableRegistry,
    ) -> anyhow::Result<Self> {
        let warnings = config.sanitize(renderables);
        let mut widgets = Vec::with_capacity(config.panels.len());
        for panel in &config.panels {
            let Some(content) = renderables.create(&panel.widget, &panel.settings) else {
                continue;
            };
            let title = if panel.title.is_empty() {
                panel.id.clone()
            } else {
                panel.title.clone()
            };
            widgets.push(Widget::new(&panel.id, title, content, panel.size, panel.position));
        }
        let registry = LayoutRegistry::new(widgets)?;
        let drag = DragController::new(config.collision_padding);
        Ok(Self {
            config,
            registry,
            drag,
            view: ViewState::default(),
            bounds: FrameBounds::default(),
            warnings,
        })
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LayoutRegistry {
        &mut self.registry
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Slot rectangle of a widget as of the last painted frame.
    pub fn bounds_of(&self, id: &str) -> Option<egui::Rect> {
        self.bounds.bounds(id)
    }

    pub fn expand(&mut self, id: &str) {
        self.view.expand(&self.registry, id);
    }

    pub fn collapse(&mut self) {
        self.view.collapse();
    }

    /// Discard every user rearrangement: abort any drag, leave the expanded
    /// view and restore the registry to the compiled snapshot.
    pub fn reset(&mut self) {
        self.drag.cancel();
        self.view.collapse();
        self.registry.reset();
    }

    // Pointer/drag event entry points, also driven by `ui` below.

    pub fn drag_started(&mut self, id: &str, dims: egui::Vec2) {
        self.drag.start(&self.registry, id, dims);
    }

    pub fn pointer_moved(&mut self, pos: egui::Pos2) {
        self.drag.update_pointer(&self.registry, &self.bounds, pos);
    }

    pub fn dropped(&mut self) -> bool {
        self.drag.drop(&mut self.registry)
    }

    pub fn drag_ended(&mut self) {
        self.drag.end();
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.cancel_drag();
        }
        match self.view.expanded().map(str::to_owned) {
            Some(id) => self.expanded_ui(ui, &id),
            None => self.grid_ui(ui),
        }
    }

    fn expanded_ui(&mut self, ui: &mut egui::Ui, id: &str) {
        let mut restore = false;
        match self.registry.get_mut(id) {
            Some(widget) => {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.heading(&widget.title);
                            if ui.small_button("Restore").on_hover_text("Back to grid").clicked()
                            {
                                restore = true;
                            }
                            widget.renderable.header_ui(ui);
                        });
                        widget.renderable.ui(ui);
                    });
                });
            }
            // The expanded widget can disappear mid-session.
            None => restore = true,
        }
        if restore {
            self.view.collapse();
        }
    }

    fn grid_ui(&mut self, ui: &mut egui::Ui) {
        let cols = self.config.grid.cols.max(1);
        let row_h = self.config.grid.row_height;

        // Plan slot placement up front so the total grid height is known.
        let mut order: Vec<usize> = self
            .registry
            .list()
            .iter()
            .enumerate()
            .filter(|(_, w)| w.visible)
            .map(|(i, _)| i)
            .collect();
        order.sort_by_key(|&i| self.registry.list()[i].position);

        let mut placements: Vec<(usize, u8, u8, u8)> = Vec::with_capacity(order.len());
        let (mut col, mut row) = (0u8, 0u8);
        for &i in &order {
            let span = self.registry.list()[i].size_class.col_span(cols);
            if col + span > cols {
                col = 0;
                row += 1;
            }
            placements.push((i, col, row, span));
            col += span;
            if col >= cols {
                col = 0;
                row += 1;
            }
        }
        let rows = placements.iter().map(|&(_, _, r, _)| r + 1).max().unwrap_or(0);

        let col_w = ui.available_width() / cols as f32;
        let grid_size = egui::vec2(ui.available_width(), rows as f32 * row_h);
        let (rect, _) = ui.allocate_exact_size(grid_size, egui::Sense::hover());
        let mut child = ui.child_ui(rect, egui::Layout::top_down(egui::Align::LEFT));

        let highlighted = self.drag.highlighted_target().map(str::to_owned);
        let mut frame_bounds = HashMap::new();
        let mut header_ops: Vec<HeaderOp> = Vec::new();
        let mut pointer_ops: Vec<PointerOp> = Vec::new();

        for &(idx, col, row, span) in &placements {
            let slot_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(col_w * col as f32, row_h * row as f32),
                egui::vec2(col_w * span as f32, row_h),
            );
            let slot_clip = slot_rect.intersect(child.clip_rect());
            let widget = &mut self.registry.list_mut()[idx];
            let widget_id = widget.id.clone();
            child.allocate_ui_at_rect(slot_rect, |slot_ui| {
                slot_ui.set_clip_rect(slot_clip);
                slot_ui.set_min_size(slot_rect.size());
                Self::panel_ui(widget, slot_rect, slot_ui, &mut header_ops, &mut pointer_ops);
            });
            if highlighted.as_deref() == Some(widget_id.as_str()) {
                child.painter().rect_stroke(
                    slot_rect,
                    2.0,
                    (2.0, child.visuals().selection.stroke.color),
                );
            }
            frame_bounds.insert(widget_id, slot_rect);
        }

        self.bounds = FrameBounds(frame_bounds);

        // A release with no drop event this frame (for example after the
        // dragged widget was hidden) ends the gesture without mutation.
        if self.drag.is_dragging()
            && !pointer_ops
                .iter()
                .any(|op| matches!(op, PointerOp::Drop | PointerOp::Start { .. }))
            && !ui.input(|i| i.pointer.any_down())
        {
            self.drag.end();
        }

        for op in pointer_ops {
            match op {
                PointerOp::Start { id, dims } => self.drag_started(&id, dims),
                PointerOp::Move(pos) => self.pointer_moved(pos),
                PointerOp::Drop => {
                    self.dropped();
                }
            }
        }
        for op in header_ops {
            match op {
                HeaderOp::ToggleMinimized(id) => self.registry.toggle_minimized(&id),
                HeaderOp::Hide(id) => self.registry.set_visible(&id, false),
                HeaderOp::Expand(id) => self.view.expand(&self.registry, &id),
            }
        }
    }

    fn panel_ui(
        widget: &mut Widget,
        slot_rect: egui::Rect,
        ui: &mut egui::Ui,
        header_ops: &mut Vec<HeaderOp>,
        pointer_ops: &mut Vec<PointerOp>,
    ) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical(|ui| {
                let header = ui.horizontal(|ui| {
                    ui.heading(&widget.title);
                    let minimize_label = if widget.minimized { "+" } else { "–" };
                    if ui
                        .small_button(minimize_label)
                        .on_hover_text("Minimize")
                        .clicked()
                    {
                        header_ops.push(HeaderOp::ToggleMinimized(widget.id.clone()));
                    }
                    if ui.small_button("⛶").on_hover_text("Expand").clicked() {
                        header_ops.push(HeaderOp::Expand(widget.id.clone()));
                    }
                    if ui.small_button("✕").on_hover_text("Hide").clicked() {
                        header_ops.push(HeaderOp::Hide(widget.id.clone()));
                    }
                    widget.renderable.header_ui(ui);
                });

                // Drag sense only, so the header buttons keep their clicks.
                let drag_resp = ui.interact(
                    header.response.rect,
                    ui.id().with(("panel-drag", widget.id.as_str())),
                    egui::Sense::drag(),
                );
                if drag_resp.drag_started() {
                    pointer_ops.push(PointerOp::Start {
                        id: widget.id.clone(),
                        dims: slot_rect.size(),
                    });
                }
                if drag_resp.dragged() {
                    if let Some(pos) = drag_resp.interact_pointer_pos() {
                        pointer_ops.push(PointerOp::Move(pos));
                    }
                }
                if drag_resp.drag_stopped() {
                    pointer_ops.push(PointerOp::Drop);
                }

                // A minimized widget keeps its slot but suppresses its body.
                if !widget.minimized {
                    widget.renderable.ui(ui);
                }
            });
        });
    }
}
