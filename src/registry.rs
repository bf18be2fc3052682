use crate::render::Renderable;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Column footprint of a widget. Maps to a column span, not a pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Full,
}

impl Default for SizeClass {
    fn default() -> Self {
        Self::Medium
    }
}

impl SizeClass {
    pub fn col_span(self, grid_cols: u8) -> u8 {
        let cols = grid_cols.max(1);
        match self {
            SizeClass::Small => 1,
            SizeClass::Medium => cols.min(2),
            SizeClass::Large => cols.min(3),
            SizeClass::Full => cols,
        }
    }
}

/// Ordinal grid coordinate used for sorting and default ordering.
///
/// `y` is declared first so the derived `Ord` is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub y: u8,
    pub x: u8,
}

impl GridPos {
    pub fn new(x: u8, y: u8) -> Self {
        Self { y, x }
    }
}

/// A dashboard panel: layout-relevant state plus the opaque content handle.
pub struct Widget {
    pub id: String,
    pub title: String,
    pub renderable: Box<dyn Renderable>,
    pub size_class: SizeClass,
    pub position: GridPos,
    pub visible: bool,
    pub minimized: bool,
}

impl Widget {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        renderable: Box<dyn Renderable>,
        size_class: SizeClass,
        position: GridPos,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            renderable,
            size_class,
            position,
            visible: true,
            minimized: false,
        }
    }
}

/// Layout fields of one widget as recorded in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub id: String,
    pub size_class: SizeClass,
    pub position: GridPos,
    pub visible: bool,
    pub minimized: bool,
}

impl From<&Widget> for PanelLayout {
    fn from(widget: &Widget) -> Self {
        Self {
            id: widget.id.clone(),
            size_class: widget.size_class,
            position: widget.position,
            visible: widget.visible,
            minimized: widget.minimized,
        }
    }
}

/// Canonical store of widget records. The snapshot is captured once at
/// construction and is the sole source for `reset`.
pub struct LayoutRegistry {
    widgets: Vec<Widget>,
    snapshot: Vec<PanelLayout>,
}

impl LayoutRegistry {
    pub fn new(widgets: Vec<Widget>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for widget in &widgets {
            if !seen.insert(widget.id.as_str()) {
                anyhow::bail!("duplicate widget id '{}'", widget.id);
            }
        }
        let snapshot = widgets.iter().map(PanelLayout::from).collect();
        Ok(Self { widgets, snapshot })
    }

    pub fn list(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn list_mut(&mut self) -> &mut [Widget] {
        &mut self.widgets
    }

    pub fn get(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub fn snapshot(&self) -> &[PanelLayout] {
        &self.snapshot
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        match self.get_mut(id) {
            Some(widget) => {
                widget.visible = visible;
                tracing::debug!(%id, visible, "widget visibility updated");
            }
            None => tracing::debug!(%id, "set_visible on unknown widget"),
        }
    }

    pub fn set_minimized(&mut self, id: &str, minimized: bool) {
        match self.get_mut(id) {
            Some(widget) => {
                widget.minimized = minimized;
                tracing::debug!(%id, minimized, "widget minimize flag updated");
            }
            None => tracing::debug!(%id, "set_minimized on unknown widget"),
        }
    }

    pub fn toggle_visible(&mut self, id: &str) {
        if let Some(visible) = self.get(id).map(|w| w.visible) {
            self.set_visible(id, !visible);
        }
    }

    pub fn toggle_minimized(&mut self, id: &str) {
        if let Some(minimized) = self.get(id).map(|w| w.minimized) {
            self.set_minimized(id, !minimized);
        }
    }

    /// Swap the grid positions of two widgets. A no-op when the ids are
    /// equal, either id is unknown, or either widget is hidden. Returns
    /// whether a swap happened.
    pub fn swap_positions(&mut self, id_a: &str, id_b: &str) -> bool {
        if id_a == id_b {
            return false;
        }
        let Some(a) = self.widgets.iter().position(|w| w.id == id_a) else {
            tracing::debug!(id = %id_a, "swap with unknown widget");
            return false;
        };
        let Some(b) = self.widgets.iter().position(|w| w.id == id_b) else {
            tracing::debug!(id = %id_b, "swap with unknown widget");
            return false;
        };
        if !self.widgets[a].visible || !self.widgets[b].visible {
            tracing::debug!(%id_a, %id_b, "swap rejected, widget hidden");
            return false;
        }
        let pos = self.widgets[a].position;
        self.widgets[a].position = self.widgets[b].position;
        self.widgets[b].position = pos;
        tracing::debug!(%id_a, %id_b, "widget positions swapped");
        true
    }

    /// Restore every widget's layout fields and the record ordering to the
    /// snapshot taken at construction. Unconditional and idempotent.
    pub fn reset(&mut self) {
        let order: HashMap<String, usize> = self
            .snapshot
            .iter()
            .enumerate()
            .map(|(idx, layout)| (layout.id.clone(), idx))
            .collect();
        for widget in &mut self.widgets {
            if let Some(&idx) = order.get(&widget.id) {
                let layout = &self.snapshot[idx];
                widget.size_class = layout.size_class;
                widget.position = layout.position;
                widget.visible = layout.visible;
                widget.minimized = layout.minimized;
            }
        }
        self.widgets
            .sort_by_key(|w| order.get(&w.id).copied().unwrap_or(usize::MAX));
        tracing::debug!("layout reset to snapshot");
    }
}
