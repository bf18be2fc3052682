use crate::registry::LayoutRegistry;

/// Exclusive full-view overlay. Purely view-side state: expanding and
/// collapsing never mutate the registry, so the grid comes back exactly as it
/// was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    expanded: Option<String>,
}

impl ViewState {
    /// Put one widget into exclusive full view. At most one widget is
    /// expanded at a time; unknown or hidden ids are ignored.
    pub fn expand(&mut self, registry: &LayoutRegistry, id: &str) {
        match registry.get(id) {
            Some(widget) if widget.visible => {
                self.expanded = Some(id.to_string());
                tracing::debug!(%id, "widget expanded");
            }
            _ => tracing::debug!(%id, "expand ignored, unknown or hidden widget"),
        }
    }

    /// Return to the grid view.
    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }
}
