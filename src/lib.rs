pub mod collision;
pub mod config;
pub mod dashboard;
pub mod drag;
pub mod logging;
pub mod registry;
pub mod render;
pub mod view;

pub use config::{DashboardConfig, GridConfig, PanelConfig};
pub use dashboard::Dashboard;
pub use drag::{BoundsProvider, DragController};
pub use registry::{GridPos, LayoutRegistry, PanelLayout, SizeClass, Widget};
pub use render::{Renderable, RenderableFactory, RenderableRegistry};
pub use view::ViewState;
