use crate::collision;
use crate::registry::{GridPos, SizeClass};
use crate::render::RenderableRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn default_version() -> u32 {
    1
}

fn default_cols() -> u8 {
    4
}

fn default_row_height() -> f32 {
    240.0
}

fn default_padding() -> f32 {
    collision::DEFAULT_PADDING
}

/// Grid definition for the dashboard layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: u8,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            row_height: default_row_height(),
        }
    }
}

/// One panel of the dashboard: which widget kind fills it and where it sits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub widget: String,
    #[serde(default)]
    pub size: SizeClass,
    pub position: GridPos,
    #[serde(default)]
    pub settings: Value,
}

impl PanelConfig {
    pub fn with_widget(id: &str, title: &str, widget: &str, size: SizeClass, x: u8, y: u8) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            widget: widget.to_string(),
            size,
            position: GridPos::new(x, y),
            settings: Value::Object(Default::default()),
        }
    }
}

/// Primary dashboard configuration. The `Default` layout is the compiled-in
/// snapshot that `reset` always returns to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default = "default_padding")]
    pub collision_padding: f32,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            grid: GridConfig::default(),
            collision_padding: default_padding(),
            panels: vec![
                PanelConfig::with_widget(
                    "machine_health",
                    "Machine Health",
                    "machine_health",
                    SizeClass::Medium,
                    0,
                    0,
                ),
                PanelConfig::with_widget(
                    "alert_feed",
                    "Active Alerts",
                    "alert_feed",
                    SizeClass::Medium,
                    2,
                    0,
                ),
                PanelConfig::with_widget(
                    "sensor_trends",
                    "Sensor Trends",
                    "sensor_trends",
                    SizeClass::Large,
                    0,
                    1,
                ),
                PanelConfig::with_widget(
                    "work_orders",
                    "Open Work Orders",
                    "work_orders",
                    SizeClass::Small,
                    3,
                    1,
                ),
                PanelConfig::with_widget(
                    "downtime_summary",
                    "Downtime Summary",
                    "downtime_summary",
                    SizeClass::Medium,
                    0,
                    2,
                ),
                PanelConfig::with_widget(
                    "fleet_status",
                    "Fleet Status",
                    "fleet_status",
                    SizeClass::Medium,
                    2,
                    2,
                ),
            ],
        }
    }
}

impl DashboardConfig {
    /// Remove panels whose widget kind is unregistered and normalize empty
    /// settings. Returns human-readable warnings for everything dropped.
    pub fn sanitize(&mut self, registry: &RenderableRegistry) -> Vec<String> {
        let mut warnings = Vec::new();
        self.panels.retain(|panel| {
            if panel.widget.is_empty() || !registry.contains(&panel.widget) {
                tracing::warn!(widget = %panel.widget, "unknown dashboard widget dropped");
                warnings.push(format!("unknown dashboard widget '{}' dropped", panel.widget));
                return false;
            }
            true
        });
        for panel in &mut self.panels {
            if panel.settings.is_null() {
                panel.settings = registry
                    .default_settings(&panel.widget)
                    .unwrap_or_else(|| json!({}));
            }
        }
        warnings
    }
}
