use eframe::egui;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque widget content. The layout core stores and forwards these handles
/// and never inspects what they draw.
pub trait Renderable: Send {
    fn ui(&mut self, ui: &mut egui::Ui);

    /// Extra controls rendered in the panel header next to the built-in ones.
    fn header_ui(&mut self, _ui: &mut egui::Ui) {}
}

/// Descriptor for building renderables from JSON settings.
#[derive(Clone)]
pub struct RenderableDescriptor {
    ctor: Arc<dyn Fn(&Value) -> Box<dyn Renderable> + Send + Sync>,
    default_settings: Arc<dyn Fn() -> Value + Send + Sync>,
}

pub type RenderableFactory = RenderableDescriptor;

impl RenderableDescriptor {
    pub fn new<
        T: Renderable + 'static,
        C: DeserializeOwned + Serialize + Default + 'static,
    >(
        build: fn(C) -> T,
    ) -> Self {
        Self {
            ctor: Arc::new(move |v| {
                let cfg = serde_json::from_value::<C>(v.clone()).unwrap_or_default();
                Box::new(build(cfg))
            }),
            default_settings: Arc::new(|| {
                serde_json::to_value(C::default()).unwrap_or_else(|_| json!({}))
            }),
        }
    }

    pub fn default_settings(&self) -> Value {
        (self.default_settings)()
    }

    pub fn create(&self, settings: &Value) -> Box<dyn Renderable> {
        (self.ctor)(settings)
    }
}

/// Registry of the widget kinds the hosting application supplies. The layout
/// core only ever asks it to build a boxed handle for a kind name.
#[derive(Clone, Default)]
pub struct RenderableRegistry {
    map: HashMap<String, RenderableDescriptor>,
}

impl RenderableRegistry {
    pub fn register(&mut self, name: &str, factory: RenderableFactory) {
        self.map.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn create(&self, name: &str, settings: &Value) -> Option<Box<dyn Renderable>> {
        let settings = if settings.is_null() {
            self.default_settings(name)
                .unwrap_or_else(|| Value::Object(Default::default()))
        } else {
            settings.clone()
        };
        self.map.get(name).map(|f| f.create(&settings))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_settings(&self, name: &str) -> Option<Value> {
        self.map.get(name).map(|f| f.default_settings())
    }
}
