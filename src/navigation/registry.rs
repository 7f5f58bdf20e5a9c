//! Lookup of views by the ids the configuration refers to.

use std::collections::HashMap;
use std::sync::Arc;

use crate::navigation::view::View;
use crate::navigation::views::{BevyView, GameView, HomeView, NotFoundView};

/// Maps view ids to shared view instances.
#[derive(Debug, Default, Clone)]
pub struct ViewRegistry {
    views: HashMap<String, Arc<dyn View>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in views.
    pub fn builtin(experiments: Vec<String>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HomeView::new(experiments)));
        registry.register(Arc::new(GameView));
        registry.register(Arc::new(BevyView));
        registry.register(Arc::new(NotFoundView));
        registry
    }

    /// Register a view under its own id, replacing any previous one.
    pub fn register(&mut self, view: Arc<dyn View>) {
        self.views.insert(view.id().to_string(), view);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn View>> {
        self.views.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.views.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.views.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
