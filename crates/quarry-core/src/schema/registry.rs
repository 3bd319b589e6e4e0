use super::EntityDefinition;

use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared cache of registered entity definitions.
///
/// Many sessions read the registry concurrently. Only a session performing a
/// schema operation writes to it, and the write happens after the DDL has run,
/// so readers may briefly observe a definition older than the physical table.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<IndexMap<String, Arc<EntityDefinition>>>,
}

impl ModelRegistry {
    pub fn new() -> ModelRegistry {
        ModelRegistry::default()
    }

    fn key(name: &str) -> String {
        name.to_ascii_lowercase()
    }

    pub fn get(&self, name: &str) -> Option<Arc<EntityDefinition>> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&Self::key(name))
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces a definition, returning the previous one.
    pub fn insert(&self, entity: EntityDefinition) -> Option<Arc<EntityDefinition>> {
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Self::key(&entity.name), Arc::new(entity))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<EntityDefinition>> {
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(&Self::key(name))
    }

    /// Names of every registered entity, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|entity| entity.name.clone())
            .collect()
    }

    /// Drops every cached definition.
    pub fn invalidate(&self) {
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
