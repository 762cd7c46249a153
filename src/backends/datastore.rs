// In-memory named collection for hosts without persistent storage, and for tests

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::components::NamedCollection;

#[derive(Debug, Default)]
pub struct InMemoryDataStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl NamedCollection for InMemoryDataStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}
