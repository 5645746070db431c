use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Storage;
use crate::error::PersistenceError;

/// In-memory store. Clones share the same map, which lets a test hand one
/// clone to a controller and inspect or reuse the records through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.map.borrow_mut().insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.borrow().contains_key(key)
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        self.map.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
