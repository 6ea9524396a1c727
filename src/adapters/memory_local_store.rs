use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::AppError;
use crate::ports::LocalStore;

/// In-memory local store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    // Arc<Mutex> so a test can keep a clone and inspect what the code wrote.
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.entries.lock().map_err(|_| AppError::Storage("memory store lock poisoned".into()))
    }
}

impl LocalStore for MemoryLocalStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), AppError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
