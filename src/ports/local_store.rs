//! Device-local key-value store port.

use std::sync::Arc;

use crate::domain::AppError;

/// Port for the string key-value store that outlives a page load.
pub trait LocalStore: Send + Sync {
    /// Value stored under `key`, `None` if nothing was written.
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove `key`. Clearing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<(), AppError>;
}

impl<T: LocalStore + ?Sized> LocalStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).write(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), AppError> {
        (**self).clear(key)
    }
}
