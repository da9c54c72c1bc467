// core/src/storage.rs

//! Injected key-value storage.
//!
//! In a browser the cart lives in `localStorage`, the payment-form autosave
//! in `sessionStorage`, and the post-order clear signal in a cookie.
//! All three are string key-value stores, so the whole persistence surface is
//! one object-safe trait with `get`/`set`/`remove`. Components take the trait,
//! never a concrete store, so tests swap in [`MemoryStorage`] directly.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StorageError;

pub trait StorageBackend: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
  fn remove(&self, key: &str) -> Result<(), StorageError>;

  /// Reads and deletes a key in one operation. Used for short-lived markers
  /// (e.g. the server-set clear-cart signal) that must be consumed once.
  fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
    let value = self.get(key)?;
    if value.is_some() {
      self.remove(key)?;
    }
    Ok(value)
  }
}

/// In-memory store over a `parking_lot::RwLock`.
///
/// Serves both as the test fake and as a session-scoped store in headless
/// embeddings. Clones share the same map, mirroring how every script on a
/// page sees the same underlying storage.
#[derive(Clone, Default)]
pub struct MemoryStorage {
  entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }
}

impl StorageBackend for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.entries.read().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    self.entries.write().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    self.entries.write().remove(key);
    Ok(())
  }
}

impl<S: StorageBackend + ?Sized> StorageBackend for Arc<S> {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    (**self).set(key, value)
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    (**self).remove(key)
  }
}
