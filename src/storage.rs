//! Flat key-value storage backends.
//!
//! The browser build persists into `window.localStorage`; host builds and tests use
//! [`MemoryStore`], which can also be told to fail so persistence degradation is testable.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::PersistenceError;

/// Durable string store. Writes are synchronous: when `set` returns `Ok` the value is stored.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_writes: bool,
    fail_reads: bool,
}

/// In-memory store. Clones share the same entries, which lets a test "reload" a
/// [`ProgressStore`](crate::progress::ProgressStore) over the data a previous one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates quota exhaustion / disabled storage for subsequent writes.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let inner = self.inner.borrow();
        if inner.fail_reads {
            return Err(PersistenceError::Unavailable("memory store reads disabled".into()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                reason: "quota exceeded".into(),
            });
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                reason: "quota exceeded".into(),
            });
        }
        inner.entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage` adapter. Absent storage (private mode, disabled cookies) surfaces
/// as [`PersistenceError::Unavailable`] on every call rather than at construction.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable; progress will not survive a reload");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PersistenceError> {
        self.storage
            .as_ref()
            .ok_or_else(|| PersistenceError::Unavailable("window.localStorage".into()))
    }
}

#[cfg(target_arch = "wasm32")]
fn js_reason(err: wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| PersistenceError::Unavailable(js_reason(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| PersistenceError::WriteFailed {
                key: key.to_string(),
                reason: js_reason(e),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| PersistenceError::WriteFailed {
                key: key.to_string(),
                reason: js_reason(e),
            })
    }
}
