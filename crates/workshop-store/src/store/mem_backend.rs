use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since a repository has a single
/// writer. This keeps the `StorageBackend` trait on `&self`.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<PathBuf, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper: the raw text stored at `path`, if any.
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Test helper: store raw text at `path`, bypassing write error simulation.
    pub fn put_raw(&self, path: &Path, content: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl StorageBackend for MemBackend {
    fn read_text(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(StoreError::Store("Simulated write error".to_string()));
        }
        self.put_raw(path, content);
        Ok(())
    }
}
