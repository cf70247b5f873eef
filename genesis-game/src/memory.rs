//! In-memory port adapters for headless play and tests.
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use thiserror::Error;

use crate::catalog::{ElementId, ElementRecord};
use crate::{GameStorage, Renderer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStorageError {
    #[error("storage is refusing writes")]
    WritesDisabled,
    #[error("storage is refusing reads")]
    ReadsDisabled,
}

/// Save slots held in a shared map. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saves: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
    fail_reads: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write and delete fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Put a raw blob in a slot, bypassing failure injection.
    pub fn insert_raw(&self, save_name: &str, blob: impl Into<String>) {
        self.saves
            .borrow_mut()
            .insert(save_name.to_string(), blob.into());
    }

    #[must_use]
    pub fn raw(&self, save_name: &str) -> Option<String> {
        self.saves.borrow().get(save_name).cloned()
    }

    /// Successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl GameStorage for MemoryStorage {
    type Error = MemoryStorageError;

    fn save_game(&self, save_name: &str, blob: &str) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(MemoryStorageError::WritesDisabled);
        }
        self.insert_raw(save_name, blob);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn load_game(&self, save_name: &str) -> Result<Option<String>, Self::Error> {
        if self.fail_reads.get() {
            return Err(MemoryStorageError::ReadsDisabled);
        }
        Ok(self.raw(save_name))
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(MemoryStorageError::WritesDisabled);
        }
        self.saves.borrow_mut().remove(save_name);
        Ok(())
    }
}

/// Renderer that keeps the ids it was last asked to draw.
#[derive(Debug, Default)]
pub struct RenderLog {
    frames: Cell<usize>,
    last: RefCell<Vec<ElementId>>,
}

impl RenderLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames.get()
    }

    #[must_use]
    pub fn last_frame(&self) -> Vec<ElementId> {
        self.last.borrow().clone()
    }
}

impl Renderer for RenderLog {
    fn render(&self, discovered: &BTreeMap<ElementId, ElementRecord>) {
        self.frames.set(self.frames.get() + 1);
        *self.last.borrow_mut() = discovered.keys().cloned().collect();
    }
}
