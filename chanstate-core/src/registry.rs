//! Per-engine ownership of state documents.
//!
//! Each engine instance owns at most one [`StateDocument`], created on the
//! first write and dropped with the instance's [`EngineHandle`]. Documents
//! are never shared between engine instances. When several engines live in
//! one process the table is held behind a [`SharedRegistry`]. The table lock
//! is only held to find or insert an engine's slot; reading, merging and
//! serializing happen under that slot's own lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chanstate_types::EngineId;

use crate::document::StateDocument;

/// One engine's document, locked independently of the table.
pub type DocumentSlot = Arc<Mutex<StateDocument>>;

#[derive(Debug, Default)]
pub struct EngineStateRegistry {
    documents: HashMap<EngineId, DocumentSlot>,
}

impl EngineStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot owned by `engine`, created empty on the first call.
    pub fn get_or_create(&mut self, engine: EngineId) -> DocumentSlot {
        self.documents
            .entry(engine)
            .or_insert_with(|| {
                log::info!(target: "registry", "creating new internal state object for {}", engine);
                Arc::new(Mutex::new(StateDocument::new()))
            })
            .clone()
    }

    /// Non-creating lookup. `None` until something has been written for `engine`.
    pub fn get(&self, engine: EngineId) -> Option<DocumentSlot> {
        self.documents.get(&engine).cloned()
    }

    pub fn remove(&mut self, engine: EngineId) -> Option<DocumentSlot> {
        self.documents.remove(&engine)
    }

    pub fn contains(&self, engine: EngineId) -> bool {
        self.documents.contains_key(&engine)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn lock_document(slot: &Mutex<StateDocument>) -> MutexGuard<'_, StateDocument> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry table shared by every engine instance in the process.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<EngineStateRegistry>>,
    next_id: Arc<AtomicU32>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineStateRegistry::new())),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Process-wide registry, created on first use.
    pub fn global() -> &'static SharedRegistry {
        static GLOBAL: OnceLock<SharedRegistry> = OnceLock::new();
        GLOBAL.get_or_init(SharedRegistry::new)
    }

    /// Register a new engine instance and return its identity.
    pub fn attach(&self) -> EngineHandle {
        let id = EngineId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        log::debug!(target: "registry", "attached {}", id);
        EngineHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Run `f` with the table locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut EngineStateRegistry) -> R) -> R {
        f(&mut self.lock())
    }

    /// Number of engine instances that currently own a document.
    pub fn document_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, EngineStateRegistry> {
        // The table only maps ids to slots, a panic elsewhere cannot leave it half-written
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of one engine instance within a [`SharedRegistry`].
///
/// Dropping the handle tears down the instance's document.
#[derive(Debug)]
pub struct EngineHandle {
    id: EngineId,
    registry: SharedRegistry,
}

impl EngineHandle {
    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn has_document(&self) -> bool {
        self.registry.with(|r| r.contains(self.id))
    }

    /// Read-only access; `None` if nothing was ever written for this instance.
    pub fn with_document<R>(&self, f: impl FnOnce(Option<&StateDocument>) -> R) -> R {
        match self.registry.with(|r| r.get(self.id)) {
            Some(slot) => {
                let doc = lock_document(&slot);
                f(Some(&*doc))
            }
            None => f(None),
        }
    }

    /// Mutable access, creating the document on first use.
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut StateDocument) -> R) -> R {
        let slot = self.registry.with(|r| r.get_or_create(self.id));
        let mut doc = lock_document(&slot);
        f(&mut doc)
    }

    /// Install `document` as the whole store of this instance, discarding the old one.
    pub fn replace_document(&self, document: StateDocument) {
        self.with_document_mut(|doc| *doc = document);
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.registry.with(|r| r.remove(self.id)).is_some() {
            log::debug!(target: "registry", "released state document of {}", self.id);
        }
    }
}
