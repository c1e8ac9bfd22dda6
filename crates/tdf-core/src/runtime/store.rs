// crates/tdf-core/src/runtime/store.rs
// ============================================================================
// Module: TDF Harness In-Memory Document Store
// Description: Simple in-memory document store for tests and dry runs.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! Documents are kept per collection in insertion order and receive
//! sequential identifiers (`doc-1`, `doc-2`, ...). Durable deployments use
//! the SQLite store instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::identifiers::CollectionName;
use crate::core::identifiers::DocumentId;
use crate::interfaces::DocumentStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Collections plus the id counter.
#[derive(Debug, Default)]
struct StoreState {
    /// Last issued document sequence number.
    last_id: u64,
    /// Documents per collection in insertion order.
    collections: BTreeMap<CollectionName, Vec<(DocumentId, Value)>>,
}

/// In-memory document store for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every document in a collection in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when the store mutex is poisoned.
    pub fn documents(&self, collection: &CollectionName) -> Result<Vec<Value>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("document store mutex poisoned".to_string()))?;
        Ok(guard
            .collections
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    /// Returns the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when the store mutex is poisoned.
    pub fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Value>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("document store mutex poisoned".to_string()))?;
        Ok(guard
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(_, doc)| doc.clone()))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert_document(
        &self,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<DocumentId, StoreError> {
        if !document.is_object() {
            return Err(StoreError::Invalid("documents must be json objects".to_string()));
        }
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("document store mutex poisoned".to_string()))?;
        guard.last_id += 1;
        let id = DocumentId::new(format!("doc-{}", guard.last_id));
        guard
            .collections
            .entry(collection.clone())
            .or_default()
            .push((id.clone(), document.clone()));
        drop(guard);
        Ok(id)
    }

    fn find_document(
        &self,
        collection: &CollectionName,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("document store mutex poisoned".to_string()))?;
        Ok(guard.collections.get(collection).and_then(|docs| {
            docs.iter()
                .map(|(_, doc)| doc)
                .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }
}
