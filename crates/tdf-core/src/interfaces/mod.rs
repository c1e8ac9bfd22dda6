// crates/tdf-core/src/interfaces/mod.rs
// ============================================================================
// Module: TDF Harness Interfaces
// Description: Capability traits for the document store, device agent, publisher, and clock.
// Purpose: Define the only surfaces through which the executor reaches outside systems.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The executor consumes four narrow capabilities. Implementations decide
//! transport, persistence, and timeouts; the core only sees results.
//! Store and publisher failures are fatal to a run. Device failures are
//! recorded against the test that caused them and the run continues.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::CollectionName;
use crate::core::identifiers::DocumentId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Document Store
// ============================================================================

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("document store io error: {0}")]
    Io(String),
    /// Stored data failed integrity checks.
    #[error("document store corruption: {0}")]
    Corrupt(String),
    /// Stored data version is incompatible.
    #[error("document store version mismatch: {0}")]
    VersionMismatch(String),
    /// The document was rejected.
    #[error("document store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("document store error: {0}")]
    Store(String),
}

/// Collection-oriented document store.
pub trait DocumentStore {
    /// Inserts a document and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert_document(
        &self,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<DocumentId, StoreError>;

    /// Returns the earliest inserted document whose top-level `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_document(
        &self,
        collection: &CollectionName,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError>;
}

/// Shared document store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedDocumentStore {
    /// Inner store implementation.
    inner: Arc<dyn DocumentStore + Send + Sync>,
}

impl SharedDocumentStore {
    /// Wraps a document store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl DocumentStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl DocumentStore for SharedDocumentStore {
    fn insert_document(
        &self,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<DocumentId, StoreError> {
        self.inner.insert_document(collection, document)
    }

    fn find_document(
        &self,
        collection: &CollectionName,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.inner.find_document(collection, field, value)
    }
}

// ============================================================================
// SECTION: Device Agent
// ============================================================================

/// Device call errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device could not be reached.
    #[error("device transport error: {0}")]
    Transport(String),
    /// The device answered and refused the request.
    #[error("device rejected request: {0}")]
    Rejected(String),
}

/// Value and type tag read from a device object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReading {
    /// Value rendered as text.
    pub value: String,
    /// Type tag reported by the device, for example `INTEGER`.
    pub value_type: String,
}

/// Management agent on the device under test.
pub trait DeviceAgent {
    /// Reads an object.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError`] when the read fails or is refused.
    fn get(&self, oid: &str) -> Result<DeviceReading, DeviceError>;

    /// Writes an object.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError`] when the write fails or is refused.
    fn set(&self, oid: &str, value: &str, value_type: &str) -> Result<(), DeviceError>;
}

/// Shared device agent backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedDeviceAgent {
    /// Inner agent implementation.
    inner: Arc<dyn DeviceAgent + Send + Sync>,
}

impl SharedDeviceAgent {
    /// Wraps a device agent in a shared, clonable wrapper.
    #[must_use]
    pub fn from_agent(agent: impl DeviceAgent + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(agent),
        }
    }

    /// Wraps an existing shared agent.
    #[must_use]
    pub const fn new(agent: Arc<dyn DeviceAgent + Send + Sync>) -> Self {
        Self {
            inner: agent,
        }
    }
}

impl DeviceAgent for SharedDeviceAgent {
    fn get(&self, oid: &str) -> Result<DeviceReading, DeviceError> {
        self.inner.get(oid)
    }

    fn set(&self, oid: &str, value: &str, value_type: &str) -> Result<(), DeviceError> {
        self.inner.set(oid, value, value_type)
    }
}

// ============================================================================
// SECTION: Result Publisher
// ============================================================================

/// Notification that a result document was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultNotice {
    /// Channel the notice is addressed to.
    pub channel: String,
    /// Identifier of the stored result document.
    pub result_id: DocumentId,
    /// Test name the result belongs to.
    pub test_name: String,
}

/// Receipt returned by a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Publisher-assigned receipt identifier.
    pub receipt_id: String,
    /// Publisher name.
    pub publisher: String,
}

/// Publisher errors.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Publisher reported an error.
    #[error("publish error: {0}")]
    PublishFailed(String),
}

/// Announces stored results to downstream consumers.
pub trait ResultPublisher {
    /// Publishes a result notice.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when delivery fails.
    fn publish(&self, notice: &ResultNotice) -> Result<PublishReceipt, PublishError>;
}

/// Shared publisher backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedResultPublisher {
    /// Inner publisher implementation.
    inner: Arc<dyn ResultPublisher + Send + Sync>,
}

impl SharedResultPublisher {
    /// Wraps a publisher in a shared, clonable wrapper.
    #[must_use]
    pub fn from_publisher(publisher: impl ResultPublisher + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(publisher),
        }
    }

    /// Wraps an existing shared publisher.
    #[must_use]
    pub const fn new(publisher: Arc<dyn ResultPublisher + Send + Sync>) -> Self {
        Self {
            inner: publisher,
        }
    }
}

impl ResultPublisher for SharedResultPublisher {
    fn publish(&self, notice: &ResultNotice) -> Result<PublishReceipt, PublishError> {
        self.inner.publish(notice)
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of timestamps for audit documents and log records.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}
