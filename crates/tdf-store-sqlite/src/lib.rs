// crates/tdf-store-sqlite/src/lib.rs
// ============================================================================
// Module: TDF Harness SQLite Store Library
// Description: SQLite-backed document store for results, audits, and captures.
// Purpose: Persist harness documents durably between runs.
// Dependencies: tdf-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Provides [`SqliteDocumentStore`], a [`tdf_core::DocumentStore`] that keeps
//! every collection in one `SQLite` table. Documents are stored as canonical
//! JSON beside their hash and are verified on every read.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_DOCUMENT_BYTES;
pub use store::SqliteDocumentStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
