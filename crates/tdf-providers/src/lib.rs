// crates/tdf-providers/src/lib.rs
// ============================================================================
// Module: TDF Harness Providers
// Description: File-backed collaborators for the test executor.
// Purpose: Replay device state and captured signaling from local files.
// Dependencies: tdf-core, serde, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! This crate ships collaborators that read local JSON or YAML files: a
//! snapshot-backed [`tdf_core::DeviceAgent`] and an importer that loads
//! captured signaling messages into any [`tdf_core::DocumentStore`].
//! Invariants:
//! - Files are read with a byte limit and rejected when they exceed it.
//! - Malformed files fail closed; nothing is partially applied from a file
//!   that does not parse.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod capture;
pub mod snapshot;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use capture::CaptureImport;
pub use capture::CaptureImportConfig;
pub use capture::import_captures;
pub use snapshot::SnapshotDevice;
pub use snapshot::SnapshotDeviceConfig;
pub use snapshot::SnapshotEntry;
pub use source::DEFAULT_MAX_FILE_BYTES;
pub use source::DocumentFormat;
pub use source::ProviderError;
pub use source::read_document;
