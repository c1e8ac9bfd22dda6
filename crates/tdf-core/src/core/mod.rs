// crates/tdf-core/src/core/mod.rs
// ============================================================================
// Module: TDF Harness Core Types
// Description: Test records, test files, suites, and emitted documents.
// Purpose: Provide stable, serializable types shared by the grammar and the executor.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe what a test definition file means once parsed: the
//! typed test records, the accepted file that owns them, the suite that
//! groups accepted files by folder, and the documents the executor writes
//! back to the document store.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod document;
pub mod hashing;
pub mod identifiers;
pub mod record;
pub mod suite;
pub mod test_file;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use document::AuditDocument;
pub use document::AuditKind;
pub use document::AuditMethod;
pub use document::AuditStatus;
pub use document::CollectionNames;
pub use document::ResultDocument;
pub use document::SignalDocumentLayout;
pub use document::Verdict;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::DocumentDigest;
pub use hashing::HashAlgorithm;
pub use hashing::HashError;
pub use hashing::canonical_document_bytes;
pub use hashing::digest_document;
pub use hashing::hash_bytes;
pub use identifiers::CollectionName;
pub use identifiers::DocumentId;
pub use identifiers::FolderName;
pub use record::AccessMode;
pub use record::DeviceQueryTest;
pub use record::Inclusion;
pub use record::SignalInclusionTest;
pub use record::TestHeader;
pub use record::TestKind;
pub use record::TestRecord;
pub use suite::Suite;
pub use suite::SuiteError;
pub use suite::discover_test_files;
pub use suite::folder_of;
pub use test_file::TestFile;
pub use time::Timestamp;
