// crates/tdf-providers/src/capture.rs
// ============================================================================
// Module: TDF Harness Capture Import
// Description: Loads captured signaling messages into a document store.
// Purpose: Seed the signals collection before signal inclusion tests run.
// Dependencies: tdf-core, serde_json
// ============================================================================

//! ## Overview
//! A capture file holds a JSON array or YAML list of signaling messages, or a
//! single message object. Each message becomes one document in the configured
//! collection, in file order. A file is validated completely before any of
//! its messages are inserted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tdf_core::CollectionName;
use tdf_core::DocumentId;
use tdf_core::DocumentStore;
use tdf_core::EventLog;
use tdf_core::LogEvent;

use crate::source::DEFAULT_MAX_FILE_BYTES;
use crate::source::ProviderError;
use crate::source::read_document;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Capture import settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptureImportConfig {
    /// Collection receiving the messages.
    pub collection: CollectionName,
    /// Capture files, imported in order.
    pub files: Vec<PathBuf>,
    /// Maximum size of one capture file in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl CaptureImportConfig {
    /// Creates a config with the default size limit.
    #[must_use]
    pub fn new(collection: CollectionName, files: Vec<PathBuf>) -> Self {
        Self {
            collection,
            files,
            max_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Returns the default capture size limit.
const fn default_max_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureImport {
    /// Document identifiers in insertion order.
    pub document_ids: Vec<DocumentId>,
    /// Number of documents imported per file, in file order.
    pub per_file: Vec<(PathBuf, usize)>,
}

// ============================================================================
// SECTION: Import
// ============================================================================

/// Imports every configured capture file into `store`.
///
/// # Errors
///
/// Returns [`ProviderError`] for the first file that cannot be read or holds
/// a non-object message, or when the store rejects a document. Files before
/// the failing one stay imported.
pub fn import_captures(
    store: &dyn DocumentStore,
    config: &CaptureImportConfig,
    log: &EventLog,
) -> Result<CaptureImport, ProviderError> {
    let mut import = CaptureImport::default();
    for path in &config.files {
        let document = read_document(path, config.max_bytes)?;
        let messages = capture_messages(document).map_err(|reason| {
            ProviderError::Invalid(format!("{}: {reason}", path.display()))
        })?;
        for message in &messages {
            import.document_ids.push(store.insert_document(&config.collection, message)?);
        }
        log.emit(LogEvent::CaptureImported {
            path: path.display().to_string(),
            documents: messages.len(),
        });
        import.per_file.push((path.clone(), messages.len()));
    }
    Ok(import)
}

/// Splits a capture document into message objects.
fn capture_messages(document: Value) -> Result<Vec<Value>, String> {
    let messages = match document {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return Err("capture must be a list of message objects".to_string()),
    };
    if let Some(index) = messages.iter().position(|message| !message.is_object()) {
        return Err(format!("capture entry {index} is not an object"));
    }
    Ok(messages)
}
