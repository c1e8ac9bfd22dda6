// crates/tdf-providers/src/source.rs
// ============================================================================
// Module: TDF Harness Provider Sources
// Description: Size-limited JSON and YAML file reading.
// Purpose: Share file loading between the snapshot device and capture import.
// Dependencies: serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Files are read through a byte limit and decoded by extension: `.yaml` and
//! `.yml` are YAML, everything else is JSON.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tdf_core::DeviceError;
use tdf_core::StoreError;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum provider file size in bytes.
pub const DEFAULT_MAX_FILE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// File could not be opened or read.
    #[error("provider io error: {0}")]
    Io(String),
    /// File exceeds the configured size limit.
    #[error("provider file exceeds size limit: {path} ({max_bytes} bytes max)")]
    TooLarge {
        /// File path.
        path: String,
        /// Configured limit.
        max_bytes: usize,
    },
    /// File content could not be decoded.
    #[error("provider parse error: {0}")]
    Parse(String),
    /// Decoded content has the wrong shape.
    #[error("provider invalid data: {0}")]
    Invalid(String),
    /// Device state could not be updated.
    #[error("provider device error: {0}")]
    Device(#[from] DeviceError),
    /// Store rejected an imported document.
    #[error("provider store error: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Encoding of a provider file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Self::Yaml
        } else {
            Self::Json
        }
    }
}

// ============================================================================
// SECTION: Reading
// ============================================================================

/// Reads and decodes a JSON or YAML file.
///
/// # Errors
///
/// Returns [`ProviderError`] when the file cannot be read, exceeds
/// `max_bytes`, or does not decode.
pub fn read_document(path: &Path, max_bytes: usize) -> Result<Value, ProviderError> {
    let content = read_file_limited(path, max_bytes)?;
    let display = path.display();
    match DocumentFormat::for_path(path) {
        DocumentFormat::Yaml => serde_yaml::from_slice(&content)
            .map_err(|err| ProviderError::Parse(format!("{display}: invalid yaml: {err}"))),
        DocumentFormat::Json => serde_json::from_slice(&content)
            .map_err(|err| ProviderError::Parse(format!("{display}: invalid json: {err}"))),
    }
}

/// Reads a file while enforcing a maximum byte limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ProviderError> {
    let file = File::open(path)
        .map_err(|err| ProviderError::Io(format!("{}: {err}", path.display())))?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| ProviderError::Invalid("size limit exceeds u64".to_string()))?;
    let mut buf = Vec::new();
    file.take(limit)
        .read_to_end(&mut buf)
        .map_err(|err| ProviderError::Io(format!("{}: {err}", path.display())))?;
    if buf.len() > max_bytes {
        return Err(ProviderError::TooLarge {
            path: path.display().to_string(),
            max_bytes,
        });
    }
    Ok(buf)
}
