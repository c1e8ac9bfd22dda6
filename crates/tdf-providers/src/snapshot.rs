// crates/tdf-providers/src/snapshot.rs
// ============================================================================
// Module: TDF Harness Snapshot Device
// Description: Device agent replaying an object table captured from a device.
// Purpose: Run device query tests without a live management agent.
// Dependencies: tdf-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A snapshot is a JSON or YAML list of objects:
//!
//! ```yaml
//! - oid: 1.3.6.1.2.1.1.3.0
//!   type: TimeTicks
//!   value: 4200
//! - oid: 1.3.6.1.2.1.1.5.0
//!   type: OCTET_STRING
//!   value: edge-router
//!   writable: true
//! ```
//!
//! Scalar values are stored as text. Objects flagged `unreachable` fail every
//! call in transport, which replays a device that stopped answering for them.
//! Invariants:
//! - Every OID appears at most once.
//! - Writes change only the in-memory table, never the snapshot file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tdf_core::DeviceAgent;
use tdf_core::DeviceError;
use tdf_core::DeviceObject;
use tdf_core::DeviceReading;
use tdf_core::InMemoryDeviceAgent;

use crate::source::DEFAULT_MAX_FILE_BYTES;
use crate::source::ProviderError;
use crate::source::read_document;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for a snapshot device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotDeviceConfig {
    /// Snapshot file path.
    pub path: PathBuf,
    /// Maximum snapshot size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl SnapshotDeviceConfig {
    /// Creates a config with the default size limit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Returns the default snapshot size limit.
const fn default_max_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

// ============================================================================
// SECTION: Snapshot Entries
// ============================================================================

/// One object in a snapshot file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotEntry {
    /// Object identifier.
    pub oid: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Scalar value.
    pub value: Value,
    /// Whether writes are accepted.
    #[serde(default)]
    pub writable: bool,
    /// Whether calls fail in transport.
    #[serde(default)]
    pub unreachable: bool,
}

impl SnapshotEntry {
    /// Renders the scalar value as device text.
    fn value_text(&self) -> Result<String, ProviderError> {
        match &self.value {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => Err(ProviderError::Invalid(
                format!("{}: snapshot value must be a scalar", self.oid),
            )),
        }
    }
}

// ============================================================================
// SECTION: Snapshot Device
// ============================================================================

/// Device agent serving a snapshot from memory.
#[derive(Debug, Clone)]
pub struct SnapshotDevice {
    /// Backing object table.
    agent: InMemoryDeviceAgent,
    /// Number of objects loaded.
    objects: usize,
}

impl SnapshotDevice {
    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the file cannot be read or holds
    /// invalid entries.
    pub fn load(config: &SnapshotDeviceConfig) -> Result<Self, ProviderError> {
        let document = read_document(&config.path, config.max_bytes)?;
        let entries: Vec<SnapshotEntry> = serde_json::from_value(document).map_err(|err| {
            ProviderError::Invalid(format!("{}: {err}", config.path.display()))
        })?;
        Self::from_entries(entries)
    }

    /// Loads a snapshot file with the default size limit.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the file cannot be read or holds
    /// invalid entries.
    pub fn open(path: &Path) -> Result<Self, ProviderError> {
        Self::load(&SnapshotDeviceConfig::new(path))
    }

    /// Builds a device from parsed entries.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Invalid`] for empty OIDs, duplicate OIDs, or
    /// non-scalar values.
    pub fn from_entries(entries: Vec<SnapshotEntry>) -> Result<Self, ProviderError> {
        let mut objects = BTreeMap::new();
        let mut unreachable = Vec::new();
        for entry in entries {
            if entry.oid.trim().is_empty() {
                return Err(ProviderError::Invalid("snapshot oid must be non-empty".to_string()));
            }
            let object = DeviceObject {
                value: entry.value_text()?,
                value_type: entry.value_type.clone(),
                writable: entry.writable,
            };
            if entry.unreachable {
                unreachable.push(entry.oid.clone());
            }
            if objects.insert(entry.oid.clone(), object).is_some() {
                return Err(ProviderError::Invalid(format!("{}: duplicate snapshot oid", entry.oid)));
            }
        }
        let count = objects.len();
        let agent = InMemoryDeviceAgent::from_objects(objects);
        for oid in unreachable {
            agent.mark_unreachable(oid)?;
        }
        Ok(Self {
            agent,
            objects: count,
        })
    }

    /// Returns the number of objects in the snapshot.
    #[must_use]
    pub const fn object_count(&self) -> usize {
        self.objects
    }

    /// Returns the backing agent, for inspecting writes.
    #[must_use]
    pub const fn agent(&self) -> &InMemoryDeviceAgent {
        &self.agent
    }
}

impl DeviceAgent for SnapshotDevice {
    fn get(&self, oid: &str) -> Result<DeviceReading, DeviceError> {
        self.agent.get(oid)
    }

    fn set(&self, oid: &str, value: &str, value_type: &str) -> Result<(), DeviceError> {
        self.agent.set(oid, value, value_type)
    }
}
