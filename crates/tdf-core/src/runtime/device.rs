// crates/tdf-core/src/runtime/device.rs
// ============================================================================
// Module: TDF Harness In-Memory Device Agent
// Description: Table-backed device agent with writable and unreachable objects.
// Purpose: Stand in for a management agent in tests and snapshot replays.
// Dependencies: crate::interfaces, crate::runtime::comparator, serde
// ============================================================================

//! ## Overview
//! Objects live in an OID-keyed table. Reads of unknown objects and writes to
//! read-only objects are refused with [`DeviceError::Rejected`]; objects marked
//! unreachable fail with [`DeviceError::Transport`]. Successful writes are
//! remembered so tests can check probe and restore ordering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;

use crate::interfaces::DeviceAgent;
use crate::interfaces::DeviceError;
use crate::interfaces::DeviceReading;
use crate::runtime::comparator::same_type;

// ============================================================================
// SECTION: Device Objects
// ============================================================================

/// One managed object on the simulated device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceObject {
    /// Current value rendered as text.
    pub value: String,
    /// Type tag, for example `INTEGER`.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Whether writes are accepted.
    #[serde(default)]
    pub writable: bool,
}

/// Mutable device state.
#[derive(Debug, Default)]
struct DeviceState {
    /// Objects keyed by OID.
    objects: BTreeMap<String, DeviceObject>,
    /// OIDs whose calls fail in transport.
    unreachable: BTreeSet<String>,
    /// Successful writes in call order.
    writes: Vec<(String, String)>,
}

// ============================================================================
// SECTION: Agent
// ============================================================================

/// Device agent backed by an in-memory object table.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDeviceAgent {
    /// Device state protected by a mutex.
    state: Arc<Mutex<DeviceState>>,
}

impl InMemoryDeviceAgent {
    /// Creates a device with no objects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a device from an object table.
    #[must_use]
    pub fn from_objects(objects: BTreeMap<String, DeviceObject>) -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState {
                objects,
                ..DeviceState::default()
            })),
        }
    }

    /// Adds or replaces an object.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the device mutex is poisoned.
    pub fn insert(&self, oid: impl Into<String>, object: DeviceObject) -> Result<(), DeviceError> {
        self.lock()?.objects.insert(oid.into(), object);
        Ok(())
    }

    /// Makes every call on `oid` fail in transport.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the device mutex is poisoned.
    pub fn mark_unreachable(&self, oid: impl Into<String>) -> Result<(), DeviceError> {
        self.lock()?.unreachable.insert(oid.into());
        Ok(())
    }

    /// Returns the current state of an object.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the device mutex is poisoned.
    pub fn object(&self, oid: &str) -> Result<Option<DeviceObject>, DeviceError> {
        Ok(self.lock()?.objects.get(oid).cloned())
    }

    /// Returns successful writes as `(oid, value)` pairs in call order.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the device mutex is poisoned.
    pub fn writes(&self) -> Result<Vec<(String, String)>, DeviceError> {
        Ok(self.lock()?.writes.clone())
    }

    /// Locks the device state.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DeviceState>, DeviceError> {
        self.state
            .lock()
            .map_err(|_| DeviceError::Transport("device state mutex poisoned".to_string()))
    }
}

impl DeviceAgent for InMemoryDeviceAgent {
    fn get(&self, oid: &str) -> Result<DeviceReading, DeviceError> {
        let guard = self.lock()?;
        if guard.unreachable.contains(oid) {
            return Err(DeviceError::Transport(format!("{oid}: no response")));
        }
        let object = guard
            .objects
            .get(oid)
            .ok_or_else(|| DeviceError::Rejected(format!("{oid}: no such object")))?;
        Ok(DeviceReading {
            value: object.value.clone(),
            value_type: object.value_type.clone(),
        })
    }

    fn set(&self, oid: &str, value: &str, value_type: &str) -> Result<(), DeviceError> {
        let mut guard = self.lock()?;
        if guard.unreachable.contains(oid) {
            return Err(DeviceError::Transport(format!("{oid}: no response")));
        }
        let object = guard
            .objects
            .get_mut(oid)
            .ok_or_else(|| DeviceError::Rejected(format!("{oid}: no such object")))?;
        if !object.writable {
            return Err(DeviceError::Rejected(format!("{oid}: not writable")));
        }
        if !same_type(&object.value_type, value_type) {
            return Err(DeviceError::Rejected(format!(
                "{oid}: wrong type {value_type}, object is {}",
                object.value_type
            )));
        }
        object.value = value.to_string();
        guard.writes.push((oid.to_string(), value.to_string()));
        drop(guard);
        Ok(())
    }
}
