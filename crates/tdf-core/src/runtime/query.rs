// crates/tdf-core/src/runtime/query.rs
// ============================================================================
// Module: TDF Device-Query Evaluator
// Description: Get, set-and-restore, and read-only checks against a device agent.
// Purpose: Evaluate SNMP tests with a request/response audit trail per device call.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{comparator, events}
// ============================================================================

//! ## Overview
//! - `READABLE`: read the object; the type must match and any expected value
//!   must hold.
//! - `SETTABLE`: read the original, write a probe value, write the original
//!   back. Both writes must succeed.
//! - `READONLY`: the `READABLE` check must pass and a probe write must be
//!   refused by the device. A probe write that succeeds is undone and fails
//!   the test.
//!
//! Every device call is bracketed by a request and a response audit document.
//! Device failures fail the test and never abort the run; failing to store an
//! audit document does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

use crate::core::document::AuditDocument;
use crate::core::document::AuditKind;
use crate::core::document::AuditMethod;
use crate::core::document::AuditStatus;
use crate::core::identifiers::CollectionName;
use crate::core::record::AccessMode;
use crate::core::record::DeviceQueryTest;
use crate::interfaces::Clock;
use crate::interfaces::DeviceAgent;
use crate::interfaces::DeviceError;
use crate::interfaces::DeviceReading;
use crate::interfaces::DocumentStore;
use crate::interfaces::SharedDeviceAgent;
use crate::interfaces::SharedDocumentStore;
use crate::interfaces::StoreError;
use crate::runtime::comparator::matches_expected;
use crate::runtime::comparator::probe_value;
use crate::runtime::comparator::same_type;
use crate::runtime::evaluator::Evaluation;
use crate::runtime::evaluator::ExecutionError;
use crate::runtime::events::EventLog;
use crate::runtime::events::LogEvent;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates device-query tests against a device agent.
#[derive(Clone)]
pub struct QueryEvaluator {
    /// Device under test.
    device: SharedDeviceAgent,
    /// Store receiving audit documents.
    store: SharedDocumentStore,
    /// Collection receiving audit documents.
    audit_collection: CollectionName,
    /// Device label written into audit documents.
    destination: String,
    /// Timestamp source for audit documents.
    clock: Arc<dyn Clock + Send + Sync>,
    /// Event log for device failures.
    log: EventLog,
}

impl QueryEvaluator {
    /// Creates an evaluator for one device.
    #[must_use]
    pub fn new(
        device: SharedDeviceAgent,
        store: SharedDocumentStore,
        audit: CollectionName,
        destination: impl Into<String>,
        clock: Arc<dyn Clock + Send + Sync>,
        log: EventLog,
    ) -> Self {
        Self {
            device,
            store,
            audit_collection: audit,
            destination: destination.into(),
            clock,
            log,
        }
    }

    /// Evaluates one test.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Store`] when an audit document cannot be stored.
    pub fn evaluate(&self, test: &DeviceQueryTest) -> Result<Evaluation, ExecutionError> {
        let (Some(oid), Some(command), Some(value_type)) =
            (test.oid.as_deref(), test.command, test.value_type.as_deref())
        else {
            return Ok(Evaluation::failed());
        };
        let call = Call {
            name: &test.header.name,
            oid,
            value_type,
        };
        let expected = test.expected_value.as_deref();
        match command {
            AccessMode::Get => self.check_readable(&call, expected).map(|reading| {
                Evaluation::from_passed(reading.is_some())
            }),
            AccessMode::Set => self.check_settable(&call, expected),
            AccessMode::GetOnly => self.check_read_only(&call, expected),
        }
    }

    /// Reads the object and returns the reading when it satisfies the test.
    fn check_readable(
        &self,
        call: &Call<'_>,
        expected: Option<&str>,
    ) -> Result<Option<DeviceReading>, ExecutionError> {
        let Ok(reading) = self.get(call)? else {
            return Ok(None);
        };
        let type_ok = same_type(&reading.value_type, call.value_type);
        let value_ok =
            expected.is_none_or(|expected| matches_expected(call.value_type, &reading.value, expected));
        Ok((type_ok && value_ok).then_some(reading))
    }

    /// Writes a probe value and restores the original.
    fn check_settable(
        &self,
        call: &Call<'_>,
        expected: Option<&str>,
    ) -> Result<Evaluation, ExecutionError> {
        let Ok(original) = self.get(call)? else {
            return Ok(Evaluation::failed());
        };
        let probe = probe_value(call.value_type, &original.value, expected);
        if self.set(call, &probe, false)?.is_err() {
            return Ok(Evaluation::failed());
        }
        self.restore(call, &original.value)
    }

    /// Checks that the object reads correctly and refuses writes.
    fn check_read_only(
        &self,
        call: &Call<'_>,
        expected: Option<&str>,
    ) -> Result<Evaluation, ExecutionError> {
        let Some(original) = self.check_readable(call, expected)? else {
            return Ok(Evaluation::failed());
        };
        let probe = probe_value(call.value_type, &original.value, expected);
        match self.set(call, &probe, true)? {
            Err(DeviceError::Rejected(_)) => Ok(Evaluation::passed()),
            Err(DeviceError::Transport(_)) => Ok(Evaluation::failed()),
            Ok(()) => {
                let restored = self.restore(call, &original.value)?;
                Ok(Evaluation {
                    passed: false,
                    ..restored
                })
            }
        }
    }

    /// Writes the original value back after a successful probe.
    fn restore(&self, call: &Call<'_>, original: &str) -> Result<Evaluation, ExecutionError> {
        match self.set(call, original, false)? {
            Ok(()) => Ok(Evaluation::passed()),
            Err(err) => {
                self.log.emit(LogEvent::DeviceLeftModified {
                    test: call.name.to_string(),
                    oid: call.oid.to_string(),
                    original: original.to_string(),
                    error: err.to_string(),
                });
                Ok(Evaluation {
                    passed: false,
                    device_left_modified: true,
                })
            }
        }
    }

    // ------------------------------------------------------------------------
    // Audited device calls
    // ------------------------------------------------------------------------

    /// Reads an object between request and response audit documents.
    fn get(&self, call: &Call<'_>) -> Result<Result<DeviceReading, DeviceError>, ExecutionError> {
        self.audit(call, AuditKind::Request, AuditMethod::Get, AuditStatus::Success)?;
        let result = self.device.get(call.oid);
        self.audit(call, AuditKind::Response, AuditMethod::Get, AuditStatus::from_ok(result.is_ok()))?;
        if let Err(err) = &result {
            self.report_failure(call, AuditMethod::Get, err);
        }
        Ok(result)
    }

    /// Writes an object between request and response audit documents.
    ///
    /// With `refusal_expected`, a [`DeviceError::Rejected`] answer is not
    /// reported as a device failure.
    fn set(
        &self,
        call: &Call<'_>,
        value: &str,
        refusal_expected: bool,
    ) -> Result<Result<(), DeviceError>, ExecutionError> {
        self.audit(call, AuditKind::Request, AuditMethod::Set, AuditStatus::Success)?;
        let result = self.device.set(call.oid, value, call.value_type);
        self.audit(call, AuditKind::Response, AuditMethod::Set, AuditStatus::from_ok(result.is_ok()))?;
        match &result {
            Err(DeviceError::Rejected(_)) if refusal_expected => {}
            Err(err) => self.report_failure(call, AuditMethod::Set, err),
            Ok(()) => {}
        }
        Ok(result)
    }

    /// Logs a failed device call.
    fn report_failure(&self, call: &Call<'_>, method: AuditMethod, err: &DeviceError) {
        self.log.emit(LogEvent::DeviceFailure {
            test: call.name.to_string(),
            oid: call.oid.to_string(),
            method,
            error: err.to_string(),
        });
    }

    /// Stores one audit document.
    fn audit(
        &self,
        call: &Call<'_>,
        kind: AuditKind,
        method: AuditMethod,
        status: AuditStatus,
    ) -> Result<(), ExecutionError> {
        let document = AuditDocument {
            kind,
            method,
            destination: self.destination.clone(),
            oid: call.oid.to_string(),
            name: call.name.to_string(),
            time: self.clock.now().render(),
            status,
        };
        let value: Value = serde_json::to_value(&document)
            .map_err(|err| StoreError::Invalid(err.to_string()))?;
        self.store.insert_document(&self.audit_collection, &value)?;
        Ok(())
    }
}

/// Fields shared by every device call of one test.
struct Call<'a> {
    /// Test name.
    name: &'a str,
    /// Object identifier.
    oid: &'a str,
    /// Type tag sent with writes and checked on reads.
    value_type: &'a str,
}
