// crates/tdf-core/tests/runtime/query_tests.rs
// ============================================================================
// Module: Query Evaluator Tests
// Description: Access-mode checks, probe writes, and audit trails.
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use tdf_core::AccessMode;
use tdf_core::CollectionNames;
use tdf_core::DeviceAgent;
use tdf_core::DeviceError;
use tdf_core::DeviceQueryTest;
use tdf_core::DeviceReading;
use tdf_core::EventLog;
use tdf_core::ExecutionError;
use tdf_core::InMemoryDeviceAgent;
use tdf_core::InMemoryDocumentStore;
use tdf_core::LogEvent;
use tdf_core::LogicalClock;
use tdf_core::QueryEvaluator;
use tdf_core::SharedDeviceAgent;
use tdf_core::SharedDocumentStore;
use tdf_core::TestHeader;

use super::common::ReadOnlyStore;
use super::common::audit_documents;
use super::common::memory_log;
use super::common::object;
use super::common::query_evaluator;
use super::common::query_evaluator_with;

const OID: &str = "1.3.6.1.4.1.9999.1.1";

fn query(command: AccessMode, value_type: &str, expected: Option<&str>) -> DeviceQueryTest {
    DeviceQueryTest {
        header: TestHeader {
            name: "query check".to_string(),
            expect: true,
        },
        oid: Some(OID.to_string()),
        command: Some(command),
        value_type: Some(value_type.to_string()),
        expected_value: expected.map(str::to_string),
    }
}

fn device_with(value: &str, value_type: &str, writable: bool) -> InMemoryDeviceAgent {
    let device = InMemoryDeviceAgent::new();
    device.insert(OID, object(value, value_type, writable)).unwrap();
    device
}

fn statuses(store: &InMemoryDocumentStore) -> Vec<String> {
    audit_documents(store)
        .iter()
        .map(|doc| format!("{}:{}:{}", doc["type"], doc["method"], doc["status"]).replace('"', ""))
        .collect()
}

/// Device whose writes follow a script before falling back to a real agent.
struct ScriptedDevice {
    /// Agent answering reads and unscripted writes.
    inner: InMemoryDeviceAgent,
    /// Per-write overrides; `None` delegates to `inner`.
    sets: Mutex<VecDeque<Option<DeviceError>>>,
}

impl ScriptedDevice {
    fn new(inner: InMemoryDeviceAgent, script: Vec<Option<DeviceError>>) -> Self {
        Self {
            inner,
            sets: Mutex::new(script.into()),
        }
    }
}

impl DeviceAgent for ScriptedDevice {
    fn get(&self, oid: &str) -> Result<DeviceReading, DeviceError> {
        self.inner.get(oid)
    }

    fn set(&self, oid: &str, value: &str, value_type: &str) -> Result<(), DeviceError> {
        match self.sets.lock().unwrap().pop_front().flatten() {
            Some(err) => Err(err),
            None => self.inner.set(oid, value, value_type),
        }
    }
}

// ============================================================================
// SECTION: Readable
// ============================================================================

/// Verifies numeric expectations need an operator and compare as integers.
#[test]
fn readable_numeric_comparisons() {
    let cases = [(">3", true), ("<3", false), ("=5", true), ("= 5", true), ("5", false), (">x", false)];
    for (expected, passed) in cases {
        let device = device_with("5", "INTEGER", false);
        let store = InMemoryDocumentStore::new();
        let evaluation = query_evaluator(&device, &store)
            .evaluate(&query(AccessMode::Get, "INTEGER", Some(expected)))
            .unwrap();
        assert_eq!(evaluation.passed, passed, "expected {expected}");
    }
}

/// Verifies text expectations compare exactly.
#[test]
fn readable_text_comparison_is_exact() {
    let device = device_with("lab-router", "OCTET_STRING", false);
    let store = InMemoryDocumentStore::new();
    let evaluator = query_evaluator(&device, &store);

    let exact = query(AccessMode::Get, "OCTET_STRING", Some("lab-router"));
    assert!(evaluator.evaluate(&exact).unwrap().passed);
    let other = query(AccessMode::Get, "OCTET_STRING", Some("Lab-Router"));
    assert!(!evaluator.evaluate(&other).unwrap().passed);
}

/// Verifies the reported type must match, ignoring case and separators.
#[test]
fn readable_checks_value_type() {
    let device = device_with("12345", "TimeTicks", false);
    let store = InMemoryDocumentStore::new();
    let evaluator = query_evaluator(&device, &store);

    assert!(evaluator.evaluate(&query(AccessMode::Get, "TIMETICKS", None)).unwrap().passed);
    assert!(!evaluator.evaluate(&query(AccessMode::Get, "INTEGER", None)).unwrap().passed);
}

/// Verifies a read brackets the call with request and response audits.
#[test]
fn readable_writes_request_and_response_audits() {
    let device = device_with("5", "INTEGER", false);
    let store = InMemoryDocumentStore::new();
    query_evaluator(&device, &store).evaluate(&query(AccessMode::Get, "INTEGER", None)).unwrap();

    let audits = audit_documents(&store);
    assert_eq!(audits.len(), 2);
    assert_eq!(audits[0]["type"], "snmpRequest");
    assert_eq!(audits[1]["type"], "snmpResponse");
    assert_eq!(audits[0]["destination"], "dut-1");
    assert_eq!(audits[0]["oid"], OID);
    assert_eq!(audits[0]["name"], "query check");
    assert_eq!(audits[0]["time"], "1");
    assert_eq!(audits[1]["time"], "2");
    assert_eq!(statuses(&store), vec!["snmpRequest:get:S", "snmpResponse:get:S"]);
}

/// Verifies a transport failure fails the test and is audited and logged.
#[test]
fn readable_transport_failure_fails() {
    let device = device_with("5", "INTEGER", false);
    device.mark_unreachable(OID).unwrap();
    let store = InMemoryDocumentStore::new();
    let (log, sink) = memory_log();
    let evaluator = query_evaluator_with(SharedDeviceAgent::from_agent(device), &store, log);

    let evaluation = evaluator.evaluate(&query(AccessMode::Get, "INTEGER", None)).unwrap();
    assert!(!evaluation.passed);
    assert_eq!(statuses(&store), vec!["snmpRequest:get:S", "snmpResponse:get:F"]);
    assert!(matches!(sink.events().as_slice(), [LogEvent::DeviceFailure { .. }]));
}

// ============================================================================
// SECTION: Settable
// ============================================================================

/// Verifies a settable object is probed and restored to its original value.
#[test]
fn settable_probes_and_restores() {
    let device = device_with("5", "INTEGER", true);
    let store = InMemoryDocumentStore::new();
    let evaluation =
        query_evaluator(&device, &store).evaluate(&query(AccessMode::Set, "INTEGER", None)).unwrap();

    assert!(evaluation.passed);
    assert!(!evaluation.device_left_modified);
    assert_eq!(
        device.writes().unwrap(),
        vec![(OID.to_string(), "6".to_string()), (OID.to_string(), "5".to_string())]
    );
    assert_eq!(device.object(OID).unwrap().unwrap().value, "5");
    assert_eq!(
        statuses(&store),
        vec![
            "snmpRequest:get:S",
            "snmpResponse:get:S",
            "snmpRequest:set:S",
            "snmpResponse:set:S",
            "snmpRequest:set:S",
            "snmpResponse:set:S",
        ]
    );
}

/// Verifies a plain expected value is used as the probe.
#[test]
fn settable_uses_expected_value_as_probe() {
    let device = device_with("lab", "OCTET_STRING", true);
    let store = InMemoryDocumentStore::new();
    let evaluation = query_evaluator(&device, &store)
        .evaluate(&query(AccessMode::Set, "OCTET_STRING", Some("field")))
        .unwrap();

    assert!(evaluation.passed);
    assert_eq!(device.writes().unwrap()[0].1, "field");
    assert_eq!(device.object(OID).unwrap().unwrap().value, "lab");
}

/// Verifies a refused write fails a settable test without touching the object.
#[test]
fn settable_refused_write_fails() {
    let device = device_with("5", "INTEGER", false);
    let store = InMemoryDocumentStore::new();
    let (log, sink) = memory_log();
    let evaluator =
        query_evaluator_with(SharedDeviceAgent::from_agent(device.clone()), &store, log);

    let evaluation = evaluator.evaluate(&query(AccessMode::Set, "INTEGER", None)).unwrap();
    assert!(!evaluation.passed);
    assert!(device.writes().unwrap().is_empty());
    assert_eq!(statuses(&store).len(), 4);
    assert!(matches!(sink.events().as_slice(), [LogEvent::DeviceFailure { .. }]));
}

/// Verifies a failed restore is escalated and flagged on the evaluation.
#[test]
fn settable_restore_failure_leaves_device_modified() {
    let inner = device_with("5", "INTEGER", true);
    let device = ScriptedDevice::new(
        inner.clone(),
        vec![None, Some(DeviceError::Transport("timeout".to_string()))],
    );
    let store = InMemoryDocumentStore::new();
    let (log, sink) = memory_log();
    let evaluator = query_evaluator_with(SharedDeviceAgent::from_agent(device), &store, log);

    let evaluation = evaluator.evaluate(&query(AccessMode::Set, "INTEGER", None)).unwrap();
    assert!(!evaluation.passed);
    assert!(evaluation.device_left_modified);
    assert_eq!(inner.object(OID).unwrap().unwrap().value, "6");

    let events = sink.events();
    assert!(events.iter().any(|event| matches!(
        event,
        LogEvent::DeviceLeftModified { original, .. } if original == "5"
    )));
}

// ============================================================================
// SECTION: Read Only
// ============================================================================

/// Verifies a read-only object that refuses the probe passes quietly.
#[test]
fn read_only_refusal_passes() {
    let device = device_with("7", "INTEGER", false);
    let store = InMemoryDocumentStore::new();
    let (log, sink) = memory_log();
    let evaluator =
        query_evaluator_with(SharedDeviceAgent::from_agent(device.clone()), &store, log);

    let evaluation = evaluator.evaluate(&query(AccessMode::GetOnly, "INTEGER", Some("=7"))).unwrap();
    assert!(evaluation.passed);
    assert!(device.writes().unwrap().is_empty());
    assert_eq!(
        statuses(&store),
        vec!["snmpRequest:get:S", "snmpResponse:get:S", "snmpRequest:set:S", "snmpResponse:set:F"]
    );
    assert!(sink.events().is_empty());
}

/// Verifies a read-only test fails when the read itself fails its check.
#[test]
fn read_only_requires_readable_check() {
    let device = device_with("7", "INTEGER", false);
    let store = InMemoryDocumentStore::new();
    let evaluation = query_evaluator(&device, &store)
        .evaluate(&query(AccessMode::GetOnly, "INTEGER", Some(">10")))
        .unwrap();

    assert!(!evaluation.passed);
    assert_eq!(audit_documents(&store).len(), 2);
}

/// Verifies a writable object fails a read-only test and is restored.
#[test]
fn read_only_accepted_write_fails_and_restores() {
    let device = device_with("7", "INTEGER", true);
    let store = InMemoryDocumentStore::new();
    let evaluation =
        query_evaluator(&device, &store).evaluate(&query(AccessMode::GetOnly, "INTEGER", None)).unwrap();

    assert!(!evaluation.passed);
    assert!(!evaluation.device_left_modified);
    assert_eq!(device.object(OID).unwrap().unwrap().value, "7");
    assert_eq!(device.writes().unwrap().len(), 2);
}

/// Verifies a transport failure on the probe is not mistaken for a refusal.
#[test]
fn read_only_transport_failure_fails() {
    let inner = device_with("7", "INTEGER", false);
    let device =
        ScriptedDevice::new(inner, vec![Some(DeviceError::Transport("timeout".to_string()))]);
    let store = InMemoryDocumentStore::new();
    let evaluator =
        query_evaluator_with(SharedDeviceAgent::from_agent(device), &store, EventLog::disabled());

    assert!(!evaluator.evaluate(&query(AccessMode::GetOnly, "INTEGER", None)).unwrap().passed);
}

// ============================================================================
// SECTION: Audit Store Failures
// ============================================================================

/// Verifies an audit store failure aborts evaluation.
#[test]
fn audit_store_failure_is_an_error() {
    let device = device_with("5", "INTEGER", false);
    let evaluator = QueryEvaluator::new(
        SharedDeviceAgent::from_agent(device),
        SharedDocumentStore::from_store(ReadOnlyStore {
            inner: InMemoryDocumentStore::new(),
        }),
        CollectionNames::default().audit,
        "dut-1",
        Arc::new(LogicalClock::new()),
        EventLog::disabled(),
    );

    let result = evaluator.evaluate(&query(AccessMode::Get, "INTEGER", None));
    assert!(matches!(result, Err(ExecutionError::Store(_))));
}
