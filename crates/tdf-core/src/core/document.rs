// crates/tdf-core/src/core/document.rs
// ============================================================================
// Module: TDF Harness Documents
// Description: Result, audit, and captured-signal document shapes.
// Purpose: Fix the wire shape of documents exchanged with the document store.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The executor writes two kinds of documents: one result document per test
//! (`{"name", "result"}`) and a request/response pair of audit documents per
//! device call. Captured signaling messages are read through a configurable
//! [`SignalDocumentLayout`] because capture tooling names its fields
//! differently from site to site.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::CollectionName;

// ============================================================================
// SECTION: Result Documents
// ============================================================================

/// Pass or fail verdict for one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The test passed.
    Pass,
    /// The test failed.
    Fail,
}

impl Verdict {
    /// Converts a boolean outcome into a verdict.
    #[must_use]
    pub const fn from_passed(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }

    /// Returns true for [`Verdict::Pass`].
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Document inserted into the results collection for each executed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Test name.
    pub name: String,
    /// Test verdict.
    pub result: Verdict,
}

// ============================================================================
// SECTION: Audit Documents
// ============================================================================

/// Direction of an audit document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditKind {
    /// Written before the device call.
    #[serde(rename = "snmpRequest")]
    Request,
    /// Written after the device call.
    #[serde(rename = "snmpResponse")]
    Response,
}

/// Device call recorded by an audit document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMethod {
    /// Read call.
    Get,
    /// Write call.
    Set,
}

/// Outcome recorded by an audit document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    /// The call succeeded.
    #[serde(rename = "S")]
    Success,
    /// The call failed or was refused.
    #[serde(rename = "F")]
    Failure,
}

impl AuditStatus {
    /// Converts a boolean outcome into a status.
    #[must_use]
    pub const fn from_ok(ok: bool) -> Self {
        if ok { Self::Success } else { Self::Failure }
    }
}

/// Audit document written for every device get or set attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditDocument {
    /// Request or response.
    #[serde(rename = "type")]
    pub kind: AuditKind,
    /// Get or set.
    pub method: AuditMethod,
    /// Device label the call was sent to.
    pub destination: String,
    /// Object identifier.
    pub oid: String,
    /// Name of the test that issued the call.
    pub name: String,
    /// Rendered timestamp.
    pub time: String,
    /// Call status. Requests are written as successful sends.
    pub status: AuditStatus,
}

// ============================================================================
// SECTION: Collections
// ============================================================================

/// Collection names the executor reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    /// Collection receiving result documents.
    pub results: CollectionName,
    /// Collection holding captured signaling messages.
    pub signals: CollectionName,
    /// Collection receiving device audit documents.
    pub audit: CollectionName,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            results: CollectionName::new("Test Results"),
            signals: CollectionName::new("Signals"),
            audit: CollectionName::new("SNMP Audit"),
        }
    }
}

// ============================================================================
// SECTION: Signal Document Layout
// ============================================================================

/// Field names used to navigate a captured signaling message.
///
/// A captured message looks like
/// `{"Name": "Peer_Offer", "Data_Items": [{"Name": "...", "Sub_Data_Items": [...]}]}`
/// under the default layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalDocumentLayout {
    /// Field holding the signal name and each item name.
    pub name_field: String,
    /// Field holding the list of data items on a signal.
    pub items_field: String,
    /// Field holding the list of sub data items on a data item.
    pub sub_items_field: String,
}

impl Default for SignalDocumentLayout {
    fn default() -> Self {
        Self {
            name_field: "Name".to_string(),
            items_field: "Data_Items".to_string(),
            sub_items_field: "Sub_Data_Items".to_string(),
        }
    }
}

impl SignalDocumentLayout {
    /// Returns the entry named `name` from the list stored under `list_field`.
    ///
    /// A missing or non-array list is treated as empty.
    #[must_use]
    pub fn find_entry<'a>(&self, document: &'a Value, list_field: &str, name: &str) -> Option<&'a Value> {
        document.get(list_field)?.as_array()?.iter().find(|entry| {
            entry.get(&self.name_field).and_then(Value::as_str) == Some(name)
        })
    }
}
