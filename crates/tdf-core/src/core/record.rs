// crates/tdf-core/src/core/record.rs
// ============================================================================
// Module: TDF Harness Test Records
// Description: Typed test records produced by the definition grammar.
// Purpose: Model signal-inclusion and device-query tests with readiness checks.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`TestRecord`] is created when the grammar reads a `TYPE:` line, filled
//! in by the `NAME:` and `TEST:` lines of the same group, and frozen into a
//! [`crate::TestFile`] once [`TestRecord::is_ready`] holds. The variant fixes
//! the protocol family for the lifetime of the record.
//!
//! Inclusion directives are positional on signal-inclusion tests: the first
//! directive checks a data item on the signal, the second checks a sub data
//! item nested under that data item.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Kinds and Modes
// ============================================================================

/// Protocol family a test record targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Signal-inclusion test against captured signaling messages (`DLEP`).
    SignalInclusion,
    /// Device-query test against a management agent (`SNMP`).
    DeviceQuery,
}

impl TestKind {
    /// Returns the `TYPE:` tag used in definition files.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::SignalInclusion => "DLEP",
            Self::DeviceQuery => "SNMP",
        }
    }

    /// Resolves a `TYPE:` tag into a kind.
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "DLEP" => Some(Self::SignalInclusion),
            "SNMP" => Some(Self::DeviceQuery),
            _ => None,
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Whether a signal-inclusion directive requires presence or absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    /// `TO_INCLUDE`: the item must be present.
    Include,
    /// `TO_NOT_INCLUDE`: the item must be absent.
    Exclude,
}

impl Inclusion {
    /// Returns the definition-file keyword for this directive.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Include => "TO_INCLUDE",
            Self::Exclude => "TO_NOT_INCLUDE",
        }
    }

    /// Returns true when an observation of `present` satisfies the directive.
    ///
    /// This is the XNOR of the requirement and the observation.
    #[must_use]
    pub const fn is_satisfied_by(self, present: bool) -> bool {
        matches!(self, Self::Include) == present
    }
}

/// Access mode asserted by a device-query test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// `READABLE`: the object can be read.
    Get,
    /// `SETTABLE`: the object can be written and restored.
    Set,
    /// `READONLY`: the object can be read but writes are refused.
    GetOnly,
}

impl AccessMode {
    /// Returns the `TO_BE` keyword for this mode.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Get => "READABLE",
            Self::Set => "SETTABLE",
            Self::GetOnly => "READONLY",
        }
    }

    /// Resolves a `TO_BE` keyword into a mode.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "READABLE" => Some(Self::Get),
            "SETTABLE" => Some(Self::Set),
            "READONLY" => Some(Self::GetOnly),
            _ => None,
        }
    }

    /// Returns the command label used in record descriptions.
    #[must_use]
    pub const fn command_label(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::GetOnly => "only_get",
        }
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Fields shared by every test record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestHeader {
    /// Free-text test name from the `NAME:` line.
    pub name: String,
    /// Set when the `TEST:` line opens with `EXPECT`.
    pub expect: bool,
}

impl TestHeader {
    /// Returns true when the shared fields are complete.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.expect && !self.name.is_empty()
    }
}

/// Returns true when a text field is set to a non-empty value.
const fn is_filled(field: &Option<String>) -> bool {
    matches!(field, Some(value) if !value.is_empty())
}

/// Signal-inclusion test over a captured signaling message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalInclusionTest {
    /// Shared record fields.
    pub header: TestHeader,
    /// Signal whose captured message is inspected.
    pub signal: Option<String>,
    /// Directive applied to `data_item`.
    pub signal_inclusion: Option<Inclusion>,
    /// Data item checked on the signal.
    pub data_item: Option<String>,
    /// Directive applied to `sub_item`.
    pub item_inclusion: Option<Inclusion>,
    /// Sub data item checked under `data_item`.
    pub sub_item: Option<String>,
}

impl SignalInclusionTest {
    /// Records an inclusion directive in the next free position.
    ///
    /// Returns false when both positions are already taken.
    pub fn push_inclusion(&mut self, inclusion: Inclusion, item: impl Into<String>) -> bool {
        if self.signal_inclusion.is_none() {
            self.signal_inclusion = Some(inclusion);
            self.data_item = Some(item.into());
            true
        } else if self.item_inclusion.is_none() {
            self.item_inclusion = Some(inclusion);
            self.sub_item = Some(item.into());
            true
        } else {
            false
        }
    }

    /// Returns true when the record may be accepted.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.header.is_ready()
            && is_filled(&self.signal)
            && self.signal_inclusion.is_some()
            && is_filled(&self.data_item)
            && (self.item_inclusion.is_none() || is_filled(&self.sub_item))
    }

    /// Renders the nested description used by suite listings.
    fn describe_test(&self) -> Value {
        let mut test = Map::new();
        test.insert("Signal".to_string(), json!(self.signal));
        if let Some(inclusion) = self.signal_inclusion {
            let mut item = Map::new();
            item.insert("Data Item".to_string(), json!(self.data_item));
            if let Some(nested) = self.item_inclusion {
                item.insert(nested.keyword().to_string(), json!({ "Sub Data Item": self.sub_item }));
            }
            test.insert(inclusion.keyword().to_string(), Value::Object(item));
        }
        Value::Object(test)
    }
}

/// Device-query test against a management agent object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceQueryTest {
    /// Shared record fields.
    pub header: TestHeader,
    /// Object identifier queried on the device.
    pub oid: Option<String>,
    /// Asserted access mode.
    pub command: Option<AccessMode>,
    /// Expected value type tag, for example `INTEGER` or `OCTET_STRING`.
    pub value_type: Option<String>,
    /// Expected value, optionally prefixed with `>`, `<`, or `=` for numeric types.
    pub expected_value: Option<String>,
}

impl DeviceQueryTest {
    /// Returns true when the record may be accepted.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.header.is_ready()
            && is_filled(&self.oid)
            && self.command.is_some()
            && is_filled(&self.value_type)
    }

    /// Renders the flat description used by suite listings.
    fn describe_test(&self) -> Value {
        let mut test = Map::new();
        test.insert("Oid".to_string(), json!(self.oid));
        test.insert("To be".to_string(), json!(self.command.map(AccessMode::command_label)));
        test.insert("Mib type".to_string(), json!(self.value_type));
        if let Some(value) = &self.expected_value {
            test.insert("Mib value".to_string(), json!(value));
        }
        Value::Object(test)
    }
}

/// A parsed test of either protocol family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestRecord {
    /// Signal-inclusion test.
    SignalInclusion(SignalInclusionTest),
    /// Device-query test.
    DeviceQuery(DeviceQueryTest),
}

impl TestRecord {
    /// Creates an empty record of the given kind.
    #[must_use]
    pub fn new(kind: TestKind) -> Self {
        match kind {
            TestKind::SignalInclusion => Self::SignalInclusion(SignalInclusionTest::default()),
            TestKind::DeviceQuery => Self::DeviceQuery(DeviceQueryTest::default()),
        }
    }

    /// Returns the protocol family of the record.
    #[must_use]
    pub const fn kind(&self) -> TestKind {
        match self {
            Self::SignalInclusion(_) => TestKind::SignalInclusion,
            Self::DeviceQuery(_) => TestKind::DeviceQuery,
        }
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn header(&self) -> &TestHeader {
        match self {
            Self::SignalInclusion(test) => &test.header,
            Self::DeviceQuery(test) => &test.header,
        }
    }

    /// Returns the shared fields for mutation while the group is parsed.
    pub const fn header_mut(&mut self) -> &mut TestHeader {
        match self {
            Self::SignalInclusion(test) => &mut test.header,
            Self::DeviceQuery(test) => &mut test.header,
        }
    }

    /// Returns the test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.header().name
    }

    /// Returns true when every required field of the variant is set.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        match self {
            Self::SignalInclusion(test) => test.is_ready(),
            Self::DeviceQuery(test) => test.is_ready(),
        }
    }

    /// Renders the `{"Type", "Name", "Test"}` description of the record.
    #[must_use]
    pub fn describe(&self) -> Value {
        let test = match self {
            Self::SignalInclusion(test) => test.describe_test(),
            Self::DeviceQuery(test) => test.describe_test(),
        };
        json!({
            "Type": self.kind().type_tag(),
            "Name": self.name(),
            "Test": test,
        })
    }
}
