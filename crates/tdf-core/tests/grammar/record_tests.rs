// crates/tdf-core/tests/grammar/record_tests.rs
// ============================================================================
// Module: Test Record Unit Tests
// Description: Readiness rules, descriptions, and serialization of records.
// ============================================================================

use serde_json::json;
use tdf_core::AccessMode;
use tdf_core::DeviceQueryTest;
use tdf_core::Inclusion;
use tdf_core::SignalInclusionTest;
use tdf_core::TestHeader;
use tdf_core::TestKind;
use tdf_core::TestRecord;
use tdf_core::parse_source;

fn header(name: &str) -> TestHeader {
    TestHeader {
        name: name.to_string(),
        expect: true,
    }
}

// ============================================================================
// SECTION: Readiness
// ============================================================================

/// Verifies a signal test needs a signal and a first directive.
#[test]
fn signal_test_readiness() {
    let mut test = SignalInclusionTest {
        header: header("offer"),
        signal: Some("Peer_Offer".to_string()),
        ..SignalInclusionTest::default()
    };
    assert!(!test.is_ready());

    assert!(test.push_inclusion(Inclusion::Include, "Peer_Type"));
    assert!(test.is_ready());

    test.header.expect = false;
    assert!(!test.is_ready());
}

/// Verifies only two directives fit on one signal test.
#[test]
fn signal_test_holds_two_directives() {
    let mut test = SignalInclusionTest::default();
    assert!(test.push_inclusion(Inclusion::Include, "a"));
    assert!(test.push_inclusion(Inclusion::Exclude, "b"));
    assert!(!test.push_inclusion(Inclusion::Include, "c"));
    assert_eq!(test.sub_item.as_deref(), Some("b"));
}

/// Verifies a query test does not need an expected value.
#[test]
fn query_test_value_is_optional() {
    let test = DeviceQueryTest {
        header: header("uptime"),
        oid: Some("1.3.6.1.2.1.1.3.0".to_string()),
        command: Some(AccessMode::Get),
        value_type: Some("TimeTicks".to_string()),
        expected_value: None,
    };
    assert!(test.is_ready());
    assert!(!DeviceQueryTest {
        command: None,
        ..test
    }
    .is_ready());
}

/// Verifies the XNOR rule for directives.
#[test]
fn inclusion_is_satisfied_by_matching_observation() {
    assert!(Inclusion::Include.is_satisfied_by(true));
    assert!(!Inclusion::Include.is_satisfied_by(false));
    assert!(Inclusion::Exclude.is_satisfied_by(false));
    assert!(!Inclusion::Exclude.is_satisfied_by(true));
}

/// Verifies type tags and access keywords resolve both ways.
#[test]
fn keywords_resolve_both_ways() {
    assert_eq!(TestKind::from_type_tag("DLEP"), Some(TestKind::SignalInclusion));
    assert_eq!(TestKind::from_type_tag("dlep"), None);
    assert_eq!(TestKind::DeviceQuery.to_string(), "SNMP");
    for mode in [AccessMode::Get, AccessMode::Set, AccessMode::GetOnly] {
        assert_eq!(AccessMode::from_keyword(mode.keyword()), Some(mode));
    }
}

// ============================================================================
// SECTION: Descriptions
// ============================================================================

/// Verifies nested signal descriptions key each level by its directive.
#[test]
fn describes_nested_signal_test() {
    let source = "TYPE: DLEP\nNAME: offer\nTEST: EXPECT SIGNAL Peer_Offer TO_INCLUDE DATA_ITEM IPv4_Connection_Point TO_NOT_INCLUDE SUB_DATA_ITEM Port\n";
    let file = parse_source("offer.tdf", source).unwrap();
    assert_eq!(
        file.tests()[0].describe(),
        json!({
            "Type": "DLEP",
            "Name": "offer",
            "Test": {
                "Signal": "Peer_Offer",
                "TO_INCLUDE": {
                    "Data Item": "IPv4_Connection_Point",
                    "TO_NOT_INCLUDE": { "Sub Data Item": "Port" }
                }
            }
        })
    );
}

/// Verifies query descriptions omit an absent value.
#[test]
fn describes_query_test_without_value() {
    let source = "TYPE: SNMP\nNAME: uptime\nTEST: EXPECT OID 1.3.6.1.2.1.1.3.0 TO_BE READONLY OF_TYPE TimeTicks\n";
    let file = parse_source("uptime.tdf", source).unwrap();
    assert_eq!(
        file.tests()[0].describe(),
        json!({
            "Type": "SNMP",
            "Name": "uptime",
            "Test": {
                "Oid": "1.3.6.1.2.1.1.3.0",
                "To be": "only_get",
                "Mib type": "TimeTicks"
            }
        })
    );
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

/// Verifies records serialize with a kind tag and read back unchanged.
#[test]
fn records_serialize_with_kind_tag() {
    let source = "TYPE: SNMP\nNAME: contact\nTEST: EXPECT OID 1.3 TO_BE SETTABLE OF_TYPE OCTET_STRING WITH_VALUE noc\n";
    let file = parse_source("contact.tdf", source).unwrap();
    let record = &file.tests()[0];

    let value = serde_json::to_value(record).unwrap();
    assert_eq!(value["kind"], "device_query");
    assert_eq!(value["command"], "set");

    let back: TestRecord = serde_json::from_value(value).unwrap();
    assert_eq!(&back, record);
    assert!(back.is_ready());
}
