// crates/tdf-core/tests/grammar/parser_tests.rs
// ============================================================================
// Module: Parser Unit Tests
// Description: Group parsing, clause tables, and file-level rejection.
// ============================================================================

use std::fs;

use tdf_core::AccessMode;
use tdf_core::Inclusion;
use tdf_core::ParseError;
use tdf_core::TestKind;
use tdf_core::TestRecord;
use tdf_core::parse_source;
use tdf_core::parse_test_file;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const SIGNAL_GROUP: &str = "TYPE: DLEP
NAME: peer offer carries connection point
TEST: EXPECT SIGNAL Peer_Offer TO_INCLUDE DATA_ITEM IPv4_Connection_Point TO_NOT_INCLUDE SUB_DATA_ITEM Port
";

const QUERY_GROUP: &str = "TYPE: SNMP
NAME: contact is settable
TEST: EXPECT OID 1.3.6.1.2.1.1.4.0 TO_BE SETTABLE OF_TYPE OCTET_STRING WITH_VALUE noc
";

fn parse(source: &str) -> Result<Vec<TestRecord>, ParseError> {
    parse_source("tests/dlep/sample.tdf", source).map(|file| file.tests().to_vec())
}

// ============================================================================
// SECTION: Accepted Groups
// ============================================================================

/// Verifies a full signal-inclusion group fills every field positionally.
#[test]
fn parses_signal_inclusion_group() {
    let records = parse(SIGNAL_GROUP).expect("parse");
    assert_eq!(records.len(), 1);
    let TestRecord::SignalInclusion(test) = &records[0] else {
        panic!("expected signal-inclusion record");
    };
    assert_eq!(test.header.name, "peer offer carries connection point");
    assert!(test.header.expect);
    assert_eq!(test.signal.as_deref(), Some("Peer_Offer"));
    assert_eq!(test.signal_inclusion, Some(Inclusion::Include));
    assert_eq!(test.data_item.as_deref(), Some("IPv4_Connection_Point"));
    assert_eq!(test.item_inclusion, Some(Inclusion::Exclude));
    assert_eq!(test.sub_item.as_deref(), Some("Port"));
    assert!(records[0].is_ready());
}

/// Verifies a full device-query group fills every field.
#[test]
fn parses_device_query_group() {
    let records = parse(QUERY_GROUP).expect("parse");
    let TestRecord::DeviceQuery(test) = &records[0] else {
        panic!("expected device-query record");
    };
    assert_eq!(test.oid.as_deref(), Some("1.3.6.1.2.1.1.4.0"));
    assert_eq!(test.command, Some(AccessMode::Set));
    assert_eq!(test.value_type.as_deref(), Some("OCTET_STRING"));
    assert_eq!(test.expected_value.as_deref(), Some("noc"));
}

/// Verifies groups are parsed in order and mixed kinds are allowed.
#[test]
fn parses_multiple_groups_in_order() {
    let source = format!("{SIGNAL_GROUP}\n# second\n{QUERY_GROUP}");
    let records = parse(&source).expect("parse");
    let kinds: Vec<TestKind> = records.iter().map(TestRecord::kind).collect();
    assert_eq!(kinds, vec![TestKind::SignalInclusion, TestKind::DeviceQuery]);
}

/// Verifies the marker word does not decide nesting.
#[test]
fn inclusion_nesting_is_positional() {
    let source = "TYPE: DLEP
NAME: positional
TEST: EXPECT SIGNAL Peer_Offer TO_NOT_INCLUDE SUB_DATA_ITEM Foo TO_INCLUDE DATA_ITEM Bar
";
    let records = parse(source).expect("parse");
    let TestRecord::SignalInclusion(test) = &records[0] else {
        panic!("expected signal-inclusion record");
    };
    assert_eq!(test.signal_inclusion, Some(Inclusion::Exclude));
    assert_eq!(test.data_item.as_deref(), Some("Foo"));
    assert_eq!(test.item_inclusion, Some(Inclusion::Include));
    assert_eq!(test.sub_item.as_deref(), Some("Bar"));
}

/// Verifies a name keeps single spacing between words.
#[test]
fn name_words_are_joined_with_single_spaces() {
    let source = "TYPE: SNMP\nNAME:   uptime    reads\nTEST: EXPECT OID 1.3 TO_BE READABLE OF_TYPE TimeTicks\n";
    let records = parse(source).expect("parse");
    assert_eq!(records[0].name(), "uptime reads");
}

/// Verifies a file with only comments is accepted with no tests.
#[test]
fn comment_only_file_is_accepted_empty() {
    let file = parse_source("tests/snmp/empty.tdf", "# nothing yet\n").expect("parse");
    assert!(file.is_empty());
}

/// Verifies parsing the same text twice yields equal files.
#[test]
fn parsing_is_deterministic() {
    let first = parse_source("a.tdf", SIGNAL_GROUP).expect("first");
    let second = parse_source("a.tdf", SIGNAL_GROUP).expect("second");
    assert_eq!(first, second);
}

// ============================================================================
// SECTION: Rejected Groups
// ============================================================================

/// Verifies a first line other than `TYPE:` is rejected.
#[test]
fn rejects_group_not_starting_with_type() {
    let source = "NAME: x\nTYPE: DLEP\nTEST: EXPECT SIGNAL a TO_INCLUDE DATA_ITEM b\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedKeyword {
            expected: "TYPE:",
            found: "NAME:".to_string(),
            line: 1,
        }
    );
}

/// Verifies unknown protocol families are rejected.
#[test]
fn rejects_unknown_type() {
    let source = "TYPE: NETCONF\nNAME: x\nTEST: EXPECT OID 1 TO_BE READABLE OF_TYPE INTEGER\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownType {
            found: "NETCONF".to_string(),
            line: 1,
        }
    );
}

/// Verifies a missing `NAME:` line misaligns the group and is rejected.
#[test]
fn rejects_missing_name_line() {
    let source = "TYPE: DLEP\nTEST: EXPECT SIGNAL a TO_INCLUDE DATA_ITEM b\nTYPE: DLEP\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedKeyword {
            expected: "NAME:",
            found: "TEST:".to_string(),
            line: 2,
        }
    );
}

/// Verifies `TEST:` must open with `EXPECT`.
#[test]
fn rejects_missing_expect() {
    let source = "TYPE: DLEP\nNAME: x\nTEST: SIGNAL a TO_INCLUDE DATA_ITEM b\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedKeyword {
            expected: "EXPECT",
            found: "SIGNAL".to_string(),
            line: 3,
        }
    );
}

/// Verifies a group without its required clauses is incomplete.
#[test]
fn rejects_group_missing_required_field() {
    let source = "TYPE: SNMP\nNAME: no type\nTEST: EXPECT OID 1.3.6 TO_BE READABLE\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::IncompleteTest {
            name: "no type".to_string(),
            line: 3,
        }
    );
}

/// Verifies an empty name leaves the record incomplete.
#[test]
fn rejects_empty_name() {
    let source = "TYPE: SNMP\nNAME:\nTEST: EXPECT OID 1.3.6 TO_BE READABLE OF_TYPE INTEGER\n";
    assert!(matches!(parse(source), Err(ParseError::IncompleteTest { .. })));
}

/// Verifies empty quoted signal and item arguments leave the record incomplete.
#[test]
fn rejects_empty_quoted_signal_arguments() {
    let sources = [
        "TYPE: DLEP\nNAME: blank\nTEST: EXPECT SIGNAL '' TO_INCLUDE DATA_ITEM ''\n",
        "TYPE: DLEP\nNAME: blank\nTEST: EXPECT SIGNAL \"\" TO_INCLUDE DATA_ITEM Port\n",
        "TYPE: DLEP\nNAME: blank\nTEST: EXPECT SIGNAL Peer_Offer TO_INCLUDE DATA_ITEM ''\n",
        "TYPE: DLEP\nNAME: blank\nTEST: EXPECT SIGNAL Peer_Offer TO_INCLUDE DATA_ITEM Port TO_NOT_INCLUDE SUB_DATA_ITEM \"\"\n",
    ];
    for source in sources {
        assert_eq!(
            parse(source).unwrap_err(),
            ParseError::IncompleteTest {
                name: "blank".to_string(),
                line: 3,
            },
            "{source}"
        );
    }
}

/// Verifies empty quoted object identifiers and type tags leave the record incomplete.
#[test]
fn rejects_empty_quoted_query_arguments() {
    let sources = [
        "TYPE: SNMP\nNAME: blank\nTEST: EXPECT OID \"\" TO_BE READABLE OF_TYPE \"\"\n",
        "TYPE: SNMP\nNAME: blank\nTEST: EXPECT OID '' TO_BE READABLE OF_TYPE INTEGER\n",
        "TYPE: SNMP\nNAME: blank\nTEST: EXPECT OID 1.3.6 TO_BE READABLE OF_TYPE ''\n",
    ];
    for source in sources {
        assert_eq!(
            parse(source).unwrap_err(),
            ParseError::IncompleteTest {
                name: "blank".to_string(),
                line: 3,
            },
            "{source}"
        );
    }
}

/// Verifies a quoted multi-word name keeps its per-word quote characters.
#[test]
fn quoted_name_is_stripped_per_word() {
    let source = "TYPE: SNMP\nNAME: \"link up\"\nTEST: EXPECT OID 1.3.6 TO_BE READABLE OF_TYPE INTEGER\n";
    let records = parse(source).unwrap();
    assert_eq!(records[0].name(), "\"link up\"");
}

/// Verifies clause keywords from the other protocol are rejected.
#[test]
fn rejects_foreign_clause_keyword() {
    let source = "TYPE: DLEP\nNAME: x\nTEST: EXPECT OID 1.3.6\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedKeyword {
            expected: "SIGNAL, TO_INCLUDE, or TO_NOT_INCLUDE",
            found: "OID".to_string(),
            line: 3,
        }
    );
}

/// Verifies clause arguments must be present.
#[test]
fn rejects_clause_missing_argument() {
    let source = "TYPE: DLEP\nNAME: x\nTEST: EXPECT SIGNAL a TO_INCLUDE DATA_ITEM\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingArgument {
            keyword: "TO_INCLUDE",
            line: 3,
        }
    );
}

/// Verifies misspelled inclusion markers are rejected.
#[test]
fn rejects_unknown_item_marker() {
    let source = "TYPE: DLEP\nNAME: x\nTEST: EXPECT SIGNAL a TO_INCLUDE ITEM b\n";
    assert!(matches!(
        parse(source),
        Err(ParseError::UnexpectedKeyword {
            expected: "DATA_ITEM or SUB_DATA_ITEM",
            ..
        })
    ));
}

/// Verifies a third inclusion directive is rejected.
#[test]
fn rejects_third_inclusion_directive() {
    let source = "TYPE: DLEP\nNAME: x\nTEST: EXPECT SIGNAL a TO_INCLUDE DATA_ITEM b TO_INCLUDE SUB_DATA_ITEM c TO_INCLUDE SUB_DATA_ITEM d\n";
    assert!(matches!(parse(source), Err(ParseError::UnexpectedKeyword { .. })));
}

/// Verifies repeated scalar clauses are rejected.
#[test]
fn rejects_repeated_clause() {
    let source = "TYPE: SNMP\nNAME: x\nTEST: EXPECT OID 1 OID 2 TO_BE READABLE OF_TYPE INTEGER\n";
    assert!(matches!(parse(source), Err(ParseError::UnexpectedKeyword { .. })));
}

/// Verifies unknown access modes are rejected.
#[test]
fn rejects_unknown_access_mode() {
    let source = "TYPE: SNMP\nNAME: x\nTEST: EXPECT OID 1 TO_BE WRITABLE OF_TYPE INTEGER\n";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedKeyword {
            expected: "READONLY, SETTABLE, or READABLE",
            found: "WRITABLE".to_string(),
            line: 3,
        }
    );
}

/// Verifies extra words after the type tag are rejected.
#[test]
fn rejects_words_after_type() {
    let source = "TYPE: SNMP v3\nNAME: x\nTEST: EXPECT OID 1 TO_BE READABLE OF_TYPE INTEGER\n";
    assert!(matches!(parse(source), Err(ParseError::UnexpectedKeyword { .. })));
}

// ============================================================================
// SECTION: File-Level Rejection
// ============================================================================

/// Verifies two good groups plus one leftover line reject the whole file.
#[test]
fn rejects_trailing_lines_after_valid_groups() {
    let source = format!("{SIGNAL_GROUP}{QUERY_GROUP}TYPE: DLEP\n");
    let err = parse(&source).unwrap_err();
    assert_eq!(
        err,
        ParseError::TrailingLines {
            count: 1,
            line: 7,
        }
    );
}

/// Verifies a bad group anywhere rejects the file, even after good groups.
#[test]
fn later_bad_group_rejects_earlier_good_groups() {
    let source = format!("{SIGNAL_GROUP}TYPE: SNMP\nNAME: x\nTEST: EXPECT OID 1\n");
    assert!(parse(&source).is_err());
}

/// Verifies files are read from disk and missing files surface as io errors.
#[test]
fn reads_files_and_reports_io_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("query.tdf");
    fs::write(&path, QUERY_GROUP).expect("write");

    let file = parse_test_file(&path).expect("parse file");
    assert_eq!(file.path(), path.as_path());
    assert_eq!(file.len(), 1);

    let missing = parse_test_file(&dir.path().join("missing.tdf"));
    assert!(matches!(missing, Err(ParseError::Io(_))));
}

/// Verifies error messages name the line.
#[test]
fn errors_render_line_numbers() {
    let err = ParseError::TrailingLines {
        count: 2,
        line: 10,
    };
    assert_eq!(err.to_string(), "2 spare line(s) starting on line 10 do not form a test");
}

/// Verifies parse errors behave as standard errors with keyword and io messages.
#[test]
fn errors_implement_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(ParseError::MissingArgument {
        keyword: "OID",
        line: 3,
    });
    assert_eq!(err.to_string(), "`OID` on line 3 is missing its argument");
    assert!(err.source().is_none());
    assert_eq!(
        ParseError::Io("denied".to_string()).to_string(),
        "test file io error: denied"
    );
}
