// crates/tdf-core/tests/grammar/tokenizer_tests.rs
// ============================================================================
// Module: Tokenizer Unit Tests
// Description: Line filtering, word splitting, and quote stripping.
// ============================================================================

use tdf_core::tokenize;

// ============================================================================
// SECTION: Line Filtering
// ============================================================================

/// Verifies blank and comment lines are dropped and numbering is preserved.
#[test]
fn drops_blank_and_comment_lines_keeping_numbers() {
    let source = "# header\n\nTYPE: DLEP\n   # indented comment\n   \nNAME: offer\n";
    let lines = tokenize(source);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].number, 3);
    assert_eq!(lines[0].words, vec!["TYPE:", "DLEP"]);
    assert_eq!(lines[1].number, 6);
    assert_eq!(lines[1].words, vec!["NAME:", "offer"]);
}

/// Verifies trailing whitespace and carriage returns are stripped.
#[test]
fn strips_trailing_whitespace() {
    let lines = tokenize("TYPE: SNMP   \r\nNAME: a\t\n");
    assert_eq!(lines[0].words, vec!["TYPE:", "SNMP"]);
    assert_eq!(lines[1].words, vec!["NAME:", "a"]);
}

/// Verifies a hash later in the line is an ordinary word.
#[test]
fn hash_inside_line_is_not_a_comment() {
    let lines = tokenize("NAME: case #4");
    assert_eq!(lines[0].words, vec!["NAME:", "case", "#4"]);
}

// ============================================================================
// SECTION: Word Splitting
// ============================================================================

/// Verifies runs of spaces produce no empty words.
#[test]
fn collapses_repeated_spaces() {
    let lines = tokenize("TEST:  EXPECT    SIGNAL  Peer_Offer");
    assert_eq!(lines[0].words, vec!["TEST:", "EXPECT", "SIGNAL", "Peer_Offer"]);
}

/// Verifies matching surrounding quotes are removed.
#[test]
fn strips_matching_quotes() {
    let lines = tokenize("WITH_VALUE \"lab-router\" 'x' \"open");
    assert_eq!(lines[0].words, vec!["WITH_VALUE", "lab-router", "x", "\"open"]);
}

/// Verifies quotes are stripped word by word.
#[test]
fn quotes_are_stripped_per_word() {
    let lines = tokenize("NAME: \"link up\" '' \"\"");
    assert_eq!(lines[0].words, vec!["NAME:", "\"link", "up\"", "", ""]);
}

/// Verifies a single quote character is kept as is.
#[test]
fn lone_quote_is_kept() {
    let lines = tokenize("NAME: \"");
    assert_eq!(lines[0].words, vec!["NAME:", "\""]);
}

/// Verifies empty input yields no lines.
#[test]
fn empty_input_yields_nothing() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("\n\n# only comments\n").is_empty());
}
