// crates/tdf-core/src/grammar/parser.rs
// ============================================================================
// Module: TDF Group Parser
// Description: Three-line group state machine over tokenized definition files.
// Purpose: Build ready test records or reject the whole file with a located error.
// Dependencies: thiserror, crate::core, crate::grammar::{keyword, tokenizer}
// ============================================================================

//! ## Overview
//! Logical lines are buffered until a full group of [`TEST_GROUP_LINES`] is
//! available, then the group is parsed into one [`TestRecord`]:
//!
//! ```text
//! TYPE: SNMP
//! NAME: uptime is readable
//! TEST: EXPECT OID 1.3.6.1.2.1.1.3.0 TO_BE READABLE OF_TYPE TimeTicks
//! ```
//!
//! Clause words are consumed left to right by a cursor over the line; each
//! keyword takes a fixed number of words. Any failure rejects the file as a
//! whole, and a partial group at end of file is an error of its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::record::AccessMode;
use crate::core::record::DeviceQueryTest;
use crate::core::record::Inclusion;
use crate::core::record::SignalInclusionTest;
use crate::core::record::TestKind;
use crate::core::record::TestRecord;
use crate::core::test_file::TestFile;
use crate::grammar::keyword::EXPECT;
use crate::grammar::keyword::ItemMarker;
use crate::grammar::keyword::LineKeyword;
use crate::grammar::keyword::QueryKeyword;
use crate::grammar::keyword::SignalKeyword;
use crate::grammar::tokenizer::TokenLine;
use crate::grammar::tokenizer::tokenize;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Number of logical lines in one test group.
pub const TEST_GROUP_LINES: usize = 3;

/// Maximum accepted definition file size in bytes.
const MAX_SOURCE_BYTES: u64 = 1024 * 1024;

/// Placeholder shown when a line ends before an expected word.
const END_OF_LINE: &str = "end of line";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that reject a definition file.
///
/// # Invariants
/// - `line` fields are 1-based source line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A word appeared where a different keyword was required.
    #[error("unexpected `{found}` on line {line}, expected {expected}")]
    UnexpectedKeyword {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The word that was actually seen.
        found: String,
        /// Source line.
        line: usize,
    },
    /// `TYPE:` named an unknown protocol family.
    #[error("unknown test type `{found}` on line {line}")]
    UnknownType {
        /// The unknown type tag.
        found: String,
        /// Source line.
        line: usize,
    },
    /// A group parsed but left required fields unset.
    #[error("test `{name}` ending on line {line} is missing required fields")]
    IncompleteTest {
        /// Test name, possibly empty.
        name: String,
        /// Source line of the group's `TEST:` line.
        line: usize,
    },
    /// Lines remained after the last complete group.
    #[error("{count} spare line(s) starting on line {line} do not form a test")]
    TrailingLines {
        /// Number of leftover logical lines.
        count: usize,
        /// Source line of the first leftover line.
        line: usize,
    },
    /// A keyword ran out of words before its arguments.
    #[error("`{keyword}` on line {line} is missing its argument")]
    MissingArgument {
        /// The keyword missing its arguments.
        keyword: &'static str,
        /// Source line.
        line: usize,
    },
    /// The file could not be read.
    #[error("test file io error: {0}")]
    Io(String),
}


// ============================================================================
// SECTION: Public API
// ============================================================================

/// Reads and parses a definition file.
///
/// # Errors
///
/// Returns [`ParseError::Io`] when the file is unreadable, too large, or not
/// UTF-8, and any grammar error from [`parse_source`].
pub fn parse_test_file(path: &Path) -> Result<TestFile, ParseError> {
    let metadata =
        fs::metadata(path).map_err(|err| ParseError::Io(format!("{}: {err}", path.display())))?;
    if metadata.len() > MAX_SOURCE_BYTES {
        return Err(ParseError::Io(format!(
            "{}: file exceeds {MAX_SOURCE_BYTES} bytes",
            path.display()
        )));
    }
    let source = fs::read_to_string(path)
        .map_err(|err| ParseError::Io(format!("{}: {err}", path.display())))?;
    parse_source(path, &source)
}

/// Parses definition text attributed to `path`.
///
/// # Errors
///
/// Returns the first [`ParseError`] found; no partial file is produced.
pub fn parse_source(path: impl Into<PathBuf>, source: &str) -> Result<TestFile, ParseError> {
    let mut tests = Vec::new();
    let mut group: Vec<TokenLine> = Vec::with_capacity(TEST_GROUP_LINES);
    for line in tokenize(source) {
        group.push(line);
        if let [type_line, name_line, test_line] = group.as_slice() {
            tests.push(parse_group(type_line, name_line, test_line)?);
            group.clear();
        }
    }
    if let Some(first) = group.first() {
        return Err(ParseError::TrailingLines {
            count: group.len(),
            line: first.number,
        });
    }
    Ok(TestFile::new(path.into(), tests))
}

// ============================================================================
// SECTION: Group Parsing
// ============================================================================

/// Parses one full group into a ready record.
fn parse_group(
    type_line: &TokenLine,
    name_line: &TokenLine,
    test_line: &TokenLine,
) -> Result<TestRecord, ParseError> {
    let mut record = TestRecord::new(parse_type_line(type_line)?);
    record.header_mut().name = parse_name_line(name_line)?;

    let mut cursor = Cursor::open(test_line, LineKeyword::Test)?;
    match cursor.next_word() {
        Some(EXPECT) => record.header_mut().expect = true,
        other => {
            return Err(ParseError::UnexpectedKeyword {
                expected: EXPECT,
                found: other.unwrap_or(END_OF_LINE).to_string(),
                line: test_line.number,
            });
        }
    }
    match &mut record {
        TestRecord::SignalInclusion(test) => parse_signal_clauses(&mut cursor, test)?,
        TestRecord::DeviceQuery(test) => parse_query_clauses(&mut cursor, test)?,
    }

    if !record.is_ready() {
        return Err(ParseError::IncompleteTest {
            name: record.name().to_string(),
            line: test_line.number,
        });
    }
    Ok(record)
}

/// Parses `TYPE: <kind>`.
fn parse_type_line(line: &TokenLine) -> Result<TestKind, ParseError> {
    let mut cursor = Cursor::open(line, LineKeyword::Type)?;
    let tag = cursor.next_word().ok_or(ParseError::MissingArgument {
        keyword: LineKeyword::Type.as_str(),
        line: line.number,
    })?;
    let kind = TestKind::from_type_tag(tag).ok_or_else(|| ParseError::UnknownType {
        found: tag.to_string(),
        line: line.number,
    })?;
    if let Some(extra) = cursor.next_word() {
        return Err(ParseError::UnexpectedKeyword {
            expected: END_OF_LINE,
            found: extra.to_string(),
            line: line.number,
        });
    }
    Ok(kind)
}

/// Parses `NAME: <words...>` into a single-spaced name.
fn parse_name_line(line: &TokenLine) -> Result<String, ParseError> {
    let cursor = Cursor::open(line, LineKeyword::Name)?;
    Ok(cursor.rest().join(" "))
}

/// Consumes `DLEP` clauses.
fn parse_signal_clauses(
    cursor: &mut Cursor<'_>,
    test: &mut SignalInclusionTest,
) -> Result<(), ParseError> {
    while let Some(word) = cursor.peek() {
        let keyword = SignalKeyword::from_word(word)
            .ok_or_else(|| cursor.unexpected(SignalKeyword::EXPECTED, word))?;
        let clause = cursor.take_clause(keyword.as_str(), keyword.arity())?;
        match keyword {
            SignalKeyword::Signal => {
                if test.signal.is_some() {
                    return Err(cursor.unexpected("a single SIGNAL clause", word));
                }
                test.signal = Some(clause[1].clone());
            }
            SignalKeyword::ToInclude | SignalKeyword::ToNotInclude => {
                let marker = &clause[1];
                if ItemMarker::from_word(marker).is_none() {
                    return Err(cursor.unexpected(ItemMarker::EXPECTED, marker));
                }
                let inclusion = if keyword == SignalKeyword::ToInclude {
                    Inclusion::Include
                } else {
                    Inclusion::Exclude
                };
                if !test.push_inclusion(inclusion, clause[2].clone()) {
                    return Err(cursor.unexpected("at most two inclusion clauses", word));
                }
            }
        }
    }
    Ok(())
}

/// Consumes `SNMP` clauses.
fn parse_query_clauses(
    cursor: &mut Cursor<'_>,
    test: &mut DeviceQueryTest,
) -> Result<(), ParseError> {
    while let Some(word) = cursor.peek() {
        let keyword = QueryKeyword::from_word(word)
            .ok_or_else(|| cursor.unexpected(QueryKeyword::EXPECTED, word))?;
        let clause = cursor.take_clause(keyword.as_str(), keyword.arity())?;
        let argument = clause[1].clone();
        let already_set = match keyword {
            QueryKeyword::Oid => test.oid.replace(argument).is_some(),
            QueryKeyword::ToBe => {
                let mode = AccessMode::from_keyword(&argument).ok_or_else(|| {
                    cursor.unexpected("READONLY, SETTABLE, or READABLE", &argument)
                })?;
                test.command.replace(mode).is_some()
            }
            QueryKeyword::OfType => test.value_type.replace(argument).is_some(),
            QueryKeyword::WithValue => test.expected_value.replace(argument).is_some(),
        };
        if already_set {
            return Err(cursor.unexpected("each clause at most once", word));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Cursor
// ============================================================================

/// Read position over the words of one line.
struct Cursor<'a> {
    /// Words of the line.
    words: &'a [String],
    /// Index of the next unread word.
    index: usize,
    /// Source line number.
    line: usize,
}

impl<'a> Cursor<'a> {
    /// Checks the leading keyword and positions the cursor after it.
    fn open(line: &'a TokenLine, keyword: LineKeyword) -> Result<Self, ParseError> {
        let lead = line.lead().unwrap_or(END_OF_LINE);
        if lead != keyword.as_str() {
            return Err(ParseError::UnexpectedKeyword {
                expected: keyword.as_str(),
                found: lead.to_string(),
                line: line.number,
            });
        }
        Ok(Self {
            words: &line.words,
            index: 1,
            line: line.number,
        })
    }

    /// Returns the next word without consuming it.
    fn peek(&self) -> Option<&'a str> {
        self.words.get(self.index).map(String::as_str)
    }

    /// Consumes and returns the next word.
    fn next_word(&mut self) -> Option<&'a str> {
        let word = self.peek()?;
        self.index += 1;
        Some(word)
    }

    /// Consumes a clause of `arity` words starting at the cursor.
    fn take_clause(&mut self, keyword: &'static str, arity: usize) -> Result<&'a [String], ParseError> {
        let end = self.index + arity;
        let clause = self.words.get(self.index .. end).ok_or(ParseError::MissingArgument {
            keyword,
            line: self.line,
        })?;
        self.index = end;
        Ok(clause)
    }

    /// Returns every unread word.
    fn rest(&self) -> &'a [String] {
        self.words.get(self.index ..).unwrap_or_default()
    }

    /// Builds an unexpected-keyword error on this line.
    fn unexpected(&self, expected: &'static str, found: &str) -> ParseError {
        ParseError::UnexpectedKeyword {
            expected,
            found: found.to_string(),
            line: self.line,
        }
    }
}
