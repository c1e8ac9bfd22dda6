// crates/tdf-core/src/grammar/mod.rs
// ============================================================================
// Module: TDF Definition Grammar
// Description: Tokenizer, keyword tables, and group parser for definition files.
// Purpose: Turn definition text into accepted test files.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Definition files are untrusted operator input. The grammar is strict:
//! unknown keywords, repeated clauses, and leftover lines all reject the file
//! rather than guessing at intent.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod keyword;
pub mod parser;
pub mod tokenizer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use parser::ParseError;
pub use parser::TEST_GROUP_LINES;
pub use parser::parse_source;
pub use parser::parse_test_file;
pub use tokenizer::TokenLine;
pub use tokenizer::tokenize;
