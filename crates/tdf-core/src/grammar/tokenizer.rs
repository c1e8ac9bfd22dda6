// crates/tdf-core/src/grammar/tokenizer.rs
// ============================================================================
// Module: TDF Line Tokenizer
// Description: Splits definition file text into numbered word lists.
// Purpose: Drop blank and comment lines before the grammar sees the input.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Tokenizing never fails. Each surviving line keeps its 1-based source line
//! number so grammar errors can point back at the file. Words are separated
//! by single spaces; runs of spaces produce no empty words. A word wrapped in
//! matching double or single quotes loses the quotes. Quotes are stripped
//! per word, so a quoted phrase such as `"link up"` keeps its quote
//! characters, and `""` becomes an empty word that the grammar later treats
//! as an unset field.

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// One logical line of a definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine {
    /// 1-based line number in the source text.
    pub number: usize,
    /// Words on the line, in order.
    pub words: Vec<String>,
}

impl TokenLine {
    /// Returns the first word, if any.
    #[must_use]
    pub fn lead(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }
}

// ============================================================================
// SECTION: Tokenizer
// ============================================================================

/// Splits source text into logical lines.
#[must_use]
pub fn tokenize(source: &str) -> Vec<TokenLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.trim_end();
            if line.is_empty() || line.trim_start().starts_with('#') {
                return None;
            }
            let words: Vec<String> =
                line.split(' ').filter(|word| !word.is_empty()).map(strip_quotes).collect();
            if words.is_empty() {
                return None;
            }
            Some(TokenLine {
                number: index + 1,
                words,
            })
        })
        .collect()
}

/// Removes one pair of matching surrounding quotes.
fn strip_quotes(word: &str) -> String {
    for quote in ['"', '\''] {
        if word.len() >= 2
            && let Some(inner) = word.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    word.to_string()
}
