// crates/tdf-core/src/runtime/comparator.rs
// ============================================================================
// Module: TDF Harness Value Comparison
// Description: Type-tag matching, expected-value checks, and probe values.
// Purpose: Decide whether a device reading satisfies a device-query test.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Device type tags are matched case-insensitively with `_` and `-` treated
//! alike, so `OCTET_STRING` matches `octet-string` but `Integer32` does not
//! match `INTEGER`.
//!
//! Numeric types compare through an operator prefix (`>5`, `<5`, `=5`); an
//! expectation without an operator never passes. Text types compare by exact
//! equality. Numeric comparison is integer-only and fails closed on values
//! that do not parse.

// ============================================================================
// SECTION: Type Tags
// ============================================================================

/// Comparison class of a device type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// Integer-valued type with an inclusive range.
    Numeric {
        /// Smallest representable value.
        min: i128,
        /// Largest representable value.
        max: i128,
    },
    /// Any other type, compared as text.
    Text,
}

/// Normalizes a type tag for comparison.
fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_uppercase().replace('-', "_")
}

/// Returns true when two type tags name the same type.
#[must_use]
pub fn same_type(left: &str, right: &str) -> bool {
    normalize_tag(left) == normalize_tag(right)
}

/// Classifies a type tag.
#[must_use]
pub fn value_class(tag: &str) -> ValueClass {
    match normalize_tag(tag).as_str() {
        "INTEGER" | "INTEGER32" => ValueClass::Numeric {
            min: i128::from(i32::MIN),
            max: i128::from(i32::MAX),
        },
        "UNSIGNED32" | "UINTEGER" | "UINTEGER32" | "COUNTER" | "COUNTER32" | "GAUGE" | "GAUGE32"
        | "TICKS" | "TIMETICKS" => ValueClass::Numeric {
            min: 0,
            max: i128::from(u32::MAX),
        },
        "COUNTER64" => ValueClass::Numeric {
            min: 0,
            max: i128::from(u64::MAX),
        },
        _ => ValueClass::Text,
    }
}

// ============================================================================
// SECTION: Expected Values
// ============================================================================

/// Operator prefix of a numeric expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `>`: strictly greater.
    Greater,
    /// `<`: strictly less.
    Less,
    /// `=`: equal.
    Equal,
}

impl Comparison {
    /// Applies the comparison to `actual` against `operand`.
    #[must_use]
    pub const fn holds(self, actual: i128, operand: i128) -> bool {
        match self {
            Self::Greater => actual > operand,
            Self::Less => actual < operand,
            Self::Equal => actual == operand,
        }
    }
}

/// Splits a numeric expectation such as `>3` into operator and operand.
///
/// Returns `None` when the operator is missing or the operand is not an integer.
#[must_use]
pub fn parse_numeric_expectation(expected: &str) -> Option<(Comparison, i128)> {
    let mut chars = expected.chars();
    let comparison = match chars.next()? {
        '>' => Comparison::Greater,
        '<' => Comparison::Less,
        '=' => Comparison::Equal,
        _ => return None,
    };
    let operand = chars.as_str().trim().parse::<i128>().ok()?;
    Some((comparison, operand))
}

/// Returns true when `actual` satisfies `expected` under the type's rules.
#[must_use]
pub fn matches_expected(value_type: &str, actual: &str, expected: &str) -> bool {
    match value_class(value_type) {
        ValueClass::Text => actual == expected,
        ValueClass::Numeric {
            ..
        } => {
            let Some((comparison, operand)) = parse_numeric_expectation(expected) else {
                return false;
            };
            let Ok(actual) = actual.trim().parse::<i128>() else {
                return false;
            };
            comparison.holds(actual, operand)
        }
    }
}

// ============================================================================
// SECTION: Probe Values
// ============================================================================

/// Chooses a value to write when probing whether an object is writable.
///
/// A plain `expected` value valid for the type and different from
/// `original` is used as is. Otherwise numeric types step one away from the
/// original inside the type's range, and text types append `-probe`.
#[must_use]
pub fn probe_value(value_type: &str, original: &str, expected: Option<&str>) -> String {
    let class = value_class(value_type);
    if let Some(expected) = expected
        && expected != original
        && is_plain_value(class, expected)
    {
        return expected.to_string();
    }
    match class {
        ValueClass::Text => format!("{original}-probe"),
        ValueClass::Numeric {
            min,
            max,
        } => {
            let Ok(current) = original.trim().parse::<i128>() else {
                return min.max(0).to_string();
            };
            let next = if current < max { current + 1 } else { current - 1 };
            next.clamp(min, max).to_string()
        }
    }
}

/// Returns true when `value` can be written as is for the class.
fn is_plain_value(class: ValueClass, value: &str) -> bool {
    match class {
        ValueClass::Text => true,
        ValueClass::Numeric {
            min,
            max,
        } => value.parse::<i128>().is_ok_and(|number| (min ..= max).contains(&number)),
    }
}
