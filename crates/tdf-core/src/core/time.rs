// crates/tdf-core/src/core/time.rs
// ============================================================================
// Module: TDF Harness Time Model
// Description: Timestamps stamped onto audit documents and log records.
// Purpose: Keep the executor free of wall-clock reads so runs can be replayed.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The executor never reads the wall clock. Hosts inject a
//! [`crate::interfaces::Clock`] that yields either unix milliseconds or a
//! logical counter; tests use the logical form so audit documents are
//! byte-for-byte reproducible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Timestamp used in audit documents and log records.
///
/// # Invariants
/// - Values are supplied by a clock owned by the host.
/// - Monotonicity is the clock's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Renders the timestamp for the `time` field of audit documents.
    ///
    /// Wall-clock values render as RFC 3339 in UTC. Logical values and
    /// out-of-range wall-clock values render as their plain integer.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::UnixMillis(millis) => {
                let nanos = i128::from(*millis) * 1_000_000;
                OffsetDateTime::from_unix_timestamp_nanos(nanos)
                    .ok()
                    .and_then(|instant| instant.format(&Rfc3339).ok())
                    .unwrap_or_else(|| millis.to_string())
            }
            Self::Logical(value) => value.to_string(),
        }
    }
}
