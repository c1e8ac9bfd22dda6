// crates/tdf-core/src/runtime/clock.rs
// ============================================================================
// Module: TDF Harness Logical Clock
// Description: Deterministic clock that counts instead of reading wall time.
// Purpose: Make audit documents and log records reproducible in tests and replays.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`LogicalClock`] hands out strictly increasing logical timestamps starting
//! at 1. Audit documents stamped with it render the counter instead of a wall
//! time, so two runs over the same inputs write identical documents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::core::time::Timestamp;
use crate::interfaces::Clock;

// ============================================================================
// SECTION: Logical Clock
// ============================================================================

/// Clock yielding 1, 2, 3, ... as logical timestamps.
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Last issued tick.
    ticks: AtomicU64,
}

impl LogicalClock {
    /// Creates a clock whose first tick is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        Timestamp::Logical(self.ticks.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
