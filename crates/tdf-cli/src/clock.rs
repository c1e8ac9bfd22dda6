// crates/tdf-cli/src/clock.rs
// ============================================================================
// Module: TDF Harness System Clock
// Description: Wall-clock implementation of the core clock interface.
// Purpose: Stamp audit documents and log records during real runs.
// Dependencies: tdf-core
// ============================================================================

//! Wall-clock [`Clock`] yielding unix milliseconds.

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use tdf_core::Clock;
use tdf_core::Timestamp;

/// Clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Timestamp::UnixMillis(millis)
    }
}
