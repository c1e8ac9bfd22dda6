// crates/tdf-core/src/runtime/events.rs
// ============================================================================
// Module: TDF Harness Event Log
// Description: Structured JSON-lines log records and their sinks.
// Purpose: Report parse rejections, device failures, and results without a logging framework.
// Dependencies: crate::core, crate::interfaces, serde, serde_json
// ============================================================================

//! ## Overview
//! Every noteworthy step of a run is a typed [`LogEvent`]. The [`EventLog`]
//! stamps it with a timestamp, level, and component, filters it against the
//! configured level, and hands the record to an [`EventSink`]. Sinks write one
//! JSON object per line; a sink that fails to write drops the record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;

use crate::core::document::AuditMethod;
use crate::core::document::Verdict;
use crate::core::record::TestKind;
use crate::core::time::Timestamp;
use crate::interfaces::Clock;
use crate::runtime::clock::LogicalClock;

// ============================================================================
// SECTION: Levels
// ============================================================================

/// Log verbosity, from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failures that leave the run or the device in a bad state.
    Error,
    /// Rejected input and recoverable failures.
    Warn,
    /// Normal progress.
    Info,
    /// Per-call detail.
    Debug,
}

impl LogLevel {
    /// Parses a level label such as `info`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Harness events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    /// A definition file parsed cleanly.
    FileAccepted {
        /// File path.
        path: String,
        /// Number of tests in the file.
        tests: usize,
    },
    /// A definition file was dropped.
    FileRejected {
        /// File path.
        path: String,
        /// Reason the file cannot be parsed.
        error: String,
    },
    /// A suite folder was assembled.
    SuiteFolder {
        /// Folder name.
        folder: String,
        /// Number of accepted files in the folder.
        files: usize,
    },
    /// A test finished.
    TestExecuted {
        /// Test name.
        name: String,
        /// Protocol family.
        kind: TestKind,
        /// Verdict.
        verdict: Verdict,
    },
    /// A device call failed.
    DeviceFailure {
        /// Test that issued the call.
        test: String,
        /// Object identifier.
        oid: String,
        /// Call method.
        method: AuditMethod,
        /// Failure reason.
        error: String,
    },
    /// A probe write could not be undone.
    DeviceLeftModified {
        /// Test that issued the probe.
        test: String,
        /// Object identifier.
        oid: String,
        /// Value the object held before the probe.
        original: String,
        /// Restore failure reason.
        error: String,
    },
    /// A result notice was published.
    ResultPublished {
        /// Test name.
        test: String,
        /// Stored result document identifier.
        result_id: String,
        /// Publisher receipt identifier.
        receipt_id: String,
    },
    /// Captured signaling messages were imported into the store.
    CaptureImported {
        /// Capture file path.
        path: String,
        /// Number of documents imported.
        documents: usize,
    },
}

impl LogEvent {
    /// Returns the level the event is logged at.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        match self {
            Self::DeviceLeftModified {
                ..
            } => LogLevel::Error,
            Self::FileRejected {
                ..
            }
            | Self::DeviceFailure {
                ..
            } => LogLevel::Warn,
            Self::FileAccepted {
                ..
            }
            | Self::SuiteFolder {
                ..
            }
            | Self::TestExecuted {
                ..
            }
            | Self::CaptureImported {
                ..
            } => LogLevel::Info,
            Self::ResultPublished {
                ..
            } => LogLevel::Debug,
        }
    }
}

/// One serialized log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Time the event was emitted.
    pub timestamp: Timestamp,
    /// Event level.
    pub level: LogLevel,
    /// Component that emitted the event.
    pub component: &'static str,
    /// Event payload.
    #[serde(flatten)]
    pub event: LogEvent,
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for log records.
pub trait EventSink: Send + Sync {
    /// Records one log record.
    fn record(&self, record: &LogRecord);
}

/// Sink that writes JSON lines to stderr.
pub struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn record(&self, record: &LogRecord) {
        if let Ok(payload) = serde_json::to_string(record) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, record: &LogRecord) {
        if let Ok(payload) = serde_json::to_string(record)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that keeps records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryEventSink {
    /// Recorded log lines.
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.records
            .lock()
            .map(|records| records.iter().map(|record| record.event.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns a copy of the full records in emission order.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

/// Sink that discards every record.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _record: &LogRecord) {}
}

// ============================================================================
// SECTION: Event Log
// ============================================================================

/// Level-filtered front end over an [`EventSink`].
#[derive(Clone)]
pub struct EventLog {
    /// Destination sink.
    sink: Arc<dyn EventSink>,
    /// Timestamp source.
    clock: Arc<dyn Clock + Send + Sync>,
    /// Most verbose level that is recorded.
    level: LogLevel,
    /// Component label stamped on records.
    component: &'static str,
}

impl EventLog {
    /// Creates an event log for the `harness` component.
    #[must_use]
    pub fn new(
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock + Send + Sync>,
        level: LogLevel,
    ) -> Self {
        Self {
            sink,
            clock,
            level,
            component: "harness",
        }
    }

    /// Creates an event log that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopEventSink), Arc::new(LogicalClock::new()), LogLevel::Error)
    }

    /// Returns a copy of this log stamped with another component label.
    #[must_use]
    pub fn for_component(&self, component: &'static str) -> Self {
        Self {
            component,
            ..self.clone()
        }
    }

    /// Returns true when events at `level` are recorded.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Emits an event if its level is enabled.
    pub fn emit(&self, event: LogEvent) {
        let level = event.level();
        if !self.enabled(level) {
            return;
        }
        self.sink.record(&LogRecord {
            timestamp: self.clock.now(),
            level,
            component: self.component,
            event,
        });
    }
}
