// crates/tdf-broker/src/sink/log.rs
// ============================================================================
// Module: TDF Harness Log Sink
// Description: Sink that writes result notices as JSON lines.
// Purpose: Record published results to any writer, such as a file or stdout.
// Dependencies: serde_json, std
// ============================================================================

//! ## Overview
//! [`LogSink`] serializes each notice together with its receipt into one JSON
//! line. The writer is flushed after every record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use serde_json::json;
use tdf_core::PublishReceipt;
use tdf_core::ResultNotice;

use crate::sink::ReceiptFactory;
use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Sink writing one JSON line per notice.
pub struct LogSink<W: Write + Send> {
    /// Output writer.
    writer: Mutex<W>,
    /// Receipt generator.
    receipts: ReceiptFactory,
}

impl<W: Write + Send> LogSink<W> {
    /// Creates a log sink with the `log` publisher name.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_publisher(writer, "log")
    }

    /// Creates a log sink with a custom publisher name.
    #[must_use]
    pub fn with_publisher(writer: W, publisher: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            receipts: ReceiptFactory::new(publisher),
        }
    }
}

impl<W: Write + Send> Sink for LogSink<W> {
    fn deliver(&self, notice: &ResultNotice) -> Result<PublishReceipt, SinkError> {
        let receipt = self.receipts.next();
        let record = json!({
            "receipt_id": receipt.receipt_id,
            "publisher": receipt.publisher,
            "channel": notice.channel,
            "result_id": notice.result_id,
            "test_name": notice.test_name,
        });
        let line = serde_json::to_string(&record)
            .map_err(|err| SinkError::LogWriteFailed(err.to_string()))?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::LogWriteFailed("log writer mutex poisoned".to_string()))?;
        writeln!(writer, "{line}").map_err(|err| SinkError::LogWriteFailed(err.to_string()))?;
        writer.flush().map_err(|err| SinkError::LogWriteFailed(err.to_string()))?;
        Ok(receipt)
    }
}
