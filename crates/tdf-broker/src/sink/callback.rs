// crates/tdf-broker/src/sink/callback.rs
// ============================================================================
// Module: TDF Harness Callback Sink
// Description: Sink that hands result notices to a closure.
// Purpose: Let embedders react to results without a channel or writer.
// Dependencies: std
// ============================================================================

//! Closure-backed sink. The callback's error becomes the delivery error.

use std::sync::Arc;

use tdf_core::PublishReceipt;
use tdf_core::ResultNotice;

use crate::sink::ReceiptFactory;
use crate::sink::ResultMessage;
use crate::sink::Sink;
use crate::sink::SinkError;

/// Callback invoked for every delivered notice.
type ResultCallback = dyn Fn(&ResultMessage) -> Result<(), SinkError> + Send + Sync;

/// Sink invoking a callback per notice.
pub struct CallbackSink {
    /// Callback handler.
    callback: Arc<ResultCallback>,
    /// Receipt generator.
    receipts: ReceiptFactory,
}

impl CallbackSink {
    /// Creates a callback sink with the `callback` publisher name.
    #[must_use]
    pub fn new(
        callback: impl Fn(&ResultMessage) -> Result<(), SinkError> + Send + Sync + 'static,
    ) -> Self {
        Self::with_publisher(callback, "callback")
    }

    /// Creates a callback sink with a custom publisher name.
    #[must_use]
    pub fn with_publisher(
        callback: impl Fn(&ResultMessage) -> Result<(), SinkError> + Send + Sync + 'static,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            callback: Arc::new(callback),
            receipts: ReceiptFactory::new(publisher),
        }
    }
}

impl Sink for CallbackSink {
    fn deliver(&self, notice: &ResultNotice) -> Result<PublishReceipt, SinkError> {
        let receipt = self.receipts.next();
        let message = ResultMessage {
            notice: notice.clone(),
            receipt,
        };
        (self.callback)(&message)?;
        Ok(message.receipt)
    }
}
