// crates/tdf-broker/src/sink/channel.rs
// ============================================================================
// Module: TDF Harness Channel Sink
// Description: Sink that forwards result notices over a tokio channel.
// Purpose: Hand results to an in-process consumer such as a dashboard task.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`ChannelSink`] never blocks: a full or closed channel is a delivery
//! failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tdf_core::PublishReceipt;
use tdf_core::ResultNotice;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::sink::ReceiptFactory;
use crate::sink::ResultMessage;
use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

/// Sink forwarding notices to a bounded channel.
pub struct ChannelSink {
    /// Channel sender.
    sender: mpsc::Sender<ResultMessage>,
    /// Receipt generator.
    receipts: ReceiptFactory,
}

impl ChannelSink {
    /// Creates a channel sink with the `channel` publisher name.
    #[must_use]
    pub fn new(sender: mpsc::Sender<ResultMessage>) -> Self {
        Self::with_publisher(sender, "channel")
    }

    /// Creates a channel sink with a custom publisher name.
    #[must_use]
    pub fn with_publisher(sender: mpsc::Sender<ResultMessage>, publisher: impl Into<String>) -> Self {
        Self {
            sender,
            receipts: ReceiptFactory::new(publisher),
        }
    }
}

impl Sink for ChannelSink {
    fn deliver(&self, notice: &ResultNotice) -> Result<PublishReceipt, SinkError> {
        let receipt = self.receipts.next();
        let message = ResultMessage {
            notice: notice.clone(),
            receipt: receipt.clone(),
        };
        self.sender.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => SinkError::DeliveryFailed("channel full".to_string()),
            TrySendError::Closed(_) => SinkError::DeliveryFailed("channel closed".to_string()),
        })?;
        Ok(receipt)
    }
}
