// crates/tdf-broker/src/sink/mod.rs
// ============================================================================
// Module: TDF Harness Broker Sinks
// Description: Sink trait and reference implementations for result notices.
// Purpose: Deliver result notices to concrete consumers.
// Dependencies: tdf-core, thiserror, std
// ============================================================================

//! ## Overview
//! Sinks deliver [`ResultNotice`] values and return [`PublishReceipt`] values
//! that identify the delivery. Implementations must fail closed on delivery
//! errors.
//! Invariants:
//! - Receipts are returned only after successful delivery.
//! - Receipt identifiers are `<publisher>-<sequence>` with a per-sink sequence
//!   starting at 1.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use tdf_core::PublishReceipt;
use tdf_core::ResultNotice;
use thiserror::Error;

// ============================================================================
// SECTION: Sink Errors
// ============================================================================

/// Errors emitted by broker sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Sink delivery failed.
    #[error("sink delivery failed: {0}")]
    DeliveryFailed(String),
    /// Log sink failed to write.
    #[error("log write failed: {0}")]
    LogWriteFailed(String),
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Delivers result notices to one consumer.
pub trait Sink: Send + Sync {
    /// Delivers the notice.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when delivery fails.
    fn deliver(&self, notice: &ResultNotice) -> Result<PublishReceipt, SinkError>;
}

// ============================================================================
// SECTION: Result Message
// ============================================================================

/// Message emitted by channel-based sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMessage {
    /// Delivered notice.
    pub notice: ResultNotice,
    /// Receipt issued for the delivery.
    pub receipt: PublishReceipt,
}

// ============================================================================
// SECTION: Receipt Helpers
// ============================================================================

/// Builds sequential publish receipts.
#[derive(Debug)]
pub(crate) struct ReceiptFactory {
    /// Publisher name embedded in receipts.
    publisher: String,
    /// Monotonic counter for receipt identifiers.
    counter: AtomicU64,
}

impl ReceiptFactory {
    /// Creates a receipt factory for the named publisher.
    pub(crate) fn new(publisher: impl Into<String>) -> Self {
        Self {
            publisher: publisher.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Returns the next receipt.
    pub(crate) fn next(&self) -> PublishReceipt {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        PublishReceipt {
            receipt_id: format!("{}-{seq}", self.publisher),
            publisher: self.publisher.clone(),
        }
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod callback;
pub mod channel;
pub mod log;

pub use callback::CallbackSink;
pub use channel::ChannelSink;
pub use log::LogSink;
