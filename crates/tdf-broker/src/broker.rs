// crates/tdf-broker/src/broker.rs
// ============================================================================
// Module: TDF Harness Fan-Out Publisher
// Description: Result publisher delivering each notice to every configured sink.
// Purpose: Implement the core publisher interface over broker sinks.
// Dependencies: tdf-core, thiserror
// ============================================================================

//! ## Overview
//! [`FanOutPublisher`] implements [`tdf_core::ResultPublisher`] by delivering
//! each notice to its sinks in registration order.
//! Invariants:
//! - At least one sink is configured.
//! - Delivery stops at the first failing sink and the notice is reported as
//!   unpublished.
//! - The receipt of the first sink is the receipt of the publish.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tdf_core::PublishError;
use tdf_core::PublishReceipt;
use tdf_core::ResultNotice;
use tdf_core::ResultPublisher;
use thiserror::Error;

use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Broker Errors
// ============================================================================

/// Errors returned by the fan-out publisher.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// No sink was configured.
    #[error("broker sink is not configured")]
    MissingSink,
    /// A sink failed to deliver the notice.
    #[error("sink failure: {0}")]
    Sink(#[from] SinkError),
}

impl From<BrokerError> for PublishError {
    fn from(err: BrokerError) -> Self {
        Self::PublishFailed(err.to_string())
    }
}

// ============================================================================
// SECTION: Fan-Out Publisher
// ============================================================================

/// Builder for a fan-out publisher.
#[derive(Default)]
pub struct FanOutPublisherBuilder {
    /// Sinks in registration order.
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanOutPublisherBuilder {
    /// Adds a sink.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Adds an already shared sink.
    #[must_use]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Builds the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::MissingSink`] when no sink was added.
    pub fn build(self) -> Result<FanOutPublisher, BrokerError> {
        if self.sinks.is_empty() {
            return Err(BrokerError::MissingSink);
        }
        Ok(FanOutPublisher {
            sinks: self.sinks,
        })
    }
}

/// Publisher delivering every notice to all configured sinks.
#[derive(Clone)]
pub struct FanOutPublisher {
    /// Sinks in delivery order.
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanOutPublisher {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> FanOutPublisherBuilder {
        FanOutPublisherBuilder::default()
    }

    /// Returns the number of configured sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Delivers a notice to every sink.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] at the first sink that fails.
    pub fn deliver(&self, notice: &ResultNotice) -> Result<PublishReceipt, BrokerError> {
        let mut primary = None;
        for sink in &self.sinks {
            let receipt = sink.deliver(notice)?;
            primary.get_or_insert(receipt);
        }
        primary.ok_or(BrokerError::MissingSink)
    }
}

impl ResultPublisher for FanOutPublisher {
    fn publish(&self, notice: &ResultNotice) -> Result<PublishReceipt, PublishError> {
        self.deliver(notice).map_err(PublishError::from)
    }
}
