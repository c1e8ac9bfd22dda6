// crates/tdf-broker/src/lib.rs
// ============================================================================
// Module: TDF Harness Broker Library
// Description: Reference sinks and the fan-out publisher for result notices.
// Purpose: Announce stored test results to downstream consumers.
// Dependencies: tdf-core, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The broker provides ready-made [`Sink`] implementations plus the
//! [`FanOutPublisher`] that implements [`tdf_core::ResultPublisher`] on top of
//! them. The `tdf-harness` binary wires a [`LogSink`]; the channel and
//! callback sinks serve programs embedding the harness.
//! Invariants:
//! - Sinks return receipts only on successful delivery.
//! - A notice counts as published only when every sink accepted it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod broker;
pub mod sink;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use broker::BrokerError;
pub use broker::FanOutPublisher;
pub use broker::FanOutPublisherBuilder;
pub use sink::CallbackSink;
pub use sink::ChannelSink;
pub use sink::LogSink;
pub use sink::ResultMessage;
pub use sink::Sink;
pub use sink::SinkError;
