// crates/tdf-core/src/lib.rs
// ============================================================================
// Module: TDF Harness Core Library
// Description: Public API surface for the test definition harness core.
// Purpose: Expose test records, the definition grammar, interfaces, and the executor.
// Dependencies: crate::{core, grammar, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The harness core turns line-oriented test definition files into typed test
//! records, groups accepted files into suites, and executes each record against
//! captured signaling traffic or a device agent. External systems are reached
//! only through the traits in [`interfaces`], so the core never talks to a
//! database, a message broker, or the network directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod grammar;
pub mod interfaces;
pub mod runtime;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use grammar::ParseError;
pub use grammar::TEST_GROUP_LINES;
pub use grammar::TokenLine;
pub use grammar::parse_source;
pub use grammar::parse_test_file;
pub use grammar::tokenize;
pub use interfaces::Clock;
pub use interfaces::DeviceAgent;
pub use interfaces::DeviceError;
pub use interfaces::DeviceReading;
pub use interfaces::DocumentStore;
pub use interfaces::PublishError;
pub use interfaces::PublishReceipt;
pub use interfaces::ResultNotice;
pub use interfaces::ResultPublisher;
pub use interfaces::SharedDeviceAgent;
pub use interfaces::SharedDocumentStore;
pub use interfaces::SharedResultPublisher;
pub use interfaces::StoreError;
pub use runtime::DeviceObject;
pub use runtime::Evaluation;
pub use runtime::EvaluatorSet;
pub use runtime::EventLog;
pub use runtime::EventSink;
pub use runtime::ExecutionError;
pub use runtime::Executor;
pub use runtime::ExecutorConfig;
pub use runtime::FileEventSink;
pub use runtime::InMemoryDeviceAgent;
pub use runtime::InMemoryDocumentStore;
pub use runtime::LogEvent;
pub use runtime::LogLevel;
pub use runtime::LogRecord;
pub use runtime::LogicalClock;
pub use runtime::MemoryEventSink;
pub use runtime::QueryEvaluator;
pub use runtime::RunSummary;
pub use runtime::SignalEvaluator;
pub use runtime::StderrEventSink;
pub use runtime::TestOutcome;
pub use runtime::load_suite;
pub use runtime::load_test_files;
