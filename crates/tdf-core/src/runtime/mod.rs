// crates/tdf-core/src/runtime/mod.rs
// ============================================================================
// Module: TDF Harness Runtime
// Description: Evaluators, executor, loader, event log, and in-memory collaborators.
// Purpose: Execute accepted tests against the capability interfaces.
// Dependencies: crate::core, crate::grammar, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime is synchronous and single-threaded per run. Collaborators are
//! held behind the shared wrappers from [`crate::interfaces`] so one store can
//! serve both the signal evaluator and result emission.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod clock;
pub mod comparator;
pub mod device;
pub mod evaluator;
pub mod events;
pub mod executor;
pub mod loader;
pub mod query;
pub mod signal;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::LogicalClock;
pub use device::DeviceObject;
pub use device::InMemoryDeviceAgent;
pub use evaluator::Evaluation;
pub use evaluator::EvaluatorSet;
pub use evaluator::ExecutionError;
pub use events::EventLog;
pub use events::EventSink;
pub use events::FileEventSink;
pub use events::LogEvent;
pub use events::LogLevel;
pub use events::LogRecord;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use executor::Executor;
pub use executor::ExecutorConfig;
pub use executor::RunSummary;
pub use executor::TestOutcome;
pub use loader::load_suite;
pub use loader::load_test_files;
pub use query::QueryEvaluator;
pub use signal::SignalEvaluator;
pub use store::InMemoryDocumentStore;
