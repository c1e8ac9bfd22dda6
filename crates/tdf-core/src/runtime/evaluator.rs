// crates/tdf-core/src/runtime/evaluator.rs
// ============================================================================
// Module: TDF Evaluator Set
// Description: Per-kind evaluator dispatch and run-fatal execution errors.
// Purpose: Route each test record to the evaluator configured for its kind.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{query, signal}
// ============================================================================

//! ## Overview
//! The evaluator set is assembled once at startup and passed to the executor.
//! Dispatch is a `match` on the record variant; a kind without an evaluator
//! is a configuration error that stops the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::record::TestKind;
use crate::core::record::TestRecord;
use crate::interfaces::PublishError;
use crate::interfaces::StoreError;
use crate::runtime::query::QueryEvaluator;
use crate::runtime::signal::SignalEvaluator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No evaluator is configured for the record's kind.
    #[error("no evaluator configured for {0} tests")]
    NoEvaluatorForType(TestKind),
    /// The document store failed.
    #[error("result store failure: {0}")]
    Store(#[from] StoreError),
    /// The result publisher failed.
    #[error("result publish failure: {0}")]
    Publish(#[from] PublishError),
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Outcome of evaluating one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the test passed.
    pub passed: bool,
    /// Whether a probe write could not be undone.
    pub device_left_modified: bool,
}

impl Evaluation {
    /// A passing evaluation.
    #[must_use]
    pub const fn passed() -> Self {
        Self::from_passed(true)
    }

    /// A failing evaluation.
    #[must_use]
    pub const fn failed() -> Self {
        Self::from_passed(false)
    }

    /// An evaluation that left the device untouched.
    #[must_use]
    pub const fn from_passed(passed: bool) -> Self {
        Self {
            passed,
            device_left_modified: false,
        }
    }
}

// ============================================================================
// SECTION: Evaluator Set
// ============================================================================

/// Evaluators keyed by test kind.
#[derive(Clone, Default)]
pub struct EvaluatorSet {
    /// Evaluator for signal-inclusion tests.
    signal: Option<SignalEvaluator>,
    /// Evaluator for device-query tests.
    query: Option<QueryEvaluator>,
}

impl EvaluatorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the signal-inclusion evaluator.
    #[must_use]
    pub fn with_signal(mut self, evaluator: SignalEvaluator) -> Self {
        self.signal = Some(evaluator);
        self
    }

    /// Adds the device-query evaluator.
    #[must_use]
    pub fn with_query(mut self, evaluator: QueryEvaluator) -> Self {
        self.query = Some(evaluator);
        self
    }

    /// Returns true when an evaluator exists for `kind`.
    #[must_use]
    pub const fn supports(&self, kind: TestKind) -> bool {
        match kind {
            TestKind::SignalInclusion => self.signal.is_some(),
            TestKind::DeviceQuery => self.query.is_some(),
        }
    }

    /// Evaluates a record with the evaluator for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::NoEvaluatorForType`] when the kind has no
    /// evaluator, and store errors raised by the evaluator.
    pub fn evaluate(&self, record: &TestRecord) -> Result<Evaluation, ExecutionError> {
        let missing = || ExecutionError::NoEvaluatorForType(record.kind());
        match record {
            TestRecord::SignalInclusion(test) => self.signal.as_ref().ok_or_else(missing)?.evaluate(test),
            TestRecord::DeviceQuery(test) => self.query.as_ref().ok_or_else(missing)?.evaluate(test),
        }
    }
}
