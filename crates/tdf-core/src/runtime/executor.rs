// crates/tdf-core/src/runtime/executor.rs
// ============================================================================
// Module: TDF Test Executor
// Description: Runs accepted tests and emits one stored, published result each.
// Purpose: Drive evaluation, result storage, and result announcement for a run.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{evaluator, events}
// ============================================================================

//! ## Overview
//! Tests run one at a time in file order. For each test the executor
//! evaluates the record, inserts `{"name", "result"}` into the results
//! collection, publishes the returned document id, and optionally pauses
//! before the next test so downstream consumers can keep up.
//!
//! Errors from [`Executor::run`] are fatal: the run stops at the first test
//! whose result cannot be evaluated, stored, or published.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::core::document::ResultDocument;
use crate::core::document::Verdict;
use crate::core::identifiers::CollectionName;
use crate::core::identifiers::DocumentId;
use crate::core::record::TestKind;
use crate::core::record::TestRecord;
use crate::core::test_file::TestFile;
use crate::interfaces::DocumentStore;
use crate::interfaces::PublishReceipt;
use crate::interfaces::ResultNotice;
use crate::interfaces::ResultPublisher;
use crate::interfaces::SharedDocumentStore;
use crate::interfaces::SharedResultPublisher;
use crate::interfaces::StoreError;
use crate::runtime::evaluator::EvaluatorSet;
use crate::runtime::evaluator::ExecutionError;
use crate::runtime::events::EventLog;
use crate::runtime::events::LogEvent;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Executor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Collection receiving result documents.
    pub results: CollectionName,
    /// Channel named in result notices.
    pub channel: String,
    /// Pause after each published result.
    pub result_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            results: CollectionName::new("Test Results"),
            channel: "results".to_string(),
            result_delay: Duration::ZERO,
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Recorded outcome of one executed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    /// Test name.
    pub name: String,
    /// Protocol family.
    pub kind: TestKind,
    /// Verdict.
    pub verdict: Verdict,
    /// File the test came from, when known.
    pub source: Option<PathBuf>,
    /// Identifier of the stored result document.
    pub result_id: DocumentId,
    /// Publisher receipt for the result notice.
    pub receipt: PublishReceipt,
    /// Whether a probe write could not be undone.
    pub device_left_modified: bool,
}

/// Outcomes of a run in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Per-test outcomes.
    pub outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    /// Returns the number of executed tests.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the number of passing tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.verdict.is_pass()).count()
    }

    /// Returns the number of failing tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Returns true when every test passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Returns outcomes whose probe writes were not undone.
    pub fn devices_left_modified(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.device_left_modified)
    }
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Sequential test executor.
pub struct Executor {
    /// Evaluators keyed by test kind.
    evaluators: EvaluatorSet,
    /// Store receiving result documents.
    store: SharedDocumentStore,
    /// Publisher announcing stored results.
    publisher: SharedResultPublisher,
    /// Executor settings.
    config: ExecutorConfig,
    /// Event log.
    log: EventLog,
}

impl Executor {
    /// Creates an executor.
    #[must_use]
    pub const fn new(
        evaluators: EvaluatorSet,
        store: SharedDocumentStore,
        publisher: SharedResultPublisher,
        config: ExecutorConfig,
        log: EventLog,
    ) -> Self {
        Self {
            evaluators,
            store,
            publisher,
            config,
            log,
        }
    }

    /// Runs every test of the given files in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] at the first test that cannot be evaluated,
    /// stored, or published.
    pub fn run<'a>(
        &self,
        files: impl IntoIterator<Item = &'a TestFile>,
    ) -> Result<RunSummary, ExecutionError> {
        let mut summary = RunSummary::default();
        for file in files {
            for record in file.tests() {
                let mut outcome = self.execute(record)?;
                outcome.source = Some(file.path().to_path_buf());
                summary.outcomes.push(outcome);
            }
        }
        Ok(summary)
    }

    /// Executes a single test and emits its result.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the test cannot be evaluated, stored,
    /// or published.
    pub fn execute(&self, record: &TestRecord) -> Result<TestOutcome, ExecutionError> {
        let evaluation = self.evaluators.evaluate(record)?;
        let verdict = Verdict::from_passed(evaluation.passed);
        self.log.emit(LogEvent::TestExecuted {
            name: record.name().to_string(),
            kind: record.kind(),
            verdict,
        });

        let document = ResultDocument {
            name: record.name().to_string(),
            result: verdict,
        };
        let value: Value =
            serde_json::to_value(&document).map_err(|err| StoreError::Invalid(err.to_string()))?;
        let result_id = self.store.insert_document(&self.config.results, &value)?;

        let notice = ResultNotice {
            channel: self.config.channel.clone(),
            result_id: result_id.clone(),
            test_name: document.name.clone(),
        };
        let receipt = self.publisher.publish(&notice)?;
        self.log.emit(LogEvent::ResultPublished {
            test: document.name.clone(),
            result_id: result_id.to_string(),
            receipt_id: receipt.receipt_id.clone(),
        });

        if !self.config.result_delay.is_zero() {
            thread::sleep(self.config.result_delay);
        }

        Ok(TestOutcome {
            name: document.name,
            kind: record.kind(),
            verdict,
            source: None,
            result_id,
            receipt,
            device_left_modified: evaluation.device_left_modified,
        })
    }
}
