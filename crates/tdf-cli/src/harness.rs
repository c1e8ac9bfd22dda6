// crates/tdf-cli/src/harness.rs
// ============================================================================
// Module: TDF Harness Assembly
// Description: Builds the store, device, publisher, and executor from config.
// Purpose: Run selected test files against configured collaborators.
// Dependencies: tdf-core, tdf-config, tdf-broker, tdf-providers, tdf-store-sqlite
// ============================================================================

//! ## Overview
//! [`Harness::build`] wires collaborators in a fixed order: event log,
//! document store, capture import, device, publisher, executor. Capture files
//! are imported before any test runs so signal lookups see them.
//! Invariants:
//! - Without a configured device snapshot the harness has no device query
//!   evaluator, and a run reaching a device query test stops with
//!   [`ExecutionError::NoEvaluatorForType`].
//! - Selections never mix suite folders with explicit files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tdf_broker::BrokerError;
use tdf_broker::FanOutPublisher;
use tdf_broker::LogSink;
use tdf_config::HarnessConfig;
use tdf_core::Clock;
use tdf_core::EvaluatorSet;
use tdf_core::EventLog;
use tdf_core::EventSink;
use tdf_core::ExecutionError;
use tdf_core::Executor;
use tdf_core::FileEventSink;
use tdf_core::FolderName;
use tdf_core::InMemoryDocumentStore;
use tdf_core::QueryEvaluator;
use tdf_core::RunSummary;
use tdf_core::SharedDeviceAgent;
use tdf_core::SharedDocumentStore;
use tdf_core::SharedResultPublisher;
use tdf_core::SignalEvaluator;
use tdf_core::StderrEventSink;
use tdf_core::Suite;
use tdf_core::SuiteError;
use tdf_core::load_suite;
use tdf_core::load_test_files;
use tdf_providers::CaptureImportConfig;
use tdf_providers::ProviderError;
use tdf_providers::SnapshotDevice;
use tdf_providers::SnapshotDeviceConfig;
use tdf_providers::import_captures;
use tdf_store_sqlite::SqliteDocumentStore;
use tdf_store_sqlite::SqliteStoreError;
use thiserror::Error;

use crate::clock::SystemClock;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while assembling or running the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The event log or notice log could not be opened.
    #[error("log setup failed: {0}")]
    Log(String),
    /// The durable store could not be opened.
    #[error(transparent)]
    Store(#[from] SqliteStoreError),
    /// A snapshot or capture file could not be loaded.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The publisher could not be built.
    #[error(transparent)]
    Broker(#[from] BrokerError),
    /// Suite discovery or selection failed.
    #[error(transparent)]
    Suite(#[from] SuiteError),
    /// The run stopped.
    #[error("run aborted: {0}")]
    Execution(#[from] ExecutionError),
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Tests chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every suite folder under the tests root.
    All,
    /// Named suite folders under the tests root.
    Suites(Vec<FolderName>),
    /// Explicit definition files.
    Files(Vec<PathBuf>),
}

impl Selection {
    /// Builds a selection from CLI arguments.
    #[must_use]
    pub fn from_args(suites: Vec<String>, files: Vec<PathBuf>) -> Self {
        if !files.is_empty() {
            Self::Files(files)
        } else if suites.is_empty() {
            Self::All
        } else {
            Self::Suites(suites.into_iter().map(FolderName::new).collect())
        }
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Configured harness ready to run tests.
pub struct Harness {
    /// Validated configuration.
    config: HarnessConfig,
    /// Test executor.
    executor: Executor,
    /// Event log shared with loading.
    log: EventLog,
}

impl Harness {
    /// Builds a harness logging and publishing where the configuration says.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when a collaborator cannot be set up.
    pub fn build(config: HarnessConfig) -> Result<Self, HarnessError> {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
        let sink: Arc<dyn EventSink> = match &config.logging.file {
            Some(path) => Arc::new(FileEventSink::open(path).map_err(|err| log_error(path, &err))?),
            None => Arc::new(StderrEventSink),
        };
        let log = EventLog::new(sink, Arc::clone(&clock), config.logging.level);
        let publisher = match &config.execution.notice_log {
            Some(path) => notice_publisher(LogSink::new(open_append(path)?))?,
            None => notice_publisher(LogSink::new(io::stderr()))?,
        };
        Self::assemble(config, log, clock, publisher)
    }

    /// Builds a harness around an injected log, clock, and publisher.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the store, captures, or device cannot be
    /// set up.
    pub fn assemble(
        config: HarnessConfig,
        log: EventLog,
        clock: Arc<dyn Clock + Send + Sync>,
        publisher: SharedResultPublisher,
    ) -> Result<Self, HarnessError> {
        let store = open_store(&config)?;
        if !config.capture.files.is_empty() {
            let capture = CaptureImportConfig {
                collection: config.collections.signals.clone(),
                files: config.capture.files.clone(),
                max_bytes: config.capture.max_bytes,
            };
            import_captures(&store, &capture, &log.for_component("capture"))?;
        }

        let mut evaluators = EvaluatorSet::new().with_signal(SignalEvaluator::new(
            store.clone(),
            config.collections.signals.clone(),
            config.signal_documents.clone(),
        ));
        if let Some(snapshot) = &config.device.snapshot {
            let device = SnapshotDevice::load(&SnapshotDeviceConfig {
                path: snapshot.clone(),
                max_bytes: config.device.max_snapshot_bytes,
            })?;
            evaluators = evaluators.with_query(QueryEvaluator::new(
                SharedDeviceAgent::from_agent(device),
                store.clone(),
                config.collections.audit.clone(),
                config.device.destination.clone(),
                clock,
                log.for_component("device"),
            ));
        }

        let executor =
            Executor::new(evaluators, store, publisher, config.executor_config(), log.clone());
        Ok(Self {
            config,
            executor,
            log,
        })
    }

    /// Returns the configuration the harness was built from.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Loads the selected tests and executes them.
    ///
    /// Files that fail to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when suite discovery or selection fails, or
    /// when the run stops on an execution error.
    pub fn run(&self, selection: &Selection) -> Result<RunSummary, HarnessError> {
        let loader_log = self.log.for_component("loader");
        let summary = match selection {
            Selection::Files(paths) => {
                let files = load_test_files(paths, &loader_log);
                self.executor.run(&files)?
            }
            Selection::All => {
                let suite = self.load_suite(&loader_log)?;
                self.executor.run(suite.files())?
            }
            Selection::Suites(names) => {
                let suite = self.load_suite(&loader_log)?;
                self.executor.run(suite.select_folders(names)?)?
            }
        };
        Ok(summary)
    }

    /// Loads the configured tests root.
    fn load_suite(&self, log: &EventLog) -> Result<Suite, HarnessError> {
        Ok(load_suite(&self.config.tests.root, &self.config.tests.extension, log)?)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens the configured document store.
fn open_store(config: &HarnessConfig) -> Result<SharedDocumentStore, HarnessError> {
    match config.store.sqlite_config() {
        Some(sqlite) => Ok(SharedDocumentStore::from_store(SqliteDocumentStore::new(sqlite)?)),
        None => Ok(SharedDocumentStore::from_store(InMemoryDocumentStore::new())),
    }
}

/// Wraps a notice sink in a fan-out publisher.
fn notice_publisher<W: io::Write + Send + 'static>(
    sink: LogSink<W>,
) -> Result<SharedResultPublisher, HarnessError> {
    let publisher = FanOutPublisher::builder().sink(sink).build()?;
    Ok(SharedResultPublisher::from_publisher(publisher))
}

/// Opens a file for appending.
fn open_append(path: &Path) -> Result<File, HarnessError> {
    OpenOptions::new().create(true).append(true).open(path).map_err(|err| log_error(path, &err))
}

/// Formats a log setup failure.
fn log_error(path: &Path, err: &io::Error) -> HarnessError {
    HarnessError::Log(format!("{}: {err}", path.display()))
}
