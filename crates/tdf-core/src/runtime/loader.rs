// crates/tdf-core/src/runtime/loader.rs
// ============================================================================
// Module: TDF Suite Loader
// Description: Parses a batch of definition files and assembles the suite.
// Purpose: Apply per-file rejection so one bad file never stops a batch.
// Dependencies: crate::core, crate::grammar, crate::runtime::events
// ============================================================================

//! ## Overview
//! Loading parses each definition file on its own. A file that fails to parse
//! is logged as rejected and left out; accepted files are logged with their
//! test count. [`load_suite`] discovers files under a tests root first and
//! logs each resulting suite folder.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use crate::core::suite::Suite;
use crate::core::suite::SuiteError;
use crate::core::suite::discover_test_files;
use crate::core::test_file::TestFile;
use crate::grammar::parse_test_file;
use crate::runtime::events::EventLog;
use crate::runtime::events::LogEvent;

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Parses each path, logging and dropping files that fail.
#[must_use]
pub fn load_test_files(paths: &[PathBuf], log: &EventLog) -> Vec<TestFile> {
    let mut accepted = Vec::with_capacity(paths.len());
    for path in paths {
        match parse_test_file(path) {
            Ok(file) => {
                log.emit(LogEvent::FileAccepted {
                    path: path.display().to_string(),
                    tests: file.len(),
                });
                accepted.push(file);
            }
            Err(err) => log.emit(LogEvent::FileRejected {
                path: path.display().to_string(),
                error: err.to_string(),
            }),
        }
    }
    accepted
}

/// Discovers, parses, and groups every definition file under `root`.
///
/// # Errors
///
/// Returns [`SuiteError::Io`] when the tests root cannot be listed.
pub fn load_suite(root: &Path, extension: &str, log: &EventLog) -> Result<Suite, SuiteError> {
    let paths = discover_test_files(root, extension)?;
    let suite = Suite::with_root(root, load_test_files(&paths, log));
    for (folder, files) in suite.folders() {
        log.emit(LogEvent::SuiteFolder {
            folder: folder.to_string(),
            files: files.len(),
        });
    }
    Ok(suite)
}
