// crates/tdf-core/src/core/test_file.rs
// ============================================================================
// Module: TDF Harness Test Files
// Description: Accepted definition files and the records they own.
// Purpose: Carry a source path with its ordered, ready test records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestFile`] only exists for files that parsed cleanly: every group was
//! complete, every record was ready, and no lines were left over. Files that
//! fail any of those checks are dropped whole by the grammar.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::core::record::TestRecord;

// ============================================================================
// SECTION: Test File
// ============================================================================

/// An accepted test definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFile {
    /// Path the file was read from.
    path: PathBuf,
    /// Ready records in source order.
    tests: Vec<TestRecord>,
}

impl TestFile {
    /// Creates an accepted file from its path and ready records.
    #[must_use]
    pub const fn new(path: PathBuf, tests: Vec<TestRecord>) -> Self {
        Self {
            path,
            tests,
        }
    }

    /// Returns the source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the records in source order.
    #[must_use]
    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true when the file holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
