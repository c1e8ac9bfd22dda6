// crates/tdf-core/src/core/suite.rs
// ============================================================================
// Module: TDF Harness Suites
// Description: Grouping of accepted test files by folder, plus discovery.
// Purpose: Build the folder-to-files listing and resolve run selections.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Test files live under a tests root as `<root>/<folder>/<file>.tdf`; the
//! folder name is the suite name. A [`Suite`] is built once from the files
//! that parsed cleanly and is read-only afterwards. Folder keys and the file
//! lists under them both keep first-seen order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::identifiers::FolderName;
use crate::core::test_file::TestFile;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while discovering or selecting test files.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The tests root could not be listed.
    #[error("suite discovery io error: {0}")]
    Io(String),
    /// A selected file is not part of the suite.
    #[error("unknown test file: {0}")]
    UnknownFile(String),
    /// A selected folder is not part of the suite.
    #[error("unknown suite folder: {0}")]
    UnknownFolder(String),
}

// ============================================================================
// SECTION: Folder Resolution
// ============================================================================

/// Returns the suite folder of a test file path.
///
/// When `root` is given and prefixes the path, the folder is the first
/// component below the root. Otherwise a path with at least three normal
/// components uses its second one (`tests/dlep/a.tdf` gives `dlep`), and
/// shorter paths fall back to the parent directory name. A bare file name
/// lands in the `.` folder.
#[must_use]
pub fn folder_of(path: &Path, root: Option<&Path>) -> FolderName {
    if let Some(root) = root
        && let Ok(relative) = path.strip_prefix(root)
    {
        let mut parts = normal_components(relative);
        if parts.len() >= 2 {
            return FolderName::new(parts.swap_remove(0));
        }
    }
    let parts = normal_components(path);
    if parts.len() >= 3 {
        return FolderName::new(parts[1].clone());
    }
    path.parent()
        .and_then(Path::file_name)
        .map_or_else(|| FolderName::new("."), |name| FolderName::new(name.to_string_lossy()))
}

/// Collects the normal components of a path as strings.
fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Lists `<root>/*/*.<extension>` in sorted order.
///
/// # Errors
///
/// Returns [`SuiteError::Io`] when the root or a folder cannot be listed.
pub fn discover_test_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, SuiteError> {
    let mut found = Vec::new();
    for folder in list_dir(root)? {
        if !folder.is_dir() {
            continue;
        }
        for file in list_dir(&folder)? {
            let matches = file.is_file()
                && file.extension().is_some_and(|ext| ext.to_string_lossy() == extension);
            if matches {
                found.push(file);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Lists the entries of a directory.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, SuiteError> {
    let entries = fs::read_dir(dir)
        .map_err(|err| SuiteError::Io(format!("{}: {err}", dir.display())))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| SuiteError::Io(format!("{}: {err}", dir.display())))?;
        paths.push(entry.path());
    }
    Ok(paths)
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Files accepted under one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SuiteFolder {
    /// Folder name.
    name: FolderName,
    /// Accepted file paths in first-seen order.
    paths: Vec<PathBuf>,
}

/// Accepted test files grouped by folder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Suite {
    /// Tests root used for folder resolution and relative selection.
    root: Option<PathBuf>,
    /// Folders in first-seen order.
    folders: Vec<SuiteFolder>,
    /// Accepted files in insertion order.
    files: Vec<TestFile>,
}

impl Suite {
    /// Builds a suite without a tests root.
    #[must_use]
    pub fn build(files: Vec<TestFile>) -> Self {
        Self::assemble(None, files)
    }

    /// Builds a suite whose folders are resolved relative to `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>, files: Vec<TestFile>) -> Self {
        Self::assemble(Some(root.into()), files)
    }

    /// Groups files into folders.
    fn assemble(root: Option<PathBuf>, files: Vec<TestFile>) -> Self {
        let mut folders: Vec<SuiteFolder> = Vec::new();
        for file in &files {
            let name = folder_of(file.path(), root.as_deref());
            let path = file.path().to_path_buf();
            match folders.iter_mut().find(|folder| folder.name == name) {
                Some(folder) => folder.paths.push(path),
                None => folders.push(SuiteFolder {
                    name,
                    paths: vec![path],
                }),
            }
        }
        Self {
            root,
            folders,
            files,
        }
    }

    /// Returns the tests root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Iterates folders and their file paths in first-seen order.
    pub fn folders(&self) -> impl Iterator<Item = (&FolderName, &[PathBuf])> {
        self.folders.iter().map(|folder| (&folder.name, folder.paths.as_slice()))
    }

    /// Returns the file paths under a folder.
    #[must_use]
    pub fn folder(&self, name: &FolderName) -> Option<&[PathBuf]> {
        self.folders.iter().find(|folder| &folder.name == name).map(|folder| folder.paths.as_slice())
    }

    /// Returns every accepted file.
    #[must_use]
    pub fn files(&self) -> &[TestFile] {
        &self.files
    }

    /// Returns the accepted file at `path`.
    #[must_use]
    pub fn file(&self, path: &Path) -> Option<&TestFile> {
        self.files.iter().find(|file| file.path() == path)
    }

    /// Resolves selected paths to accepted files.
    ///
    /// A selection matches a file exactly or relative to the tests root.
    /// Duplicate selections are returned once, in first-selected order.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::UnknownFile`] for a selection that matches no file.
    pub fn select(&self, selections: &[PathBuf]) -> Result<Vec<&TestFile>, SuiteError> {
        let mut chosen: Vec<&TestFile> = Vec::new();
        for selection in selections {
            let file = self
                .file(selection)
                .or_else(|| self.root.as_ref().and_then(|root| self.file(&root.join(selection))))
                .ok_or_else(|| SuiteError::UnknownFile(selection.display().to_string()))?;
            if !chosen.iter().any(|seen| seen.path() == file.path()) {
                chosen.push(file);
            }
        }
        Ok(chosen)
    }

    /// Resolves whole folders to their accepted files, in folder order.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::UnknownFolder`] for an unknown folder name.
    pub fn select_folders(&self, names: &[FolderName]) -> Result<Vec<&TestFile>, SuiteError> {
        let mut paths = Vec::new();
        for name in names {
            let folder = self
                .folder(name)
                .ok_or_else(|| SuiteError::UnknownFolder(name.to_string()))?;
            paths.extend_from_slice(folder);
        }
        self.select(&paths)
    }

    /// Renders the `AvailableTestSuites` listing.
    ///
    /// Paths are shown relative to the tests root when one is set.
    #[must_use]
    pub fn available_suites(&self) -> Value {
        let suites: Vec<Value> = self
            .folders
            .iter()
            .map(|folder| {
                let tests: Vec<String> =
                    folder.paths.iter().map(|path| self.display_path(path)).collect();
                json!({ "Name": folder.name, "Tests": tests })
            })
            .collect();
        json!({ "ConfigType": "AvailableTestSuites", "TestSuites": suites })
    }

    /// Formats a path for listings.
    fn display_path(&self, path: &Path) -> String {
        self.root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
