// crates/tdf-core/tests/runtime/loader_tests.rs
// ============================================================================
// Module: Loader and Suite Tests
// Description: Discovery, file rejection, folder grouping, and selection.
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde_json::json;
use tdf_core::EventLog;
use tdf_core::FolderName;
use tdf_core::LogEvent;
use tdf_core::Suite;
use tdf_core::SuiteError;
use tdf_core::folder_of;
use tdf_core::load_suite;
use tdf_core::load_test_files;
use tdf_core::parse_source;

use super::common::memory_log;

const SIGNAL_TEST: &str =
    "TYPE: DLEP\nNAME: offer\nTEST: EXPECT SIGNAL Peer_Offer TO_INCLUDE DATA_ITEM Peer_Type\n";
const QUERY_TEST: &str =
    "TYPE: SNMP\nNAME: uptime\nTEST: EXPECT OID 1.3.6.1.2.1.1.3.0 TO_BE READABLE OF_TYPE TimeTicks\n";

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn tests_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "dlep/offer.tdf", SIGNAL_TEST);
    write(dir.path(), "dlep/broken.tdf", "TYPE: DLEP\nNAME: half\n");
    write(dir.path(), "snmp/uptime.tdf", QUERY_TEST);
    write(dir.path(), "snmp/readme.txt", "not a test");
    write(dir.path(), "stray.tdf", SIGNAL_TEST);
    dir
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Verifies bad files are logged and dropped while good files load.
#[test]
fn load_test_files_drops_rejected_files() {
    let dir = tests_root();
    let paths = vec![
        dir.path().join("dlep/offer.tdf"),
        dir.path().join("dlep/broken.tdf"),
        dir.path().join("dlep/missing.tdf"),
    ];
    let (log, sink) = memory_log();

    let files = load_test_files(&paths, &log);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path(), paths[0].as_path());

    let events = sink.events();
    assert!(matches!(events[0], LogEvent::FileAccepted { tests: 1, .. }));
    assert!(matches!(&events[1], LogEvent::FileRejected { error, .. } if error.contains("spare line")));
    assert!(matches!(events[2], LogEvent::FileRejected { .. }));
}

/// Verifies suites only pick up definition files one folder below the root.
#[test]
fn load_suite_groups_files_by_folder() {
    let dir = tests_root();
    let (log, sink) = memory_log();

    let suite = load_suite(dir.path(), "tdf", &log).unwrap();
    let folders: Vec<(String, usize)> =
        suite.folders().map(|(name, paths)| (name.to_string(), paths.len())).collect();
    assert_eq!(folders, vec![("dlep".to_string(), 1), ("snmp".to_string(), 1)]);
    assert_eq!(suite.files().len(), 2);
    assert_eq!(suite.root(), Some(dir.path()));

    let folder_events = sink
        .events()
        .into_iter()
        .filter(|event| matches!(event, LogEvent::SuiteFolder { .. }))
        .count();
    assert_eq!(folder_events, 2);
}

/// Verifies a missing tests root is an error.
#[test]
fn load_suite_requires_existing_root() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_suite(&dir.path().join("absent"), "tdf", &EventLog::disabled());
    assert!(matches!(result, Err(SuiteError::Io(_))));
}

// ============================================================================
// SECTION: Listing and Selection
// ============================================================================

/// Verifies the suite listing shows root-relative paths per folder.
#[test]
fn available_suites_lists_relative_paths() {
    let dir = tests_root();
    let suite = load_suite(dir.path(), "tdf", &EventLog::disabled()).unwrap();
    assert_eq!(
        suite.available_suites(),
        json!({
            "ConfigType": "AvailableTestSuites",
            "TestSuites": [
                { "Name": "dlep", "Tests": ["dlep/offer.tdf"] },
                { "Name": "snmp", "Tests": ["snmp/uptime.tdf"] }
            ]
        })
    );
}

/// Verifies selections resolve relative to the root and are deduplicated.
#[test]
fn select_resolves_relative_paths_once() {
    let dir = tests_root();
    let suite = load_suite(dir.path(), "tdf", &EventLog::disabled()).unwrap();

    let chosen = suite
        .select(&[
            PathBuf::from("snmp/uptime.tdf"),
            dir.path().join("snmp/uptime.tdf"),
            PathBuf::from("dlep/offer.tdf"),
        ])
        .unwrap();
    let names: Vec<&str> = chosen.iter().map(|file| file.tests()[0].name()).collect();
    assert_eq!(names, vec!["uptime", "offer"]);

    let unknown = suite.select(&[PathBuf::from("dlep/broken.tdf")]);
    assert!(matches!(unknown, Err(SuiteError::UnknownFile(_))));
}

/// Verifies whole folders can be selected by name.
#[test]
fn select_folders_by_name() {
    let dir = tests_root();
    let suite = load_suite(dir.path(), "tdf", &EventLog::disabled()).unwrap();

    let chosen = suite.select_folders(&[FolderName::new("snmp")]).unwrap();
    assert_eq!(chosen.len(), 1);
    let unknown = suite.select_folders(&[FolderName::new("netconf")]);
    assert!(matches!(unknown, Err(SuiteError::UnknownFolder(_))));
}

// ============================================================================
// SECTION: Folder Resolution
// ============================================================================

/// Verifies folder names with and without a tests root.
#[test]
fn folder_resolution_rules() {
    let root = Path::new("/srv/tests");
    assert_eq!(folder_of(Path::new("/srv/tests/dlep/a.tdf"), Some(root)).as_str(), "dlep");
    assert_eq!(folder_of(Path::new("tests/snmp/b.tdf"), None).as_str(), "snmp");
    assert_eq!(folder_of(Path::new("snmp/b.tdf"), None).as_str(), "snmp");
    assert_eq!(folder_of(Path::new("b.tdf"), None).as_str(), ".");
}

/// Verifies suites built from paths group in first-seen order.
#[test]
fn suite_build_preserves_first_seen_order() {
    let files = vec![
        parse_source("tests/snmp/a.tdf", QUERY_TEST).unwrap(),
        parse_source("tests/dlep/b.tdf", SIGNAL_TEST).unwrap(),
        parse_source("tests/snmp/c.tdf", QUERY_TEST).unwrap(),
    ];
    let suite = Suite::build(files);
    let names: Vec<String> = suite.folders().map(|(name, _)| name.to_string()).collect();
    assert_eq!(names, vec!["snmp", "dlep"]);
    assert_eq!(suite.folder(&FolderName::new("snmp")).map(<[PathBuf]>::len), Some(2));
}
