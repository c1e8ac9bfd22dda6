// crates/tdf-config/src/config.rs
// ============================================================================
// Module: TDF Harness Configuration
// Description: Configuration loading and validation for the TDF harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tdf-core, tdf-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file is found through an explicit path, then the
//! [`CONFIG_ENV_VAR`] environment variable, then [`DEFAULT_CONFIG_NAME`] in
//! the working directory. Every section has defaults, so an empty file is a
//! valid configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tdf_core::CollectionNames;
use tdf_core::ExecutorConfig;
use tdf_core::LogLevel;
use tdf_core::SignalDocumentLayout;
use tdf_store_sqlite::SqliteStoreConfig;
use tdf_store_sqlite::SqliteStoreMode;
use tdf_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "tdf-harness.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TDF_HARNESS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of capture files.
pub(crate) const MAX_CAPTURE_FILES: usize = 256;
/// Largest accepted snapshot or capture size limit in bytes.
pub(crate) const MAX_PROVIDER_FILE_BYTES: usize = 16 * 1024 * 1024;
/// Default snapshot and capture size limit in bytes.
pub(crate) const DEFAULT_PROVIDER_FILE_BYTES: usize = 1024 * 1024;
/// Largest accepted pause between results in milliseconds.
pub(crate) const MAX_RESULT_DELAY_MS: u64 = 60_000;
/// Largest accepted `SQLite` busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Default `SQLite` busy timeout in milliseconds.
pub(crate) const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// TDF harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Test discovery settings.
    #[serde(default)]
    pub tests: TestsConfig,
    /// Document store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Collection names.
    #[serde(default)]
    pub collections: CollectionNames,
    /// Field names of captured signaling messages.
    #[serde(default)]
    pub signal_documents: SignalDocumentLayout,
    /// Device under test.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Capture files imported before a run.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Harness event logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl HarnessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        Self::load_file(&resolved)
    }

    /// Loads configuration when one is present.
    ///
    /// An explicit path or the environment variable must name a readable
    /// file. Only the implicit default file may be absent, in which case
    /// `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_optional(path: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        let env_path = env::var(CONFIG_ENV_VAR).ok();
        let implicit = path.is_none() && env_path.is_none();
        let resolved = resolve_path(path, env_path)?;
        if implicit && !resolved.exists() {
            return Ok(None);
        }
        Self::load_file(&resolved).map(Some)
    }

    /// Loads and validates one config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is too large,
    /// is not UTF-8, does not parse, or fails validation.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = read_config_limited(path)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text does not parse or fails
    /// validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tests.validate()?;
        self.store.validate()?;
        validate_collections(&self.collections)?;
        validate_layout(&self.signal_documents)?;
        self.device.validate()?;
        self.capture.validate()?;
        self.logging.validate()?;
        self.execution.validate()
    }

    /// Returns executor settings derived from this configuration.
    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            results: self.collections.results.clone(),
            channel: self.execution.channel.clone(),
            result_delay: Duration::from_millis(self.execution.result_delay_ms),
        }
    }
}

/// Test discovery configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestsConfig {
    /// Root folder holding one sub-folder per suite.
    #[serde(default = "default_tests_root")]
    pub root: PathBuf,
    /// File extension of definition files, without the dot.
    #[serde(default = "default_tests_extension")]
    pub extension: String,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            root: default_tests_root(),
            extension: default_tests_extension(),
        }
    }
}

impl TestsConfig {
    /// Validates test discovery settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("tests.root", &self.root.to_string_lossy())?;
        let extension = self.extension.trim();
        if extension.is_empty() {
            return Err(ConfigError::Invalid("tests.extension must be non-empty".to_string()));
        }
        if extension.starts_with('.') || extension.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(
                "tests.extension must be a bare extension such as tdf".to_string(),
            ));
        }
        Ok(())
    }
}

/// Document store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())?;
                if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
                    return Err(ConfigError::Invalid(format!(
                        "store.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Returns the `SQLite` store settings when the sqlite backend is selected.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }
}

/// Device under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Label written into the `destination` field of audit documents.
    #[serde(default = "default_destination")]
    pub destination: String,
    /// Snapshot file replayed as the device.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    /// Maximum snapshot size in bytes.
    #[serde(default = "default_provider_file_bytes")]
    pub max_snapshot_bytes: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            snapshot: None,
            max_snapshot_bytes: default_provider_file_bytes(),
        }
    }
}

impl DeviceConfig {
    /// Validates device settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.destination.trim().is_empty() {
            return Err(ConfigError::Invalid("device.destination must be non-empty".to_string()));
        }
        if let Some(snapshot) = &self.snapshot {
            validate_path_string("device.snapshot", &snapshot.to_string_lossy())?;
        }
        validate_size_limit("device.max_snapshot_bytes", self.max_snapshot_bytes)
    }
}

/// Capture files imported into the signals collection before a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureConfig {
    /// Capture files, imported in order.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Maximum size of one capture file in bytes.
    #[serde(default = "default_provider_file_bytes")]
    pub max_bytes: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            max_bytes: default_provider_file_bytes(),
        }
    }
}

impl CaptureConfig {
    /// Validates capture settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.files.len() > MAX_CAPTURE_FILES {
            return Err(ConfigError::Invalid(format!(
                "capture.files must list at most {MAX_CAPTURE_FILES} files"
            )));
        }
        for file in &self.files {
            validate_path_string("capture.files", &file.to_string_lossy())?;
        }
        validate_size_limit("capture.max_bytes", self.max_bytes)
    }
}

/// Harness event logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Most verbose level recorded.
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    /// Append-only JSON-lines log file. Events go to stderr when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(file) = &self.file {
            validate_path_string("logging.file", &file.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Channel named in result notices.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Pause after each published result, in milliseconds.
    #[serde(default)]
    pub result_delay_ms: u64,
    /// JSON-lines file receiving result notices. Notices go to stderr when
    /// unset.
    #[serde(default)]
    pub notice_log: Option<PathBuf>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            result_delay_ms: 0,
            notice_log: None,
        }
    }
}

impl ExecutionConfig {
    /// Validates execution settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.trim().is_empty() {
            return Err(ConfigError::Invalid("execution.channel must be non-empty".to_string()));
        }
        if self.result_delay_ms > MAX_RESULT_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "execution.result_delay_ms must be at most {MAX_RESULT_DELAY_MS}"
            )));
        }
        if let Some(path) = &self.notice_log {
            validate_path_string("execution.notice_log", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default tests root.
fn default_tests_root() -> PathBuf {
    PathBuf::from("tests")
}

/// Returns the default definition file extension.
fn default_tests_extension() -> String {
    "tdf".to_string()
}

/// Returns the default `SQLite` busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default device label.
fn default_destination() -> String {
    "device-under-test".to_string()
}

/// Returns the default snapshot and capture size limit.
const fn default_provider_file_bytes() -> usize {
    DEFAULT_PROVIDER_FILE_BYTES
}

/// Returns the default log level.
const fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Returns the default result channel.
fn default_channel() -> String {
    "results".to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a config file, refusing files larger than [`MAX_CONFIG_FILE_SIZE`].
fn read_config_limited(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let file = File::open(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let limit = u64::try_from(MAX_CONFIG_FILE_SIZE.saturating_add(1))
        .map_err(|_| ConfigError::Invalid("config size limit exceeds u64".to_string()))?;
    let mut bytes = Vec::new();
    file.take(limit).read_to_end(&mut bytes).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Resolves the config path from an explicit path, the environment, or the
/// default name.
pub(crate) fn resolve_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
pub(crate) fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a provider file size limit.
fn validate_size_limit(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_PROVIDER_FILE_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_PROVIDER_FILE_BYTES}"
        )));
    }
    Ok(())
}

/// Validates that collection names are set and distinct.
fn validate_collections(collections: &CollectionNames) -> Result<(), ConfigError> {
    let entries = [
        ("collections.results", collections.results.as_str()),
        ("collections.signals", collections.signals.as_str()),
        ("collections.audit", collections.audit.as_str()),
    ];
    let mut seen = BTreeSet::new();
    for (field, name) in entries {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Invalid(format!("{field} duplicates another collection")));
        }
    }
    Ok(())
}

/// Validates signal document field names.
fn validate_layout(layout: &SignalDocumentLayout) -> Result<(), ConfigError> {
    let entries = [
        ("signal_documents.name_field", layout.name_field.as_str()),
        ("signal_documents.items_field", layout.items_field.as_str()),
        ("signal_documents.sub_items_field", layout.sub_items_field.as_str()),
    ];
    for (field, name) in entries {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
        }
        if name.contains('"') {
            return Err(ConfigError::Invalid(format!("{field} must not contain quotes")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
