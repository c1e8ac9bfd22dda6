// crates/tdf-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Document Store
// Description: Durable DocumentStore backed by SQLite.
// Purpose: Persist harness documents with canonical serialization and integrity hashes.
// Dependencies: tdf-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`DocumentStore`] using `SQLite`. Every
//! document is written as RFC 8785 canonical JSON together with its digest,
//! in one append-only table keyed by collection. Reads recompute the digest
//! and fail closed when the stored bytes no longer match.
//!
//! Lookups by field only match top-level string values, mirroring the
//! in-memory store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde_json::Value;
use tdf_core::CollectionName;
use tdf_core::DEFAULT_HASH_ALGORITHM;
use tdf_core::DocumentId;
use tdf_core::DocumentStore;
use tdf_core::HashAlgorithm;
use tdf_core::StoreError;
use tdf_core::canonical_document_bytes;
use tdf_core::hash_bytes;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Current schema version of the store tables.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of any single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of the full store path.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum canonical size of one stored document in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` document store.
///
/// # Invariants
/// - `path` must resolve to a file path, not a directory.
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default pragmas for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw document payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid document or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Document exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "document exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps a `rusqlite` error into a store error.
fn db_error(err: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed document store.
pub struct SqliteDocumentStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Connection guarded for cross-thread use.
    connection: Mutex<Connection>,
}

/// One stored row before verification.
struct StoredRow {
    /// Row identifier.
    id: i64,
    /// Canonical JSON text.
    doc_json: String,
    /// Stored digest value.
    doc_hash: String,
    /// Stored digest algorithm label.
    hash_algorithm: String,
}

impl SqliteDocumentStore {
    /// Opens or creates an `SQLite`-backed document store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is unsafe or the database
    /// cannot be opened or initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Mutex::new(connection),
        })
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Verifies the store can execute a simple statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the connection is unusable.
    pub fn readiness(&self) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard.query_row("SELECT 1", [], |_| Ok(())).map_err(|err| db_error(&err))
    }

    /// Returns every document in a collection in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or a row fails verification.
    pub fn list_documents(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<(DocumentId, Value)>, SqliteStoreError> {
        let rows = {
            let guard = self.lock()?;
            let mut statement = guard
                .prepare(
                    "SELECT id, doc_json, doc_hash, hash_algorithm FROM documents WHERE \
                     collection = ?1 ORDER BY id",
                )
                .map_err(|err| db_error(&err))?;
            let mapped = statement
                .query_map(params![collection.as_str()], read_row)
                .map_err(|err| db_error(&err))?;
            mapped.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))?
        };
        rows.into_iter().map(verify_row).collect()
    }

    /// Returns the document stored under `id` in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or the row fails verification.
    pub fn load_document(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Value>, SqliteStoreError> {
        let Ok(row_id) = id.as_str().parse::<i64>() else {
            return Ok(None);
        };
        let row = {
            let guard = self.lock()?;
            guard
                .query_row(
                    "SELECT id, doc_json, doc_hash, hash_algorithm FROM documents WHERE id = ?1 \
                     AND collection = ?2",
                    params![row_id, collection.as_str()],
                    read_row,
                )
                .optional()
                .map_err(|err| db_error(&err))?
        };
        row.map(verify_row).transpose().map(|found| found.map(|(_, document)| document))
    }

    /// Locks the connection.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite connection mutex poisoned".to_string()))
    }

    /// Inserts one document.
    fn insert(
        &self,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<DocumentId, SqliteStoreError> {
        if !document.is_object() {
            return Err(SqliteStoreError::Invalid("documents must be json objects".to_string()));
        }
        let bytes = canonical_document_bytes(document)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_DOCUMENT_BYTES,
                actual_bytes: bytes.len(),
            });
        }
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &bytes);
        let doc_json =
            String::from_utf8(bytes).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO documents (collection, doc_json, doc_hash, hash_algorithm, \
                 inserted_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    collection.as_str(),
                    doc_json,
                    digest.value,
                    digest.algorithm.label(),
                    unix_millis()
                ],
            )
            .map_err(|err| db_error(&err))?;
        Ok(DocumentId::new(guard.last_insert_rowid().to_string()))
    }

    /// Finds the earliest document whose top-level string `field` equals `value`.
    fn find(
        &self,
        collection: &CollectionName,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, SqliteStoreError> {
        let path = field_path(field)?;
        let row = {
            let guard = self.lock()?;
            guard
                .query_row(
                    "SELECT id, doc_json, doc_hash, hash_algorithm FROM documents WHERE \
                     collection = ?1 AND json_type(doc_json, ?2) = 'text' AND \
                     json_extract(doc_json, ?2) = ?3 ORDER BY id LIMIT 1",
                    params![collection.as_str(), path, value],
                    read_row,
                )
                .optional()
                .map_err(|err| db_error(&err))?
        };
        row.map(verify_row).transpose().map(|found| found.map(|(_, document)| document))
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn insert_document(
        &self,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<DocumentId, StoreError> {
        self.insert(collection, document).map_err(StoreError::from)
    }

    fn find_document(
        &self,
        collection: &CollectionName,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.find(collection, field, value).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Row Handling
// ============================================================================

/// Reads the stored columns of one row.
fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        doc_json: row.get(1)?,
        doc_hash: row.get(2)?,
        hash_algorithm: row.get(3)?,
    })
}

/// Recomputes the digest of a row and decodes its document.
fn verify_row(row: StoredRow) -> Result<(DocumentId, Value), SqliteStoreError> {
    let algorithm = parse_hash_algorithm(&row.hash_algorithm)?;
    let expected = hash_bytes(algorithm, row.doc_json.as_bytes());
    if expected.value != row.doc_hash {
        return Err(SqliteStoreError::Corrupt(format!("hash mismatch for document {}", row.id)));
    }
    let document: Value = serde_json::from_str(&row.doc_json)
        .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    Ok((DocumentId::new(row.id.to_string()), document))
}

/// Builds the JSON path of a top-level field.
fn field_path(field: &str) -> Result<String, SqliteStoreError> {
    if field.is_empty() || field.contains('"') {
        return Err(SqliteStoreError::Invalid(format!("unsupported lookup field: {field}")));
    }
    Ok(format!("$.\"{field}\""))
}

/// Parses a hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    HashAlgorithm::from_label(label)
        .ok_or_else(|| SqliteStoreError::Invalid(format!("unsupported hash algorithm: {label}")))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.display().to_string().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    if path
        .components()
        .any(|component| component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(SqliteStoreError::Invalid(
            "store path contains an overlong component".to_string(),
        ));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_error(&err))?;
    Ok(connection)
}

/// Initializes the schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_error(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS documents (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    collection TEXT NOT NULL,
                    doc_json TEXT NOT NULL,
                    doc_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    inserted_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_documents_collection
                    ON documents (collection, id);",
            )
            .map_err(|err| db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| db_error(&err))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
