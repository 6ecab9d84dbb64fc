// crates/sensor-registry-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Sensor Store
// Description: Durable SensorStore backed by SQLite.
// Purpose: Persist sensor records with constraint-backed uniqueness and
//          cursor-paged queries.
// Dependencies: sensor-registry-core, rusqlite, serde, thiserror, tokio,
//               tracing
// ============================================================================

//! ## Overview
//! This module implements a durable [`SensorStore`] using `SQLite`. Domain
//! keys are primary keys, so duplicate detection is a single atomic insert
//! surfacing `EXISTS` on conflict rather than a separate existence read.
//! Referential and sub-range checks for dependent entities run inside one
//! transaction with the insert. Queries compile the core query-engine
//! semantics to SQL; paged variants use limit/offset with one-row
//! look-ahead to decide the `next` link. The `SQLite` rowid is the
//! storage-assigned internal identifier and never leaves this module.
//!
//! All operations run on blocking worker threads; the connection is
//! serialized through a mutex.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Type;
use rusqlite::types::Value;
use sensor_registry_core::ErrorKind;
use sensor_registry_core::Interval;
use sensor_registry_core::Page;
use sensor_registry_core::PageCursor;
use sensor_registry_core::PageLink;
use sensor_registry_core::PageRequest;
use sensor_registry_core::Quantity;
use sensor_registry_core::RegistryError;
use sensor_registry_core::RegistryErrors;
use sensor_registry_core::RegistryResult;
use sensor_registry_core::Sensor;
use sensor_registry_core::SensorAdd;
use sensor_registry_core::SensorFind;
use sensor_registry_core::SensorQuery;
use sensor_registry_core::SensorReading;
use sensor_registry_core::SensorReadingAdd;
use sensor_registry_core::SensorReadingFind;
use sensor_registry_core::SensorReadingQuery;
use sensor_registry_core::SensorStore;
use sensor_registry_core::SensorType;
use sensor_registry_core::SensorTypeAdd;
use sensor_registry_core::SensorTypeFind;
use sensor_registry_core::SensorTypeQuery;
use sensor_registry_core::core::validate;
use sensor_registry_core::interfaces::paging;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default records per page when the caller does not choose.
const DEFAULT_PAGE_COUNT: u64 = paging::DEFAULT_PAGE_COUNT;
/// Hard upper bound on records per page.
const DEFAULT_MAX_PAGE_COUNT: u64 = 100;

/// Table bootstrap executed at open.
///
/// Domain keys are primary keys: inserts conflict atomically instead of
/// needing an existence read. The implicit rowid is the storage-internal
/// identifier and is never selected.
const SCHEMA_SQL: &str = "
BEGIN;
CREATE TABLE IF NOT EXISTS sensor_types (
    id TEXT PRIMARY KEY,
    manufacturer TEXT NOT NULL,
    model_number TEXT NOT NULL,
    quantity TEXT NOT NULL,
    unit TEXT NOT NULL,
    limits_min REAL NOT NULL,
    limits_max REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS sensors (
    id TEXT PRIMARY KEY,
    sensor_type_id TEXT NOT NULL REFERENCES sensor_types(id),
    expected_min REAL NOT NULL,
    expected_max REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS sensors_by_type ON sensors(sensor_type_id);
CREATE TABLE IF NOT EXISTS sensor_readings (
    sensor_id TEXT NOT NULL REFERENCES sensors(id),
    timestamp INTEGER NOT NULL,
    value REAL NOT NULL,
    PRIMARY KEY (sensor_id, timestamp)
);
COMMIT;
";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
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
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
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

/// Configuration for the `SQLite` sensor store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
/// - `default_page_count` and `max_page_count` are positive and ordered.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Records per page when a query does not choose a count.
    #[serde(default = "default_page_count")]
    pub default_page_count: u64,
    /// Hard cap on records per page.
    #[serde(default = "default_max_page_count")]
    pub max_page_count: u64,
}

impl SqliteStoreConfig {
    /// Creates a config with defaults for everything but the path.
    #[must_use]
    pub fn for_path(path: PathBuf) -> Self {
        Self {
            path,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
            default_page_count: DEFAULT_PAGE_COUNT,
            max_page_count: DEFAULT_MAX_PAGE_COUNT,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default page count.
const fn default_page_count() -> u64 {
    DEFAULT_PAGE_COUNT
}

/// Returns the default page-count cap.
const fn default_max_page_count() -> u64 {
    DEFAULT_MAX_PAGE_COUNT
}

/// Validates page limits in the store configuration.
fn validate_page_limits(config: &SqliteStoreConfig) -> Result<(), SqliteStoreError> {
    if config.default_page_count == 0 {
        return Err(SqliteStoreError::Invalid(
            "default_page_count must be greater than zero".to_string(),
        ));
    }
    if config.max_page_count < config.default_page_count {
        return Err(SqliteStoreError::Invalid(
            "max_page_count must be at least default_page_count".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors raised at open/close and by the engine.
///
/// # Invariants
/// - Error messages avoid embedding record payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration.
    #[error("sqlite store invalid config: {0}")]
    Invalid(String),
    /// Operation attempted after [`SensorStore::close`].
    #[error("sqlite store is closed")]
    Closed,
}

impl From<SqliteStoreError> for RegistryErrors {
    fn from(error: SqliteStoreError) -> Self {
        Self::of(ErrorKind::Db, error.to_string())
    }
}

/// Wraps an engine error as a `DB` failure.
fn db_errors(err: &rusqlite::Error) -> RegistryErrors {
    RegistryErrors::of(ErrorKind::Db, format!("sqlite error: {err}"))
}

/// Returns true when the failure is a primary-key or unique conflict.
fn is_duplicate_key(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Maps an insert failure to `EXISTS` on key conflict, `DB` otherwise.
fn insert_errors(err: &rusqlite::Error, field: &str, message: String) -> RegistryErrors {
    if is_duplicate_key(err) {
        RegistryErrors::single(RegistryError::for_field(ErrorKind::Exists, field, message))
    } else {
        db_errors(err)
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed durable sensor store.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Duplicate detection happens inside the insert via key constraints.
#[derive(Clone)]
pub struct SqliteSensorStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection; `None` after close.
    connection: Arc<Mutex<Option<Connection>>>,
}

impl SqliteSensorStore {
    /// Opens (creating if needed) the database and bootstraps the schema.
    ///
    /// Blocking: call before entering async context or from a blocking
    /// task.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the configuration is invalid or
    /// the database cannot be opened.
    pub fn open(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_page_limits(&config)?;
        let connection = Connection::open(&config.path)
            .map_err(|err| SqliteStoreError::Io(err.to_string()))?;
        connection
            .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .pragma_update(None, "journal_mode", config.journal_mode.pragma_value())
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .pragma_update(None, "synchronous", config.sync_mode.pragma_value())
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .pragma_update(None, "foreign_keys", "on")
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .execute_batch(SCHEMA_SQL)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tracing::debug!(path = %config.path.display(), "opened sqlite sensor store");
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(Some(connection))),
        })
    }

    /// Runs a closure against the live connection on a blocking thread.
    async fn with_connection<T, F>(&self, op: F) -> RegistryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RegistryResult<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let result = tokio::task::spawn_blocking(move || {
            let mut guard = connection
                .lock()
                .map_err(|_| RegistryErrors::of(ErrorKind::Db, "store mutex poisoned"))?;
            let Some(conn) = guard.as_mut() else {
                return Err(SqliteStoreError::Closed.into());
            };
            op(conn)
        })
        .await
        .map_err(|err| RegistryErrors::of(ErrorKind::Db, format!("store worker failed: {err}")))?;
        if let Err(errors) = &result
            && errors.has_kind(ErrorKind::Db)
        {
            tracing::warn!(error = %errors, "sqlite sensor store operation failed");
        }
        result
    }

    /// First-page window using the configured default record count.
    ///
    /// Callers that have no explicit window start here and follow
    /// cursor links from then on.
    #[must_use]
    pub const fn default_page(&self) -> PageRequest {
        PageRequest::first(self.config.default_page_count)
    }

    /// Clamps a requested page window to configured limits.
    ///
    /// # Errors
    ///
    /// Returns `BAD_VAL` for a zero count.
    fn clamp_page(&self, page: &PageRequest) -> RegistryResult<PageRequest> {
        paging::ensure_page_count(page.count)?;
        Ok(PageRequest {
            offset: page.offset,
            count: page.count.min(self.config.max_page_count),
        })
    }
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Maps a `sensor_types` row onto the entity.
fn sensor_type_from_row(row: &Row<'_>) -> rusqlite::Result<SensorType> {
    let quantity: String = row.get(3)?;
    let quantity = quantity
        .parse::<Quantity>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err)))?;
    Ok(SensorType {
        id: row.get(0)?,
        manufacturer: row.get(1)?,
        model_number: row.get(2)?,
        quantity,
        unit: row.get(4)?,
        limits: Interval::new(row.get(5)?, row.get(6)?),
    })
}

/// Maps a `sensors` row onto the entity.
fn sensor_from_row(row: &Row<'_>) -> rusqlite::Result<Sensor> {
    Ok(Sensor {
        id: row.get(0)?,
        sensor_type_id: row.get(1)?,
        expected: Interval::new(row.get(2)?, row.get(3)?),
    })
}

/// Maps a `sensor_readings` row onto the entity.
fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<SensorReading> {
    Ok(SensorReading {
        sensor_id: row.get(0)?,
        timestamp: row.get(1)?,
        value: row.get(2)?,
    })
}

// ============================================================================
// SECTION: Query Compilation
// ============================================================================

/// Compiled SQL fragment plus its bound parameters.
struct CompiledQuery {
    /// Full SELECT statement.
    sql: String,
    /// Positional parameters in clause order.
    params: Vec<Value>,
}

/// Compiles a sensor-type query to SQL, preserving predicate semantics.
fn compile_sensor_type_query(query: &SensorTypeQuery) -> CompiledQuery {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    push_text_clause(&mut clauses, &mut params, "id", query.id.clone());
    push_text_clause(&mut clauses, &mut params, "manufacturer", query.manufacturer.clone());
    push_text_clause(&mut clauses, &mut params, "model_number", query.model_number.clone());
    push_text_clause(
        &mut clauses,
        &mut params,
        "quantity",
        query.quantity.map(|quantity| quantity.as_str().to_string()),
    );
    push_text_clause(&mut clauses, &mut params, "unit", query.unit.clone());
    let sql = format!(
        "SELECT id, manufacturer, model_number, quantity, unit, limits_min, limits_max \
         FROM sensor_types{} ORDER BY id ASC",
        where_clause(&clauses)
    );
    CompiledQuery { sql, params }
}

/// Compiles a sensor query to SQL, preserving predicate semantics.
fn compile_sensor_query(query: &SensorQuery) -> CompiledQuery {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    push_text_clause(&mut clauses, &mut params, "id", query.id.clone());
    push_text_clause(&mut clauses, &mut params, "sensor_type_id", query.sensor_type_id.clone());
    let sql = format!(
        "SELECT id, sensor_type_id, expected_min, expected_max FROM sensors{} ORDER BY id ASC",
        where_clause(&clauses)
    );
    CompiledQuery { sql, params }
}

/// Compiles a reading query to SQL, preserving predicate semantics.
///
/// Bounds are inclusive and each end applies independently, exactly as the
/// core query engine evaluates them.
fn compile_reading_query(query: &SensorReadingQuery) -> CompiledQuery {
    let mut clauses = vec!["sensor_id = ?".to_string()];
    let mut params = vec![Value::Text(query.sensor_id.clone())];
    if let Some(lo) = query.min_value {
        clauses.push("value >= ?".to_string());
        params.push(Value::Real(lo));
    }
    if let Some(hi) = query.max_value {
        clauses.push("value <= ?".to_string());
        params.push(Value::Real(hi));
    }
    if let Some(lo) = query.min_timestamp {
        clauses.push("timestamp >= ?".to_string());
        params.push(Value::Integer(lo));
    }
    if let Some(hi) = query.max_timestamp {
        clauses.push("timestamp <= ?".to_string());
        params.push(Value::Integer(hi));
    }
    let sql = format!(
        "SELECT sensor_id, timestamp, value FROM sensor_readings{} ORDER BY timestamp ASC",
        where_clause(&clauses)
    );
    CompiledQuery { sql, params }
}

/// Appends an exact-match clause when the filter value is present.
fn push_text_clause(
    clauses: &mut Vec<String>,
    params: &mut Vec<Value>,
    column: &str,
    value: Option<String>,
) {
    if let Some(value) = value {
        clauses.push(format!("{column} = ?"));
        params.push(Value::Text(value));
    }
}

/// Joins clauses into a WHERE fragment, empty when unfiltered.
fn where_clause(clauses: &[String]) -> String {
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// Extends a compiled query with a look-ahead page window.
///
/// Fetches one row beyond the window so the caller can decide whether a
/// `next` link exists without a second query.
fn compile_page_window(compiled: &mut CompiledQuery, page: &PageRequest) -> RegistryResult<()> {
    let count = i64::try_from(page.count.saturating_add(1))
        .map_err(|_| RegistryErrors::of(ErrorKind::BadVal, "page count too large"))?;
    let offset = i64::try_from(page.offset)
        .map_err(|_| RegistryErrors::of(ErrorKind::BadVal, "page offset too large"))?;
    compiled.sql.push_str(" LIMIT ? OFFSET ?");
    compiled.params.push(Value::Integer(count));
    compiled.params.push(Value::Integer(offset));
    Ok(())
}

/// Executes a compiled query, mapping rows onto entities.
fn run_query<T>(
    conn: &Connection,
    compiled: &CompiledQuery,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RegistryResult<Vec<T>> {
    let mut stmt = conn.prepare(&compiled.sql).map_err(|err| db_errors(&err))?;
    let rows = stmt
        .query_map(params_from_iter(compiled.params.iter()), map)
        .map_err(|err| db_errors(&err))?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row.map_err(|err| db_errors(&err))?);
    }
    Ok(items)
}

/// Assembles a page from look-ahead query results.
fn assemble_page<T, R>(
    mut items: Vec<T>,
    filter: &R,
    page: &PageRequest,
    base_path: &str,
) -> RegistryResult<Page<T>>
where
    R: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    let count = usize::try_from(page.count).unwrap_or(usize::MAX);
    let has_more = items.len() > count;
    items.truncate(count);
    let prev = if page.offset > 0 {
        let cursor = PageCursor {
            filter: filter.clone(),
            offset: page.offset.saturating_sub(page.count),
            count: page.count,
        };
        Some(PageLink::prev(cursor.href(base_path)?))
    } else {
        None
    };
    let next = if has_more {
        let cursor = PageCursor {
            filter: filter.clone(),
            offset: page.offset.saturating_add(page.count),
            count: page.count,
        };
        Some(PageLink::next(cursor.href(base_path)?))
    } else {
        None
    };
    Ok(Page {
        values: items,
        prev,
        next,
    })
}

// ============================================================================
// SECTION: SensorStore Implementation
// ============================================================================

#[async_trait]
impl SensorStore for SqliteSensorStore {
    async fn clear(&self) -> RegistryResult<()> {
        self.with_connection(|conn| {
            conn.execute_batch(
                "BEGIN;
                 DELETE FROM sensor_readings;
                 DELETE FROM sensors;
                 DELETE FROM sensor_types;
                 COMMIT;",
            )
            .map_err(|err| db_errors(&err))
        })
        .await?;
        tracing::debug!("cleared sqlite sensor store");
        Ok(())
    }

    async fn close(&self) -> RegistryResult<()> {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection
                .lock()
                .map_err(|_| RegistryErrors::of(ErrorKind::Db, "store mutex poisoned"))?;
            match guard.take() {
                Some(conn) => conn.close().map_err(|(_, err)| db_errors(&err)),
                None => Ok(()),
            }
        })
        .await
        .map_err(|err| RegistryErrors::of(ErrorKind::Db, format!("store worker failed: {err}")))?
    }

    async fn add_sensor_type(&self, req: &SensorTypeAdd) -> RegistryResult<SensorType> {
        let sensor_type = validate::validate_sensor_type(req)?;
        let stored = sensor_type.clone();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO sensor_types \
                 (id, manufacturer, model_number, quantity, unit, limits_min, limits_max) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    stored.id,
                    stored.manufacturer,
                    stored.model_number,
                    stored.quantity.as_str(),
                    stored.unit,
                    stored.limits.min,
                    stored.limits.max,
                ],
            )
            .map_err(|err| {
                insert_errors(
                    &err,
                    "id",
                    format!("sensor type \"{}\" already exists", stored.id),
                )
            })?;
            Ok(())
        })
        .await?;
        tracing::debug!(id = %sensor_type.id, "stored sensor type");
        Ok(sensor_type)
    }

    async fn add_sensor(&self, req: &SensorAdd) -> RegistryResult<Sensor> {
        let sensor = validate::validate_sensor(req)?;
        let stored = sensor.clone();
        self.with_connection(move |conn| {
            let tx = conn.transaction().map_err(|err| db_errors(&err))?;
            let limits: Option<(f64, f64)> = tx
                .query_row(
                    "SELECT limits_min, limits_max FROM sensor_types WHERE id = ?1",
                    params![stored.sensor_type_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|err| db_errors(&err))?;
            let Some((limits_min, limits_max)) = limits else {
                return Err(RegistryErrors::single(RegistryError::for_field(
                    ErrorKind::BadId,
                    "sensorTypeId",
                    format!("unknown sensorTypeId \"{}\"", stored.sensor_type_id),
                )));
            };
            if !Interval::new(limits_min, limits_max).encloses(&stored.expected) {
                return Err(RegistryErrors::single(RegistryError::for_field(
                    ErrorKind::BadRange,
                    "expected",
                    format!(
                        "expected range [{}, {}] escapes sensor-type limits [{limits_min}, \
                         {limits_max}]",
                        stored.expected.min, stored.expected.max
                    ),
                )));
            }
            tx.execute(
                "INSERT INTO sensors (id, sensor_type_id, expected_min, expected_max) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    stored.id,
                    stored.sensor_type_id,
                    stored.expected.min,
                    stored.expected.max,
                ],
            )
            .map_err(|err| {
                insert_errors(&err, "id", format!("sensor \"{}\" already exists", stored.id))
            })?;
            tx.commit().map_err(|err| db_errors(&err))
        })
        .await?;
        tracing::debug!(id = %sensor.id, "stored sensor");
        Ok(sensor)
    }

    async fn add_sensor_reading(&self, req: &SensorReadingAdd) -> RegistryResult<SensorReading> {
        let reading = validate::validate_sensor_reading(req)?;
        let stored = reading.clone();
        self.with_connection(move |conn| {
            let tx = conn.transaction().map_err(|err| db_errors(&err))?;
            let known: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM sensors WHERE id = ?1",
                    params![stored.sensor_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| db_errors(&err))?;
            if known.is_none() {
                return Err(RegistryErrors::single(RegistryError::for_field(
                    ErrorKind::BadId,
                    "sensorId",
                    format!("unknown sensorId \"{}\"", stored.sensor_id),
                )));
            }
            tx.execute(
                "INSERT INTO sensor_readings (sensor_id, timestamp, value) VALUES (?1, ?2, ?3)",
                params![stored.sensor_id, stored.timestamp, stored.value],
            )
            .map_err(|err| {
                insert_errors(
                    &err,
                    "timestamp",
                    format!(
                        "reading for sensor \"{}\" at timestamp {} already exists",
                        stored.sensor_id, stored.timestamp
                    ),
                )
            })?;
            tx.commit().map_err(|err| db_errors(&err))
        })
        .await?;
        tracing::debug!(
            sensor_id = %reading.sensor_id,
            timestamp = reading.timestamp,
            "stored sensor reading"
        );
        Ok(reading)
    }

    async fn find_sensor_types(&self, req: &SensorTypeFind) -> RegistryResult<Vec<SensorType>> {
        let query = validate::validate_sensor_type_find(req)?;
        let compiled = compile_sensor_type_query(&query);
        self.with_connection(move |conn| run_query(conn, &compiled, sensor_type_from_row)).await
    }

    async fn find_sensors(&self, req: &SensorFind) -> RegistryResult<Vec<Sensor>> {
        let query = validate::validate_sensor_find(req)?;
        let compiled = compile_sensor_query(&query);
        self.with_connection(move |conn| run_query(conn, &compiled, sensor_from_row)).await
    }

    async fn find_sensor_readings(
        &self,
        req: &SensorReadingFind,
    ) -> RegistryResult<Vec<SensorReading>> {
        let query = validate::validate_sensor_reading_find(req)?;
        let compiled = compile_reading_query(&query);
        self.with_connection(move |conn| run_query(conn, &compiled, reading_from_row)).await
    }

    async fn find_sensor_types_page(
        &self,
        req: &SensorTypeFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<SensorType>> {
        let query = validate::validate_sensor_type_find(req)?;
        let page = self.clamp_page(page)?;
        let mut compiled = compile_sensor_type_query(&query);
        compile_page_window(&mut compiled, &page)?;
        let items = self
            .with_connection(move |conn| run_query(conn, &compiled, sensor_type_from_row))
            .await?;
        assemble_page(items, req, &page, paging::SENSOR_TYPES_PATH)
    }

    async fn find_sensors_page(
        &self,
        req: &SensorFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<Sensor>> {
        let query = validate::validate_sensor_find(req)?;
        let page = self.clamp_page(page)?;
        let mut compiled = compile_sensor_query(&query);
        compile_page_window(&mut compiled, &page)?;
        let items = self
            .with_connection(move |conn| run_query(conn, &compiled, sensor_from_row))
            .await?;
        assemble_page(items, req, &page, paging::SENSORS_PATH)
    }

    async fn find_sensor_readings_page(
        &self,
        req: &SensorReadingFind,
        page: &PageRequest,
    ) -> RegistryResult<Page<SensorReading>> {
        let query = validate::validate_sensor_reading_find(req)?;
        let page = self.clamp_page(page)?;
        let mut compiled = compile_reading_query(&query);
        compile_page_window(&mut compiled, &page)?;
        let items = self
            .with_connection(move |conn| run_query(conn, &compiled, reading_from_row))
            .await?;
        assemble_page(items, req, &page, paging::SENSOR_READINGS_PATH)
    }
}
