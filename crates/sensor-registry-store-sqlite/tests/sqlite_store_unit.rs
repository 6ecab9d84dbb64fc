// crates/sensor-registry-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Store Unit Tests
// Description: Contract and durability tests for the SQLite sensor store.
// Purpose: Validate constraint-backed EXISTS detection, transactional
//          referential checks, persistence across reopen, and paged
//          queries with look-ahead links.
// ============================================================================

//! ## Overview
//! Unit-level tests for the `SQLite` store:
//! - Atomic duplicate detection via primary-key constraints (`EXISTS`)
//! - Referential (`BAD_ID`) and sub-range (`BAD_RANGE`) checks leave no
//!   partial writes behind
//! - Records survive close and reopen on the same path
//! - Paged finds emit `prev`/`next` links matching the in-memory store
//! - Page counts clamp to the configured maximum
//! - Operations after close fail with `DB`

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::Path;

use sensor_registry_core::ErrorKind;
use sensor_registry_core::FlatReq;
use sensor_registry_core::PageCursor;
use sensor_registry_core::PageRequest;
use sensor_registry_core::SensorAdd;
use sensor_registry_core::SensorFind;
use sensor_registry_core::SensorReadingAdd;
use sensor_registry_core::SensorReadingFind;
use sensor_registry_core::SensorStore;
use sensor_registry_core::SensorTypeAdd;
use sensor_registry_core::SensorTypeFind;
use sensor_registry_store_sqlite::SqliteSensorStore;
use sensor_registry_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

fn flat(pairs: &[(&str, &str)]) -> FlatReq {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

fn type_add(id: &str, manufacturer: &str) -> SensorTypeAdd {
    SensorTypeAdd::from_flat(&flat(&[
        ("id", id),
        ("manufacturer", manufacturer),
        ("modelNumber", "TH-1"),
        ("quantity", "temperature"),
        ("unit", "C"),
        ("min", "-40"),
        ("max", "120"),
    ]))
}

fn sensor_add(id: &str, sensor_type_id: &str, min: &str, max: &str) -> SensorAdd {
    SensorAdd::from_flat(&flat(&[
        ("id", id),
        ("sensorTypeId", sensor_type_id),
        ("min", min),
        ("max", max),
    ]))
}

fn reading_add(sensor_id: &str, timestamp: &str, value: &str) -> SensorReadingAdd {
    SensorReadingAdd::from_flat(&flat(&[
        ("sensorId", sensor_id),
        ("timestamp", timestamp),
        ("value", value),
    ]))
}

fn open_store(path: &Path) -> SqliteSensorStore {
    SqliteSensorStore::open(SqliteStoreConfig::for_path(path.to_path_buf())).unwrap()
}

async fn seeded_store(path: &Path) -> SqliteSensorStore {
    let store = open_store(path);
    store.add_sensor_type(&type_add("t-100", "Honeywell")).await.unwrap();
    store.add_sensor_type(&type_add("t-200", "Bosch")).await.unwrap();
    store.add_sensor(&sensor_add("s-1", "t-100", "0", "50")).await.unwrap();
    store
}

#[tokio::test(flavor = "multi_thread")]
async fn records_survive_close_and_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sensors.db");
    let store = seeded_store(&path).await;
    store.add_sensor_reading(&reading_add("s-1", "10", "20")).await.unwrap();
    store.close().await.unwrap();

    let reopened = open_store(&path);
    let types = reopened.find_sensor_types(&SensorTypeFind::default()).await.unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].id, "t-100");
    assert_eq!(types[0].limits.min, -40.0);
    let readings = reopened
        .find_sensor_readings(
            &SensorReadingFind::from_flat(&flat(&[("sensorId", "s-1")])).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].value, 20.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_keys_conflict_with_exists() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;

    let errors = store.add_sensor_type(&type_add("t-100", "Siemens")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Exists));
    assert_eq!(errors.errors[0].field.as_deref(), Some("id"));

    let errors = store.add_sensor(&sensor_add("s-1", "t-100", "0", "50")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Exists));

    store.add_sensor_reading(&reading_add("s-1", "10", "20")).await.unwrap();
    let errors = store.add_sensor_reading(&reading_add("s-1", "10", "21")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Exists));
    assert_eq!(errors.errors[0].field.as_deref(), Some("timestamp"));
}

#[tokio::test(flavor = "multi_thread")]
async fn exists_conflict_preserves_the_stored_record() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;
    store.add_sensor_type(&type_add("t-100", "Siemens")).await.unwrap_err();
    let types = store
        .find_sensor_types(&SensorTypeFind::from_flat(&flat(&[("id", "t-100")])).unwrap())
        .await
        .unwrap();
    assert_eq!(types[0].manufacturer, "Honeywell");
}

#[tokio::test(flavor = "multi_thread")]
async fn sensor_referential_failures_write_nothing() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;

    let errors = store.add_sensor(&sensor_add("s-9", "t-999", "0", "50")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadId));
    assert_eq!(errors.errors[0].field.as_deref(), Some("sensorTypeId"));

    let errors = store.add_sensor(&sensor_add("s-9", "t-100", "-100", "50")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadRange));

    let sensors = store.find_sensors(&SensorFind::default()).await.unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0].id, "s-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn referential_failures_take_precedence_over_exists() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;

    // Duplicate sensor id whose request also dangles: the reference
    // check wins over duplicate detection.
    let errors = store.add_sensor(&sensor_add("s-1", "t-999", "0", "50")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadId));
    assert_eq!(errors.errors[0].field.as_deref(), Some("sensorTypeId"));

    let errors = store.add_sensor(&sensor_add("s-1", "t-100", "-100", "50")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadRange));
}

#[tokio::test(flavor = "multi_thread")]
async fn reading_for_unknown_sensor_is_bad_id() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;
    let errors = store.add_sensor_reading(&reading_add("s-999", "10", "20")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadId));
    assert_eq!(errors.errors[0].field.as_deref(), Some("sensorId"));
}

#[tokio::test(flavor = "multi_thread")]
async fn filters_compile_to_matching_sql() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;
    store.add_sensor(&sensor_add("s-2", "t-200", "10", "90")).await.unwrap();

    let types = store
        .find_sensor_types(
            &SensorTypeFind::from_flat(&flat(&[("manufacturer", "Bosch")])).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].id, "t-200");

    let sensors = store
        .find_sensors(&SensorFind::from_flat(&flat(&[("sensorTypeId", "t-100")])).unwrap())
        .await
        .unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0].id, "s-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn reading_bounds_are_inclusive_and_results_sorted() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;
    store.add_sensor_reading(&reading_add("s-1", "30", "15")).await.unwrap();
    store.add_sensor_reading(&reading_add("s-1", "10", "5")).await.unwrap();
    store.add_sensor_reading(&reading_add("s-1", "20", "10")).await.unwrap();

    let bounded = store
        .find_sensor_readings(
            &SensorReadingFind::from_flat(&flat(&[
                ("sensorId", "s-1"),
                ("minValue", "5"),
                ("maxValue", "10"),
            ]))
            .unwrap(),
        )
        .await
        .unwrap();
    let timestamps: Vec<i64> = bounded.iter().map(|reading| reading.timestamp).collect();
    assert_eq!(timestamps, [10, 20]);
}

#[tokio::test(flavor = "multi_thread")]
async fn paged_finds_use_look_ahead_links() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir.path().join("sensors.db"));
    for index in 0 .. 7 {
        store.add_sensor_type(&type_add(&format!("t-{index}"), "Honeywell")).await.unwrap();
    }
    let filter = SensorTypeFind::default();

    let first = store
        .find_sensor_types_page(&filter, &PageRequest::first(3))
        .await
        .unwrap();
    assert_eq!(first.values.len(), 3);
    assert_eq!(first.values[0].id, "t-0");
    assert!(first.prev.is_none());
    let next = first.next.unwrap();
    assert!(next.href.starts_with("/sensor-types?cursor="));
    let cursor: PageCursor<SensorTypeFind> = PageCursor::from_href(&next.href).unwrap();
    assert_eq!(cursor.offset, 3);

    let last = store
        .find_sensor_types_page(
            &filter,
            &PageRequest {
                offset: 6,
                count: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(last.values.len(), 1);
    assert!(last.next.is_none());
    assert!(last.prev.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn page_count_clamps_to_configured_maximum() {
    let dir = TempDir::new().unwrap();
    let mut config = SqliteStoreConfig::for_path(dir.path().join("sensors.db"));
    config.default_page_count = 2;
    config.max_page_count = 2;
    let store = SqliteSensorStore::open(config).unwrap();
    for index in 0 .. 5 {
        store.add_sensor_type(&type_add(&format!("t-{index}"), "Honeywell")).await.unwrap();
    }
    let page = store
        .find_sensor_types_page(&SensorTypeFind::default(), &PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(page.values.len(), 2);
    assert!(page.next.is_some());

    // Callers without an explicit window start from the configured
    // default count.
    assert_eq!(store.default_page(), PageRequest::first(2));
    let page = store
        .find_sensor_types_page(&SensorTypeFind::default(), &store.default_page())
        .await
        .unwrap();
    assert_eq!(page.values.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn operations_after_close_fail_with_db() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;
    store.close().await.unwrap();
    let errors = store.add_sensor_type(&type_add("t-300", "Siemens")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Db));
    // A second close is a no-op.
    store.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn clear_empties_every_table() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir.path().join("sensors.db")).await;
    store.add_sensor_reading(&reading_add("s-1", "10", "20")).await.unwrap();
    store.clear().await.unwrap();
    assert!(store.find_sensor_types(&SensorTypeFind::default()).await.unwrap().is_empty());
    assert!(store.find_sensors(&SensorFind::default()).await.unwrap().is_empty());
}

#[test]
fn invalid_page_limit_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = SqliteStoreConfig::for_path(dir.path().join("sensors.db"));
    config.default_page_count = 0;
    assert!(SqliteSensorStore::open(config).is_err());

    let mut config = SqliteStoreConfig::for_path(dir.path().join("sensors.db"));
    config.default_page_count = 10;
    config.max_page_count = 5;
    assert!(SqliteSensorStore::open(config).is_err());
}
