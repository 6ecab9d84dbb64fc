// crates/sensor-registry-core/tests/memory_store_unit.rs
// ============================================================================
// Module: In-Memory Store Unit Tests
// Description: SensorStore contract tests against the reference store.
// Purpose: Validate insert-only EXISTS semantics, paged queries, and
//          cursor link round trips.
// ============================================================================

//! ## Overview
//! Contract tests for the in-memory [`SensorStore`] implementation:
//! - Insert-only add paths conflict with `EXISTS`
//! - Paged finds window results and emit `prev`/`next` links
//! - Cursor hrefs decode back to the originating filter and window
//! - `clear` resets all collections

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

use sensor_registry_core::ErrorKind;
use sensor_registry_core::FlatReq;
use sensor_registry_core::InMemorySensorStore;
use sensor_registry_core::PageCursor;
use sensor_registry_core::PageRequest;
use sensor_registry_core::SensorAdd;
use sensor_registry_core::SensorReadingAdd;
use sensor_registry_core::SensorReadingFind;
use sensor_registry_core::SensorStore;
use sensor_registry_core::SensorTypeAdd;
use sensor_registry_core::SensorTypeFind;

fn flat(pairs: &[(&str, &str)]) -> FlatReq {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

fn type_add(id: &str) -> SensorTypeAdd {
    SensorTypeAdd::from_flat(&flat(&[
        ("id", id),
        ("manufacturer", "Honeywell"),
        ("modelNumber", "TH-1"),
        ("quantity", "temperature"),
        ("unit", "C"),
        ("min", "-40"),
        ("max", "120"),
    ]))
}

fn sensor_add(id: &str) -> SensorAdd {
    SensorAdd::from_flat(&flat(&[
        ("id", id),
        ("sensorTypeId", "t-0"),
        ("min", "0"),
        ("max", "50"),
    ]))
}

fn reading_add(timestamp: &str, value: &str) -> SensorReadingAdd {
    SensorReadingAdd::from_flat(&flat(&[
        ("sensorId", "s-0"),
        ("timestamp", timestamp),
        ("value", value),
    ]))
}

async fn seeded_store(type_count: usize) -> InMemorySensorStore {
    let store = InMemorySensorStore::new();
    for index in 0 .. type_count {
        store.add_sensor_type(&type_add(&format!("t-{index}"))).await.unwrap();
    }
    store
}

#[tokio::test]
async fn duplicate_sensor_type_is_exists() {
    let store = seeded_store(1).await;
    let errors = store.add_sensor_type(&type_add("t-0")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Exists));
    assert_eq!(errors.errors[0].field.as_deref(), Some("id"));
}

#[tokio::test]
async fn duplicate_sensor_is_exists() {
    let store = seeded_store(1).await;
    store.add_sensor(&sensor_add("s-0")).await.unwrap();
    let errors = store.add_sensor(&sensor_add("s-0")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Exists));
}

#[tokio::test]
async fn duplicate_reading_timestamp_is_exists() {
    let store = seeded_store(1).await;
    store.add_sensor(&sensor_add("s-0")).await.unwrap();
    store.add_sensor_reading(&reading_add("10", "20")).await.unwrap();
    let errors = store.add_sensor_reading(&reading_add("10", "21")).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::Exists));
    assert_eq!(errors.errors[0].field.as_deref(), Some("timestamp"));
}

#[tokio::test]
async fn referential_failures_take_precedence_over_exists() {
    let store = seeded_store(1).await;
    store.add_sensor(&sensor_add("s-0")).await.unwrap();

    // Duplicate sensor id whose request also dangles: the reference
    // check wins over duplicate detection.
    let req = SensorAdd::from_flat(&flat(&[
        ("id", "s-0"),
        ("sensorTypeId", "t-999"),
        ("min", "0"),
        ("max", "50"),
    ]));
    let errors = store.add_sensor(&req).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadId));
    assert_eq!(errors.errors[0].field.as_deref(), Some("sensorTypeId"));

    let req = SensorAdd::from_flat(&flat(&[
        ("id", "s-0"),
        ("sensorTypeId", "t-0"),
        ("min", "-100"),
        ("max", "50"),
    ]));
    let errors = store.add_sensor(&req).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadRange));

    let req = SensorReadingAdd::from_flat(&flat(&[
        ("sensorId", "s-999"),
        ("timestamp", "10"),
        ("value", "1"),
    ]));
    let errors = store.add_sensor_reading(&req).await.unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadId));
}

#[tokio::test]
async fn exists_failure_leaves_stored_record_intact() {
    let store = seeded_store(1).await;
    store.add_sensor(&sensor_add("s-0")).await.unwrap();
    store.add_sensor_reading(&reading_add("10", "20")).await.unwrap();
    store.add_sensor_reading(&reading_add("10", "99")).await.unwrap_err();
    let readings = store
        .find_sensor_readings(&SensorReadingFind::from_flat(&flat(&[("sensorId", "s-0")])).unwrap())
        .await
        .unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].value, 20.0);
}

#[tokio::test]
async fn paged_find_windows_results_and_links_neighbors() {
    let store = seeded_store(7).await;
    let filter = SensorTypeFind::default();

    let first = store
        .find_sensor_types_page(&filter, &PageRequest::first(3))
        .await
        .unwrap();
    assert_eq!(first.values.len(), 3);
    assert_eq!(first.values[0].id, "t-0");
    assert!(first.prev.is_none());
    let next = first.next.unwrap();
    assert_eq!(next.rel, "next");
    assert_eq!(next.method, "GET");
    assert!(next.href.starts_with("/sensor-types?cursor="));

    let cursor: PageCursor<SensorTypeFind> = PageCursor::from_href(&next.href).unwrap();
    assert_eq!(cursor.offset, 3);
    assert_eq!(cursor.count, 3);
    assert_eq!(cursor.filter, filter);

    let middle = store
        .find_sensor_types_page(
            &cursor.filter,
            &PageRequest {
                offset: cursor.offset,
                count: cursor.count,
            },
        )
        .await
        .unwrap();
    assert_eq!(middle.values.len(), 3);
    assert_eq!(middle.values[0].id, "t-3");
    assert!(middle.prev.is_some());
    assert!(middle.next.is_some());

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
    let prev = last.prev.unwrap();
    assert_eq!(prev.rel, "prev");
    let cursor: PageCursor<SensorTypeFind> = PageCursor::from_href(&prev.href).unwrap();
    assert_eq!(cursor.offset, 3);
}

#[tokio::test]
async fn page_links_preserve_the_filter() {
    let store = seeded_store(7).await;
    let filter = SensorTypeFind::from_flat(&flat(&[("manufacturer", "Honeywell")])).unwrap();
    let page = store
        .find_sensor_types_page(&filter, &PageRequest::first(2))
        .await
        .unwrap();
    let cursor: PageCursor<SensorTypeFind> =
        PageCursor::from_href(&page.next.unwrap().href).unwrap();
    assert_eq!(cursor.filter.manufacturer.as_deref(), Some("Honeywell"));
}

#[tokio::test]
async fn offset_past_end_yields_empty_page_with_prev() {
    let store = seeded_store(3).await;
    let page = store
        .find_sensor_types_page(
            &SensorTypeFind::default(),
            &PageRequest {
                offset: 10,
                count: 5,
            },
        )
        .await
        .unwrap();
    assert!(page.values.is_empty());
    assert!(page.next.is_none());
    assert!(page.prev.is_some());
}

#[tokio::test]
async fn zero_page_count_is_bad_val() {
    let store = seeded_store(1).await;
    let errors = store
        .find_sensor_types_page(&SensorTypeFind::default(), &PageRequest::first(0))
        .await
        .unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadVal));
}

#[tokio::test]
async fn clear_resets_the_store() {
    let store = seeded_store(3).await;
    store.clear().await.unwrap();
    let types = store.find_sensor_types(&SensorTypeFind::default()).await.unwrap();
    assert!(types.is_empty());
}

#[test]
fn malformed_cursor_tokens_are_bad_val() {
    let errors = PageCursor::<SensorTypeFind>::from_token("not-base64!").unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadVal));
    let errors = PageCursor::<SensorTypeFind>::from_href("/sensor-types").unwrap_err();
    assert_eq!(errors.first_kind(), Some(ErrorKind::BadVal));
}
