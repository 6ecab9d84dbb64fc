// crates/sensor-registry-core/tests/proptest_paging.rs
// ============================================================================
// Module: Interval and Paging Property-Based Tests
// Description: Property tests for interval containment and pagination.
// Purpose: Detect window-arithmetic and cursor round-trip defects across
//          wide input ranges.
// ============================================================================

//! Property-based tests for interval and pagination invariants.

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

use proptest::prelude::*;
use sensor_registry_core::Interval;
use sensor_registry_core::PageCursor;
use sensor_registry_core::PageRequest;
use sensor_registry_core::SensorTypeFind;
use sensor_registry_core::interfaces::paging;

proptest! {
    #[test]
    fn enclosed_interval_values_stay_contained(
        outer_min in -1_000.0f64 .. 0.0,
        outer_span in 1.0f64 .. 1_000.0,
        inner_start in 0.0f64 .. 1.0,
        inner_span in 0.0f64 .. 1.0,
        point in 0.0f64 .. 1.0,
    ) {
        let outer = Interval::new(outer_min, outer_min + outer_span);
        let inner_min = outer.min + inner_start * (outer.max - outer.min);
        let inner_max = inner_min + inner_span * (outer.max - inner_min);
        let inner = Interval::new(inner_min, inner_max);
        prop_assert!(outer.encloses(&inner));
        let value = inner.min + point * (inner.max - inner.min);
        prop_assert!(inner.contains(value));
        prop_assert!(outer.contains(value));
    }

    #[test]
    fn interval_never_contains_values_outside_bounds(
        min in -1_000.0f64 .. 0.0,
        span in 1.0f64 .. 1_000.0,
        excess in 0.001f64 .. 100.0,
    ) {
        let interval = Interval::new(min, min + span);
        prop_assert!(!interval.contains(interval.min - excess));
        prop_assert!(!interval.contains(interval.max + excess));
    }

    #[test]
    fn page_window_never_exceeds_count(
        total in 0usize .. 50,
        offset in 0u64 .. 60,
        count in 1u64 .. 10,
    ) {
        let items: Vec<u32> = (0 .. u32::try_from(total).unwrap()).collect();
        let page = paging::paginate(
            items,
            &SensorTypeFind::default(),
            &PageRequest { offset, count },
            paging::SENSOR_TYPES_PATH,
        )
        .unwrap();
        prop_assert!(u64::try_from(page.values.len()).unwrap() <= count);
        prop_assert_eq!(page.prev.is_some(), offset > 0);
        let end = offset.saturating_add(count);
        prop_assert_eq!(page.next.is_some(), end < u64::try_from(total).unwrap());
    }

    #[test]
    fn walking_next_links_reconstructs_the_collection(
        total in 0usize .. 40,
        count in 1u64 .. 7,
    ) {
        let items: Vec<u32> = (0 .. u32::try_from(total).unwrap()).collect();
        let filter = SensorTypeFind::default();
        let mut page_request = PageRequest::first(count);
        let mut collected = Vec::new();
        loop {
            let page = paging::paginate(
                items.clone(),
                &filter,
                &page_request,
                paging::SENSOR_TYPES_PATH,
            )
            .unwrap();
            collected.extend(page.values);
            let Some(next) = page.next else {
                break;
            };
            let cursor: PageCursor<SensorTypeFind> = PageCursor::from_href(&next.href).unwrap();
            page_request = PageRequest {
                offset: cursor.offset,
                count: cursor.count,
            };
        }
        prop_assert_eq!(collected, items);
    }

    #[test]
    fn cursor_tokens_round_trip(
        id in proptest::option::of("[a-z0-9-]{1,12}"),
        manufacturer in proptest::option::of("[A-Za-z ]{1,16}"),
        offset in 0u64 .. 10_000,
        count in 1u64 .. 100,
    ) {
        let cursor = PageCursor {
            filter: SensorTypeFind {
                id,
                manufacturer,
                ..SensorTypeFind::default()
            },
            offset,
            count,
        };
        let token = cursor.token().unwrap();
        let decoded: PageCursor<SensorTypeFind> = PageCursor::from_token(&token).unwrap();
        prop_assert_eq!(&decoded, &cursor);
        let href = cursor.href(paging::SENSOR_TYPES_PATH).unwrap();
        let from_href: PageCursor<SensorTypeFind> = PageCursor::from_href(&href).unwrap();
        prop_assert_eq!(from_href, cursor);
    }
}
