// crates/sensor-registry-core/src/lib.rs
// ============================================================================
// Module: Sensor Registry Core Crate
// Description: Sensor metadata registry with validation and queries.
// Purpose: Public API surface re-exporting core types and interfaces.
// Dependencies: async-trait, base64, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! This crate records sensor metadata (sensor types, sensors, readings),
//! enforces cross-entity consistency rules, and answers filtered, sorted,
//! paginated queries over those records. The in-memory
//! [`SensorRegistry`] is synchronous and single-threaded; the
//! [`SensorStore`] trait is the asynchronous contract durable adapters
//! implement with identical observable semantics.
//!
//! Transport, authentication, and presentation concerns live outside this
//! workspace.

pub mod core;
pub mod interfaces;

pub use crate::core::ErrorKind;
pub use crate::core::FlatReq;
pub use crate::core::Interval;
pub use crate::core::Quantity;
pub use crate::core::RegistryError;
pub use crate::core::RegistryErrors;
pub use crate::core::RegistryResult;
pub use crate::core::Sensor;
pub use crate::core::SensorAdd;
pub use crate::core::SensorFind;
pub use crate::core::SensorQuery;
pub use crate::core::SensorReading;
pub use crate::core::SensorReadingAdd;
pub use crate::core::SensorReadingFind;
pub use crate::core::SensorReadingQuery;
pub use crate::core::SensorRegistry;
pub use crate::core::SensorType;
pub use crate::core::SensorTypeAdd;
pub use crate::core::SensorTypeFind;
pub use crate::core::SensorTypeQuery;
pub use crate::interfaces::SensorStore;
pub use crate::interfaces::memory::InMemorySensorStore;
pub use crate::interfaces::paging::DEFAULT_PAGE_COUNT;
pub use crate::interfaces::paging::Page;
pub use crate::interfaces::paging::PageCursor;
pub use crate::interfaces::paging::PageLink;
pub use crate::interfaces::paging::PageRequest;
