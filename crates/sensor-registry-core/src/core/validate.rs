// crates/sensor-registry-core/src/core/validate.rs
// ============================================================================
// Module: Sensor Registry Validator
// Description: Table-driven field validation and type coercion.
// Purpose: Turn raw request records into checked entities and queries.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The validator is pure and synchronous: no I/O and no cross-entity
//! lookups (those belong to the registry). Each entity kind declares a
//! [`FieldRule`] table; a single pass checks required presence and coerces
//! values, accumulating every independent failure so callers see them all
//! at once. Checks apply in a fixed order per field: required presence
//! (`REQUIRED`), numeric/enum coercion (`BAD_VAL`), then range
//! well-formedness across `{min, max}` pairs (`BAD_RANGE`).
//!
//! Find-time validation shares the same taxonomy and produces typed queries
//! with parsed bounds for the query engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::entities::Interval;
use crate::core::entities::Quantity;
use crate::core::entities::Sensor;
use crate::core::entities::SensorReading;
use crate::core::entities::SensorType;
use crate::core::errors::ErrorKind;
use crate::core::errors::RegistryError;
use crate::core::errors::RegistryErrors;
use crate::core::errors::RegistryResult;
use crate::core::query::SensorQuery;
use crate::core::query::SensorReadingQuery;
use crate::core::query::SensorTypeQuery;
use crate::core::requests::SensorAdd;
use crate::core::requests::SensorFind;
use crate::core::requests::SensorReadingAdd;
use crate::core::requests::SensorReadingFind;
use crate::core::requests::SensorTypeAdd;
use crate::core::requests::SensorTypeFind;

// ============================================================================
// SECTION: Rule Tables
// ============================================================================

/// Value kind a field must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Opaque non-empty text.
    Text,
    /// Enumerated unit category.
    Quantity,
    /// Finite floating-point number.
    Float,
    /// Signed integer.
    Integer,
}

/// Declarative validation rule for one request field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRule {
    /// Wire name of the field.
    pub(crate) name: &'static str,
    /// Whether absence fails with `REQUIRED`.
    pub(crate) required: bool,
    /// Coercion target.
    pub(crate) kind: FieldKind,
}

impl FieldRule {
    /// Declares a mandatory field.
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    /// Declares an optional field.
    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Rules for adding a sensor type.
pub(crate) const SENSOR_TYPE_ADD_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Text),
    FieldRule::required("manufacturer", FieldKind::Text),
    FieldRule::required("modelNumber", FieldKind::Text),
    FieldRule::required("quantity", FieldKind::Quantity),
    FieldRule::required("unit", FieldKind::Text),
    FieldRule::required("min", FieldKind::Float),
    FieldRule::required("max", FieldKind::Float),
];

/// Rules for adding a sensor.
pub(crate) const SENSOR_ADD_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Text),
    FieldRule::required("sensorTypeId", FieldKind::Text),
    FieldRule::required("min", FieldKind::Float),
    FieldRule::required("max", FieldKind::Float),
];

/// Rules for adding a sensor reading.
pub(crate) const READING_ADD_RULES: &[FieldRule] = &[
    FieldRule::required("sensorId", FieldKind::Text),
    FieldRule::required("timestamp", FieldKind::Integer),
    FieldRule::required("value", FieldKind::Float),
];

/// Rules for filtering sensor types.
pub(crate) const SENSOR_TYPE_FIND_RULES: &[FieldRule] = &[
    FieldRule::optional("id", FieldKind::Text),
    FieldRule::optional("manufacturer", FieldKind::Text),
    FieldRule::optional("modelNumber", FieldKind::Text),
    FieldRule::optional("quantity", FieldKind::Quantity),
    FieldRule::optional("unit", FieldKind::Text),
];

/// Rules for filtering sensors.
pub(crate) const SENSOR_FIND_RULES: &[FieldRule] = &[
    FieldRule::optional("id", FieldKind::Text),
    FieldRule::optional("sensorTypeId", FieldKind::Text),
];

/// Rules for filtering sensor readings.
pub(crate) const READING_FIND_RULES: &[FieldRule] = &[
    FieldRule::required("sensorId", FieldKind::Text),
    FieldRule::optional("minValue", FieldKind::Float),
    FieldRule::optional("maxValue", FieldKind::Float),
    FieldRule::optional("minTimestamp", FieldKind::Integer),
    FieldRule::optional("maxTimestamp", FieldKind::Integer),
];

// ============================================================================
// SECTION: Field Checking
// ============================================================================

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    /// Coerced text.
    Text(String),
    /// Coerced unit category.
    Quantity(Quantity),
    /// Coerced finite float.
    Float(f64),
    /// Coerced integer.
    Integer(i64),
}

/// Coerced values keyed by rule-table field name.
type FieldValues = BTreeMap<&'static str, FieldValue>;

/// Runs the required/coercion pass for one rule table.
///
/// Every independent failure is collected; a value only lands in the
/// returned map when its coercion succeeded. The accessor borrows from
/// the request, not from its own argument, hence the named lifetime.
fn check_fields<'req>(
    rules: &[FieldRule],
    get: &dyn Fn(&str) -> Option<&'req str>,
) -> (FieldValues, Vec<RegistryError>) {
    let mut values = FieldValues::new();
    let mut errors = Vec::new();
    for rule in rules {
        match get(rule.name) {
            None => {
                if rule.required {
                    errors.push(RegistryError::for_field(
                        ErrorKind::Required,
                        rule.name,
                        format!("missing required field \"{}\"", rule.name),
                    ));
                }
            }
            Some(raw) => match coerce(rule, raw) {
                Ok(value) => {
                    values.insert(rule.name, value);
                }
                Err(error) => errors.push(error),
            },
        }
    }
    (values, errors)
}

/// Coerces one raw value per its rule kind.
fn coerce(rule: &FieldRule, raw: &str) -> Result<FieldValue, RegistryError> {
    match rule.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Quantity => raw.parse::<Quantity>().map(FieldValue::Quantity).map_err(|_| {
            RegistryError::for_field(
                ErrorKind::BadVal,
                rule.name,
                format!("bad value \"{raw}\" for {}: unknown quantity", rule.name),
            )
        }),
        FieldKind::Float => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(FieldValue::Float(value)),
            _ => Err(RegistryError::for_field(
                ErrorKind::BadVal,
                rule.name,
                format!("bad value \"{raw}\" for {}: expected a number", rule.name),
            )),
        },
        FieldKind::Integer => raw.parse::<i64>().map(FieldValue::Integer).map_err(|_| {
            RegistryError::for_field(
                ErrorKind::BadVal,
                rule.name,
                format!("bad value \"{raw}\" for {}: expected an integer", rule.name),
            )
        }),
    }
}

/// Removes a checked text value.
fn take_text(values: &mut FieldValues, name: &str) -> Option<String> {
    match values.remove(name) {
        Some(FieldValue::Text(value)) => Some(value),
        _ => None,
    }
}

/// Removes a checked quantity value.
fn take_quantity(values: &mut FieldValues, name: &str) -> Option<Quantity> {
    match values.remove(name) {
        Some(FieldValue::Quantity(value)) => Some(value),
        _ => None,
    }
}

/// Removes a checked float value.
fn take_float(values: &mut FieldValues, name: &str) -> Option<f64> {
    match values.remove(name) {
        Some(FieldValue::Float(value)) => Some(value),
        _ => None,
    }
}

/// Removes a checked integer value.
fn take_integer(values: &mut FieldValues, name: &str) -> Option<i64> {
    match values.remove(name) {
        Some(FieldValue::Integer(value)) => Some(value),
        _ => None,
    }
}

/// Checks `min < max` well-formedness for a bound pair.
///
/// Returns the interval only when both bounds are present and ordered;
/// a violated ordering records a `BAD_RANGE` failure against `field`.
fn checked_interval(
    field: &str,
    min: Option<f64>,
    max: Option<f64>,
    errors: &mut Vec<RegistryError>,
) -> Option<Interval> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo < hi => Some(Interval::new(lo, hi)),
        (Some(lo), Some(hi)) => {
            errors.push(RegistryError::for_field(
                ErrorKind::BadRange,
                field,
                format!("bad range for {field}: min {lo} must be less than max {hi}"),
            ));
            None
        }
        _ => None,
    }
}

/// Wraps accumulated failures, guarding against an empty list.
///
/// The builders only reach the failure path when at least one error was
/// recorded; the fallback exists so this function can never produce an
/// empty aggregate.
fn into_errors(errors: Vec<RegistryError>) -> RegistryErrors {
    if errors.is_empty() {
        RegistryErrors::of(ErrorKind::BadVal, "request failed validation")
    } else {
        RegistryErrors { errors }
    }
}

// ============================================================================
// SECTION: Add Validation
// ============================================================================

/// Validates a sensor-type add request into a checked entity.
///
/// # Errors
///
/// Returns `REQUIRED`, `BAD_VAL`, and `BAD_RANGE` failures, accumulated.
pub fn validate_sensor_type(req: &SensorTypeAdd) -> RegistryResult<SensorType> {
    let (mut values, mut errors) = check_fields(SENSOR_TYPE_ADD_RULES, &|name| req.field(name));
    let min = take_float(&mut values, "min");
    let max = take_float(&mut values, "max");
    let limits = checked_interval("limits", min, max, &mut errors);
    match (
        take_text(&mut values, "id"),
        take_text(&mut values, "manufacturer"),
        take_text(&mut values, "modelNumber"),
        take_quantity(&mut values, "quantity"),
        take_text(&mut values, "unit"),
        limits,
    ) {
        (Some(id), Some(manufacturer), Some(model_number), Some(quantity), Some(unit), Some(limits))
            if errors.is_empty() =>
        {
            Ok(SensorType {
                id,
                manufacturer,
                model_number,
                quantity,
                unit,
                limits,
            })
        }
        _ => Err(into_errors(errors)),
    }
}

/// Validates a sensor add request into a checked entity.
///
/// Referential checks against the owning sensor type (existence and
/// limit containment) are the registry's responsibility, not the
/// validator's.
///
/// # Errors
///
/// Returns `REQUIRED`, `BAD_VAL`, and `BAD_RANGE` failures, accumulated.
pub fn validate_sensor(req: &SensorAdd) -> RegistryResult<Sensor> {
    let (mut values, mut errors) = check_fields(SENSOR_ADD_RULES, &|name| req.field(name));
    let min = take_float(&mut values, "min");
    let max = take_float(&mut values, "max");
    let expected = checked_interval("expected", min, max, &mut errors);
    match (
        take_text(&mut values, "id"),
        take_text(&mut values, "sensorTypeId"),
        expected,
    ) {
        (Some(id), Some(sensor_type_id), Some(expected)) if errors.is_empty() => Ok(Sensor {
            id,
            sensor_type_id,
            expected,
        }),
        _ => Err(into_errors(errors)),
    }
}

/// Validates a sensor-reading add request into a checked entity.
///
/// # Errors
///
/// Returns `REQUIRED` and `BAD_VAL` failures, accumulated.
pub fn validate_sensor_reading(req: &SensorReadingAdd) -> RegistryResult<SensorReading> {
    let (mut values, errors) = check_fields(READING_ADD_RULES, &|name| req.field(name));
    match (
        take_text(&mut values, "sensorId"),
        take_integer(&mut values, "timestamp"),
        take_float(&mut values, "value"),
    ) {
        (Some(sensor_id), Some(timestamp), Some(value)) if errors.is_empty() => Ok(SensorReading {
            sensor_id,
            timestamp,
            value,
        }),
        _ => Err(into_errors(errors)),
    }
}

// ============================================================================
// SECTION: Find Validation
// ============================================================================

/// Validates a sensor-type filter into a typed query.
///
/// # Errors
///
/// Returns `BAD_VAL` failures for malformed filter values.
pub fn validate_sensor_type_find(req: &SensorTypeFind) -> RegistryResult<SensorTypeQuery> {
    let (mut values, errors) = check_fields(SENSOR_TYPE_FIND_RULES, &|name| req.field(name));
    if !errors.is_empty() {
        return Err(into_errors(errors));
    }
    Ok(SensorTypeQuery {
        id: take_text(&mut values, "id"),
        manufacturer: take_text(&mut values, "manufacturer"),
        model_number: take_text(&mut values, "modelNumber"),
        quantity: take_quantity(&mut values, "quantity"),
        unit: take_text(&mut values, "unit"),
    })
}

/// Validates a sensor filter into a typed query.
///
/// # Errors
///
/// Returns `BAD_VAL` failures for malformed filter values.
pub fn validate_sensor_find(req: &SensorFind) -> RegistryResult<SensorQuery> {
    let (mut values, errors) = check_fields(SENSOR_FIND_RULES, &|name| req.field(name));
    if !errors.is_empty() {
        return Err(into_errors(errors));
    }
    Ok(SensorQuery {
        id: take_text(&mut values, "id"),
        sensor_type_id: take_text(&mut values, "sensorTypeId"),
    })
}

/// Validates a sensor-reading filter into a typed query.
///
/// Bound pairs are validated for ordering when both ends are supplied;
/// each bound also filters independently when supplied alone.
///
/// # Errors
///
/// Returns `REQUIRED` (missing `sensorId`), `BAD_VAL` (malformed bounds),
/// and `BAD_RANGE` (inverted pairs) failures, accumulated.
pub fn validate_sensor_reading_find(req: &SensorReadingFind) -> RegistryResult<SensorReadingQuery> {
    let (mut values, mut errors) = check_fields(READING_FIND_RULES, &|name| req.field(name));
    let min_value = take_float(&mut values, "minValue");
    let max_value = take_float(&mut values, "maxValue");
    if let (Some(lo), Some(hi)) = (min_value, max_value)
        && lo >= hi
    {
        errors.push(RegistryError::for_field(
            ErrorKind::BadRange,
            "minValue",
            format!("bad range: minValue {lo} must be less than maxValue {hi}"),
        ));
    }
    let min_timestamp = take_integer(&mut values, "minTimestamp");
    let max_timestamp = take_integer(&mut values, "maxTimestamp");
    if let (Some(lo), Some(hi)) = (min_timestamp, max_timestamp)
        && lo >= hi
    {
        errors.push(RegistryError::for_field(
            ErrorKind::BadRange,
            "minTimestamp",
            format!("bad range: minTimestamp {lo} must be less than maxTimestamp {hi}"),
        ));
    }
    match take_text(&mut values, "sensorId") {
        Some(sensor_id) if errors.is_empty() => Ok(SensorReadingQuery {
            sensor_id,
            min_value,
            max_value,
            min_timestamp,
            max_timestamp,
        }),
        _ => Err(into_errors(errors)),
    }
}
