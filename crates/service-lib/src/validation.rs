//! Input coercion for predict payloads
//!
//! Payloads are coerced field by field so that a failure can name the
//! offending field. Integer fields accept integral numbers and numeric
//! strings; float fields accept any number and finite numeric strings.

use crate::error::ValidationError;
use crate::models::WeatherObservation;
use serde_json::{Map, Value};

const EXPECTED_INT: &str = "an integer";
const EXPECTED_FLOAT: &str = "a floating-point number";

/// Parse a raw request body into an observation
pub fn parse_observation(body: &[u8]) -> Result<WeatherObservation, ValidationError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;
    observation_from_value(&value)
}

/// Coerce a decoded JSON value into an observation
pub fn observation_from_value(value: &Value) -> Result<WeatherObservation, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(WeatherObservation {
        day: int_field(obj, "day")?,
        month: int_field(obj, "month")?,
        year: int_field(obj, "year")?,
        tmin: float_field(obj, "tmin")?,
        tmax: float_field(obj, "tmax")?,
        prcp: float_field(obj, "prcp")?,
        wspd: float_field(obj, "wspd")?,
    })
}

/// Semantic range checks, applied only when enabled in configuration
pub fn check_ranges(obs: &WeatherObservation) -> Result<(), ValidationError> {
    if !(1..=31).contains(&obs.day) {
        return Err(out_of_range("day", format!("{} not in 1..=31", obs.day)));
    }
    if !(1..=12).contains(&obs.month) {
        return Err(out_of_range("month", format!("{} not in 1..=12", obs.month)));
    }
    if !(1000..=9999).contains(&obs.year) {
        return Err(out_of_range("year", format!("{} is not a four-digit year", obs.year)));
    }
    if obs.prcp < 0.0 {
        return Err(out_of_range("prcp", format!("{} is negative", obs.prcp)));
    }
    if obs.wspd < 0.0 {
        return Err(out_of_range("wspd", format!("{} is negative", obs.wspd)));
    }
    if obs.tmin > obs.tmax {
        return Err(out_of_range(
            "tmin",
            format!("{} exceeds tmax {}", obs.tmin, obs.tmax),
        ));
    }
    Ok(())
}

fn out_of_range(field: &'static str, reason: String) -> ValidationError {
    ValidationError::OutOfRange { field, reason }
}

fn lookup<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    match obj.get(field) {
        Some(Value::Null) | None => Err(ValidationError::MissingField { field }),
        Some(v) => Ok(v),
    }
}

fn int_field(obj: &Map<String, Value>, field: &'static str) -> Result<i64, ValidationError> {
    let invalid = ValidationError::InvalidType {
        field,
        expected: EXPECTED_INT,
    };

    match lookup(obj, field)? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(invalid),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid),
        _ => Err(invalid),
    }
}

fn float_field(obj: &Map<String, Value>, field: &'static str) -> Result<f64, ValidationError> {
    let invalid = ValidationError::InvalidType {
        field,
        expected: EXPECTED_FLOAT,
    };

    let value = match lookup(obj, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(invalid),
    }
}
