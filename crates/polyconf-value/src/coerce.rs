//! Best-effort type coercion
//!
//! Typed getters on a configuration store convert whatever a codec produced
//! into the type the caller asks for. Flat formats only ever produce strings,
//! so most conversions accept a textual spelling of the target type.

use crate::error::CoercionError;
use crate::value::{Map, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::time::Duration;

/// Convert to string
///
/// Sequences of scalars join with `,`; mappings never convert.
pub fn to_string(value: &Value) -> Result<String, CoercionError> {
    match value {
        Value::Map(_) => Err(CoercionError::incompatible("map", "string")),
        Value::Sequence(items) if items.iter().any(|item| !item.is_scalar()) => {
            Err(CoercionError::incompatible("nested sequence", "string"))
        }
        other => Ok(other.to_string()),
    }
}

/// Convert to boolean
///
/// Accepts the spellings `1 t T TRUE true True` and `0 f F FALSE false False`;
/// integers are true when non-zero.
pub fn to_bool(value: &Value) -> Result<bool, CoercionError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(i) => Ok(*i != 0),
        Value::String(s) => match s.trim() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            other => Err(CoercionError::unparsable(other, "bool")),
        },
        other => Err(CoercionError::incompatible(other.type_name(), "bool")),
    }
}

/// Convert to 64-bit integer
///
/// Floats are truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn to_i64(value: &Value) -> Result<i64, CoercionError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(x) => {
            if x.is_finite() && *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                Ok(x.trunc() as i64)
            } else {
                Err(CoercionError::out_of_range(x, "i64"))
            }
        }
        Value::Boolean(b) => Ok(i64::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| CoercionError::unparsable(s.as_str(), "i64")),
        other => Err(CoercionError::incompatible(other.type_name(), "i64")),
    }
}

/// Convert to 32-bit integer
pub fn to_i32(value: &Value) -> Result<i32, CoercionError> {
    let wide = to_i64(value)?;
    i32::try_from(wide).map_err(|_| CoercionError::out_of_range(wide, "i32"))
}

/// Convert to 64-bit float
#[allow(clippy::cast_precision_loss)]
pub fn to_f64(value: &Value) -> Result<f64, CoercionError> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Integer(i) => Ok(*i as f64),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoercionError::unparsable(s.as_str(), "f64")),
        other => Err(CoercionError::incompatible(other.type_name(), "f64")),
    }
}

/// Convert to timestamp
///
/// Strings may be RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (both
/// read as UTC); integers are unix seconds.
pub fn to_timestamp(value: &Value) -> Result<DateTime<FixedOffset>, CoercionError> {
    match value {
        Value::Timestamp(t) => Ok(*t),
        Value::Integer(secs) => DateTime::from_timestamp(*secs, 0)
            .map(|t| t.fixed_offset())
            .ok_or_else(|| CoercionError::out_of_range(secs, "timestamp")),
        Value::String(s) => parse_timestamp(s.trim())
            .ok_or_else(|| CoercionError::unparsable(s.as_str(), "timestamp")),
        other => Err(CoercionError::incompatible(other.type_name(), "timestamp")),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc().fixed_offset())
}

/// Convert to duration
///
/// Strings use `humantime` spellings (`90s`, `1h 30m`, `250ms`); bare
/// numbers are nanoseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_duration(value: &Value) -> Result<Duration, CoercionError> {
    match value {
        Value::Duration(d) => Ok(*d),
        Value::Integer(nanos) => u64::try_from(*nanos)
            .map(Duration::from_nanos)
            .map_err(|_| CoercionError::out_of_range(nanos, "duration")),
        Value::Float(nanos) if nanos.is_finite() && *nanos >= 0.0 => {
            Ok(Duration::from_nanos(*nanos as u64))
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(nanos) = s.parse::<u64>() {
                return Ok(Duration::from_nanos(nanos));
            }
            humantime::parse_duration(s).map_err(|_| CoercionError::unparsable(s, "duration"))
        }
        other => Err(CoercionError::incompatible(other.type_name(), "duration")),
    }
}

/// Convert to list of strings
///
/// Strings split on `,` when one is present, otherwise on whitespace.
pub fn to_string_slice(value: &Value) -> Result<Vec<String>, CoercionError> {
    match value {
        Value::Sequence(items) => items.iter().map(to_string).collect(),
        Value::String(s) if s.contains(',') => {
            Ok(s.split(',').map(|part| part.trim().to_string()).collect())
        }
        Value::String(s) => Ok(s.split_whitespace().map(str::to_string).collect()),
        Value::Map(_) => Err(CoercionError::incompatible("map", "string slice")),
        scalar => Ok(vec![scalar.to_string()]),
    }
}

/// Convert to nested mapping
pub fn to_string_map(value: &Value) -> Result<Map, CoercionError> {
    match value {
        Value::Map(map) => Ok(map.clone()),
        other => Err(CoercionError::incompatible(other.type_name(), "string map")),
    }
}

/// Convert to mapping of strings
pub fn to_string_map_string(value: &Value) -> Result<IndexMap<String, String>, CoercionError> {
    to_string_map(value)?
        .into_iter()
        .map(|(key, value)| Ok::<_, CoercionError>((key, to_string(&value)?)))
        .collect()
}

/// Convert to mapping of string lists
pub fn to_string_map_string_slice(
    value: &Value,
) -> Result<IndexMap<String, Vec<String>>, CoercionError> {
    to_string_map(value)?
        .into_iter()
        .map(|(key, value)| Ok::<_, CoercionError>((key, to_string_slice(&value)?)))
        .collect()
}

/// Convert a size such as `512`, `64kb`, `10MB` or `2GB` to bytes
///
/// Suffixes are binary multiples; negative sizes clamp to zero.
pub fn to_size_in_bytes(value: &Value) -> Result<u64, CoercionError> {
    let text = to_string(value)?;
    let trimmed = text.trim();
    let (number, multiplier) = split_size_suffix(trimmed);
    let size = number
        .trim()
        .parse::<i64>()
        .map_err(|_| CoercionError::unparsable(trimmed, "size in bytes"))?;
    let size = u64::try_from(size).unwrap_or(0);
    size.checked_mul(multiplier)
        .ok_or_else(|| CoercionError::out_of_range(trimmed, "size in bytes"))
}

fn split_size_suffix(s: &str) -> (&str, u64) {
    let Some(without_b) = s.strip_suffix(['b', 'B']) else {
        return (s, 1);
    };
    let multiplier = match without_b.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some('k') => 1 << 10,
        Some('m') => 1 << 20,
        Some('g') => 1 << 30,
        _ => return (without_b, 1),
    };
    (&without_b[..without_b.len() - 1], multiplier)
}
