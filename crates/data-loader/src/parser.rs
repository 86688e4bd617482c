//! Parser for catalog and ratings exports.
//!
//! Both files may be either a single JSON array or JSON lines (one
//! document per line, blank lines skipped). Documents are parsed into
//! raw shapes; value coercion lives here too so cleaning stays a pure
//! transformation.

use crate::error::{DataLoadError, Result};
use crate::types::{RawMovie, UserRating};
use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read a whole file, mapping a missing file to `FileNotFound`
fn read_to_string(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Parse a document stream that is either a JSON array or JSON lines.
pub fn parse_documents<T: DeserializeOwned>(content: &str, file: &str) -> Result<Vec<T>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: 0,
            reason: e.to_string(),
        });
    }

    let mut docs = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let doc = serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        docs.push(doc);
    }
    Ok(docs)
}

/// Parse a movie export file
pub fn parse_movies(path: &Path) -> Result<Vec<RawMovie>> {
    let content = read_to_string(path)?;
    parse_documents(&content, &path.display().to_string())
}

/// Parse a ratings export file
pub fn parse_ratings(path: &Path) -> Result<Vec<UserRating>> {
    let content = read_to_string(path)?;
    parse_documents(&content, &path.display().to_string())
}

// =============================================================================
// Value coercion
// =============================================================================

/// Coerce a loosely-typed value to a finite float.
///
/// Numbers pass through; strings are trimmed and parsed. Anything else,
/// including "NaN"/"inf" strings, yields `None`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coerce to a non-negative integer count, truncating fractions
pub fn coerce_count(value: &Value) -> Option<u64> {
    coerce_f64(value).filter(|v| *v >= 0.0).map(|v| v as u64)
}

/// Pull an integer out of values such as `1995` or `"1995è"`
pub fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Document id as a string: plain strings, numbers, or `{"$oid": "..."}`
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(|oid| oid.as_str()).map(str::to_string),
        _ => None,
    }
}

/// Milliseconds since the Unix epoch from a loosely-typed timestamp.
///
/// Accepts epoch-millisecond numbers or numeric strings, ISO-8601 strings
/// (with or without an offset, naive ones read as UTC), and extended JSON
/// dates: `{"$date": "..."}`, `{"$date": 1717236000000}` or
/// `{"$date": {"$numberLong": "..."}}`.
pub fn coerce_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v as i64)),
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Object(map) => map
            .get("$date")
            .or_else(|| map.get("$numberLong"))
            .and_then(coerce_timestamp),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if let Ok(millis) = s.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Render any value as a string; strings are taken verbatim
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value is missing for filtering purposes (null or blank string)
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
