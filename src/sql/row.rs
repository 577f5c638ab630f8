//! Raw result rows and lenient cell decoding for `SHOW` output.
//!
//! Every column of a `SHOW` result is nullable and its wire type depends on the
//! driver (a retention time may arrive as `1`, `"1"` or `""`). Entity modules
//! declare a private `*Row` struct whose fields are all `Option<_>` decoded
//! with the helpers in [`loose`], then convert it to the exported entity with
//! defaults substituted for `None`.

use crate::error::ProviderError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One result row: column name to cell value.
pub type Row = Map<String, Value>;

/// Decode a row into `T`. Column names are matched case-insensitively.
pub fn scan<T: DeserializeOwned>(row: Row) -> Result<T, ProviderError> {
    let normalized: Map<String, Value> = row
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect();
    serde_json::from_value(Value::Object(normalized)).map_err(|e| ProviderError::Scan(e.to_string()))
}

pub fn scan_all<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, ProviderError> {
    rows.into_iter().map(scan).collect()
}

pub mod loose {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        })
    }

    /// Integers; the empty string decodes as absent.
    pub fn int<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("integer out of range: {}", n))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected integer, got '{}'", s))),
            other => Err(D::Error::custom(format!("expected integer, got {}", other))),
        }
    }

    /// Booleans from `true`/`false`, `Y`/`N`, `YES`/`NO` or numbers.
    pub fn boolean<'de, D>(d: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            Value::Number(n) => Ok(Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false))),
            Value::String(s) => match s.trim().to_uppercase().as_str() {
                "" => Ok(None),
                "Y" | "YES" | "TRUE" | "1" => Ok(Some(true)),
                "N" | "NO" | "FALSE" | "0" => Ok(Some(false)),
                _ => Err(D::Error::custom(format!("expected boolean, got '{}'", s))),
            },
            other => Err(D::Error::custom(format!("expected boolean, got {}", other))),
        }
    }

    /// Timestamps from RFC 3339, `YYYY-MM-DD HH:MM:SS[.f] [+zzzz]` or epoch seconds.
    pub fn timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .and_then(from_epoch_seconds)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid epoch timestamp: {}", n))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_timestamp(s.trim())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", s))),
            other => Err(D::Error::custom(format!("expected timestamp, got {}", other))),
        }
    }

    fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(t) = DateTime::parse_from_rfc3339(s) {
            return Some(t.with_timezone(&Utc));
        }
        if let Ok(t) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %z") {
            return Some(t.with_timezone(&Utc));
        }
        if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&t));
        }
        s.parse::<f64>().ok().and_then(from_epoch_seconds)
    }

    fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
        let whole = secs.trunc() as i64;
        let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
        DateTime::from_timestamp(whole, nanos.min(999_999_999))
    }
}
