//! Helpers for hand-decoding exchange rows.
//!
//! Exchanges return buckets as untyped JSON arrays mixing numbers and numeric
//! strings, with the open price at a different index per exchange. These
//! helpers read one field at a time and turn every mismatch into a
//! `CoinhistError::Decode` naming the exchange, row, and index.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::CoinhistError;

/// Deserialize a response body, mapping failures to `Decode`.
///
/// # Errors
/// Returns `CoinhistError::Decode` for malformed or truncated JSON.
pub fn decode_json<T: DeserializeOwned>(exchange: &str, body: &[u8]) -> Result<T, CoinhistError> {
    serde_json::from_slice(body).map_err(|e| CoinhistError::decode(exchange, e.to_string()))
}

/// Exact decimal from a JSON number or numeric string.
///
/// Numbers go through their shortest textual form so `59000.12` stays exact.
#[must_use]
pub fn decimal_from_json(v: &Value) -> Option<Decimal> {
    let text = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Midnight UTC of a `YYYY-MM-DD` date, as epoch seconds.
#[must_use]
pub fn parse_day(s: &str) -> Option<i64> {
    let d = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
    Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

/// Positional view over one bucket.
#[derive(Debug, Clone, Copy)]
pub struct BucketReader<'a> {
    exchange: &'a str,
    row: usize,
    fields: &'a [Value],
}

impl<'a> BucketReader<'a> {
    /// View `value` as a bucket; it must be a JSON array.
    ///
    /// # Errors
    /// `Decode` if `value` is not an array.
    pub fn new(exchange: &'a str, row: usize, value: &'a Value) -> Result<Self, CoinhistError> {
        match value {
            Value::Array(fields) => Ok(Self::from_fields(exchange, row, fields)),
            other => Err(CoinhistError::decode(
                exchange,
                format!("row {row}: expected an array, got {}", kind_of(other)),
            )),
        }
    }

    /// View an already-split row.
    #[must_use]
    pub const fn from_fields(exchange: &'a str, row: usize, fields: &'a [Value]) -> Self {
        Self {
            exchange,
            row,
            fields,
        }
    }

    /// Number of fields in the row.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for an empty row.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw field at `idx`.
    ///
    /// # Errors
    /// `Decode` if the row is too short.
    pub fn field(&self, idx: usize) -> Result<&'a Value, CoinhistError> {
        self.fields.get(idx).ok_or_else(|| {
            self.error(
                idx,
                format!("row has {} fields", self.fields.len()),
            )
        })
    }

    /// Integer at `idx`; accepts integral numbers and numeric strings.
    ///
    /// # Errors
    /// `Decode` if missing or not an integer.
    pub fn i64_at(&self, idx: usize) -> Result<i64, CoinhistError> {
        let v = self.field(idx)?;
        let parsed = match v {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.error(idx, format!("expected an integer, got {}", kind_of(v))))
    }

    /// Decimal at `idx`; accepts numbers and numeric strings.
    ///
    /// # Errors
    /// `Decode` if missing, null, or not numeric.
    pub fn decimal_at(&self, idx: usize) -> Result<Decimal, CoinhistError> {
        let v = self.field(idx)?;
        decimal_from_json(v)
            .ok_or_else(|| self.error(idx, format!("expected a price, got {}", kind_of(v))))
    }

    /// String at `idx`.
    ///
    /// # Errors
    /// `Decode` if missing or not a string.
    pub fn str_at(&self, idx: usize) -> Result<&'a str, CoinhistError> {
        let v = self.field(idx)?;
        v.as_str()
            .ok_or_else(|| self.error(idx, format!("expected a string, got {}", kind_of(v))))
    }

    /// `YYYY-MM-DD` at `idx`, as midnight UTC epoch seconds.
    ///
    /// # Errors
    /// `Decode` if missing or not a date.
    pub fn day_at(&self, idx: usize) -> Result<i64, CoinhistError> {
        let s = self.str_at(idx)?;
        parse_day(s).ok_or_else(|| self.error(idx, format!("expected a date, got {s:?}")))
    }

    fn error(&self, idx: usize, what: String) -> CoinhistError {
        CoinhistError::decode(self.exchange, format!("row {} field {idx}: {what}", self.row))
    }
}

const fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
