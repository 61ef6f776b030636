use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sampled price at one instant, independent of the exchange it came from.
///
/// Serializes as `{"timestamp": <epoch seconds>, "price": "<decimal string>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bucket start in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Sampled price (open, mid, or VWAP depending on the exchange).
    pub price: Decimal,
}

impl PricePoint {
    /// Build a point from epoch seconds and a price.
    #[must_use]
    pub const fn new(timestamp: i64, price: Decimal) -> Self {
        Self { timestamp, price }
    }

    /// The timestamp as a UTC datetime, when representable.
    #[must_use]
    pub fn at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn serializes_price_as_exact_string() {
        let p = PricePoint::new(1_614_556_800, Decimal::from_str("49631.24").unwrap());
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"timestamp":1614556800,"price":"49631.24"}"#);
    }

    #[test]
    fn at_converts_epoch_seconds() {
        let p = PricePoint::new(1_615_680_000, Decimal::ONE);
        assert_eq!(p.at().unwrap().to_rfc3339(), "2021-03-14T00:00:00+00:00");
        assert!(PricePoint::new(i64::MAX, Decimal::ONE).at().is_none());
    }
}
