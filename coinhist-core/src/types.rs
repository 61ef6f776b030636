//! Consolidated re-exports so downstream crates can depend on `coinhist-core` only.

pub use coinhist_types::{CoinhistError, ErrorKind, ExchangeEndpoints, ExchangeKey, GatewayConfig};

pub use crate::interval::{Granularity, IntervalToken, ParseIntervalError};
pub use crate::price::PricePoint;
pub use crate::resolve::{RangePlan, ResolvePolicy, TimeRange, resolve_plan};

pub use chrono::{DateTime, Utc};
pub use rust_decimal::Decimal;
