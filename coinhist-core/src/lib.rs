//! coinhist-core
//!
//! Core types, traits, and utilities shared across the coinhist workspace.
//!
//! - `types`: the uniform `PricePoint`, interval tokens, granularities, ranges.
//! - `resolve`: turning a lookback token into concrete time ranges per exchange.
//! - `connector`: the `ExchangeConnector` trait every exchange adapter implements.
//! - `timeseries`: positional bucket decoding and the newest-first normalizer.
#![warn(missing_docs)]

/// The `ExchangeConnector` trait and discovery metadata.
pub mod connector;
/// Lookback tokens and bucket widths.
pub mod interval;
/// The uniform output record.
pub mod price;
/// Interval resolution: ranges, partitioning, and per-exchange policy.
pub mod resolve;
/// Bucket decoding helpers and series ordering.
pub mod timeseries;
pub mod types;

pub use connector::{ExchangeConnector, ExchangeInfo};
pub use timeseries::bucket::{BucketReader, decimal_from_json, decode_json, parse_day};
pub use timeseries::order::{is_newest_first, newest_first};
pub use types::*;
