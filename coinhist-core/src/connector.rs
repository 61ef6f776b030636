use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoinhistError;
use crate::interval::{Granularity, IntervalToken};
use crate::price::PricePoint;
use crate::resolve::{RangePlan, ResolvePolicy, resolve_plan};
pub use coinhist_types::ExchangeKey;

/// One upstream source of BTC/USD history.
///
/// Implementations are immutable after construction and shared behind `Arc`
/// between requests. Decoding is a pure function of the response body; the
/// connector only owns the transport and the exchange's request shape.
#[async_trait]
pub trait ExchangeConnector: Send + Sync {
    /// Routing name, e.g. `"kraken"`. Must be unique within a gateway.
    fn name(&self) -> &'static str;

    /// Typed key derived from `name()`.
    fn key(&self) -> ExchangeKey {
        ExchangeKey::new(self.name())
    }

    /// Company or service that actually serves the data.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// REQUIRED: the tokens this exchange serves and the bucket width used for each.
    fn granularities(&self) -> &'static [(IntervalToken, Granularity)];

    /// Rounding and request-size limits layered over the calendar math.
    fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy::single()
    }

    /// Supported tokens, longest lookback first.
    fn supported_intervals(&self) -> Vec<IntervalToken> {
        let mut out: Vec<IntervalToken> = self.granularities().iter().map(|(t, _)| *t).collect();
        out.sort_unstable();
        out
    }

    /// Whether `token` is in the supported set.
    fn supports_interval(&self, token: IntervalToken) -> bool {
        self.granularity_for(token).is_some()
    }

    /// Bucket width for `token`, if supported.
    fn granularity_for(&self, token: IntervalToken) -> Option<Granularity> {
        self.granularities()
            .iter()
            .find_map(|&(t, g)| (t == token).then_some(g))
    }

    /// Resolve `token` into the ranges this connector will request.
    ///
    /// # Errors
    /// `InvalidInterval` when the token is not supported.
    fn resolve(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<RangePlan, CoinhistError> {
        resolve_plan(
            self.name(),
            self.granularities(),
            self.resolve_policy(),
            token,
            now,
        )
    }

    /// Fetch the price series for `token` ending at `now`.
    ///
    /// Unsupported tokens fail before any outbound request. Any transport,
    /// status, or decode failure aborts the whole call.
    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError>;

    /// Capability summary for discovery.
    fn info(&self) -> ExchangeInfo {
        ExchangeInfo {
            name: self.name().to_string(),
            vendor: self.vendor().to_string(),
            intervals: self.supported_intervals(),
        }
    }
}

/// What `/exchanges` reports for one connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeInfo {
    /// Routing name.
    pub name: String,
    /// Data vendor.
    pub vendor: String,
    /// Supported tokens, longest lookback first.
    pub intervals: Vec<IntervalToken>,
}
