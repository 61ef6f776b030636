//! Coinbase Exchange (formerly GDAX) candles.
//!
//! `GET /products/BTC-USD/candles` returns at most 300 buckets per call as
//! `[time, low, high, open, close, volume]`, newest first. Longer ranges are
//! split and fetched one window at a time.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use coinhist_core::{
    BucketReader, CoinhistError, ExchangeConnector, GatewayConfig, Granularity, IntervalToken,
    PricePoint, ResolvePolicy, TimeRange, decode_json, newest_first,
};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::adapter::{HttpTransport, endpoint, fetch_ok, validate_base};

const NAME: &str = "gdax";
const PRODUCT: &str = "BTC-USD";
const OPEN_IDX: usize = 3;

/// Largest number of candles one request may return.
pub const MAX_BUCKETS: u32 = 300;

/// Bucket width per supported token.
pub const GRANULARITIES: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
    (IntervalToken::Week, Granularity::FIFTEEN_MINUTES),
    (IntervalToken::Day, Granularity::FIVE_MINUTES),
];

/// Connector for the Coinbase Exchange candles endpoint.
pub struct GdaxConnector {
    transport: Arc<dyn HttpTransport>,
    base: String,
}

impl GdaxConnector {
    /// Build against `base`, e.g. `https://api.exchange.coinbase.com`.
    ///
    /// # Errors
    /// `InvalidArg` if `base` is not a URL.
    pub fn new(transport: Arc<dyn HttpTransport>, base: &str) -> Result<Self, CoinhistError> {
        Ok(Self {
            transport,
            base: validate_base(NAME, base)?,
        })
    }

    /// Build from the gateway configuration.
    ///
    /// # Errors
    /// `InvalidArg` if the configured base URL is not a URL.
    pub fn from_config(
        transport: Arc<dyn HttpTransport>,
        cfg: &GatewayConfig,
    ) -> Result<Self, CoinhistError> {
        Self::new(transport, &cfg.endpoints.gdax)
    }

    fn candles_url(
        &self,
        granularity: Granularity,
        range: &TimeRange,
        after_boundary: bool,
    ) -> Result<Url, CoinhistError> {
        // Coinbase treats both bounds as inclusive; the older window already owns the boundary.
        let start = if after_boundary {
            range.start + TimeDelta::seconds(1)
        } else {
            range.start
        };
        endpoint(
            NAME,
            &self.base,
            &format!("products/{PRODUCT}/candles"),
            &[
                ("granularity", granularity.as_secs().to_string()),
                ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("end", range.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ],
        )
    }
}

/// Decode one candles body into price points (open price), newest first.
///
/// # Errors
/// `Decode` for malformed JSON or short rows.
pub fn decode_buckets(body: &[u8]) -> Result<Vec<PricePoint>, CoinhistError> {
    let rows: Vec<Value> = decode_json(NAME, body)?;
    let mut out = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let r = BucketReader::new(NAME, i, row)?;
            Ok(PricePoint::new(r.i64_at(0)?, r.decimal_at(OPEN_IDX)?))
        })
        .collect::<Result<Vec<_>, CoinhistError>>()?;
    newest_first(&mut out);
    Ok(out)
}

fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
}

#[async_trait]
impl ExchangeConnector for GdaxConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Coinbase"
    }

    fn granularities(&self) -> &'static [(IntervalToken, Granularity)] {
        GRANULARITIES
    }

    fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy::single()
            .rounded(TimeDelta::minutes(5))
            .capped(MAX_BUCKETS)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinhist_exchanges::gdax::history", skip(self))
    )]
    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        let plan = self.resolve(token, now)?;
        let oldest = plan.start();
        let mut out = Vec::new();
        for range in &plan.ranges {
            let url = self.candles_url(plan.granularity, range, range.start > oldest)?;
            let body = fetch_ok(self.transport.as_ref(), NAME, url, error_message).await?;
            out.extend(decode_buckets(&body)?);
        }
        newest_first(&mut out);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::RawResponse;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    #[test]
    fn decodes_open_from_index_three() {
        let body = br#"[[1615766400, 55000.1, 61000.5, 60000.25, 59000, 1200.5],
                        [1615680000, 57000, 61500, 58000.75, 60000.25, 900]]"#;
        let pts = decode_buckets(body).unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].timestamp, 1_615_766_400);
        assert_eq!(pts[0].price, Decimal::from_str("60000.25").unwrap());
        assert_eq!(pts[1].price, Decimal::from_str("58000.75").unwrap());
    }

    #[test]
    fn error_body_message_is_extracted() {
        assert_eq!(
            error_message(br#"{"message":"NotFound"}"#).as_deref(),
            Some("NotFound")
        );
        assert_eq!(error_message(b"<html>"), None);
    }

    #[tokio::test]
    async fn week_is_fetched_in_three_windows_newest_first() {
        let seen = Arc::new(Mutex::new(Vec::<Url>::new()));
        let log = Arc::clone(&seen);
        let transport = <dyn HttpTransport>::from_fn(move |url| {
            log.lock().unwrap().push(url.clone());
            let end = url
                .query_pairs()
                .find(|(k, _)| k == "end")
                .map(|(_, v)| DateTime::parse_from_rfc3339(&v).unwrap().timestamp())
                .unwrap();
            Ok(RawResponse::ok(format!("[[{}, 1, 2, 3, 4, 5]]", end - 900)))
        });
        let c = GdaxConnector::new(transport, "http://gdax.test").unwrap();
        let now = Utc.with_ymd_and_hms(2021, 3, 15, 0, 2, 30).unwrap();

        let pts = c.history(IntervalToken::Week, now).await.unwrap();

        let urls = seen.lock().unwrap();
        assert_eq!(urls.len(), 3);
        let q = |u: &Url, key: &str| {
            u.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .unwrap()
        };
        assert_eq!(q(&urls[0], "granularity"), "900");
        assert_eq!(q(&urls[0], "end"), "2021-03-15T00:00:00Z");
        assert_eq!(q(&urls[0], "start"), "2021-03-11T21:00:01Z");
        assert_eq!(q(&urls[1], "end"), "2021-03-11T21:00:00Z");
        assert_eq!(q(&urls[1], "start"), "2021-03-08T18:00:01Z");
        assert_eq!(q(&urls[2], "end"), "2021-03-08T18:00:00Z");
        assert_eq!(q(&urls[2], "start"), "2021-03-08T00:00:00Z");
        assert_eq!(pts.len(), 3);
        assert!(coinhist_core::is_newest_first(&pts));
    }

    #[tokio::test]
    async fn unsupported_token_makes_no_request() {
        let transport = <dyn HttpTransport>::from_fn(|_| panic!("no request expected"));
        let c = GdaxConnector::new(transport, "http://gdax.test").unwrap();
        let err = c
            .history(IntervalToken::Hour, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, CoinhistError::invalid_interval("HOUR", "gdax"));
    }
}
