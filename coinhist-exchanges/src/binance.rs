//! Binance spot klines for `BTCUSDT`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinhist_core::{
    BucketReader, CoinhistError, ExchangeConnector, GatewayConfig, Granularity, IntervalToken,
    PricePoint, ResolvePolicy, TimeRange, decode_json, newest_first,
};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::adapter::{HttpTransport, endpoint, fetch_ok, validate_base};

const NAME: &str = "binance";
const SYMBOL: &str = "BTCUSDT";
const OPEN_IDX: usize = 1;

/// Largest `limit` Binance accepts for klines.
pub const MAX_BUCKETS: u32 = 1000;

/// Bucket width per supported token.
pub const GRANULARITIES: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
    (IntervalToken::Week, Granularity::SIX_HOURS),
    (IntervalToken::Day, Granularity::FIFTEEN_MINUTES),
];

/// Connector for `/api/v3/klines`.
pub struct BinanceConnector {
    transport: Arc<dyn HttpTransport>,
    base: String,
}

impl BinanceConnector {
    /// Build against `base`, e.g. `https://api.binance.com`.
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
        Self::new(transport, &cfg.endpoints.binance)
    }

    fn klines_url(
        &self,
        granularity: Granularity,
        range: &TimeRange,
    ) -> Result<Url, CoinhistError> {
        endpoint(
            NAME,
            &self.base,
            "api/v3/klines",
            &[
                ("symbol", SYMBOL.to_string()),
                ("interval", granularity.compact()),
                ("startTime", range.start.timestamp_millis().to_string()),
                ("endTime", range.end.timestamp_millis().to_string()),
                ("limit", MAX_BUCKETS.to_string()),
            ],
        )
    }
}

/// Decode a klines body into price points (open price), newest first.
///
/// Open times arrive in milliseconds and are truncated to seconds.
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
            Ok(PricePoint::new(
                r.i64_at(0)?.div_euclid(1000),
                r.decimal_at(OPEN_IDX)?,
            ))
        })
        .collect::<Result<Vec<_>, CoinhistError>>()?;
    newest_first(&mut out);
    Ok(out)
}

fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        msg: String,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|e| e.msg)
        .filter(|m| !m.is_empty())
}

#[async_trait]
impl ExchangeConnector for BinanceConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Binance"
    }

    fn granularities(&self) -> &'static [(IntervalToken, Granularity)] {
        GRANULARITIES
    }

    fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy::single().capped(MAX_BUCKETS)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinhist_exchanges::binance::history", skip(self))
    )]
    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        let plan = self.resolve(token, now)?;
        let mut out = Vec::new();
        for range in &plan.ranges {
            let url = self.klines_url(plan.granularity, range)?;
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

    const SAMPLE: &[u8] = br#"[
        [1615680000000,"59000.10","61000.00","58000.00","60000.00","1200.5",1615766399999,"0",100,"0","0","0"],
        [1615766400000,"60000.00","61500.00","59000.00","58500.00","900.0",1615852799999,"0",90,"0","0","0"]
    ]"#;

    #[test]
    fn decodes_milliseconds_and_string_prices() {
        let pts = decode_buckets(SAMPLE).unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].timestamp, 1_615_766_400);
        assert_eq!(pts[1].timestamp, 1_615_680_000);
        assert_eq!(pts[1].price, Decimal::from_str("59000.10").unwrap());
    }

    #[test]
    fn error_body_msg_is_extracted() {
        assert_eq!(
            error_message(br#"{"code":-1121,"msg":"Invalid symbol."}"#).as_deref(),
            Some("Invalid symbol.")
        );
    }

    #[tokio::test]
    async fn week_requests_six_hour_klines_in_one_call() {
        let transport = <dyn HttpTransport>::from_fn(|url| {
            let q: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            assert!(q.contains(&("symbol".into(), "BTCUSDT".into())));
            assert!(q.contains(&("interval".into(), "6h".into())));
            assert!(q.contains(&("limit".into(), "1000".into())));
            assert!(q.contains(&("startTime".into(), "1615161600000".into())));
            Ok(RawResponse::ok(SAMPLE))
        });
        let c = BinanceConnector::new(transport, "http://binance.test").unwrap();
        let now = Utc.with_ymd_and_hms(2021, 3, 15, 0, 0, 0).unwrap();
        let pts = c.history(IntervalToken::Week, now).await.unwrap();
        assert_eq!(pts.len(), 2);
    }
}
