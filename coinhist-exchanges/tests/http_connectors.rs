use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use coinhist_core::{
    CoinhistError, ExchangeConnector, ExchangeEndpoints, GatewayConfig, IntervalToken,
    is_newest_first,
};
use coinhist_exchanges::{
    BinanceConnector, CoindeskConnector, GdaxConnector, HttpTransport, KrakenConnector,
    QuandlConnector, QuandlDataset, ReqwestTransport, connectors_from_config,
};
use httpmock::prelude::*;

fn transport() -> Arc<dyn HttpTransport> {
    Arc::new(ReqwestTransport::default())
}

fn mid_march() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 15, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn kraken_success_round_trip() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/0/public/OHLC")
                .query_param("pair", "XXBTZUSD")
                .query_param("interval", "1440");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"error":[],"result":{"XXBTZUSD":[
                        [1615593600,"57000.0","1","1","1","1","1",1],
                        [1615680000,"59000.1","1","1","1","1","1",1]],"last":1615680000}}"#,
                );
        })
        .await;

    let c = KrakenConnector::new(transport(), &server.base_url()).unwrap();
    let pts = c.history(IntervalToken::Month, mid_march()).await.unwrap();

    m.assert_async().await;
    assert_eq!(pts.len(), 2);
    assert_eq!(pts[0].timestamp, 1_615_680_000);
    assert!(is_newest_first(&pts));
}

#[tokio::test]
async fn kraken_error_envelope_is_surfaced_on_non_success() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/0/public/OHLC");
            then.status(503)
                .header("content-type", "application/json")
                .body(r#"{"error":["EService:Unavailable"]}"#);
        })
        .await;

    let c = KrakenConnector::new(transport(), &server.base_url()).unwrap();
    let err = c.history(IntervalToken::Week, mid_march()).await.unwrap_err();

    m.assert_async().await;
    assert_eq!(err, CoinhistError::upstream("kraken", "EService:Unavailable"));
}

#[tokio::test]
async fn gdax_error_body_message_is_surfaced() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/BTC-USD/candles");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"message":"NotFound"}"#);
        })
        .await;

    let c = GdaxConnector::new(transport(), &server.base_url()).unwrap();
    let err = c.history(IntervalToken::Day, mid_march()).await.unwrap_err();

    m.assert_async().await;
    assert_eq!(err, CoinhistError::upstream("gdax", "NotFound"));
}

#[tokio::test]
async fn binance_error_body_message_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(400)
                .body(r#"{"code":-1121,"msg":"Invalid symbol."}"#);
        })
        .await;

    let c = BinanceConnector::new(transport(), &server.base_url()).unwrap();
    let err = c.history(IntervalToken::Year, mid_march()).await.unwrap_err();
    assert_eq!(err.to_string(), "binance failed: Invalid symbol.");
}

#[tokio::test]
async fn quandl_error_body_message_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/datasets/BITFINEX/BTCUSD.json");
            then.status(400).body(
                r#"{"quandl_error":{"code":"QEPx04","message":"You do not have permission to view this dataset."}}"#,
            );
        })
        .await;

    let c = QuandlConnector::new(QuandlDataset::BITFINEX, transport(), &server.base_url(), None)
        .unwrap();
    let err = c.history(IntervalToken::TwoYear, mid_march()).await.unwrap_err();
    assert_eq!(
        err,
        CoinhistError::upstream("bitfinex", "You do not have permission to view this dataset.")
    );
}

#[tokio::test]
async fn truncated_body_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/bpi/historical/open.json");
            then.status(200).body(r#"{"bpi":{"2021-03-14":59000.12,"2021-03-1"#);
        })
        .await;

    let c = CoindeskConnector::new(transport(), &server.base_url()).unwrap();
    let err = c.history(IntervalToken::Month, mid_march()).await.unwrap_err();
    assert!(matches!(err, CoinhistError::Decode { ref exchange, .. } if exchange == "index"));
}

#[tokio::test]
async fn invalid_token_never_reaches_any_exchange() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).body("[]");
        })
        .await;

    let cfg = GatewayConfig {
        endpoints: ExchangeEndpoints::all(&server.base_url()),
        quandl_api_key: Some("k".into()),
        ..GatewayConfig::default()
    };
    for c in connectors_from_config(&cfg).unwrap() {
        let err = c
            .history(IntervalToken::ThirtyMinute, mid_march())
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{}: {err}", c.name());
    }
    m.assert_hits_async(0).await;
}

#[tokio::test]
async fn connection_refused_is_upstream() {
    // Port 9 (discard) is not listening in test environments.
    let c = BinanceConnector::new(transport(), "http://127.0.0.1:9").unwrap();
    let err = c.history(IntervalToken::Day, mid_march()).await.unwrap_err();
    assert!(matches!(err, CoinhistError::Upstream { ref exchange, .. } if exchange == "binance"));
}
