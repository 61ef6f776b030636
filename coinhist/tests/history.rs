mod helpers;

use std::sync::Arc;

use coinhist::{CoinhistError, ErrorKind, Gateway};
use coinhist_core::is_newest_first;
use coinhist_mock::{MockConnector, btc_daily};
use helpers::{dt, gateway, two_mocks};

#[tokio::test]
async fn ascending_fixture_comes_back_newest_first() {
    let (index, kraken) = two_mocks();
    let gw = gateway(&index, &kraken);

    let pts = gw
        .history_at("index", "MONTH", dt(2021, 3, 15, 0, 0, 0))
        .await
        .unwrap();

    let mut expected = btc_daily();
    expected.reverse();
    assert_eq!(pts, expected);
    assert!(is_newest_first(&pts));
    assert_eq!(index.calls(), 1);
    assert_eq!(kraken.calls(), 0);
}

#[tokio::test]
async fn exchange_and_token_match_loosely() {
    let (index, kraken) = two_mocks();
    let gw = gateway(&index, &kraken);
    let pts = gw
        .history_at("Kraken", "week", dt(2021, 3, 15, 0, 0, 0))
        .await
        .unwrap();
    assert_eq!(pts.len(), 3);
    assert_eq!(kraken.calls(), 1);
}

#[tokio::test]
async fn unknown_exchange_is_checked_first() {
    let (index, kraken) = two_mocks();
    let gw = gateway(&index, &kraken);
    let err = gw.history("mtgox", "FORTNIGHT").await.unwrap_err();
    assert_eq!(err, CoinhistError::unknown_exchange("mtgox"));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn unparsable_token_never_reaches_the_connector() {
    let (index, kraken) = two_mocks();
    let gw = gateway(&index, &kraken);
    let err = gw.history("kraken", "fortnight").await.unwrap_err();
    assert_eq!(err, CoinhistError::invalid_interval("FORTNIGHT", "kraken"));
    assert_eq!(
        err.to_string(),
        "Please provide a valid interval; FORTNIGHT is invalid"
    );
    assert_eq!(kraken.calls(), 0);
}

#[tokio::test]
async fn unsupported_token_never_reaches_the_connector() {
    let (index, kraken) = two_mocks();
    let gw = gateway(&index, &kraken);
    for token in ["WEEK", "DAY", "HOUR", "THIRTYMINUTE"] {
        let err = gw.history("index", token).await.unwrap_err();
        assert!(err.is_validation(), "{token}");
    }
    assert_eq!(index.calls(), 0);
}

#[tokio::test]
async fn upstream_failures_propagate_unchanged() {
    let failing = Arc::new(
        MockConnector::new("bitstamp").failing(CoinhistError::upstream("bitstamp", "QECx02")),
    );
    let gw = Gateway::builder()
        .with_connector(failing.clone())
        .build()
        .unwrap();
    let err = gw.history("bitstamp", "YEAR").await.unwrap_err();
    assert_eq!(err, CoinhistError::upstream("bitstamp", "QECx02"));
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert_eq!(failing.calls(), 1);
}

#[tokio::test]
async fn opaque_connector_errors_are_attributed() {
    let failing =
        Arc::new(MockConnector::new("gdax").failing(CoinhistError::Other("reset".into())));
    let gw = Gateway::builder().with_connector(failing).build().unwrap();
    let err = gw.history("gdax", "MONTH").await.unwrap_err();
    assert!(matches!(err, CoinhistError::Upstream { ref exchange, .. } if exchange == "gdax"));
}
