use std::sync::Arc;

use coinhist::Gateway;
use coinhist_mock::{INTRADAY, MockConnector};

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> chrono::DateTime<chrono::Utc> {
    use chrono::TimeZone;
    chrono::Utc
        .with_ymd_and_hms(y, m, d, hh, mm, ss)
        .single()
        .expect("valid test datetime")
}

/// A daily-only "index" and a candle-style "kraken" mock.
#[allow(dead_code)]
pub fn two_mocks() -> (Arc<MockConnector>, Arc<MockConnector>) {
    (
        Arc::new(MockConnector::new("index").with_vendor("CoinDesk")),
        Arc::new(
            MockConnector::new("kraken")
                .with_vendor("Kraken")
                .with_granularities(INTRADAY),
        ),
    )
}

/// Gateway over the two mocks, in that order.
#[allow(dead_code)]
pub fn gateway(index: &Arc<MockConnector>, kraken: &Arc<MockConnector>) -> Gateway {
    Gateway::builder()
        .with_connector(index.clone())
        .with_connector(kraken.clone())
        .build()
        .expect("gateway")
}
