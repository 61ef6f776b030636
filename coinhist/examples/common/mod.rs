use std::sync::Arc;

use coinhist::{ExchangeConnector, GatewayConfig};

#[must_use]
pub fn get_connectors() -> Vec<Arc<dyn ExchangeConnector>> {
    if std::env::var("COINHIST_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Connectors for CI) ---");
        let index: Arc<dyn ExchangeConnector> =
            Arc::new(coinhist_mock::MockConnector::new("index"));
        let kraken: Arc<dyn ExchangeConnector> = Arc::new(
            coinhist_mock::MockConnector::new("kraken").with_granularities(coinhist_mock::INTRADAY),
        );
        vec![index, kraken]
    } else {
        let cfg = GatewayConfig {
            quandl_api_key: std::env::var("QUANDL_API_KEY").ok(),
            ..GatewayConfig::default()
        };
        coinhist_exchanges::connectors_from_config(&cfg).expect("connectors")
    }
}
