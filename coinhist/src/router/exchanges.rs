use coinhist_core::{ExchangeInfo, IntervalToken};

use crate::Gateway;

impl Gateway {
    /// Capability summary of every registered exchange, in registration order.
    #[must_use]
    pub fn exchanges(&self) -> Vec<ExchangeInfo> {
        self.connectors.iter().map(|c| c.info()).collect()
    }

    /// Registered exchange names, in registration order.
    #[must_use]
    pub fn exchange_names(&self) -> Vec<&'static str> {
        self.connectors.iter().map(|c| c.name()).collect()
    }

    /// Whether `exchange` is registered and serves `token`.
    #[must_use]
    pub fn supports(&self, exchange: &str, token: IntervalToken) -> bool {
        self.connector(exchange)
            .is_ok_and(|c| c.supports_interval(token))
    }
}
