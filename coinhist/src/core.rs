use std::collections::HashSet;
use std::sync::Arc;

use coinhist_core::{CoinhistError, ExchangeConnector};
use coinhist_types::ExchangeKey;

/// Routes history requests to the connector registered under the requested exchange name.
pub struct Gateway {
    pub(crate) connectors: Vec<Arc<dyn ExchangeConnector>>,
}

/// Builder for a [`Gateway`].
pub struct GatewayBuilder {
    connectors: Vec<Arc<dyn ExchangeConnector>>,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayBuilder {
    /// Start with an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connectors: Vec::new(),
        }
    }

    /// Register a connector. Registration order is the order `exchanges()` reports.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn ExchangeConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Register several connectors at once.
    #[must_use]
    pub fn with_connectors<I>(mut self, cs: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ExchangeConnector>>,
    {
        self.connectors.extend(cs);
        self
    }

    /// Build the gateway.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors were registered or two share a name
    /// (names are compared case-insensitively, matching request routing).
    pub fn build(self) -> Result<Gateway, CoinhistError> {
        if self.connectors.is_empty() {
            return Err(CoinhistError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for c in &self.connectors {
            if !seen.insert(c.name().to_ascii_lowercase()) {
                return Err(CoinhistError::InvalidArg(format!(
                    "exchange {} registered twice",
                    c.name()
                )));
            }
        }
        Ok(Gateway {
            connectors: self.connectors,
        })
    }
}

/// Attribute an error coming out of `exchange`'s connector.
///
/// Client-side and already-attributed errors pass through; anything else
/// becomes an upstream failure of that exchange.
pub fn tag_err(exchange: &str, e: CoinhistError) -> CoinhistError {
    match e {
        e @ (CoinhistError::InvalidInterval { .. }
        | CoinhistError::UnknownExchange { .. }
        | CoinhistError::Upstream { .. }
        | CoinhistError::Decode { .. }) => e,
        other => CoinhistError::upstream(exchange, other.to_string()),
    }
}

impl Gateway {
    /// Start building a new `Gateway`.
    ///
    /// ```rust,ignore
    /// let gw = coinhist::Gateway::builder()
    ///     .with_connectors(coinhist_exchanges::connectors_from_config(&cfg)?)
    ///     .build()?;
    /// let series = gw.history("kraken", "MONTH").await?;
    /// ```
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Connector registered under `exchange` (case-insensitive).
    ///
    /// # Errors
    /// `UnknownExchange` when nothing is registered under that name.
    pub fn connector(&self, exchange: &str) -> Result<Arc<dyn ExchangeConnector>, CoinhistError> {
        self.connectors
            .iter()
            .find(|c| ExchangeKey::new(c.name()).matches(exchange))
            .cloned()
            .ok_or_else(|| CoinhistError::unknown_exchange(exchange.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_err_keeps_attributed_errors() {
        let e = CoinhistError::decode("kraken", "EOF");
        assert_eq!(tag_err("gdax", e.clone()), e);
        let v = CoinhistError::invalid_interval("HOUR", "index");
        assert_eq!(tag_err("index", v.clone()), v);
    }

    #[test]
    fn tag_err_wraps_the_rest() {
        let e = tag_err("binance", CoinhistError::Other("socket closed".into()));
        assert_eq!(
            e,
            CoinhistError::upstream("binance", "unknown error: socket closed")
        );
        let e = tag_err("binance", CoinhistError::InvalidArg("bad url".into()));
        assert!(!e.is_validation());
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(matches!(
            Gateway::builder().build(),
            Err(CoinhistError::InvalidArg(_))
        ));
    }
}
