use chrono::{DateTime, Utc};
use coinhist_core::{CoinhistError, IntervalToken, PricePoint, newest_first};

use crate::Gateway;
use crate::core::tag_err;

impl Gateway {
    /// Fetch the price series for `interval` from `exchange`, ending now.
    ///
    /// See [`Gateway::history_at`] for the checks applied and the errors returned.
    ///
    /// # Errors
    /// As for [`Gateway::history_at`].
    pub async fn history(
        &self,
        exchange: &str,
        interval: &str,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        self.history_at(exchange, interval, Utc::now()).await
    }

    /// Fetch the price series for `interval` from `exchange`, ending at `now`.
    ///
    /// Checks run in order and the first failure wins: the exchange must be
    /// registered, `interval` must parse as a token, and the exchange must
    /// support that token. Only then is the connector called. The result is
    /// always newest-first.
    ///
    /// # Errors
    /// - `UnknownExchange` for an unregistered exchange.
    /// - `InvalidInterval` for an unknown or unsupported token.
    /// - `Upstream` / `Decode` for failures inside the connector.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinhist::history", skip(self))
    )]
    pub async fn history_at(
        &self,
        exchange: &str,
        interval: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        let connector = self.connector(exchange)?;
        let name = connector.name();
        let token: IntervalToken = interval
            .parse()
            .map_err(|e: coinhist_core::ParseIntervalError| {
                CoinhistError::invalid_interval(e.0, name)
            })?;
        if !connector.supports_interval(token) {
            return Err(CoinhistError::invalid_interval(token.as_str(), name));
        }

        let mut points = match connector.history(token, now).await {
            Ok(p) => p,
            Err(e) => {
                let e = tag_err(name, e);
                #[cfg(feature = "tracing")]
                tracing::warn!(exchange = name, error = %e, "history failed");
                return Err(e);
            }
        };
        newest_first(&mut points);

        #[cfg(feature = "tracing")]
        tracing::info!(exchange = name, token = %token, points = points.len(), "history served");

        Ok(points)
    }
}
