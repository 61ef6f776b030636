//! coinhist routes Bitcoin price-history requests to exchange connectors.
//!
//! Overview
//! - Connectors implementing `coinhist_core::ExchangeConnector` are registered
//!   once on a [`Gateway`] and looked up by exchange name per request.
//! - Interval tokens are parsed and checked against the exchange's supported
//!   set before any connector runs, so invalid requests never go upstream.
//! - Every series comes back newest-first regardless of the exchange's own
//!   order.
//! - Failures are one `CoinhistError`; the dispatch layer maps
//!   `ErrorKind::Validation` to a client error and `ErrorKind::Upstream` to a
//!   server error.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coinhist::Gateway;
//!
//! let gw = Gateway::builder()
//!     .with_connectors(coinhist_exchanges::connectors_from_config(&Default::default())?)
//!     .build()?;
//! let month = gw.history("index", "MONTH").await?;
//! ```
#![warn(missing_docs)]

mod core;
mod router;

pub use crate::core::{Gateway, GatewayBuilder, tag_err};
pub use coinhist_core::{
    CoinhistError, ErrorKind, ExchangeConnector, ExchangeInfo, GatewayConfig, IntervalToken,
    PricePoint,
};
