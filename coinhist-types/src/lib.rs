//! Coinhist-specific error, configuration, and identity types shared by every crate in the workspace.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;

pub use config::{ExchangeEndpoints, GatewayConfig};
pub use connector::ExchangeKey;
pub use error::{CoinhistError, ErrorKind};
