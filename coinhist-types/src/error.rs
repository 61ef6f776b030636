use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification used by the dispatch layer to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The client asked for something the gateway cannot serve (bad token, unknown exchange).
    Validation,
    /// The exchange could not be reached, refused the request, or returned an unreadable body.
    Upstream,
}

/// Unified error type for the coinhist workspace.
///
/// Validation failures never reach the network; upstream failures abort the
/// whole request and carry the exchange name plus the most specific message
/// available (the exchange's own error text when its error body decodes).
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoinhistError {
    /// The interval token is unknown or not supported by the target exchange.
    #[error("Please provide a valid interval; {token} is invalid")]
    InvalidInterval {
        /// The token as received from the client (upper-cased when parsable).
        token: String,
        /// Exchange the token was checked against.
        exchange: String,
    },

    /// No connector is registered under the requested exchange name.
    #[error("unknown exchange: {name}")]
    UnknownExchange {
        /// Name taken from the request.
        name: String,
    },

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Network failure or non-success status from an exchange.
    #[error("{exchange} failed: {msg}")]
    Upstream {
        /// Exchange name that failed.
        exchange: String,
        /// Human-readable error message, preferably the exchange's own.
        msg: String,
    },

    /// The exchange answered but its body could not be decoded.
    #[error("{exchange} returned an unreadable response: {msg}")]
    Decode {
        /// Exchange name whose body failed to decode.
        exchange: String,
        /// Decoder message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CoinhistError {
    /// Helper: build an `InvalidInterval` error.
    pub fn invalid_interval(token: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self::InvalidInterval {
            token: token.into(),
            exchange: exchange.into(),
        }
    }

    /// Helper: build an `UnknownExchange` error.
    pub fn unknown_exchange(name: impl Into<String>) -> Self {
        Self::UnknownExchange { name: name.into() }
    }

    /// Helper: build an `Upstream` error with the exchange name and message.
    pub fn upstream(exchange: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            exchange: exchange.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Decode` error with the exchange name and decoder message.
    pub fn decode(exchange: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            exchange: exchange.into(),
            msg: msg.into(),
        }
    }

    /// Which of the two error kinds this is.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInterval { .. } | Self::UnknownExchange { .. } | Self::InvalidArg(_) => {
                ErrorKind::Validation
            }
            Self::Upstream { .. } | Self::Decode { .. } | Self::Other(_) => ErrorKind::Upstream,
        }
    }

    /// Returns true for client-side mistakes that never reached an exchange.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }
}
