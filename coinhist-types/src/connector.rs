//! Exchange identity types usable across crates.

use core::fmt;

/// Typed key identifying an exchange connector in the gateway registry.
///
/// The inner string doubles as the route segment under `/historical/{exchange}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeKey(pub &'static str);

impl ExchangeKey {
    /// Construct a new typed exchange key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Case-insensitive comparison against a name taken from a request path.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name.trim())
    }
}

impl From<ExchangeKey> for &'static str {
    fn from(k: ExchangeKey) -> Self {
        k.0
    }
}

impl fmt::Display for ExchangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
