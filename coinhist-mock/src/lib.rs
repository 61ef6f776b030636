//! Deterministic exchange connector for tests and examples.
//!
//! A `MockConnector` validates interval tokens against its own granularity
//! table exactly like a real connector, then returns fixture data or a
//! scripted error without touching the network. Every accepted call is
//! counted so tests can prove that rejected requests never reached it.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinhist_core::{
    CoinhistError, ExchangeConnector, Granularity, IntervalToken, PricePoint,
};

mod fixtures;

pub use fixtures::history::btc_daily;

/// Daily-only tokens, as served by the Quandl and CoinDesk sources.
pub const DAILY: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
];

/// Daily plus `WEEK` and `DAY`, as served by the candle-based exchanges.
pub const INTRADAY: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
    (IntervalToken::Week, Granularity::FIFTEEN_MINUTES),
    (IntervalToken::Day, Granularity::FIVE_MINUTES),
];

/// Instruction for how `history` should answer once the token is accepted.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return these points as-is.
    Return(Vec<PricePoint>),
    /// Fail with this error.
    Fail(CoinhistError),
}

/// Mock connector with a configurable name, token table, and answer.
#[derive(Debug)]
pub struct MockConnector {
    name: &'static str,
    vendor: &'static str,
    granularities: &'static [(IntervalToken, Granularity)],
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockConnector {
    /// Daily-only connector returning [`btc_daily`] (oldest first).
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            vendor: "Mock",
            granularities: DAILY,
            behavior: MockBehavior::Return(btc_daily()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Override the reported vendor.
    #[must_use]
    pub const fn with_vendor(mut self, vendor: &'static str) -> Self {
        self.vendor = vendor;
        self
    }

    /// Override the supported tokens.
    #[must_use]
    pub const fn with_granularities(
        mut self,
        table: &'static [(IntervalToken, Granularity)],
    ) -> Self {
        self.granularities = table;
        self
    }

    /// Answer accepted calls with `points`.
    #[must_use]
    pub fn returning(mut self, points: Vec<PricePoint>) -> Self {
        self.behavior = MockBehavior::Return(points);
        self
    }

    /// Answer accepted calls with `err`.
    #[must_use]
    pub fn failing(mut self, err: CoinhistError) -> Self {
        self.behavior = MockBehavior::Fail(err);
        self
    }

    /// Number of calls that passed token validation.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        self.vendor
    }

    fn granularities(&self) -> &'static [(IntervalToken, Granularity)] {
        self.granularities
    }

    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        self.resolve(token, now)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Return(points) => Ok(points.clone()),
            MockBehavior::Fail(err) => Err(err.clone()),
        }
    }
}
