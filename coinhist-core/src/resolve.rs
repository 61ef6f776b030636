use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::CoinhistError;
use crate::interval::{Granularity, IntervalToken};

/// Half-open window `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting `start > end`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the bounds are inverted.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CoinhistError> {
        if start > end {
            return Err(CoinhistError::InvalidArg(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Length of the window.
    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Split into consecutive windows no longer than `max_span`, newest window first.
    ///
    /// The oldest window is truncated at `start`. A non-positive `max_span` or an
    /// empty range yields the range itself.
    ///
    /// Adjacent windows share a boundary: each window's `start` is the `end` of
    /// the next older one. Callers talking to an API with inclusive bounds must
    /// shift one side themselves.
    #[must_use]
    pub fn partition(&self, max_span: TimeDelta) -> Vec<Self> {
        if max_span <= TimeDelta::zero() || self.start >= self.end {
            return vec![*self];
        }
        let mut out = Vec::new();
        let mut end = self.end;
        while end > self.start {
            let start = end
                .checked_sub_signed(max_span)
                .map_or(self.start, |s| s.max(self.start));
            out.push(Self { start, end });
            end = start;
        }
        out
    }
}

/// Per-exchange knobs applied on top of the shared calendar math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvePolicy {
    /// Truncate "now" to this step before computing the range, so consecutive
    /// requests line up on the same bucket boundaries.
    pub round_now_to: Option<TimeDelta>,
    /// Maximum number of buckets one upstream request may return. Longer
    /// ranges are partitioned.
    pub max_buckets_per_request: Option<u32>,
}

impl ResolvePolicy {
    /// One range ending at the exact current instant.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            round_now_to: None,
            max_buckets_per_request: None,
        }
    }

    /// Truncate "now" to `step` first.
    #[must_use]
    pub const fn rounded(mut self, step: TimeDelta) -> Self {
        self.round_now_to = Some(step);
        self
    }

    /// Partition ranges so no request exceeds `buckets` samples.
    #[must_use]
    pub const fn capped(mut self, buckets: u32) -> Self {
        self.max_buckets_per_request = Some(buckets);
        self
    }
}

/// Outcome of resolving a token for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePlan {
    /// Token the plan was resolved from.
    pub token: IntervalToken,
    /// Bucket width to request.
    pub granularity: Granularity,
    /// Windows to request, newest first. Never empty.
    pub ranges: Vec<TimeRange>,
}

impl RangePlan {
    /// Oldest instant covered by the plan.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.ranges
            .iter()
            .map(|r| r.start)
            .min()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Newest instant covered by the plan.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.ranges
            .iter()
            .map(|r| r.end)
            .max()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whole window as one range.
    #[must_use]
    pub fn full_range(&self) -> TimeRange {
        TimeRange {
            start: self.start(),
            end: self.end(),
        }
    }

    /// True when more than one upstream request is needed.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        self.ranges.len() > 1
    }
}

/// Resolve `token` against an exchange's granularity table and policy.
///
/// # Errors
/// - `InvalidInterval` if `token` has no entry in `table`.
/// - `InvalidArg` if the calendar math leaves chrono's representable range.
pub fn resolve_plan(
    exchange: &str,
    table: &[(IntervalToken, Granularity)],
    policy: ResolvePolicy,
    token: IntervalToken,
    now: DateTime<Utc>,
) -> Result<RangePlan, CoinhistError> {
    let granularity = table
        .iter()
        .find_map(|&(t, g)| (t == token).then_some(g))
        .ok_or_else(|| CoinhistError::invalid_interval(token.as_str(), exchange))?;

    let end = match policy.round_now_to {
        Some(step) => now
            .duration_trunc(step)
            .map_err(|e| CoinhistError::InvalidArg(format!("cannot round {now}: {e}")))?,
        None => now,
    };
    let start = token.start_before(end).ok_or_else(|| {
        CoinhistError::InvalidArg(format!("{token} before {end} is out of range"))
    })?;
    let whole = TimeRange::new(start, end)?;

    let ranges = match policy.max_buckets_per_request {
        Some(cap) => whole.partition(TimeDelta::seconds(
            granularity.as_secs().saturating_mul(i64::from(cap)),
        )),
        None => vec![whole],
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        exchange,
        token = %token,
        granularity = %granularity,
        windows = ranges.len(),
        "resolved interval"
    );

    Ok(RangePlan {
        token,
        granularity,
        ranges,
    })
}
