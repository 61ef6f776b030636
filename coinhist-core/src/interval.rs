use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbolic lookback duration requested by a client.
///
/// Tokens are ordered from the longest lookback to the shortest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntervalToken {
    /// Two calendar years.
    TwoYear,
    /// One calendar year.
    Year,
    /// Six calendar months.
    SixMonth,
    /// Three calendar months.
    ThreeMonth,
    /// One calendar month.
    Month,
    /// Seven days.
    Week,
    /// One day.
    Day,
    /// Twelve hours.
    TwelveHour,
    /// Six hours.
    SixHour,
    /// One hour.
    Hour,
    /// Thirty minutes.
    ThirtyMinute,
}

/// How far back a token reaches from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// Calendar months; day-of-month is clamped to the target month's length.
    Months(u32),
    /// A fixed duration.
    Fixed(TimeDelta),
}

impl IntervalToken {
    /// Every token, longest lookback first.
    pub const ALL: [Self; 11] = [
        Self::TwoYear,
        Self::Year,
        Self::SixMonth,
        Self::ThreeMonth,
        Self::Month,
        Self::Week,
        Self::Day,
        Self::TwelveHour,
        Self::SixHour,
        Self::Hour,
        Self::ThirtyMinute,
    ];

    /// Stable wire identifier, e.g. `"SIXMONTH"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoYear => "TWOYEAR",
            Self::Year => "YEAR",
            Self::SixMonth => "SIXMONTH",
            Self::ThreeMonth => "THREEMONTH",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
            Self::Day => "DAY",
            Self::TwelveHour => "TWELVEHOUR",
            Self::SixHour => "SIXHOUR",
            Self::Hour => "HOUR",
            Self::ThirtyMinute => "THIRTYMINUTE",
        }
    }

    /// Calendar offset this token stands for.
    #[must_use]
    pub fn lookback(self) -> Lookback {
        match self {
            Self::TwoYear => Lookback::Months(24),
            Self::Year => Lookback::Months(12),
            Self::SixMonth => Lookback::Months(6),
            Self::ThreeMonth => Lookback::Months(3),
            Self::Month => Lookback::Months(1),
            Self::Week => Lookback::Fixed(TimeDelta::days(7)),
            Self::Day => Lookback::Fixed(TimeDelta::days(1)),
            Self::TwelveHour => Lookback::Fixed(TimeDelta::hours(12)),
            Self::SixHour => Lookback::Fixed(TimeDelta::hours(6)),
            Self::Hour => Lookback::Fixed(TimeDelta::hours(1)),
            Self::ThirtyMinute => Lookback::Fixed(TimeDelta::minutes(30)),
        }
    }

    /// The instant one lookback before `end`, or `None` if it falls outside chrono's range.
    #[must_use]
    pub fn start_before(self, end: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.lookback() {
            Lookback::Months(m) => end.checked_sub_months(Months::new(m)),
            Lookback::Fixed(d) => end.checked_sub_signed(d),
        }
    }
}

impl fmt::Display for IntervalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input did not name a known lookback token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interval token: {0}")]
pub struct ParseIntervalError(pub String);

impl FromStr for IntervalToken {
    type Err = ParseIntervalError;

    /// Case-insensitive; `-`, `_` and spaces are ignored so `two-year` parses as `TWOYEAR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == folded)
            .ok_or_else(|| ParseIntervalError(s.trim().to_ascii_uppercase()))
    }
}

/// Width of one exchange-native bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Granularity(i64);

impl Granularity {
    /// Five minutes.
    pub const FIVE_MINUTES: Self = Self(300);
    /// Fifteen minutes.
    pub const FIFTEEN_MINUTES: Self = Self(900);
    /// One hour.
    pub const HOUR: Self = Self(3_600);
    /// Six hours.
    pub const SIX_HOURS: Self = Self(21_600);
    /// One day.
    pub const DAY: Self = Self(86_400);

    /// Build from a positive number of seconds.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Option<Self> {
        if secs > 0 { Some(Self(secs)) } else { None }
    }

    /// Width in seconds.
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Width in whole minutes (truncated).
    #[must_use]
    pub const fn as_minutes(self) -> i64 {
        self.0 / 60
    }

    /// Width as a chrono duration.
    #[must_use]
    pub fn span(self) -> TimeDelta {
        TimeDelta::seconds(self.0)
    }

    /// Compact label in the largest whole unit: `1d`, `6h`, `15m`, `45s`.
    #[must_use]
    pub fn compact(self) -> String {
        let s = self.0;
        if s % 86_400 == 0 {
            format!("{}d", s / 86_400)
        } else if s % 3_600 == 0 {
            format!("{}h", s / 3_600)
        } else if s % 60 == 0 {
            format!("{}m", s / 60)
        } else {
            format!("{s}s")
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact())
    }
}
