use chrono::{DateTime, TimeDelta, Utc};
use coinhist_core::{
    Granularity, IntervalToken, PricePoint, ResolvePolicy, TimeRange, is_newest_first,
    newest_first, resolve_plan,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn arb_ts() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..2_000_000_000i64).prop_map(|s| DateTime::from_timestamp(s, 0).unwrap())
}

fn arb_token() -> impl Strategy<Value = IntervalToken> {
    proptest::sample::select(IntervalToken::ALL.to_vec())
}

fn arb_granularity() -> impl Strategy<Value = Granularity> {
    proptest::sample::select(vec![
        Granularity::FIVE_MINUTES,
        Granularity::FIFTEEN_MINUTES,
        Granularity::HOUR,
        Granularity::SIX_HOURS,
        Granularity::DAY,
    ])
}

proptest! {
    #[test]
    fn partition_is_contiguous_newest_first_and_capped(
        start in arb_ts(),
        len_secs in 0i64..(3 * 365 * 86_400),
        max_secs in 1i64..(400 * 86_400),
    ) {
        let end = start + TimeDelta::seconds(len_secs);
        let whole = TimeRange::new(start, end).unwrap();
        let max = TimeDelta::seconds(max_secs);
        let parts = whole.partition(max);

        prop_assert!(!parts.is_empty());
        prop_assert_eq!(parts.first().unwrap().end, end);
        prop_assert_eq!(parts.last().unwrap().start, start);
        for w in parts.windows(2) {
            // newer window's start is the older window's end
            prop_assert_eq!(w[0].start, w[1].end);
        }
        for p in &parts {
            prop_assert!(p.span() <= max);
            prop_assert!(p.start <= p.end);
        }
        // only the oldest window may be short
        for p in &parts[..parts.len() - 1] {
            prop_assert_eq!(p.span(), max);
        }
    }

    #[test]
    fn resolved_start_is_strictly_before_now(
        now in arb_ts(),
        token in arb_token(),
        granularity in arb_granularity(),
        cap in proptest::option::of(1u32..2_000),
    ) {
        let table = [(token, granularity)];
        let mut policy = ResolvePolicy::single().rounded(TimeDelta::minutes(5));
        policy.max_buckets_per_request = cap;
        let plan = resolve_plan("prop", &table, policy, token, now).unwrap();

        prop_assert!(plan.start() < plan.end());
        prop_assert!(plan.end() <= now);
        prop_assert_eq!(Some(plan.start()), token.start_before(plan.end()));
        if let Some(cap) = cap {
            let max = TimeDelta::seconds(granularity.as_secs() * i64::from(cap));
            prop_assert!(plan.ranges.iter().all(|r| r.span() <= max));
        } else {
            prop_assert_eq!(plan.ranges.len(), 1);
        }
    }

    #[test]
    fn newest_first_orders_any_series(ts in proptest::collection::vec(-1_000i64..1_000, 0..100)) {
        let mut points: Vec<PricePoint> =
            ts.iter().map(|&t| PricePoint::new(t, Decimal::ONE)).collect();
        newest_first(&mut points);
        prop_assert!(is_newest_first(&points));
        prop_assert_eq!(points.len(), ts.len());
    }
}
