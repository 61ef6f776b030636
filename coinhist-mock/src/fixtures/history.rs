use std::str::FromStr;

use coinhist_core::PricePoint;
use rust_decimal::Decimal;

/// Three daily BTC/USD opens, oldest first, as an exchange would send them.
pub fn btc_daily() -> Vec<PricePoint> {
    build(&[
        ("2021-03-12", "57229.83"),
        ("2021-03-13", "61195.30"),
        ("2021-03-14", "59000.12"),
    ])
}

fn build(rows: &[(&str, &str)]) -> Vec<PricePoint> {
    rows.iter()
        .map(|(date, price)| {
            PricePoint::new(
                chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc()
                    .timestamp(),
                Decimal::from_str(price).unwrap(),
            )
        })
        .collect()
}
