//! Pair a filing date with an observed closing price.

use crate::error::{Result, ValuationError};
use chrono::{Duration, NaiveDate};
use dcf_data::{PriceHistory, PricePoint, parse_date};
use tracing::debug;

/// Find a close within `window_days` calendar days of `date`.
///
/// Offsets are scanned from `-window_days` up to `+window_days` and the first
/// date with an observation wins, so the earliest date in the window is
/// returned rather than the nearest one.
pub fn match_price(history: &PriceHistory, date: NaiveDate, window_days: u32) -> Result<PricePoint> {
    let window = i64::from(window_days);

    for offset in -window..=window {
        let Some(day) = date.checked_add_signed(Duration::days(offset)) else {
            continue;
        };
        if let Some(point) = history.on(day) {
            debug!(%date, matched = %point.date, close = point.close, offset, "matched price");
            return Ok(*point);
        }
    }

    Err(ValuationError::NoPriceInWindow { date, window_days })
}

/// [`match_price`] for a `YYYY-MM-DD` reference date.
pub fn match_price_str(history: &PriceHistory, date: &str, window_days: u32) -> Result<PricePoint> {
    let date = parse_date(date).map_err(|_| ValuationError::InvalidDate {
        value: date.to_string(),
    })?;
    match_price(history, date, window_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn history(points: &[(&str, f64)]) -> PriceHistory {
        PriceHistory::new(points.iter().map(|(d, c)| PricePoint::new(day(d), *c)).collect())
    }

    #[rstest]
    #[case("2023-09-30")]
    #[case("2023-09-21")]
    #[case("2023-10-10")]
    #[case("2023-09-20")]
    fn test_single_entry_inside_window(#[case] on: &str) {
        let prices = history(&[(on, 171.21)]);
        let matched = match_price(&prices, day("2023-09-30"), 10).unwrap();
        assert_eq!(matched, PricePoint::new(day(on), 171.21));
    }

    #[test]
    fn test_empty_series() {
        let result = match_price(&PriceHistory::default(), day("2023-09-30"), 10);
        assert_eq!(
            result,
            Err(ValuationError::NoPriceInWindow {
                date: day("2023-09-30"),
                window_days: 10,
            })
        );
    }

    #[rstest]
    #[case("2023-09-19")]
    #[case("2023-10-11")]
    fn test_entry_outside_window(#[case] on: &str) {
        let prices = history(&[(on, 100.0)]);
        let result = match_price(&prices, day("2023-09-30"), 10);
        assert!(matches!(result, Err(ValuationError::NoPriceInWindow { .. })));
    }

    #[test]
    fn test_earliest_in_window_wins() {
        let prices = history(&[
            ("2023-09-25", 1.0),
            ("2023-09-29", 2.0),
            ("2023-10-02", 3.0),
        ]);
        let matched = match_price(&prices, day("2023-09-30"), 10).unwrap();
        assert_eq!(matched.close, 1.0);

        let matched = match_price(&prices, day("2023-09-30"), 1).unwrap();
        assert_eq!(matched.close, 2.0);
    }

    #[test]
    fn test_zero_window_requires_exact_date() {
        let prices = history(&[("2023-09-29", 2.0)]);
        assert!(match_price(&prices, day("2023-09-30"), 0).is_err());
        assert!(match_price(&prices, day("2023-09-29"), 0).is_ok());
    }

    #[test]
    fn test_string_date() {
        let prices = history(&[("2023-11-03", 176.65)]);
        let matched = match_price_str(&prices, "2023-11-03 00:00:00", 10).unwrap();
        assert_eq!(matched.close, 176.65);

        assert_eq!(
            match_price_str(&prices, "03/11/2023", 10),
            Err(ValuationError::InvalidDate {
                value: "03/11/2023".to_string()
            })
        );
    }
}
