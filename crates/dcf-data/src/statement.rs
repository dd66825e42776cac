//! Current and prior period statements for one company.

use crate::error::{DataError, Result};
use crate::record::RawStatementRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Record keys that may carry the statement's filing date, in lookup order.
///
/// `fillingDate` is the provider's own spelling.
pub const FILING_DATE_KEYS: &[&str] = &["fillingDate", "filingDate", "date"];

/// Everything the valuation needs from the statement provider for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementBundle {
    /// Ticker symbol (upper case)
    pub symbol: String,
    /// Filing date of the current-period statement
    pub filing_date: NaiveDate,
    /// Current-period record
    pub current: RawStatementRecord,
    /// Prior-period record
    pub prior: RawStatementRecord,
}

impl StatementBundle {
    /// Create a bundle with an explicit filing date.
    pub fn new(
        symbol: &str,
        filing_date: NaiveDate,
        current: RawStatementRecord,
        prior: RawStatementRecord,
    ) -> Result<Self> {
        Ok(Self {
            symbol: normalize_symbol(symbol)?,
            filing_date,
            current,
            prior,
        })
    }

    /// Create a bundle, reading the filing date from the current record.
    pub fn from_records(
        symbol: &str,
        current: RawStatementRecord,
        prior: RawStatementRecord,
    ) -> Result<Self> {
        let symbol = normalize_symbol(symbol)?;
        let raw_date = FILING_DATE_KEYS
            .iter()
            .find_map(|key| current.text(key))
            .ok_or_else(|| DataError::MissingData {
                symbol: symbol.clone(),
                reason: format!("no filing date under any of {FILING_DATE_KEYS:?}"),
            })?;
        let filing_date = parse_date(raw_date)?;

        Ok(Self {
            symbol,
            filing_date,
            current,
            prior,
        })
    }
}

/// Parse a `YYYY-MM-DD` date. A trailing time component after `' '` or `'T'`
/// is ignored; any other trailing text is rejected.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let invalid = || DataError::InvalidDate {
        value: value.to_string(),
    };
    let trimmed = value.trim();
    let (date_part, rest) = match (trimmed.get(..10), trimmed.get(10..)) {
        (Some(date), Some(rest)) => (date, rest),
        _ => (trimmed, ""),
    };
    if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }
    Ok(symbol.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2023-09-30", 2023, 9, 30)]
    #[case("2023-09-30 00:00:00", 2023, 9, 30)]
    #[case("2024-02-29T16:30:00Z", 2024, 2, 29)]
    #[case(" 2022-01-05 ", 2022, 1, 5)]
    fn test_parse_date(#[case] input: &str, #[case] y: i32, #[case] m: u32, #[case] d: u32) {
        assert_eq!(
            parse_date(input).unwrap(),
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("30/09/2023")]
    #[case("2023-13-01")]
    #[case("2023-11-0399")]
    #[case("2023-11-03garbage")]
    #[case("2023-11-031")]
    fn test_parse_date_rejects(#[case] input: &str) {
        assert!(matches!(parse_date(input), Err(DataError::InvalidDate { .. })));
    }

    #[test]
    fn test_from_records_reads_filing_date() {
        let current = RawStatementRecord::default()
            .with("date", "2023-09-30")
            .with("fillingDate", "2023-11-03");
        let bundle =
            StatementBundle::from_records("aapl", current, RawStatementRecord::default()).unwrap();

        assert_eq!(bundle.symbol, "AAPL");
        assert_eq!(
            bundle.filing_date,
            NaiveDate::from_ymd_opt(2023, 11, 3).unwrap()
        );
    }

    #[test]
    fn test_from_records_falls_back_to_date() {
        let current = RawStatementRecord::default().with("date", "2023-09-30");
        let bundle =
            StatementBundle::from_records("MSFT", current, RawStatementRecord::default()).unwrap();
        assert_eq!(
            bundle.filing_date,
            NaiveDate::from_ymd_opt(2023, 9, 30).unwrap()
        );
    }

    #[test]
    fn test_from_records_without_date() {
        let result = StatementBundle::from_records(
            "MSFT",
            RawStatementRecord::default(),
            RawStatementRecord::default(),
        );
        assert!(matches!(result, Err(DataError::MissingData { .. })));
    }

    #[test]
    fn test_empty_symbol() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        let result = StatementBundle::new(
            "  ",
            date,
            RawStatementRecord::default(),
            RawStatementRecord::default(),
        );
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }
}
