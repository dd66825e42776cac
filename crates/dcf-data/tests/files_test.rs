//! Loading statement documents and price files from disk.

use chrono::NaiveDate;
use dcf_data::{DataError, JsonFileSource, PriceHistory, StatementSource};
use serde_json::json;
use std::path::{Path, PathBuf};

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn test_demo_statements() {
    let bundle = JsonFileSource::new(demos_dir()).load("aapl").unwrap();

    assert_eq!(bundle.symbol, "AAPL");
    assert_eq!(bundle.filing_date, NaiveDate::from_ymd_opt(2023, 11, 3).unwrap());
    assert_eq!(bundle.current.number("outstandingShares"), Some(15_552_752_000.0));
    assert_eq!(bundle.current.number("beta"), Some(1.29));
    assert_eq!(bundle.prior.number("totalCurrentAssets"), Some(135_405_000_000.0));
}

#[test]
fn test_demo_prices() {
    let prices = PriceHistory::from_csv_path(&demos_dir().join("AAPL.csv")).unwrap();

    assert_eq!(prices.len(), 16);
    let filing = NaiveDate::from_ymd_opt(2023, 11, 3).unwrap();
    assert_eq!(prices.on(filing).map(|p| p.close), Some(176.65));
}

#[test]
fn test_split_files() {
    let dir = std::env::temp_dir().join(format!("dcf_data_split_files_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("MSFTData.json"),
        json!({
            "fillingDate": { "0": "2023-07-27 00:00:00", "1": null },
            "ebitda": { "0": 105140000000.0 },
        })
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.join("MSFTPriorData.json"),
        json!({ "ebitda": { "0": 97843000000.0 } }).to_string(),
    )
    .unwrap();

    let bundle = JsonFileSource::new(&dir).load("msft").unwrap();
    assert_eq!(bundle.filing_date, NaiveDate::from_ymd_opt(2023, 7, 27).unwrap());
    assert_eq!(bundle.prior.number("ebitda"), Some(97_843_000_000.0));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_symbol_files() {
    let result = JsonFileSource::new(demos_dir()).load("NOPE");
    assert!(matches!(result, Err(DataError::MissingData { .. })));
}
