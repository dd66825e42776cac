//! Statement sources.
//!
//! Retrieval from the remote provider (transport, retries, caching) is owned by
//! whatever implements [`StatementSource`]. This crate ships a file-backed
//! source that reads documents the provider client has already written to disk.

use crate::error::{DataError, Result};
use crate::record::RawStatementRecord;
use crate::statement::{StatementBundle, parse_date};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies current and prior period statements for a ticker.
pub trait StatementSource {
    /// Load the statements for `symbol`.
    fn load(&self, symbol: &str) -> Result<StatementBundle>;
}

/// Reads statement documents from a directory.
///
/// For a symbol `AAPL` the source looks for, in order:
///
/// 1. `AAPL.json`, a combined document `{"current": {..}, "prior": {..}}`
///    with an optional top-level `"filingDate"`;
/// 2. `AAPLData.json` and `AAPLPriorData.json`, one record each.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    /// Create a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read a combined statement document from `path`.
    pub fn read_bundle(path: &Path, symbol: &str) -> Result<StatementBundle> {
        debug!(path = %path.display(), symbol, "reading combined statement document");
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::bundle_from_value(value, symbol)
    }

    /// Build a bundle from a combined statement document.
    pub fn bundle_from_value(value: Value, symbol: &str) -> Result<StatementBundle> {
        let Value::Object(mut doc) = value else {
            return Err(DataError::Parse(
                "statement document must be a JSON object".to_string(),
            ));
        };

        let mut take = |key: &str| -> Result<RawStatementRecord> {
            let record = doc.remove(key).ok_or_else(|| DataError::MissingData {
                symbol: symbol.to_string(),
                reason: format!("statement document has no \"{key}\" record"),
            })?;
            RawStatementRecord::from_value(record)
        };
        let current = take("current")?;
        let prior = take("prior")?;

        let symbol = doc
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or(symbol)
            .to_string();

        match doc.get("filingDate").and_then(Value::as_str) {
            Some(date) => StatementBundle::new(&symbol, parse_date(date)?, current, prior),
            None => StatementBundle::from_records(&symbol, current, prior),
        }
    }

    fn combined_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.json"))
    }

    fn split_paths(&self, symbol: &str) -> (PathBuf, PathBuf) {
        (
            self.dir.join(format!("{symbol}Data.json")),
            self.dir.join(format!("{symbol}PriorData.json")),
        )
    }
}

impl StatementSource for JsonFileSource {
    fn load(&self, symbol: &str) -> Result<StatementBundle> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let combined = self.combined_path(&symbol);
        if combined.is_file() {
            return Self::read_bundle(&combined, &symbol);
        }

        let (current_path, prior_path) = self.split_paths(&symbol);
        if current_path.is_file() && prior_path.is_file() {
            debug!(
                current = %current_path.display(),
                prior = %prior_path.display(),
                "reading split statement records"
            );
            let current = RawStatementRecord::from_json_file(&current_path)?;
            let prior = RawStatementRecord::from_json_file(&prior_path)?;
            return StatementBundle::from_records(&symbol, current, prior);
        }

        Err(DataError::MissingData {
            symbol,
            reason: format!("no statement documents under {}", self.dir.display()),
        })
    }
}
