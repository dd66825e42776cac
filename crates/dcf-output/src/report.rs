//! Report envelope for valuation output.

use chrono::{DateTime, NaiveDate, Utc};
use dcf_valuation::Evaluation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A timestamped report about one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Symbol being valued.
    pub symbol: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Filing date of the statement the report is based on.
    pub filing_date: Option<NaiveDate>,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(symbol: String, filing_date: Option<NaiveDate>, contents: serde_json::Value) -> Self {
        Self {
            symbol,
            timestamp: Utc::now(),
            filing_date,
            contents,
        }
    }

    /// Report carrying the full evaluation as its contents.
    pub fn from_evaluation(evaluation: &Evaluation) -> Result<Self, ReportError> {
        Ok(Self::new(
            evaluation.symbol.clone(),
            Some(evaluation.filing_date),
            serde_json::to_value(evaluation)?,
        ))
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_evaluation;

    #[test]
    fn test_report_creation() {
        let report = Report::new("AAPL".to_string(), None, serde_json::json!({"test": "data"}));

        assert_eq!(report.symbol, "AAPL");
        assert!(report.filing_date.is_none());
    }

    #[test]
    fn test_report_from_evaluation() {
        let report = Report::from_evaluation(&sample_evaluation()).unwrap();
        let json = report.to_json().unwrap();

        assert!(json.contains("\"currentCashFlow\""));
        assert!(json.contains("\"perShareValue\""));
        assert_eq!(report.filing_date, NaiveDate::from_ymd_opt(2023, 11, 3));
    }
}
