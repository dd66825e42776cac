//! Flat export of valuation figures.
//!
//! Every intermediate figure of an [`Evaluation`] becomes one
//! `(section, name, value)` row so the whole run can be diffed, loaded into a
//! spreadsheet, or asserted against in tests.

use chrono::NaiveDate;
use dcf_valuation::{CashFlow, CostOfCapital, Evaluation, MetricSet, Outcome, Verdict};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writer produced bytes that are not UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One exported figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Stage that produced the figure
    pub section: String,
    /// Figure name
    pub name: String,
    /// Figure value
    pub value: f64,
}

impl ExportRow {
    /// Create a new row.
    pub fn new(section: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            section: section.into(),
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Serialize)]
struct FlatRow<'a> {
    symbol: &'a str,
    section: &'a str,
    name: &'a str,
    value: f64,
}

/// All figures of one valuation as ordered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationExport {
    /// Ticker symbol
    pub symbol: String,
    /// Filing date of the current statement
    pub filing_date: NaiveDate,
    /// Date of the matched close
    pub matched_date: NaiveDate,
    /// Comparator verdict
    pub verdict: Verdict,
    /// Figures in pipeline order
    pub rows: Vec<ExportRow>,
}

impl ValuationExport {
    /// Flatten an evaluation.
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        let mut rows = Vec::new();

        let config = &evaluation.config;
        rows.extend([
            ExportRow::new("config", "riskFreeRate", config.macro_inputs.risk_free_rate),
            ExportRow::new(
                "config",
                "expectedMarketReturn",
                config.macro_inputs.expected_market_return,
            ),
            ExportRow::new("config", "bondYield", config.macro_inputs.bond_yield),
            ExportRow::new("config", "dampingFactor", config.calibration.damping_factor),
            ExportRow::new("config", "debtDivisor", config.calibration.debt_divisor),
            ExportRow::new("config", "shareValueScale", config.calibration.share_value_scale),
            ExportRow::new(
                "config",
                "priceMatchWindowDays",
                f64::from(config.price_match_window_days),
            ),
        ]);

        push_metrics(&mut rows, &evaluation.current);
        push_metrics(&mut rows, &evaluation.prior);
        push_metrics(&mut rows, &evaluation.projection.metrics);

        for (metric, outcome) in &evaluation.projection.outcomes {
            if let Outcome::Projected { growth, .. } = outcome {
                rows.push(ExportRow::new("growth", metric.key(), *growth));
            }
        }

        rows.extend([
            ExportRow::new("price", "close", evaluation.matched_price.close),
            ExportRow::new("price", "marketCapitalization", evaluation.market_capitalization),
        ]);

        push_cost(&mut rows, "costOfCapital.current", &evaluation.current_cost_of_capital);
        push_cost(&mut rows, "costOfCapital.projected", &evaluation.projected_cost_of_capital);
        push_cash_flow(&mut rows, "cashFlow.current", &evaluation.current_cash_flow);
        push_cash_flow(&mut rows, "cashFlow.projected", &evaluation.projected_cash_flow);

        let result = &evaluation.result;
        rows.extend([
            ExportRow::new("valuation", "netEnterpriseValue", result.net_enterprise_value),
            ExportRow::new(
                "valuation",
                "nonOperatingAssetValue",
                result.non_operating_asset_value,
            ),
            ExportRow::new("valuation", "grossEnterpriseValue", result.gross_enterprise_value),
            ExportRow::new("valuation", "debt", result.debt),
            ExportRow::new("valuation", "equityValue", result.equity_value),
            ExportRow::new("valuation", "perShareValue", result.per_share_value),
        ]);

        let comparison = &evaluation.comparison;
        rows.extend([
            ExportRow::new("comparison", "intrinsicValue", comparison.intrinsic_value),
            ExportRow::new("comparison", "observedPrice", comparison.observed_price),
            ExportRow::new("comparison", "difference", comparison.difference),
        ]);
        if let Some(margin) = comparison.margin_of_safety() {
            rows.push(ExportRow::new("comparison", "marginOfSafety", margin));
        }

        Self {
            symbol: evaluation.symbol.clone(),
            filing_date: evaluation.filing_date,
            matched_date: evaluation.matched_price.date,
            verdict: comparison.verdict,
            rows,
        }
    }

    /// Value of the row `section.name`.
    pub fn value(&self, section: &str, name: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.section == section && r.name == name)
            .map(|r| r.value)
    }

    /// Rows belonging to `section`.
    pub fn section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a ExportRow> + 'a {
        self.rows.iter().filter(move |r| r.section == section)
    }

    fn flat_rows(&self) -> impl Iterator<Item = FlatRow<'_>> {
        self.rows.iter().map(|r| FlatRow {
            symbol: &self.symbol,
            section: &r.section,
            name: &r.name,
            value: r.value,
        })
    }
}

fn push_metrics(rows: &mut Vec<ExportRow>, metrics: &MetricSet) {
    let section = metrics.period().to_string();
    for (metric, value) in metrics.iter() {
        rows.push(ExportRow::new(section.as_str(), metric.key(), value));
    }
}

fn push_cost(rows: &mut Vec<ExportRow>, section: &str, cost: &CostOfCapital) {
    rows.extend([
        ExportRow::new(section, "leveredBeta", cost.levered_beta),
        ExportRow::new(section, "blendedBeta", cost.blended_beta),
        ExportRow::new(section, "capm", cost.capm),
        ExportRow::new(section, "equityCost", cost.equity_cost),
        ExportRow::new(section, "debtCost", cost.debt_cost),
        ExportRow::new(section, "wacc", cost.wacc),
        ExportRow::new(section, "discountFactor", cost.discount_factor),
    ]);
}

fn push_cash_flow(rows: &mut Vec<ExportRow>, section: &str, flow: &CashFlow) {
    rows.extend([
        ExportRow::new(section, "noplat", flow.noplat),
        ExportRow::new(section, "investedCapital", flow.invested_capital),
        ExportRow::new(section, "priorInvestedCapital", flow.prior_invested_capital),
        ExportRow::new(section, "netNewInvestment", flow.net_new_investment),
        ExportRow::new(section, "operatingFreeCashFlow", flow.operating_free_cash_flow),
        ExportRow::new(section, "discountedFreeCashFlow", flow.discounted_free_cash_flow),
    ]);
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_csv<'a>(exports: impl IntoIterator<Item = &'a ValuationExport>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for export in exports {
        for row in export.flat_rows() {
            wtr.serialize(row)?;
        }
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

impl Exporter for ValuationExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv([self]),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<ValuationExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_evaluation;
    use approx::assert_relative_eq;

    #[test]
    fn test_rows_cover_every_stage() {
        let export = ValuationExport::from_evaluation(&sample_evaluation());

        for section in [
            "config",
            "current",
            "prior",
            "projected",
            "growth",
            "price",
            "costOfCapital.current",
            "costOfCapital.projected",
            "cashFlow.current",
            "cashFlow.projected",
            "valuation",
            "comparison",
        ] {
            assert!(export.section(section).next().is_some(), "missing section {section}");
        }
    }

    #[test]
    fn test_cash_flow_rows() {
        let export = ValuationExport::from_evaluation(&sample_evaluation());

        assert_relative_eq!(export.value("cashFlow.current", "noplat").unwrap(), 79.0, epsilon = 1e-9);
        assert_relative_eq!(
            export.value("cashFlow.current", "priorInvestedCapital").unwrap(),
            170.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            export.value("cashFlow.current", "operatingFreeCashFlow").unwrap(),
            49.0,
            epsilon = 1e-9
        );
        assert_eq!(export.value("price", "close"), Some(20.0));
        assert_eq!(export.value("config", "priceMatchWindowDays"), Some(10.0));
    }

    #[test]
    fn test_skipped_metrics_have_no_growth_row() {
        let export = ValuationExport::from_evaluation(&sample_evaluation());
        assert!(export.value("growth", "commercialPaper").is_none());
        assert!(export.value("growth", "ebitda").is_some());
    }

    #[test]
    fn test_export_csv() {
        let export = ValuationExport::from_evaluation(&sample_evaluation());
        let csv = export.export_to_string(ExportFormat::Csv).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("symbol,section,name,value"));
        assert_eq!(csv.lines().count(), export.rows.len() + 1);
        assert!(csv.contains("TEST,valuation,perShareValue,"));
    }

    #[test]
    fn test_export_json_round_trip() {
        let export = ValuationExport::from_evaluation(&sample_evaluation());
        let json = export.export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("  "));

        let parsed: ValuationExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.symbol, export.symbol);
        assert_eq!(parsed.rows.len(), export.rows.len());
    }

    #[test]
    fn test_multiple_exports_csv() {
        let mut other = sample_evaluation();
        other.symbol = "OTHER".to_string();
        let exports = vec![
            ValuationExport::from_evaluation(&sample_evaluation()),
            ValuationExport::from_evaluation(&other),
        ];

        let csv = exports.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("TEST,"));
        assert!(csv.contains("OTHER,"));
        assert_eq!(csv.matches("symbol,section").count(), 1);
    }

    #[test]
    fn test_export_to_file() {
        let export = ValuationExport::from_evaluation(&sample_evaluation());
        let path = std::env::temp_dir().join(format!("dcf_output_export_{}.csv", std::process::id()));

        export.export_to_file(&path, ExportFormat::Csv).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("perShareValue"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
