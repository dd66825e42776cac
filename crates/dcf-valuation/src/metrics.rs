//! Metric vocabulary and per-period metric sets.

use crate::config::MacroInputs;
use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The fixed set of statement metrics the valuation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Earnings before interest, taxes, depreciation and amortization
    #[serde(rename = "ebitda")]
    Ebitda,
    /// Income tax expense
    #[serde(rename = "incomeTaxExpense")]
    IncomeTaxExpense,
    /// Total revenue
    #[serde(rename = "revenue")]
    Revenue,
    /// Total current assets
    #[serde(rename = "totalCurrentAssets")]
    TotalCurrentAssets,
    /// Total current liabilities
    #[serde(rename = "totalCurrentLiabilities")]
    TotalCurrentLiabilities,
    /// Equity beta
    #[serde(rename = "beta")]
    Beta,
    /// Long-term debt
    #[serde(rename = "longTermDebt")]
    LongTermDebt,
    /// Cash and cash equivalents
    #[serde(rename = "cashAndCashEquivalents")]
    Cash,
    /// Other non-current assets
    #[serde(rename = "otherNonCurrentAssets")]
    OtherNonCurrentAssets,
    /// Other current assets
    #[serde(rename = "otherCurrentAssets")]
    OtherCurrentAssets,
    /// Commercial paper outstanding
    #[serde(rename = "commercialPaper")]
    CommercialPaper,
    /// Net debt
    #[serde(rename = "netDebt")]
    NetDebt,
    /// Shares outstanding
    #[serde(rename = "outstandingShares")]
    OutstandingShares,
}

impl Metric {
    /// Every metric in vocabulary order.
    pub const ALL: [Self; 13] = [
        Self::Ebitda,
        Self::IncomeTaxExpense,
        Self::Revenue,
        Self::TotalCurrentAssets,
        Self::TotalCurrentLiabilities,
        Self::Beta,
        Self::LongTermDebt,
        Self::Cash,
        Self::OtherNonCurrentAssets,
        Self::OtherCurrentAssets,
        Self::CommercialPaper,
        Self::NetDebt,
        Self::OutstandingShares,
    ];

    /// Canonical provider key.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Ebitda => "ebitda",
            Self::IncomeTaxExpense => "incomeTaxExpense",
            Self::Revenue => "revenue",
            Self::TotalCurrentAssets => "totalCurrentAssets",
            Self::TotalCurrentLiabilities => "totalCurrentLiabilities",
            Self::Beta => "beta",
            Self::LongTermDebt => "longTermDebt",
            Self::Cash => "cashAndCashEquivalents",
            Self::OtherNonCurrentAssets => "otherNonCurrentAssets",
            Self::OtherCurrentAssets => "otherCurrentAssets",
            Self::CommercialPaper => "commercialPaper",
            Self::NetDebt => "netDebt",
            Self::OutstandingShares => "outstandingShares",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| ValuationError::invalid_input(s, "not a known metric"))
    }
}

/// Statement period a metric set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Most recent reported period
    Current,
    /// Period before the current one
    Prior,
    /// One period ahead, extrapolated
    Projected,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Prior => "prior",
            Self::Projected => "projected",
        })
    }
}

/// Normalized metrics for one period, plus the macro inputs of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    period: Period,
    values: BTreeMap<Metric, f64>,
    macro_inputs: MacroInputs,
}

impl MetricSet {
    /// Create an empty set.
    pub const fn new(period: Period, macro_inputs: MacroInputs) -> Self {
        Self {
            period,
            values: BTreeMap::new(),
            macro_inputs,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    /// Set a metric, replacing any previous value.
    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    /// Value of `metric`, if present.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Value of `metric`, or `MissingField` tagged with this set's period.
    pub fn require(&self, metric: Metric) -> Result<f64> {
        self.get(metric).ok_or(ValuationError::MissingField {
            metric,
            period: self.period,
        })
    }

    /// Whether `metric` is present.
    pub fn contains(&self, metric: Metric) -> bool {
        self.values.contains_key(&metric)
    }

    /// Period this set describes.
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Risk-free rate, market return and bond yield for the run.
    pub const fn macro_inputs(&self) -> &MacroInputs {
        &self.macro_inputs
    }

    /// Present metrics in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    /// Number of present metrics.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no metric is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_key_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.key().parse::<Metric>().unwrap(), metric);
        }
        assert!("marketCap".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_serializes_as_key() {
        let json = serde_json::to_string(&Metric::Cash).unwrap();
        assert_eq!(json, "\"cashAndCashEquivalents\"");
    }

    #[test]
    fn test_require_reports_period() {
        let set = MetricSet::new(Period::Projected, MacroInputs::default()).with(Metric::Beta, 1.1);

        assert_eq!(set.require(Metric::Beta), Ok(1.1));
        assert_eq!(
            set.require(Metric::Ebitda),
            Err(ValuationError::MissingField {
                metric: Metric::Ebitda,
                period: Period::Projected,
            })
        );
    }

    #[test]
    fn test_iter_in_vocabulary_order() {
        let set = MetricSet::new(Period::Current, MacroInputs::default())
            .with(Metric::NetDebt, 3.0)
            .with(Metric::Ebitda, 1.0);
        let order: Vec<Metric> = set.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec![Metric::Ebitda, Metric::NetDebt]);
    }
}
