//! Everything produced while valuing one company.

use crate::aggregate::ValuationResult;
use crate::cash_flow::CashFlow;
use crate::compare::Comparison;
use crate::config::ValuationConfig;
use crate::cost_of_capital::CostOfCapital;
use crate::metrics::MetricSet;
use crate::projection::Projection;
use chrono::NaiveDate;
use dcf_data::PricePoint;
use serde::{Deserialize, Serialize};

/// Intermediate and final figures of a single valuation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Ticker symbol
    pub symbol: String,
    /// Filing date of the current statement
    pub filing_date: NaiveDate,
    /// Configuration the run used
    pub config: ValuationConfig,
    /// Normalized current-period metrics
    pub current: MetricSet,
    /// Normalized prior-period metrics
    pub prior: MetricSet,
    /// Projected metrics and per-metric outcomes
    pub projection: Projection,
    /// Close matched to the filing date
    pub matched_price: PricePoint,
    /// Matched close times outstanding shares
    pub market_capitalization: f64,
    /// Cost of capital for the current period
    pub current_cost_of_capital: CostOfCapital,
    /// Cost of capital for the projected period
    pub projected_cost_of_capital: CostOfCapital,
    /// DCF figures for the current period
    pub current_cash_flow: CashFlow,
    /// DCF figures for the projected period
    pub projected_cash_flow: CashFlow,
    /// Aggregated valuation
    pub result: ValuationResult,
    /// Intrinsic value against the matched close
    pub comparison: Comparison,
}

impl Evaluation {
    /// Intrinsic value per share.
    pub const fn per_share_value(&self) -> f64 {
        self.result.per_share_value
    }

    /// Intrinsic value less the matched close.
    pub const fn difference(&self) -> f64 {
        self.comparison.difference
    }
}
