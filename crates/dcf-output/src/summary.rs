//! Human-readable valuation summary.

use chrono::NaiveDate;
use dcf_valuation::{Evaluation, Metric, SkipReason, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headline figures of one valuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationSummary {
    /// Ticker symbol.
    pub symbol: String,

    /// Filing date of the current statement.
    pub filing_date: NaiveDate,

    /// Date of the matched close.
    pub price_date: NaiveDate,

    /// Matched closing price.
    pub observed_price: f64,

    /// Market capitalization at the matched close.
    pub market_capitalization: f64,

    /// WACC of the current and projected periods.
    pub wacc: (f64, f64),

    /// Operating free cash flow of the current and projected periods.
    pub operating_free_cash_flow: (f64, f64),

    /// Damped enterprise value of operations.
    pub net_enterprise_value: f64,

    /// Enterprise value including non-operating assets.
    pub gross_enterprise_value: f64,

    /// Scaled debt.
    pub debt: f64,

    /// Equity value.
    pub equity_value: f64,

    /// Intrinsic value per share.
    pub per_share_value: f64,

    /// Intrinsic value less observed price.
    pub difference: f64,

    /// Difference relative to intrinsic value.
    pub margin_of_safety: Option<f64>,

    /// Comparator verdict.
    pub verdict: Verdict,

    /// Metrics the projector left out.
    pub skipped: Vec<(Metric, SkipReason)>,
}

impl ValuationSummary {
    /// Summarize an evaluation.
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        let result = &evaluation.result;
        Self {
            symbol: evaluation.symbol.clone(),
            filing_date: evaluation.filing_date,
            price_date: evaluation.matched_price.date,
            observed_price: evaluation.matched_price.close,
            market_capitalization: evaluation.market_capitalization,
            wacc: (
                evaluation.current_cost_of_capital.wacc,
                evaluation.projected_cost_of_capital.wacc,
            ),
            operating_free_cash_flow: (
                result.operating_free_cash_flow.current,
                result.operating_free_cash_flow.projected,
            ),
            net_enterprise_value: result.net_enterprise_value,
            gross_enterprise_value: result.gross_enterprise_value,
            debt: result.debt,
            equity_value: result.equity_value,
            per_share_value: result.per_share_value,
            difference: evaluation.comparison.difference,
            margin_of_safety: evaluation.comparison.margin_of_safety(),
            verdict: evaluation.comparison.verdict,
            skipped: evaluation.projection.skipped().collect(),
        }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nValuation Summary: {}\n", self.symbol));
        output.push_str(&format!(
            "Filed: {}  Price date: {}\n",
            self.filing_date, self.price_date
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str("\nCost of Capital:\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  {:<28} {:>14.2}\n",
            "Market Capitalization", self.market_capitalization
        ));
        output.push_str(&format!(
            "  {:<28} {:>13.3}%\n",
            "WACC (current)",
            self.wacc.0 * 100.0
        ));
        output.push_str(&format!(
            "  {:<28} {:>13.3}%\n",
            "WACC (projected)",
            self.wacc.1 * 100.0
        ));

        output.push_str("\nValuation:\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for (label, value) in [
            ("Free Cash Flow (current)", self.operating_free_cash_flow.0),
            ("Free Cash Flow (projected)", self.operating_free_cash_flow.1),
            ("Net Enterprise Value", self.net_enterprise_value),
            ("Gross Enterprise Value", self.gross_enterprise_value),
            ("Debt", self.debt),
            ("Equity Value", self.equity_value),
        ] {
            output.push_str(&format!("  {label:<28} {value:>14.2}\n"));
        }

        output.push_str("\nPer Share:\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  {:<28} {:>14.2}\n",
            "Intrinsic Value", self.per_share_value
        ));
        output.push_str(&format!(
            "  {:<28} {:>14.2}\n",
            "Observed Price", self.observed_price
        ));
        output.push_str(&format!("  {:<28} {:>+14.2}\n", "Difference", self.difference));
        if let Some(margin) = self.margin_of_safety {
            output.push_str(&format!(
                "  {:<28} {:>13.1}%\n",
                "Margin of Safety",
                margin * 100.0
            ));
        }
        output.push_str(&format!("  {:<28} {:>14}\n", "Verdict", self.verdict.to_string()));

        if !self.skipped.is_empty() {
            output.push_str("\nNot Projected:\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for (metric, reason) in &self.skipped {
                output.push_str(&format!("  {:<28} {reason:?}\n", metric.key()));
            }
        }

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Valuation Summary: {}\n\n", self.symbol));
        output.push_str(&format!(
            "**Filed:** {} | **Price date:** {}\n\n",
            self.filing_date, self.price_date
        ));

        output.push_str("## Figures\n\n");
        output.push_str("| Figure | Value |\n");
        output.push_str("|--------|------:|\n");
        for (label, value) in [
            ("Market Capitalization", format!("{:.2}", self.market_capitalization)),
            ("WACC (current)", format!("{:.3}%", self.wacc.0 * 100.0)),
            ("WACC (projected)", format!("{:.3}%", self.wacc.1 * 100.0)),
            ("Free Cash Flow (current)", format!("{:.2}", self.operating_free_cash_flow.0)),
            ("Free Cash Flow (projected)", format!("{:.2}", self.operating_free_cash_flow.1)),
            ("Net Enterprise Value", format!("{:.2}", self.net_enterprise_value)),
            ("Gross Enterprise Value", format!("{:.2}", self.gross_enterprise_value)),
            ("Debt", format!("{:.2}", self.debt)),
            ("Equity Value", format!("{:.2}", self.equity_value)),
        ] {
            output.push_str(&format!("| {label} | {value} |\n"));
        }
        output.push('\n');

        output.push_str("## Per Share\n\n");
        output.push_str(&format!(
            "- **Intrinsic Value:** {:.2}\n",
            self.per_share_value
        ));
        output.push_str(&format!("- **Observed Price:** {:.2}\n", self.observed_price));
        output.push_str(&format!("- **Difference:** {:+.2}", self.difference));
        if let Some(margin) = self.margin_of_safety {
            output.push_str(&format!(" ({:.1}% margin of safety)", margin * 100.0));
        }
        output.push('\n');
        output.push_str(&format!("- **Verdict:** {}\n", self.verdict));

        if !self.skipped.is_empty() {
            output.push_str("\n## Not Projected\n\n");
            for (metric, reason) in &self.skipped {
                output.push_str(&format!("- `{}`: {reason:?}\n", metric.key()));
            }
        }

        output
    }
}

impl fmt::Display for ValuationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
