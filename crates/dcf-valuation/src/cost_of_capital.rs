//! Cost of capital.
//!
//! ```text
//! levered_beta  = beta * (1 + long_term_debt / market_cap)
//! blended_beta  = (levered_beta + beta) / 2
//! capm          = rf + blended_beta * (market_return - rf)
//! equity_cost   = market_cap / (long_term_debt + market_cap) * capm
//! debt_cost     = long_term_debt / (long_term_debt + market_cap)
//!                 * bond_yield * (1 - income_tax_expense / ebitda)
//! wacc          = debt_cost + equity_cost
//! discount      = 1 / (1 + wacc)
//! ```

use crate::error::{Result, ValuationError, finite};
use crate::metrics::{Metric, MetricSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived cost-of-capital figures for one metric set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOfCapital {
    /// Beta adjusted for leverage
    pub levered_beta: f64,
    /// Mean of levered and unlevered beta
    pub blended_beta: f64,
    /// CAPM expected equity return
    pub capm: f64,
    /// Equity-weighted CAPM return
    pub equity_cost: f64,
    /// Debt-weighted after-tax bond yield
    pub debt_cost: f64,
    /// Weighted average cost of capital
    pub wacc: f64,
    /// One-period discount factor, `1 / (1 + wacc)`
    pub discount_factor: f64,
}

impl CostOfCapital {
    /// Compute the cost of capital for `metrics` at `market_capitalization`.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` when market capitalization, `long_term_debt +
    /// market_cap`, `ebitda` or `1 + wacc` is zero; `InvalidInput` when market
    /// capitalization is negative or not finite; `MissingField` when `beta`,
    /// `longTermDebt`, `incomeTaxExpense` or `ebitda` is absent.
    pub fn compute(metrics: &MetricSet, market_capitalization: f64) -> Result<Self> {
        if !market_capitalization.is_finite() || market_capitalization < 0.0 {
            return Err(ValuationError::invalid_input(
                "marketCapitalization",
                format!("must be positive, got {market_capitalization}"),
            ));
        }
        if market_capitalization == 0.0 {
            return Err(ValuationError::division_by_zero("marketCapitalization"));
        }

        let beta = metrics.require(Metric::Beta)?;
        let long_term_debt = metrics.require(Metric::LongTermDebt)?;
        let tax = metrics.require(Metric::IncomeTaxExpense)?;
        let ebitda = metrics.require(Metric::Ebitda)?;
        let rates = metrics.macro_inputs();

        let capital = long_term_debt + market_capitalization;
        if capital == 0.0 {
            return Err(ValuationError::division_by_zero(
                "longTermDebt + marketCapitalization",
            ));
        }
        if ebitda == 0.0 {
            return Err(ValuationError::division_by_zero(Metric::Ebitda.key()));
        }

        let levered_beta = beta * (1.0 + long_term_debt / market_capitalization);
        let blended_beta = (levered_beta + beta) / 2.0;
        let capm = rates.risk_free_rate
            + blended_beta * (rates.expected_market_return - rates.risk_free_rate);
        let equity_cost = market_capitalization / capital * capm;
        let debt_cost = long_term_debt / capital * rates.bond_yield * (1.0 - tax / ebitda);
        let wacc = finite("wacc", debt_cost + equity_cost)?;

        if 1.0 + wacc == 0.0 {
            return Err(ValuationError::division_by_zero("1 + wacc"));
        }
        let discount_factor = finite("discountFactor", 1.0 / (1.0 + wacc))?;

        debug!(
            period = %metrics.period(),
            levered_beta,
            capm,
            wacc,
            discount_factor,
            "computed cost of capital"
        );

        Ok(Self {
            levered_beta,
            blended_beta,
            capm,
            equity_cost,
            debt_cost,
            wacc,
            discount_factor,
        })
    }
}
