//! Operating free cash flow and its discounted value.

use crate::cost_of_capital::CostOfCapital;
use crate::error::{Result, ValuationError, finite};
use crate::metrics::{Metric, MetricSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// DCF figures for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    /// Net operating profit less adjusted taxes
    pub noplat: f64,
    /// Invested capital of this period
    pub invested_capital: f64,
    /// Invested capital of the period before
    pub prior_invested_capital: f64,
    /// Change in invested capital
    pub net_new_investment: f64,
    /// NOPLAT less net new investment
    pub operating_free_cash_flow: f64,
    /// Magnitude of the discounted operating free cash flow
    pub discounted_free_cash_flow: f64,
}

/// `ebitda * (1 - income_tax_expense / ebitda)`.
pub fn noplat(metrics: &MetricSet) -> Result<f64> {
    let ebitda = metrics.require(Metric::Ebitda)?;
    let tax = metrics.require(Metric::IncomeTaxExpense)?;
    if ebitda == 0.0 {
        return Err(ValuationError::division_by_zero(Metric::Ebitda.key()));
    }
    finite("noplat", ebitda * (1.0 - tax / ebitda))
}

/// `total_current_assets - total_current_liabilities`.
pub fn invested_capital(metrics: &MetricSet) -> Result<f64> {
    let assets = metrics.require(Metric::TotalCurrentAssets)?;
    let liabilities = metrics.require(Metric::TotalCurrentLiabilities)?;
    finite("investedCapital", assets - liabilities)
}

impl CashFlow {
    /// Compute the DCF figures for `metrics`.
    ///
    /// `prior_invested_capital` is the invested capital of the period before
    /// the one `metrics` describes: the prior period's for the current set, the
    /// current period's for the projected set.
    ///
    /// The discounted flow is reported as an absolute value; a negative
    /// operating free cash flow contributes its magnitude.
    pub fn compute(
        metrics: &MetricSet,
        prior_invested_capital: f64,
        cost: &CostOfCapital,
    ) -> Result<Self> {
        let noplat = noplat(metrics)?;
        let invested_capital = invested_capital(metrics)?;
        let net_new_investment = invested_capital - prior_invested_capital;
        let operating_free_cash_flow = noplat - net_new_investment;
        let discounted_free_cash_flow = finite(
            "discountedFreeCashFlow",
            (operating_free_cash_flow * cost.discount_factor).abs(),
        )?;

        debug!(
            period = %metrics.period(),
            noplat,
            invested_capital,
            net_new_investment,
            operating_free_cash_flow,
            discounted_free_cash_flow,
            "computed cash flow"
        );

        Ok(Self {
            noplat,
            invested_capital,
            prior_invested_capital,
            net_new_investment,
            operating_free_cash_flow,
            discounted_free_cash_flow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MacroInputs;
    use crate::metrics::Period;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn cost(discount_factor: f64) -> CostOfCapital {
        CostOfCapital {
            levered_beta: 1.0,
            blended_beta: 1.0,
            capm: 0.0,
            equity_cost: 0.0,
            debt_cost: 0.0,
            wacc: 1.0 / discount_factor - 1.0,
            discount_factor,
        }
    }

    fn metrics(ebitda: f64, tax: f64, assets: f64, liabilities: f64) -> MetricSet {
        MetricSet::new(Period::Current, MacroInputs::default())
            .with(Metric::Ebitda, ebitda)
            .with(Metric::IncomeTaxExpense, tax)
            .with(Metric::TotalCurrentAssets, assets)
            .with(Metric::TotalCurrentLiabilities, liabilities)
    }

    #[test]
    fn test_reference_cash_flow() {
        let flow = CashFlow::compute(&metrics(100.0, 21.0, 500.0, 300.0), 170.0, &cost(0.9)).unwrap();

        assert_relative_eq!(flow.noplat, 79.0, epsilon = 1e-9);
        assert_relative_eq!(flow.invested_capital, 200.0, epsilon = 1e-9);
        assert_relative_eq!(flow.net_new_investment, 30.0, epsilon = 1e-9);
        assert_relative_eq!(flow.operating_free_cash_flow, 49.0, epsilon = 1e-9);
        assert_relative_eq!(flow.discounted_free_cash_flow, 49.0 * 0.9, epsilon = 1e-9);
    }

    #[rstest]
    #[case(100.0, 0.21)]
    #[case(250.0, 0.35)]
    #[case(-80.0, 0.1)]
    #[case(1e9, 0.0)]
    fn test_noplat_is_ebitda_less_tax(#[case] ebitda: f64, #[case] rate: f64) {
        let tax = rate * ebitda;
        let set = metrics(ebitda, tax, 0.0, 0.0);
        assert_relative_eq!(noplat(&set).unwrap(), ebitda - tax, max_relative = 1e-12);
    }

    #[test]
    fn test_negative_flow_reports_magnitude() {
        // Invested capital jumps by 300 against NOPLAT of 79.
        let flow = CashFlow::compute(&metrics(100.0, 21.0, 800.0, 300.0), 200.0, &cost(0.5)).unwrap();
        assert_relative_eq!(flow.operating_free_cash_flow, -221.0, epsilon = 1e-9);
        assert_relative_eq!(flow.discounted_free_cash_flow, 110.5, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_ebitda() {
        let result = CashFlow::compute(&metrics(0.0, 0.0, 1.0, 1.0), 0.0, &cost(0.9));
        assert!(matches!(result, Err(ValuationError::DivisionByZero { .. })));
    }

    #[test]
    fn test_overflowing_working_capital() {
        let result = CashFlow::compute(&metrics(100.0, 21.0, 1.7e308, -1.7e308), 0.0, &cost(0.9));
        assert!(matches!(
            result,
            Err(ValuationError::DivisionByZero { ref quantity }) if quantity == "investedCapital"
        ));
    }

    #[test]
    fn test_missing_working_capital() {
        let set = MetricSet::new(Period::Projected, MacroInputs::default())
            .with(Metric::Ebitda, 10.0)
            .with(Metric::IncomeTaxExpense, 1.0)
            .with(Metric::TotalCurrentAssets, 5.0);
        assert_eq!(
            invested_capital(&set),
            Err(ValuationError::MissingField {
                metric: Metric::TotalCurrentLiabilities,
                period: Period::Projected,
            })
        );
    }
}
