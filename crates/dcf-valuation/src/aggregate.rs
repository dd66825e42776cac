//! Enterprise value to per-share intrinsic value.
//!
//! 1. `net_ev = (dcf_current + dcf_projected) * damping_factor`
//! 2. `non_operating = cash + other_non_current_assets + other_current_assets`
//! 3. `gross_ev = net_ev + non_operating`
//! 4. `debt = (commercial_paper + net_debt) / debt_divisor`
//! 5. `equity = gross_ev - debt`
//! 6. `per_share = equity / outstanding_shares * share_value_scale`

use crate::cash_flow::CashFlow;
use crate::config::Calibration;
use crate::error::{Result, ValuationError, finite};
use crate::metrics::{Metric, MetricSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A figure for the current and the projected period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodPair {
    /// Current period
    pub current: f64,
    /// Projected period
    pub projected: f64,
}

impl PeriodPair {
    /// Sum of both periods.
    pub fn total(&self) -> f64 {
        self.current + self.projected
    }
}

/// Assets outside core operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonOperatingAssets {
    /// Cash and cash equivalents
    pub cash: f64,
    /// Other non-current assets
    pub other_non_current_assets: f64,
    /// Other current assets
    pub other_current_assets: f64,
}

impl NonOperatingAssets {
    /// Read the components from a metric set.
    pub fn from_metrics(metrics: &MetricSet) -> Result<Self> {
        Ok(Self {
            cash: metrics.require(Metric::Cash)?,
            other_non_current_assets: metrics.require(Metric::OtherNonCurrentAssets)?,
            other_current_assets: metrics.require(Metric::OtherCurrentAssets)?,
        })
    }

    /// Sum of the components.
    pub fn total(&self) -> f64 {
        self.cash + self.other_non_current_assets + self.other_current_assets
    }
}

/// Debt subtracted from enterprise value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtComponents {
    /// Commercial paper outstanding
    pub commercial_paper: f64,
    /// Net debt
    pub net_debt: f64,
}

impl DebtComponents {
    /// Read the components from a metric set.
    pub fn from_metrics(metrics: &MetricSet) -> Result<Self> {
        Ok(Self {
            commercial_paper: metrics.require(Metric::CommercialPaper)?,
            net_debt: metrics.require(Metric::NetDebt)?,
        })
    }
}

/// Everything the aggregator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationInputs {
    /// Operating free cash flow per period
    pub operating_free_cash_flow: PeriodPair,
    /// Discounted free cash flow per period
    pub discounted_free_cash_flow: PeriodPair,
    /// Non-operating asset components
    pub non_operating: NonOperatingAssets,
    /// Debt components
    pub debt: DebtComponents,
    /// Shares outstanding
    pub outstanding_shares: f64,
}

impl ValuationInputs {
    /// Gather inputs from both cash flows and the current metric set.
    pub fn new(current: &CashFlow, projected: &CashFlow, metrics: &MetricSet) -> Result<Self> {
        Ok(Self {
            operating_free_cash_flow: PeriodPair {
                current: current.operating_free_cash_flow,
                projected: projected.operating_free_cash_flow,
            },
            discounted_free_cash_flow: PeriodPair {
                current: current.discounted_free_cash_flow,
                projected: projected.discounted_free_cash_flow,
            },
            non_operating: NonOperatingAssets::from_metrics(metrics)?,
            debt: DebtComponents::from_metrics(metrics)?,
            outstanding_shares: metrics.require(Metric::OutstandingShares)?,
        })
    }
}

/// Final valuation figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    /// Operating free cash flow per period
    pub operating_free_cash_flow: PeriodPair,
    /// Discounted free cash flow per period
    pub discounted_free_cash_flow: PeriodPair,
    /// Damped sum of discounted flows
    pub net_enterprise_value: f64,
    /// Cash plus other non-operating assets
    pub non_operating_asset_value: f64,
    /// Net enterprise value plus non-operating assets
    pub gross_enterprise_value: f64,
    /// Scaled debt
    pub debt: f64,
    /// Gross enterprise value less debt
    pub equity_value: f64,
    /// Intrinsic value per share
    pub per_share_value: f64,
}

/// Combine discounted flows, non-operating assets and debt into a per-share value.
pub fn aggregate(inputs: &ValuationInputs, calibration: &Calibration) -> Result<ValuationResult> {
    if inputs.outstanding_shares < 0.0 || !inputs.outstanding_shares.is_finite() {
        return Err(ValuationError::invalid_input(
            Metric::OutstandingShares.key(),
            format!("must be positive, got {}", inputs.outstanding_shares),
        ));
    }
    if inputs.outstanding_shares == 0.0 {
        return Err(ValuationError::division_by_zero(
            Metric::OutstandingShares.key(),
        ));
    }
    if calibration.debt_divisor == 0.0 {
        return Err(ValuationError::division_by_zero("debtDivisor"));
    }

    let net_enterprise_value =
        inputs.discounted_free_cash_flow.total() * calibration.damping_factor;
    let non_operating_asset_value = inputs.non_operating.total();
    let gross_enterprise_value = net_enterprise_value + non_operating_asset_value;
    let debt = (inputs.debt.commercial_paper + inputs.debt.net_debt) / calibration.debt_divisor;
    let equity_value = gross_enterprise_value - debt;
    let per_share_value = finite(
        "perShareValue",
        equity_value / inputs.outstanding_shares * calibration.share_value_scale,
    )?;

    debug!(
        net_enterprise_value,
        gross_enterprise_value,
        debt,
        equity_value,
        per_share_value,
        "aggregated valuation"
    );

    Ok(ValuationResult {
        operating_free_cash_flow: inputs.operating_free_cash_flow,
        discounted_free_cash_flow: inputs.discounted_free_cash_flow,
        net_enterprise_value,
        non_operating_asset_value,
        gross_enterprise_value,
        debt,
        equity_value,
        per_share_value,
    })
}
