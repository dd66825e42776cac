//! Valuation configuration.
//!
//! One [`ValuationConfig`] is built per run and passed down by reference. The
//! serialized form is a flat JSON document; absent keys take their defaults:
//!
//! ```json
//! {
//!   "riskFreeRate": 0.015,
//!   "expectedMarketReturn": 0.064,
//!   "bondYield": 0.0175,
//!   "dampingFactor": 0.7,
//!   "debtDivisor": 10.0,
//!   "shareValueScale": 10.0,
//!   "priceMatchWindowDays": 10
//! }
//! ```

use crate::error::ValuationError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File being read
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed JSON
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed but out-of-range values
    #[error(transparent)]
    Invalid(#[from] ValuationError),
}

/// Macro-economic inputs shared by every metric set of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MacroInputs {
    /// Risk-free rate (default: 0.015)
    pub risk_free_rate: f64,
    /// Expected market return (default: 0.064)
    pub expected_market_return: f64,
    /// Reference corporate bond yield (default: 0.0175)
    pub bond_yield: f64,
}

impl Default for MacroInputs {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.015,
            expected_market_return: 0.064,
            bond_yield: 0.0175,
        }
    }
}

impl MacroInputs {
    /// Market risk premium over the risk-free rate.
    pub fn market_premium(&self) -> f64 {
        self.expected_market_return - self.risk_free_rate
    }
}

/// Empirical calibration constants applied by the aggregator.
///
/// None of these has a derivation; they were fitted to a small sample of
/// companies and are exposed so they can be re-fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Calibration {
    /// Scales blended enterprise value down to offset over-projection (default: 0.7)
    pub damping_factor: f64,
    /// Divides combined debt (default: 10)
    pub debt_divisor: f64,
    /// Multiplies per-share value to align units (default: 10)
    pub share_value_scale: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            damping_factor: 0.7,
            debt_divisor: 10.0,
            share_value_scale: 10.0,
        }
    }
}

/// Everything the valuation core is parameterized by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValuationConfig {
    /// Macro-economic inputs
    #[serde(flatten)]
    pub macro_inputs: MacroInputs,
    /// Aggregator calibration
    #[serde(flatten)]
    pub calibration: Calibration,
    /// Half-width of the price match window in calendar days (default: 10)
    pub price_match_window_days: u32,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            macro_inputs: MacroInputs::default(),
            calibration: Calibration::default(),
            price_match_window_days: 10,
        }
    }
}

impl ValuationConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ValuationError> {
        let values = [
            ("riskFreeRate", self.macro_inputs.risk_free_rate),
            ("expectedMarketReturn", self.macro_inputs.expected_market_return),
            ("bondYield", self.macro_inputs.bond_yield),
            ("dampingFactor", self.calibration.damping_factor),
            ("debtDivisor", self.calibration.debt_divisor),
            ("shareValueScale", self.calibration.share_value_scale),
        ];
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValuationError::invalid_input(*name, "must be finite"));
        }
        if self.calibration.debt_divisor == 0.0 {
            return Err(ValuationError::division_by_zero("debtDivisor"));
        }
        if self.calibration.share_value_scale <= 0.0 {
            return Err(ValuationError::invalid_input(
                "shareValueScale",
                "must be positive",
            ));
        }
        Ok(())
    }
}
