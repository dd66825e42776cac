#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cash_flow;
pub mod compare;
pub mod config;
pub mod cost_of_capital;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod normalize;
pub mod price_match;
pub mod projection;

pub use aggregate::{
    DebtComponents, NonOperatingAssets, PeriodPair, ValuationInputs, ValuationResult, aggregate,
};
pub use cash_flow::{CashFlow, invested_capital, noplat};
pub use compare::{Comparison, Verdict, compare};
pub use config::{Calibration, ConfigError, MacroInputs, ValuationConfig};
pub use cost_of_capital::CostOfCapital;
pub use error::{Result, ValuationError};
pub use evaluation::Evaluation;
pub use metrics::{Metric, MetricSet, Period};
pub use normalize::{Absence, FIELD_MAP, FieldSpec, Normalizer};
pub use price_match::{match_price, match_price_str};
pub use projection::{Outcome, Projection, SkipReason, project};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
