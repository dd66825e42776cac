//! Valuation error kinds.

use crate::metrics::{Metric, Period};
use chrono::NaiveDate;
use thiserror::Error;

/// Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors raised by the valuation stages.
///
/// Any of these aborts the valuation of the company being evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    /// A required metric is absent and has no defined default.
    #[error("Missing field {metric} in {period} period")]
    MissingField {
        /// The absent metric
        metric: Metric,
        /// Period whose metric set lacked it
        period: Period,
    },

    /// A denominator evaluated to zero (or the result was not finite).
    #[error("Division by zero: {quantity}")]
    DivisionByZero {
        /// The quantity whose denominator vanished
        quantity: String,
    },

    /// No closing price within the match window.
    #[error("No price within {window_days} days of {date}")]
    NoPriceInWindow {
        /// Reference date being matched
        date: NaiveDate,
        /// Window half-width in calendar days
        window_days: u32,
    },

    /// Non-numeric, non-finite, or out-of-range input.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        /// Offending field or parameter
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// Reference date that is not `YYYY-MM-DD`.
    #[error("Invalid date: {value}")]
    InvalidDate {
        /// The rejected input
        value: String,
    },
}

impl ValuationError {
    pub(crate) fn division_by_zero(quantity: impl Into<String>) -> Self {
        Self::DivisionByZero {
            quantity: quantity.into(),
        }
    }

    pub(crate) fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Reject a non-finite intermediate figure.
pub(crate) fn finite(quantity: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValuationError::division_by_zero(quantity))
    }
}
