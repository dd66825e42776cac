//! Intrinsic value against the observed market price.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the model judges the market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    /// Intrinsic value above the observed price.
    Undervalued,
    /// Intrinsic value below the observed price.
    Overvalued,
    /// Intrinsic value equal to the observed price.
    FairlyValued,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Undervalued => "undervalued",
            Self::Overvalued => "overvalued",
            Self::FairlyValued => "fairly valued",
        };
        f.write_str(s)
    }
}

/// Outcome of [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Model per-share value
    pub intrinsic_value: f64,
    /// Matched closing price
    pub observed_price: f64,
    /// `intrinsic_value - observed_price`
    pub difference: f64,
    /// Sign of the difference
    pub verdict: Verdict,
}

impl Comparison {
    /// Difference as a fraction of intrinsic value, `None` when intrinsic value is zero.
    pub fn margin_of_safety(&self) -> Option<f64> {
        (self.intrinsic_value != 0.0).then(|| self.difference / self.intrinsic_value)
    }
}

/// Compare a per-share value with an observed price.
///
/// A positive difference means the model judges the company undervalued.
pub fn compare(per_share_value: f64, observed_price: f64) -> Comparison {
    let difference = per_share_value - observed_price;
    let verdict = if difference > 0.0 {
        Verdict::Undervalued
    } else if difference < 0.0 {
        Verdict::Overvalued
    } else {
        Verdict::FairlyValued
    };

    Comparison {
        intrinsic_value: per_share_value,
        observed_price,
        difference,
        verdict,
    }
}
