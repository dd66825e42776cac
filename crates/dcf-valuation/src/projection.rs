//! One-period metric projection.
//!
//! Each metric is extrapolated one period ahead by its year-over-year growth:
//!
//! ```text
//! growth    = (current - prior) / current
//! projected = current * (1 + growth)
//! ```
//!
//! Growth is measured against the current value, not the prior one. This is a
//! single linear step with no smoothing or mean reversion and it will overshoot
//! for volatile line items.

use crate::metrics::{Metric, MetricSet, Period};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Why a metric was not projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The prior period has no value for the metric.
    MissingPrior,
    /// The current value is zero, so growth is undefined.
    ZeroCurrent,
    /// Growth or the projected value overflowed.
    NonFinite,
}

/// Per-metric result of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    /// The metric was extrapolated.
    Projected {
        /// Growth rate applied
        growth: f64,
        /// Projected value
        value: f64,
    },
    /// The metric was left out of the projected set.
    Skipped {
        /// Why
        reason: SkipReason,
    },
}

/// Projected metric set plus what happened to each metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Metrics for [`Period::Projected`]; skipped metrics are absent
    pub metrics: MetricSet,
    /// Outcome for every metric present in the current set
    pub outcomes: BTreeMap<Metric, Outcome>,
}

impl Projection {
    /// Outcome for `metric`, if it was present in the current set.
    pub fn outcome(&self, metric: Metric) -> Option<Outcome> {
        self.outcomes.get(&metric).copied()
    }

    /// Metrics that were extrapolated.
    pub fn projected(&self) -> impl Iterator<Item = Metric> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Projected { .. }))
            .map(|(m, _)| *m)
    }

    /// Metrics that were skipped, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (Metric, SkipReason)> + '_ {
        self.outcomes.iter().filter_map(|(m, o)| match o {
            Outcome::Skipped { reason } => Some((*m, *reason)),
            Outcome::Projected { .. } => None,
        })
    }
}

/// Extrapolate `current` one period ahead using `prior`.
///
/// Never fails: a metric that cannot be projected is recorded as skipped and
/// the rest are still projected. Macro inputs carry over from `current`.
pub fn project(current: &MetricSet, prior: &MetricSet) -> Projection {
    let mut metrics = MetricSet::new(Period::Projected, *current.macro_inputs());
    let mut outcomes = BTreeMap::new();

    for (metric, value) in current.iter() {
        let outcome = if value == 0.0 {
            Outcome::Skipped {
                reason: SkipReason::ZeroCurrent,
            }
        } else if let Some(prior_value) = prior.get(metric) {
            let growth = (value - prior_value) / value;
            let projected = value * (1.0 + growth);
            if growth.is_finite() && projected.is_finite() {
                metrics.insert(metric, projected);
                Outcome::Projected {
                    growth,
                    value: projected,
                }
            } else {
                Outcome::Skipped {
                    reason: SkipReason::NonFinite,
                }
            }
        } else {
            Outcome::Skipped {
                reason: SkipReason::MissingPrior,
            }
        };

        if let Outcome::Skipped { reason } = outcome {
            warn!(%metric, ?reason, "metric not projected");
        }
        outcomes.insert(metric, outcome);
    }

    debug!(
        projected = metrics.len(),
        skipped = outcomes.len() - metrics.len(),
        "projected metrics one period ahead"
    );
    Projection { metrics, outcomes }
}
