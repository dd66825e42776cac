//! Statement normalization.
//!
//! Provider records are arbitrarily shaped; the valuation reads a flat
//! [`MetricSet`]. Extraction is driven by [`FIELD_MAP`], which lists for each
//! metric the provider keys to try (in order) and what to do when none of them
//! yields a value. Adding a metric or an alias key is a table edit.

use crate::config::MacroInputs;
use crate::error::{Result, ValuationError};
use crate::metrics::{Metric, MetricSet, Period};
use dcf_data::record::{Leaf, RawStatementRecord};
use tracing::debug;

/// What to do when a metric is absent from the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Absence {
    /// Fail with `MissingField`.
    Fail,
    /// Substitute this value.
    Default(f64),
    /// Leave the metric out of the set. Only for metrics nothing downstream reads.
    Omit,
}

/// Extraction rule for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Target metric
    pub metric: Metric,
    /// Provider keys, tried in order
    pub keys: &'static [&'static str],
    /// Policy when no key yields a value
    pub absence: Absence,
    /// Whether a `Fail` policy also applies to the prior period.
    ///
    /// The prior period only feeds growth rates and the prior invested
    /// capital, so other metrics missing there are left out of the set.
    pub required_in_prior: bool,
}

/// The field map for the financial-statement provider's record layout.
pub const FIELD_MAP: &[FieldSpec] = &[
    FieldSpec {
        metric: Metric::Ebitda,
        keys: &["ebitda"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::IncomeTaxExpense,
        keys: &["incomeTaxExpense"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::Revenue,
        keys: &["revenue"],
        absence: Absence::Omit,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::TotalCurrentAssets,
        keys: &["totalCurrentAssets"],
        absence: Absence::Fail,
        required_in_prior: true,
    },
    FieldSpec {
        metric: Metric::TotalCurrentLiabilities,
        keys: &["totalCurrentLiabilities"],
        absence: Absence::Fail,
        required_in_prior: true,
    },
    FieldSpec {
        metric: Metric::Beta,
        keys: &["beta"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::LongTermDebt,
        keys: &["longTermDebt"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::Cash,
        keys: &[
            "cashAndCashEquivalents",
            "cash",
            "cashAndShortTermInvestments",
        ],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::OtherNonCurrentAssets,
        keys: &["otherNonCurrentAssets"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::OtherCurrentAssets,
        keys: &["otherCurrentAssets"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::CommercialPaper,
        keys: &["commercialPaper"],
        absence: Absence::Default(0.0),
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::NetDebt,
        keys: &["netDebt"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
    FieldSpec {
        metric: Metric::OutstandingShares,
        keys: &["outstandingShares", "numberOfShares"],
        absence: Absence::Fail,
        required_in_prior: false,
    },
];

/// Turns raw statement records into metric sets.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    macro_inputs: MacroInputs,
    fields: &'static [FieldSpec],
}

impl Normalizer {
    /// Create a normalizer using [`FIELD_MAP`].
    pub const fn new(macro_inputs: MacroInputs) -> Self {
        Self::with_fields(macro_inputs, FIELD_MAP)
    }

    /// Create a normalizer with a custom field map.
    pub const fn with_fields(macro_inputs: MacroInputs, fields: &'static [FieldSpec]) -> Self {
        Self {
            macro_inputs,
            fields,
        }
    }

    /// Extract the metric set for `period` from `record`.
    pub fn normalize(&self, record: &RawStatementRecord, period: Period) -> Result<MetricSet> {
        let mut set = MetricSet::new(period, self.macro_inputs);

        for spec in self.fields {
            match extract(record, spec)? {
                Some(value) => set.insert(spec.metric, value),
                None => match spec.absence {
                    Absence::Default(value) => {
                        debug!(metric = %spec.metric, %period, value, "using default for absent field");
                        set.insert(spec.metric, value);
                    }
                    Absence::Omit => {}
                    Absence::Fail if period == Period::Prior && !spec.required_in_prior => {
                        debug!(metric = %spec.metric, "absent from prior period");
                    }
                    Absence::Fail => {
                        return Err(ValuationError::MissingField {
                            metric: spec.metric,
                            period,
                        });
                    }
                },
            }
        }

        if let Some(shares) = set.get(Metric::OutstandingShares)
            && shares <= 0.0
        {
            return Err(ValuationError::invalid_input(
                Metric::OutstandingShares.key(),
                format!("must be positive, got {shares}"),
            ));
        }

        debug!(%period, metrics = set.len(), "normalized statement record");
        Ok(set)
    }
}

/// First usable value among `spec.keys`.
fn extract(record: &RawStatementRecord, spec: &FieldSpec) -> Result<Option<f64>> {
    for key in spec.keys {
        match record.lookup(key) {
            Leaf::Missing => continue,
            Leaf::Number(value) if value.is_finite() => return Ok(Some(value)),
            Leaf::Number(value) => {
                return Err(ValuationError::invalid_input(
                    spec.metric.key(),
                    format!("{key} must be finite, got {value}"),
                ));
            }
            Leaf::Other(value) => {
                return Err(ValuationError::invalid_input(
                    spec.metric.key(),
                    format!("{key}: expected a number, got {value}"),
                ));
            }
        }
    }
    Ok(None)
}
