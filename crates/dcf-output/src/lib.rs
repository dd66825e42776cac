#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

#[cfg(test)]
mod fixtures;

pub use export::{ExportError, ExportFormat, ExportRow, Exporter, ValuationExport};
pub use report::{Report, ReportError};
pub use summary::ValuationSummary;
