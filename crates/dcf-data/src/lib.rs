#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod prices;
pub mod record;
pub mod source;
pub mod statement;

pub use error::{DataError, Result};
pub use prices::{PriceHistory, PricePoint};
pub use record::RawStatementRecord;
pub use source::{JsonFileSource, StatementSource};
pub use statement::{StatementBundle, parse_date};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
