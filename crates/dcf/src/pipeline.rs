//! Single-company valuation pipeline.

use dcf_data::{DataError, PriceHistory, StatementBundle, StatementSource};
use dcf_valuation::{
    CashFlow, ConfigError, CostOfCapital, Evaluation, Metric, Normalizer, Period, ValuationConfig,
    ValuationError, ValuationInputs, aggregate, compare, invested_capital, match_price, project,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a company's valuation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be loaded or parsed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A valuation stage failed.
    #[error("Valuation error: {0}")]
    Valuation(#[from] ValuationError),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Runs every valuation stage for one company at a time.
///
/// Holds only the configuration; each run builds its own intermediates, so
/// runs for different companies share no state.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    config: ValuationConfig,
}

impl Pipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: ValuationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub const fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Value the company in `bundle` against `prices`.
    pub fn run(&self, bundle: &StatementBundle, prices: &PriceHistory) -> Result<Evaluation> {
        let symbol = bundle.symbol.as_str();
        debug!(symbol, filing_date = %bundle.filing_date, "starting valuation");

        let normalizer = Normalizer::new(self.config.macro_inputs);
        let current = normalizer.normalize(&bundle.current, Period::Current)?;
        let prior = normalizer.normalize(&bundle.prior, Period::Prior)?;

        let matched_price = match_price(
            prices,
            bundle.filing_date,
            self.config.price_match_window_days,
        )?;
        let market_capitalization =
            matched_price.close * current.require(Metric::OutstandingShares)?;
        debug!(symbol, market_capitalization, "derived market capitalization");

        let projection = project(&current, &prior);

        let current_cost_of_capital = CostOfCapital::compute(&current, market_capitalization)?;
        let projected_cost_of_capital =
            CostOfCapital::compute(&projection.metrics, market_capitalization)?;

        let current_cash_flow = CashFlow::compute(
            &current,
            invested_capital(&prior)?,
            &current_cost_of_capital,
        )?;
        let projected_cash_flow = CashFlow::compute(
            &projection.metrics,
            current_cash_flow.invested_capital,
            &projected_cost_of_capital,
        )?;

        let inputs = ValuationInputs::new(&current_cash_flow, &projected_cash_flow, &current)?;
        let result = aggregate(&inputs, &self.config.calibration)?;
        let comparison = compare(result.per_share_value, matched_price.close);

        info!(
            symbol,
            per_share_value = result.per_share_value,
            observed_price = matched_price.close,
            difference = comparison.difference,
            verdict = %comparison.verdict,
            "valuation complete"
        );

        Ok(Evaluation {
            symbol: bundle.symbol.clone(),
            filing_date: bundle.filing_date,
            config: self.config,
            current,
            prior,
            projection,
            matched_price,
            market_capitalization,
            current_cost_of_capital,
            projected_cost_of_capital,
            current_cash_flow,
            projected_cash_flow,
            result,
            comparison,
        })
    }

    /// Load `symbol` from `source` and value it.
    pub fn run_from_source<S: StatementSource>(
        &self,
        source: &S,
        symbol: &str,
        prices: &PriceHistory,
    ) -> Result<Evaluation> {
        let bundle = source.load(symbol)?;
        self.run(&bundle, prices)
    }

    /// Value several companies independently.
    ///
    /// A failure is logged and returned in place; it does not stop the
    /// remaining runs.
    pub fn run_many<'a, I>(&self, companies: I) -> Vec<(String, Result<Evaluation>)>
    where
        I: IntoIterator<Item = (&'a StatementBundle, &'a PriceHistory)>,
    {
        companies
            .into_iter()
            .map(|(bundle, prices)| {
                let outcome = self.run(bundle, prices);
                if let Err(e) = &outcome {
                    warn!(symbol = %bundle.symbol, error = %e, "valuation failed");
                }
                (bundle.symbol.clone(), outcome)
            })
            .collect()
    }
}
