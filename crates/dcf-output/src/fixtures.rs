use chrono::NaiveDate;
use dcf_data::PricePoint;
use dcf_valuation::{
    CashFlow, CostOfCapital, Evaluation, Metric, MetricSet, Period, ValuationConfig,
    ValuationInputs, aggregate, compare, invested_capital, project,
};

fn metric_set(period: Period, config: &ValuationConfig, values: &[(Metric, f64)]) -> MetricSet {
    values
        .iter()
        .fold(MetricSet::new(period, config.macro_inputs), |s, (m, v)| s.with(*m, *v))
}

/// Evaluation of a synthetic company whose current cash flow is
/// NOPLAT 79, invested capital 200 (prior 170), free cash flow 49.
pub(crate) fn sample_evaluation() -> Evaluation {
    let config = ValuationConfig::default();
    let current = metric_set(
        Period::Current,
        &config,
        &[
            (Metric::Ebitda, 100.0),
            (Metric::IncomeTaxExpense, 21.0),
            (Metric::Revenue, 400.0),
            (Metric::TotalCurrentAssets, 500.0),
            (Metric::TotalCurrentLiabilities, 300.0),
            (Metric::Beta, 1.2),
            (Metric::LongTermDebt, 200.0),
            (Metric::Cash, 50.0),
            (Metric::OtherNonCurrentAssets, 10.0),
            (Metric::OtherCurrentAssets, 5.0),
            (Metric::CommercialPaper, 0.0),
            (Metric::NetDebt, 150.0),
            (Metric::OutstandingShares, 50.0),
        ],
    );
    let prior = metric_set(
        Period::Prior,
        &config,
        &[
            (Metric::Ebitda, 90.0),
            (Metric::IncomeTaxExpense, 19.0),
            (Metric::TotalCurrentAssets, 450.0),
            (Metric::TotalCurrentLiabilities, 280.0),
            (Metric::Beta, 1.2),
            (Metric::LongTermDebt, 200.0),
        ],
    );

    let date = NaiveDate::from_ymd_opt(2023, 11, 3).unwrap();
    let matched_price = PricePoint::new(date, 20.0);
    let market_capitalization = 1000.0;

    let projection = project(&current, &prior);
    let current_cost = CostOfCapital::compute(&current, market_capitalization).unwrap();
    let projected_cost = CostOfCapital::compute(&projection.metrics, market_capitalization).unwrap();
    let current_flow =
        CashFlow::compute(&current, invested_capital(&prior).unwrap(), &current_cost).unwrap();
    let projected_flow =
        CashFlow::compute(&projection.metrics, current_flow.invested_capital, &projected_cost)
            .unwrap();
    let inputs = ValuationInputs::new(&current_flow, &projected_flow, &current).unwrap();
    let result = aggregate(&inputs, &config.calibration).unwrap();
    let comparison = compare(result.per_share_value, matched_price.close);

    Evaluation {
        symbol: "TEST".to_string(),
        filing_date: date,
        config,
        current,
        prior,
        projection,
        matched_price,
        market_capitalization,
        current_cost_of_capital: current_cost,
        projected_cost_of_capital: projected_cost,
        current_cash_flow: current_flow,
        projected_cash_flow: projected_flow,
        result,
        comparison,
    }
}
