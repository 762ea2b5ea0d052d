//! One evaluation run: a recommender against every test user of a dataset.

use crate::data::{DataSet, UserId};
use crate::eval::mrr::{AggregateResult, TopNMrrMetric};
use crate::eval::row::MetricRow;
use crate::recommend::Recommender;
use serde::Serialize;
use std::time::Instant;

/// Per-user output row tagged with its user.
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub user_id: UserId,
    #[serde(flatten)]
    pub row: MetricRow,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub dataset: String,
    pub list_size: usize,
    pub user_rows: Vec<UserRow>,
    pub aggregate: MetricRow,
    #[serde(skip)]
    pub result: AggregateResult,
}

/// Ask `recommender` for a top-`list_size` list for each test user, measure it,
/// and read out the aggregate.
pub fn evaluate(
    metric: &TopNMrrMetric,
    dataset: &DataSet,
    recommender: &dyn Recommender,
    list_size: usize,
) -> EvalReport {
    let start = Instant::now();
    let context = metric.create_context(dataset, recommender);
    let suffix = metric.suffix();

    let user_rows = dataset
        .users()
        .iter()
        .map(|user| {
            let ranked = recommender.recommend(user.user_id, list_size);
            let result = context.measure_user(user, list_size, &ranked);
            UserRow {
                user_id: user.user_id,
                row: result.to_row(suffix),
            }
        })
        .collect::<Vec<_>>();

    let result = context.aggregate();
    log::info!(
        "Evaluated {} users on {} in {:?}: MRR {:.4}, MRR.OfGood {:.4} ({} users with a hit)",
        result.users,
        dataset.name,
        start.elapsed(),
        result.mrr,
        result.mrr_of_good,
        result.good_users
    );

    EvalReport {
        dataset: dataset.name.clone(),
        list_size,
        user_rows,
        aggregate: result.to_row(suffix),
        result,
    }
}
