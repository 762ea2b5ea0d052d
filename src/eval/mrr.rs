//! Mean reciprocal rank over top-N recommendation lists.
//!
//! A [`TopNMrrMetric`] holds the configuration (good-item selector and column
//! suffix). Each algorithm/dataset run gets its own [`MetricContext`]: measure
//! every test user through it, then read the aggregate.

use crate::config::MetricConfig;
use crate::data::{DataSet, ItemId, TestUser, UserId};
use crate::error::Result;
use crate::eval::accumulator::DualMeanAccumulator;
use crate::eval::rank::{find_rank, reciprocal_rank};
use crate::eval::row::MetricRow;
use crate::eval::selector::{compile_selector, ItemSelector, SelectorExpr, DEFAULT_GOOD_ITEMS};
use crate::recommend::Recommender;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Per-user column: 1-based rank of the first good item (nullable).
pub const RANK_COLUMN: &str = "Rank";
/// Per-user column: reciprocal rank.
pub const RECIP_RANK_COLUMN: &str = "RecipRank";
/// Aggregate column: MRR over all users.
pub const MRR_COLUMN: &str = "MRR";
/// Aggregate column: MRR over users with a good item in their list.
pub const MRR_OF_GOOD_COLUMN: &str = "MRR.OfGood";

pub const USER_COLUMNS: [&str; 2] = [RANK_COLUMN, RECIP_RANK_COLUMN];
pub const AGGREGATE_COLUMNS: [&str; 2] = [MRR_COLUMN, MRR_OF_GOOD_COLUMN];

/// Receives non-fatal diagnostics raised while measuring users.
pub trait DiagnosticSink: Send + Sync {
    /// The selector returned no good items for `user`.
    fn no_good_items(&self, user: UserId);
}

/// Default sink: forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn no_good_items(&self, user: UserId) {
        log::warn!("no good items for user {}", user);
    }
}

/// Outcome for one user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserResult {
    rank: Option<usize>,
    recip_rank: f64,
}

impl UserResult {
    pub fn new(rank: Option<usize>) -> Self {
        Self {
            rank,
            recip_rank: reciprocal_rank(rank),
        }
    }

    /// 1-based rank of the first good item, if any was recommended.
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    pub fn recip_rank(&self) -> f64 {
        self.recip_rank
    }

    pub fn is_hit(&self) -> bool {
        self.rank.is_some()
    }

    pub fn to_row(&self, suffix: Option<&str>) -> MetricRow {
        let mut row = MetricRow::new();
        row.insert(RANK_COLUMN, suffix, self.rank.map(|r| r as u64));
        row.insert(RECIP_RANK_COLUMN, suffix, self.recip_rank);
        row
    }
}

/// Aggregate over every user measured so far.
///
/// Either mean is `NaN` when no user contributed to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateResult {
    /// MRR over all users; users without a hit count as 0.
    pub mrr: f64,
    /// MRR over only the users whose list contained a good item.
    pub mrr_of_good: f64,
    pub users: u64,
    pub good_users: u64,
}

impl AggregateResult {
    fn from_accumulator(acc: &DualMeanAccumulator) -> Self {
        Self {
            mrr: acc.all_mean(),
            mrr_of_good: acc.good_mean(),
            users: acc.all_count(),
            good_users: acc.good_count(),
        }
    }

    pub fn to_row(&self, suffix: Option<&str>) -> MetricRow {
        let mut row = MetricRow::new();
        row.insert(MRR_COLUMN, suffix, self.mrr);
        row.insert(MRR_OF_GOOD_COLUMN, suffix, self.mrr_of_good);
        row
    }
}

/// Configured MRR metric.
pub struct TopNMrrMetric {
    good_items: Box<dyn ItemSelector>,
    suffix: Option<String>,
}

impl Default for TopNMrrMetric {
    /// Users' test items are the good items; no column suffix.
    fn default() -> Self {
        Self::new(SelectorExpr::user_test_items(), None)
    }
}

impl TopNMrrMetric {
    pub fn new(good_items: impl ItemSelector + 'static, suffix: Option<String>) -> Self {
        Self {
            good_items: Box::new(good_items),
            suffix,
        }
    }

    /// Build from the `[metric]` config section.
    ///
    /// A missing selector falls back to `user.testItems`. Fails with
    /// `EvalError::Selector` if the expression does not compile, so a bad
    /// configuration is caught before any user is measured.
    pub fn from_config(config: &MetricConfig) -> Result<Self> {
        let expr = config.good_items.as_deref().unwrap_or(DEFAULT_GOOD_ITEMS);
        let selector = compile_selector(expr)?;
        log::debug!("MRR metric: good items = {}", selector);
        Ok(Self::new(selector, config.suffix.clone()))
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Start a run of one recommender over one dataset. Diagnostics go to the log.
    pub fn create_context<'a>(
        &'a self,
        dataset: &DataSet,
        recommender: &'a dyn Recommender,
    ) -> MetricContext<'a> {
        self.create_context_with_sink(dataset, recommender, &LogSink)
    }

    pub fn create_context_with_sink<'a>(
        &'a self,
        dataset: &DataSet,
        recommender: &'a dyn Recommender,
        sink: &'a dyn DiagnosticSink,
    ) -> MetricContext<'a> {
        MetricContext {
            metric: self,
            universe: dataset.universe().clone(),
            recommender,
            sink,
            accumulator: Mutex::new(DualMeanAccumulator::new()),
        }
    }
}

/// State for one algorithm/dataset run.
///
/// `measure_user` takes `&self`; the accumulator sits behind a mutex, so a
/// context can be shared by worker threads measuring different users.
pub struct MetricContext<'a> {
    metric: &'a TopNMrrMetric,
    universe: HashSet<ItemId>,
    recommender: &'a dyn Recommender,
    sink: &'a dyn DiagnosticSink,
    accumulator: Mutex<DualMeanAccumulator>,
}

impl<'a> MetricContext<'a> {
    /// Measure one user's top-N list and fold it into the running means.
    ///
    /// `target_length` is the list length the harness asked for; the ranked
    /// list is used as given.
    pub fn measure_user(&self, user: &TestUser, target_length: usize, ranked: &[ItemId]) -> UserResult {
        let good = self
            .metric
            .good_items
            .select_items(&self.universe, self.recommender, user);
        if good.is_empty() {
            self.sink.no_good_items(user.user_id);
        }

        let result = UserResult::new(find_rank(ranked, &good));
        log::debug!(
            "user {}: rank {:?} of {} (target {}), {} good items",
            user.user_id,
            result.rank(),
            ranked.len(),
            target_length,
            good.len()
        );

        self.accumulator().add_user(result.recip_rank(), result.is_hit());
        result
    }

    /// Current aggregate. May be read mid-run or repeatedly.
    pub fn aggregate(&self) -> AggregateResult {
        AggregateResult::from_accumulator(&self.accumulator())
    }

    pub fn universe(&self) -> &HashSet<ItemId> {
        &self.universe
    }

    pub fn suffix(&self) -> Option<&str> {
        self.metric.suffix()
    }

    // The accumulator only holds a sum and a count, so a poisoned lock still
    // guards consistent state.
    fn accumulator(&self) -> MutexGuard<'_, DualMeanAccumulator> {
        self.accumulator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
