//! Evaluation framework: first-hit rank, reciprocal rank, MRR metric and runs.

pub mod accumulator;
pub mod mrr;
pub mod rank;
pub mod row;
pub mod run;
pub mod selector;

pub use accumulator::{DualMeanAccumulator, MeanAccumulator};
pub use mrr::{AggregateResult, DiagnosticSink, LogSink, MetricContext, TopNMrrMetric, UserResult};
pub use rank::{find_rank, reciprocal_rank};
pub use row::MetricRow;
pub use run::{evaluate, EvalReport, UserRow};
pub use selector::{compile_selector, from_fn, ItemSelector, SelectorExpr};
