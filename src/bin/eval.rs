//! Evaluation CLI: measure precomputed top-N lists against a test split and report MRR.

use clap::Parser;
use std::path::PathBuf;
use topn_eval::{
    data::DataSet,
    eval::{evaluate, TopNMrrMetric},
    recommend::PrecomputedRecommender,
    Config,
};

/// Evaluation framework: run MRR over test users and report the aggregate.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Path to the test dataset JSON.
    #[arg(long)]
    dataset: PathBuf,

    /// Path to precomputed recommendation lists JSON ({"<user>": [items...]}).
    #[arg(long)]
    recommendations: PathBuf,

    /// Top-N list length (overrides eval.list_size from config).
    #[arg(long)]
    list_size: Option<usize>,

    /// Also print one JSON row per user.
    #[arg(long)]
    per_user: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.eval.log_level.as_str()),
    )
    .init();

    let metric = TopNMrrMetric::from_config(&config.metric)?;

    let mut dataset = DataSet::from_json_path(&args.dataset)
        .map_err(|e| anyhow::anyhow!("Failed to load dataset {}: {}", args.dataset.display(), e))?;
    if let Some(name) = config.eval.dataset_name.clone() {
        dataset.name = name;
    }
    if dataset.users().is_empty() {
        anyhow::bail!("No test users in {}", args.dataset.display());
    }

    let recommender = PrecomputedRecommender::from_json_path(&args.recommendations).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load recommendations {}: {}",
            args.recommendations.display(),
            e
        )
    })?;

    let list_size = args.list_size.unwrap_or(config.eval.list_size);
    if list_size == 0 {
        anyhow::bail!("--list-size must be greater than 0");
    }

    log::info!(
        "Running MRR on {} ({} users, top-{})",
        dataset.name,
        dataset.users().len(),
        list_size
    );

    let report = evaluate(&metric, &dataset, &recommender, list_size);

    if args.per_user {
        for row in &report.user_rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    println!("{}", serde_json::to_string(&report.aggregate)?);

    Ok(())
}
