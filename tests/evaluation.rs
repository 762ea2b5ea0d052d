//! End-to-end run: dataset and recommendation files on disk, metric from TOML.

use std::fs;
use tempfile::TempDir;
use topn_eval::{
    data::DataSet, evaluate, recommend::PrecomputedRecommender, Config, TopNMrrMetric,
};

const DATASET: &str = r#"
{
    "name": "ml-tiny",
    "users": [
        {"user_id": 1, "train_items": [1, 2], "test_items": {"3": 5.0, "4": 1.0}},
        {"user_id": 2, "train_items": [1], "test_items": {"2": 4.5}},
        {"user_id": 3, "train_items": [4], "test_items": {"5": 2.0}},
        {"user_id": 4, "train_items": [], "test_items": {}}
    ]
}
"#;

const RECOMMENDATIONS: &str = r#"
{
    "1": [4, 3, 5],
    "2": [2, 3],
    "3": [1, 2, 3],
    "4": [1]
}
"#;

fn load(temp_dir: &TempDir) -> (DataSet, PrecomputedRecommender) {
    let ds_path = temp_dir.path().join("dataset.json");
    let rec_path = temp_dir.path().join("recs.json");
    fs::write(&ds_path, DATASET).unwrap();
    fs::write(&rec_path, RECOMMENDATIONS).unwrap();
    (
        DataSet::from_json_path(&ds_path).unwrap(),
        PrecomputedRecommender::from_json_path(&rec_path).unwrap(),
    )
}

#[test]
fn default_metric_over_test_items() {
    let temp_dir = TempDir::new().unwrap();
    let (dataset, recommender) = load(&temp_dir);

    let report = evaluate(&TopNMrrMetric::default(), &dataset, &recommender, 10);

    // user 1: rank 1 (item 4), user 2: rank 1, user 3: miss, user 4: no good items
    assert_eq!(report.result.users, 4);
    assert_eq!(report.result.good_users, 2);
    assert!((report.result.mrr - 0.5).abs() < 1e-12);
    assert!((report.result.mrr_of_good - 1.0).abs() < 1e-12);
}

#[test]
fn configured_selector_and_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let (dataset, recommender) = load(&temp_dir);
    let config = Config::from_toml_str(
        r#"
[eval]
list_size = 3

[metric]
good_items = "user.testItems(rating >= 4)"
suffix = "liked"
"#,
    )
    .unwrap();
    let metric = TopNMrrMetric::from_config(&config.metric).unwrap();

    let report = evaluate(&metric, &dataset, &recommender, config.eval.list_size);

    // user 1: item 3 at rank 2, user 2: rank 1, users 3 and 4: no liked items
    assert_eq!(report.result.good_users, 2);
    assert!((report.result.mrr - 1.5 / 4.0).abs() < 1e-12);
    assert!((report.result.mrr_of_good - 0.75).abs() < 1e-12);

    let columns: Vec<&str> = report.aggregate.columns().collect();
    assert_eq!(columns, vec!["MRR.OfGood.liked", "MRR.liked"]);
    let first_user: Vec<&str> = report.user_rows[0].row.columns().collect();
    assert_eq!(first_user, vec!["Rank.liked", "RecipRank.liked"]);
}

#[test]
fn empty_run_reports_undefined_means() {
    let dataset = DataSet::new("empty", Vec::new()).unwrap();
    let recommender = PrecomputedRecommender::default();
    let report = evaluate(&TopNMrrMetric::default(), &dataset, &recommender, 10);

    assert!(report.result.mrr.is_nan());
    assert!(report.result.mrr_of_good.is_nan());
    assert_eq!(
        serde_json::to_string(&report.aggregate).unwrap(),
        r#"{"MRR":null,"MRR.OfGood":null}"#
    );
}
