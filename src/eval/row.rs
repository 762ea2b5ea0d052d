//! Metric output rows handed to the evaluation harness.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of metric columns. Column order is by name.
///
/// Absent values (and non-finite numbers such as a `NaN` mean) are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricRow(BTreeMap<String, Value>);

impl MetricRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column, appending `.<suffix>` to its name when a suffix is set.
    pub fn insert(&mut self, column: &str, suffix: Option<&str>, value: impl Into<Value>) {
        self.0.insert(column_name(column, suffix), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Column name as the harness sees it.
pub fn column_name(column: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(sfx) => format!("{}.{}", column, sfx),
        None => column.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_suffix() {
        assert_eq!(column_name("MRR", None), "MRR");
        assert_eq!(column_name("MRR", Some("rated")), "MRR.rated");
    }

    #[test]
    fn test_nan_becomes_null() {
        let mut row = MetricRow::new();
        row.insert("MRR", None, f64::NAN);
        assert_eq!(row.get("MRR"), Some(&Value::Null));
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"MRR":null}"#);
    }

    #[test]
    fn test_missing_value_is_null() {
        let mut row = MetricRow::new();
        row.insert("Rank", Some("x"), None::<u64>);
        assert_eq!(row.get("Rank.x"), Some(&Value::Null));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["Rank.x"]);
    }
}
