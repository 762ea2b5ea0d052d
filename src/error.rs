use thiserror::Error;

use crate::data::UserId;

/// Main error type for topn-eval
#[derive(Error, Debug)]
pub enum EvalError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding errors (datasets, recommendation lists)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Item selector expression could not be compiled
    #[error("Selector error: {0}")]
    Selector(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// User not present in the test data
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),
}

/// Convenient Result type using EvalError
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvalError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_selector_error_display() {
        let err = EvalError::Selector("unknown term `user.foo`".to_string());
        assert_eq!(err.to_string(), "Selector error: unknown term `user.foo`");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<i64>>("not json").unwrap_err();
        let eval_err: EvalError = json_err.into();
        assert!(matches!(eval_err, EvalError::Json(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let eval_err: EvalError = io_err.into();
        assert!(matches!(eval_err, EvalError::Io(_)));
    }
}
