pub mod config;
pub mod error;
pub mod data;
pub mod recommend;
pub mod eval;

pub use config::Config;
pub use error::{EvalError, Result};
pub use eval::{evaluate, TopNMrrMetric};
