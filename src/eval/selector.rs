//! Good-item selection: which items count as correct recommendations for a user.
//!
//! Selectors are injected into the metric. Either wrap a closure with
//! [`from_fn`], or compile a small expression with [`compile_selector`]:
//!
//! ```text
//! user.testItems                    held-out test items (default)
//! user.trainItems                   training items
//! allItems                          every item in the universe
//! user.testItems(rating >= 4.0)     test items whose rating passes the filter
//! a + b, a - b, a & b               union, difference, intersection (left to right)
//! ```

use crate::data::{ItemId, TestUser};
use crate::error::{EvalError, Result};
use crate::recommend::Recommender;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Expression used when no selector is configured.
pub const DEFAULT_GOOD_ITEMS: &str = "user.testItems";

/// Resolves the set of good items for one user.
pub trait ItemSelector: Send + Sync {
    fn select_items(
        &self,
        universe: &HashSet<ItemId>,
        recommender: &dyn Recommender,
        user: &TestUser,
    ) -> HashSet<ItemId>;
}

/// Selector backed by a closure. Build with [`from_fn`].
pub struct FnSelector<F>(F);

/// Wrap a closure as an [`ItemSelector`].
pub fn from_fn<F>(f: F) -> FnSelector<F>
where
    F: Fn(&HashSet<ItemId>, &dyn Recommender, &TestUser) -> HashSet<ItemId> + Send + Sync,
{
    FnSelector(f)
}

impl<F> ItemSelector for FnSelector<F>
where
    F: Fn(&HashSet<ItemId>, &dyn Recommender, &TestUser) -> HashSet<ItemId> + Send + Sync,
{
    fn select_items(
        &self,
        universe: &HashSet<ItemId>,
        recommender: &dyn Recommender,
        user: &TestUser,
    ) -> HashSet<ItemId> {
        (self.0)(universe, recommender, user)
    }
}

/// Comparison used by rating filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOp {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
}

impl RatingOp {
    fn parse(op: &str) -> Option<Self> {
        match op {
            ">=" => Some(Self::Ge),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            "<" => Some(Self::Lt),
            "==" => Some(Self::Eq),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Lt => "<",
            Self::Eq => "==",
        }
    }

    fn accepts(self, rating: f64, threshold: f64) -> bool {
        match self {
            Self::Ge => rating >= threshold,
            Self::Gt => rating > threshold,
            Self::Le => rating <= threshold,
            Self::Lt => rating < threshold,
            Self::Eq => rating == threshold,
        }
    }
}

/// Compiled selector expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorExpr {
    TestItems,
    TrainItems,
    AllItems,
    RatedTestItems { op: RatingOp, threshold: f64 },
    Union(Box<SelectorExpr>, Box<SelectorExpr>),
    Difference(Box<SelectorExpr>, Box<SelectorExpr>),
    Intersection(Box<SelectorExpr>, Box<SelectorExpr>),
}

impl SelectorExpr {
    /// The default selector: the user's held-out test items.
    pub fn user_test_items() -> Self {
        Self::TestItems
    }
}

impl fmt::Display for SelectorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestItems => write!(f, "user.testItems"),
            Self::TrainItems => write!(f, "user.trainItems"),
            Self::AllItems => write!(f, "allItems"),
            Self::RatedTestItems { op, threshold } => {
                write!(f, "user.testItems(rating {} {})", op.as_str(), threshold)
            }
            Self::Union(a, b) => write!(f, "{} + {}", a, b),
            Self::Difference(a, b) => write!(f, "{} - {}", a, b),
            Self::Intersection(a, b) => write!(f, "{} & {}", a, b),
        }
    }
}

impl ItemSelector for SelectorExpr {
    fn select_items(
        &self,
        universe: &HashSet<ItemId>,
        recommender: &dyn Recommender,
        user: &TestUser,
    ) -> HashSet<ItemId> {
        match self {
            Self::TestItems => user.test_item_ids(),
            Self::TrainItems => user.train_items.clone(),
            Self::AllItems => universe.clone(),
            Self::RatedTestItems { op, threshold } => user
                .test_items
                .iter()
                .filter(|(_, rating)| op.accepts(**rating, *threshold))
                .map(|(&item, _)| item)
                .collect(),
            Self::Union(a, b) => {
                let mut items = a.select_items(universe, recommender, user);
                items.extend(b.select_items(universe, recommender, user));
                items
            }
            Self::Difference(a, b) => {
                let mut items = a.select_items(universe, recommender, user);
                for item in b.select_items(universe, recommender, user) {
                    items.remove(&item);
                }
                items
            }
            Self::Intersection(a, b) => {
                let items = a.select_items(universe, recommender, user);
                let other = b.select_items(universe, recommender, user);
                items.into_iter().filter(|i| other.contains(i)).collect()
            }
        }
    }
}

fn rating_filter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^user\.testItems\(\s*rating\s*(>=|<=|==|>|<)\s*(-?\d+(?:\.\d+)?)\s*\)$")
            .expect("Invalid regex pattern")
    })
}

fn compile_term(term: &str) -> Result<SelectorExpr> {
    match term {
        "user.testItems" => return Ok(SelectorExpr::TestItems),
        "user.trainItems" => return Ok(SelectorExpr::TrainItems),
        "allItems" => return Ok(SelectorExpr::AllItems),
        _ => {}
    }
    let caps = rating_filter_regex()
        .captures(term)
        .ok_or_else(|| EvalError::Selector(format!("unknown selector term `{}`", term)))?;
    let op = RatingOp::parse(&caps[1])
        .ok_or_else(|| EvalError::Selector(format!("bad comparison in `{}`", term)))?;
    let threshold: f64 = caps[2]
        .parse()
        .map_err(|_| EvalError::Selector(format!("bad rating threshold in `{}`", term)))?;
    Ok(SelectorExpr::RatedTestItems { op, threshold })
}

/// Split on top-level `+ - &`, leaving anything inside parentheses alone.
fn split_terms(expr: &str) -> Result<(Vec<&str>, Vec<char>)> {
    let mut terms = Vec::new();
    let mut ops = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in expr.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    EvalError::Selector(format!("unbalanced `)` in `{}`", expr))
                })?;
            }
            '+' | '-' | '&' if depth == 0 => {
                terms.push(expr[start..idx].trim());
                ops.push(ch);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(EvalError::Selector(format!("unbalanced `(` in `{}`", expr)));
    }
    terms.push(expr[start..].trim());
    if let Some(empty) = terms.iter().position(|t| t.is_empty()) {
        return Err(EvalError::Selector(format!(
            "missing operand at term {} of `{}`",
            empty + 1,
            expr
        )));
    }
    Ok((terms, ops))
}

/// Compile a good-items expression.
///
/// Fails with [`EvalError::Selector`] on blank input, unknown terms, or
/// dangling operators.
pub fn compile_selector(expr: &str) -> Result<SelectorExpr> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(EvalError::Selector("empty selector expression".to_string()));
    }
    let (terms, ops) = split_terms(expr)?;
    let mut compiled = compile_term(terms[0])?;
    for (op, term) in ops.into_iter().zip(terms.into_iter().skip(1)) {
        let rhs = Box::new(compile_term(term)?);
        let lhs = Box::new(compiled);
        compiled = match op {
            '+' => SelectorExpr::Union(lhs, rhs),
            '-' => SelectorExpr::Difference(lhs, rhs),
            _ => SelectorExpr::Intersection(lhs, rhs),
        };
    }
    Ok(compiled)
}
