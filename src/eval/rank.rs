//! First-hit rank and reciprocal rank for a single ranked list.

use crate::data::ItemId;
use std::collections::HashSet;

/// 1-based position of the first item in `ranked` that is in `good`.
///
/// Stops at the first hit. Returns `None` for an empty list, an empty good set,
/// or a list with no good item.
pub fn find_rank(ranked: &[ItemId], good: &HashSet<ItemId>) -> Option<usize> {
    if good.is_empty() {
        return None;
    }
    ranked
        .iter()
        .position(|item| good.contains(item))
        .map(|idx| idx + 1)
}

/// `1/rank`, or 0.0 when no good item was found. Ranks are 1-based.
pub fn reciprocal_rank(rank: Option<usize>) -> f64 {
    match rank {
        Some(r) => {
            debug_assert!(r >= 1, "ranks are 1-based, got {}", r);
            1.0 / r as f64
        }
        None => 0.0,
    }
}
