// src/merge.rs
//! Cross-source ranking and batch slicing. The sort must be stable: within a
//! single source the scan order is preserved, and it decides ties across
//! equal sort keys.

use std::cmp::Ordering;

use crate::item::Item;

/// Sort items into one global ranking: descending by score, then descending
/// by raw upvotes, stable beyond that. Items without a score rank last.
pub fn merge(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(rank_key);
    items
}

fn rank_key(a: &Item, b: &Item) -> Ordering {
    let sa = a.score.unwrap_or(f32::MIN);
    let sb = b.score.unwrap_or(f32::MIN);
    // Scores are clamped finite values; partial_cmp cannot fail on them.
    sb.partial_cmp(&sa)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.upvotes().cmp(&a.upvotes()))
}

/// Partition a ranked sequence into consecutive, non-overlapping windows of
/// the requested sizes. A short input yields short or empty later windows;
/// every requested window is produced either way.
pub fn slice(ordered: Vec<Item>, sizes: &[usize]) -> Vec<Vec<Item>> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut iter = ordered.into_iter();
    for &size in sizes {
        let window: Vec<Item> = iter.by_ref().take(size).collect();
        out.push(window);
    }
    out
}
