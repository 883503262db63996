// src/assemble.rs
//! Final batch contract handed to the serializer: every requested batch name
//! is produced exactly once, even when empty, and item order inside a batch
//! is frozen here.

use serde::Serialize;

use crate::item::Item;
use crate::merge;
use crate::tier::Tier;

/// A named, ordered output grouping of items.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub name: String,
    pub items: Vec<Item>,
}

/// One requested output window: a batch name plus its size.
#[derive(Debug, Clone)]
pub struct BatchSpec {
    pub name: String,
    pub size: usize,
}

impl BatchSpec {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// The default cross-source plan: four windows of ten.
pub fn default_plan() -> Vec<BatchSpec> {
    ["top", "hot", "trending", "fresh"]
        .into_iter()
        .map(|name| BatchSpec::new(name, 10))
        .collect()
}

/// Slice a merged ranking into the planned batches and stamp each item's
/// tier from its score. Order is taken from the merger unchanged.
pub fn assemble_merged(plan: &[BatchSpec], ordered: Vec<Item>) -> Vec<Batch> {
    let sizes: Vec<usize> = plan.iter().map(|s| s.size).collect();
    let windows = merge::slice(ordered, &sizes);

    plan.iter()
        .zip(windows)
        .map(|(spec, mut items)| {
            for it in &mut items {
                if let Some(score) = it.score {
                    it.tier = Some(Tier::for_score(score));
                }
            }
            Batch {
                name: spec.name.clone(),
                items,
            }
        })
        .collect()
}

/// Per-source mode: adapter scan order preserved, truncated to `cap`,
/// no re-sorting and no tier labels.
pub fn assemble_per_source(name: impl Into<String>, mut items: Vec<Item>, cap: usize) -> Batch {
    items.truncate(cap);
    Batch {
        name: name.into(),
        items,
    }
}
