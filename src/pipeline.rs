// src/pipeline.rs
//! One full curation run: fetch all source adapters concurrently, drop
//! previously seen items, classify and score survivors, then assemble the
//! merged and per-source batches. Per-item and per-source failures never
//! abort the run.

use anyhow::{bail, Result};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::assemble::{self, Batch, BatchSpec};
use crate::dedup::DedupStateStore;
use crate::item::{Item, SourceKind};
use crate::merge;
use crate::normalize::normalize_text;
use crate::profile::ProfileSet;
use crate::score::{RelevanceScorer, ScoreOutcome};

/// A source of raw items. Adapters own all provider-specific fetching and
/// parsing; items arrive already mapped to the `Item` shape.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<Item>>;
    /// Human-readable label, also the name of this adapter's per-source batch.
    fn name(&self) -> &str;
    fn kind(&self) -> SourceKind;
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub profiles: ProfileSet,
    /// Cross-source batch plan; every entry is emitted exactly once per run.
    pub plan: Vec<BatchSpec>,
    /// Also emit one capped pass-through batch per adapter.
    pub per_source_feeds: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            profiles: ProfileSet::builtin(),
            plan: assemble::default_plan(),
            per_source_feeds: true,
        }
    }
}

/// Everything a serializer needs, plus run counters for the caller's log line.
#[derive(Debug)]
pub struct RunOutput {
    pub merged: Vec<Batch>,
    pub per_source: Vec<Batch>,
    pub fetched: usize,
    pub deduped: usize,
    pub filtered: usize,
    pub below_floor: usize,
    pub kept: usize,
}

/// One-time metrics registration (so series show up on whatever exporter the
/// host application wires in).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("curator_items_fetched_total", "Raw items yielded by adapters.");
        describe_counter!("curator_items_kept_total", "Items admitted after dedup + classification.");
        describe_counter!("curator_items_deduped_total", "Items dropped by the dedup state.");
        describe_counter!("curator_items_filtered_total", "Items excluded by the classifier/scorer.");
        describe_counter!("curator_adapter_errors_total", "Adapter fetch failures.");
        describe_gauge!("curator_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Run the pipeline once. Adapters are fetched concurrently; everything after
/// that is synchronous and pure. The only hard failure is an empty output
/// contract (no batch plan and per-source feeds disabled).
pub async fn run_once(
    adapters: &[Arc<dyn SourceAdapter>],
    cfg: &RunConfig,
    store: &DedupStateStore,
) -> Result<RunOutput> {
    ensure_metrics_described();

    if cfg.plan.is_empty() && !cfg.per_source_feeds {
        bail!("no output batches configured");
    }

    let mut state = store.load();

    // Fetch all sources concurrently; collect results back into adapter
    // enumeration order so the stable merge sees a deterministic input.
    let mut set = JoinSet::new();
    for (idx, adapter) in adapters.iter().enumerate() {
        let adapter = Arc::clone(adapter);
        set.spawn(async move { (idx, adapter.fetch_items().await) });
    }
    let mut fetches: Vec<Option<Vec<Item>>> = (0..adapters.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, Ok(items))) => fetches[idx] = Some(items),
            Ok((idx, Err(e))) => {
                tracing::warn!(target: "pipeline", adapter = adapters[idx].name(), error = ?e, "adapter fetch failed");
                counter!("curator_adapter_errors_total").increment(1);
            }
            Err(e) => {
                tracing::warn!(target: "pipeline", error = ?e, "adapter task panicked");
                counter!("curator_adapter_errors_total").increment(1);
            }
        }
    }

    let mut fetched = 0usize;
    let mut deduped = 0usize;
    let mut filtered = 0usize;
    let mut below_floor = 0usize;
    let mut survivors: Vec<Item> = Vec::new();
    let mut per_source: Vec<Batch> = Vec::new();

    for (adapter, items) in adapters.iter().zip(fetches) {
        let items = items.unwrap_or_default();
        fetched += items.len();

        let profile = cfg.profiles.for_kind(adapter.kind());
        let scorer = RelevanceScorer::new(profile);
        let mut admitted: Vec<Item> = Vec::with_capacity(items.len());

        for mut item in items {
            // Cheapest rejection first: an already-seen id skips
            // classification and scoring entirely.
            if state.has(&item.id) {
                deduped += 1;
                continue;
            }

            if profile.min_upvotes > 0 && item.upvotes() < profile.min_upvotes {
                below_floor += 1;
                continue;
            }

            item.title = normalize_text(&item.title);
            item.body_text = normalize_text(&item.body_text);

            match scorer.score(&item) {
                ScoreOutcome::Excluded(reason) => {
                    tracing::debug!(target: "pipeline", id = %item.id, ?reason, "item excluded");
                    filtered += 1;
                }
                ScoreOutcome::Included(score) => {
                    item.score = Some(score);
                    state.record(&item.id);
                    admitted.push(item);
                }
            }
        }

        if cfg.per_source_feeds {
            per_source.push(assemble::assemble_per_source(
                adapter.name(),
                admitted.clone(),
                profile.per_source_cap,
            ));
        }
        survivors.extend(admitted);
    }

    let kept = survivors.len();
    let ordered = merge::merge(survivors);
    let merged = assemble::assemble_merged(&cfg.plan, ordered);

    // Persist failure leaves this run's output intact; the next run simply
    // re-sees some items.
    if let Err(e) = store.persist(&mut state) {
        tracing::warn!(target: "pipeline", error = ?e, "failed to persist dedup state");
    }

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    counter!("curator_items_fetched_total").increment(fetched as u64);
    counter!("curator_items_kept_total").increment(kept as u64);
    counter!("curator_items_deduped_total").increment(deduped as u64);
    counter!("curator_items_filtered_total").increment((filtered + below_floor) as u64);
    gauge!("curator_last_run_ts").set(now as f64);

    tracing::info!(
        target: "pipeline",
        fetched,
        kept,
        deduped,
        filtered,
        below_floor,
        merged_batches = merged.len(),
        per_source_batches = per_source.len(),
        "curation run complete"
    );

    Ok(RunOutput {
        merged,
        per_source,
        fetched,
        deduped,
        filtered,
        below_floor,
        kept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyAdapter;

    #[async_trait::async_trait]
    impl SourceAdapter for EmptyAdapter {
        async fn fetch_items(&self) -> Result<Vec<Item>> {
            Ok(Vec::new())
        }
        fn name(&self) -> &str {
            "empty"
        }
        fn kind(&self) -> SourceKind {
            SourceKind::FeedArticle
        }
    }

    #[tokio::test]
    async fn empty_output_contract_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DedupStateStore::new(dir.path().join("state.json"), 100);
        let cfg = RunConfig {
            plan: Vec::new(),
            per_source_feeds: false,
            ..RunConfig::default()
        };
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(EmptyAdapter)];
        assert!(run_once(&adapters, &cfg, &store).await.is_err());
    }

    #[tokio::test]
    async fn zero_adapters_still_emit_planned_batches() {
        let dir = tempfile::tempdir().unwrap();
        let store = DedupStateStore::new(dir.path().join("state.json"), 100);
        let cfg = RunConfig::default();
        let adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();
        let out = run_once(&adapters, &cfg, &store).await.unwrap();
        assert_eq!(out.merged.len(), 4);
        assert!(out.merged.iter().all(|b| b.items.is_empty()));
        assert_eq!(out.kept, 0);
    }
}
