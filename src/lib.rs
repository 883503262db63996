// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod assemble;
pub mod classify;
pub mod dedup;
pub mod item;
pub mod merge;
pub mod mirrors;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod score;
pub mod tier;

// ---- Re-exports for stable public API ----
pub use crate::assemble::{Batch, BatchSpec};
pub use crate::classify::{BlockReason, ContentClassifier, Verdict};
pub use crate::dedup::{DedupState, DedupStateStore};
pub use crate::item::{Engagement, Item, SourceKind};
pub use crate::mirrors::MirrorClient;
pub use crate::pipeline::{run_once, RunConfig, RunOutput, SourceAdapter};
pub use crate::profile::{EngagementWeights, ProfileSet, SourceProfile};
pub use crate::score::{RelevanceScorer, ScoreOutcome};
pub use crate::tier::Tier;
