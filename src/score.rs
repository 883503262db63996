// src/score.rs
//! Numeric relevance score per item: source-defined base, topical keyword
//! boosts, and (for forum posts) an engagement boost. Exclusion is an
//! explicit outcome variant, not a sentinel score, so tuning the thresholds
//! can never accidentally re-admit blocked items.

use crate::classify::{BlockReason, ContentClassifier, Verdict};
use crate::item::Item;
use crate::profile::SourceProfile;

pub const SCORE_MAX: f32 = 100.0;
pub const SCORE_FLOOR: f32 = 0.0;

/// Tri-state scoring result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    /// Admitted, with a score clamped to <0, 100>.
    Included(f32),
    /// Dropped by the classifier; never reaches the tier assigner.
    Excluded(BlockReason),
}

impl ScoreOutcome {
    pub fn value(&self) -> Option<f32> {
        match self {
            ScoreOutcome::Included(s) => Some(*s),
            ScoreOutcome::Excluded(_) => None,
        }
    }
}

/// Pure scorer over one immutable profile.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer<'a> {
    profile: &'a SourceProfile,
}

impl<'a> RelevanceScorer<'a> {
    pub fn new(profile: &'a SourceProfile) -> Self {
        Self { profile }
    }

    /// Score an item snapshot. Deterministic: the same text/engagement
    /// fields always yield the same outcome.
    pub fn score(&self, item: &Item) -> ScoreOutcome {
        let text = item.combined_text();

        match ContentClassifier::new(self.profile).classify(&text) {
            Verdict::Block(reason) => return ScoreOutcome::Excluded(reason),
            Verdict::Allow => {}
        }

        let mut score = self.profile.base_score;

        // Each configured keyword counts once, regardless of repetitions.
        for kw in &self.profile.high_priority {
            if text.contains(kw.as_str()) {
                score += self.profile.high_boost;
            }
        }
        for kw in &self.profile.medium_priority {
            if text.contains(kw.as_str()) {
                score += self.profile.medium_boost;
            }
        }

        if let (Some(w), Some(e)) = (self.profile.engagement, item.engagement) {
            let upvotes = e.upvotes.max(0) as f32;
            let comments = e.comments as f32;
            let ratio = e.approval_ratio.clamp(0.0, 1.0);
            score += upvotes * w.w_upvote + comments * w.w_comment + ratio * w.w_ratio;
        }

        ScoreOutcome::Included(score.clamp(SCORE_FLOOR, SCORE_MAX))
    }
}
