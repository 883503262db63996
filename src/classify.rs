// src/classify.rs
//! Binary allow/block decision per item based on topical keyword rules.
//!
//! Matching is case-insensitive substring containment over the concatenation
//! of title and body text; no stemming or tokenization. The score thresholds
//! downstream were tuned against substring behavior, so this must not be
//! silently upgraded to token matching.

use serde::Serialize;

use crate::profile::SourceProfile;

/// Why an item was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Spam/promotional/adult/gambling term matched.
    Spam,
    /// Content is about an unrelated topic and nothing in the positive
    /// context set rescued it.
    OtherTopic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Block(BlockReason),
}

impl Verdict {
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// Pure classifier over one immutable profile. Holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct ContentClassifier<'a> {
    profile: &'a SourceProfile,
}

impl<'a> ContentClassifier<'a> {
    pub fn new(profile: &'a SourceProfile) -> Self {
        Self { profile }
    }

    /// Evaluate precedence in order:
    /// 1. blocked-term match -> Block(Spam), unconditionally
    /// 2. positive-context match -> Allow, unconditionally
    /// 3. other-topic match (when the profile defines the set) -> Block(OtherTopic)
    /// 4. default -> Allow
    ///
    /// `text` is expected lowercased (see `Item::combined_text`); keyword
    /// lists are stored lowercase. Empty text and empty sets degrade to Allow.
    pub fn classify(&self, text: &str) -> Verdict {
        if contains_any(text, &self.profile.blocked_terms) {
            return Verdict::Block(BlockReason::Spam);
        }
        if contains_any(text, &self.profile.positive_context) {
            return Verdict::Allow;
        }
        if let Some(other) = &self.profile.other_topic {
            if contains_any(text, other) {
                return Verdict::Block(BlockReason::OtherTopic);
            }
        }
        Verdict::Allow
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|kw| haystack.contains(kw.as_str()))
}
