// src/profile.rs
//! Per-source-kind configuration: keyword sets, score increments, engagement
//! weights, and caps. Profiles are immutable data handed to the classifier
//! and scorer at construction time; there is no shared mutable keyword state.
//!
//! The built-in profiles mirror the curated lists the thresholds were tuned
//! against. They are deliberately swappable: load alternatives from TOML for
//! a different topical domain without touching code.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::item::SourceKind;

pub const DEFAULT_PROFILE_CONFIG_PATH: &str = "config/profiles.toml";
pub const ENV_PROFILE_CONFIG_PATH: &str = "CURATOR_PROFILE_PATH";

/// Linear weights for the forum engagement boost.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EngagementWeights {
    pub w_upvote: f32,
    pub w_comment: f32,
    pub w_ratio: f32,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            w_upvote: 0.01,
            w_comment: 0.1,
            w_ratio: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceProfile {
    /// Starting score before any boost.
    #[serde(default)]
    pub base_score: f32,
    /// Domain-context terms that force Allow regardless of other signals.
    #[serde(default)]
    pub positive_context: Vec<String>,
    /// Spam/promotional terms that force Block unless positive-context matched.
    #[serde(default)]
    pub blocked_terms: Vec<String>,
    /// Adversarial topic boundary: presence forces Block unless
    /// positive-context matched. `None` disables the boundary entirely.
    #[serde(default)]
    pub other_topic: Option<Vec<String>>,
    /// High-priority topical keywords, each worth `high_boost`.
    #[serde(default)]
    pub high_priority: Vec<String>,
    /// Medium-priority topical keywords, each worth `medium_boost`.
    #[serde(default)]
    pub medium_priority: Vec<String>,
    #[serde(default = "default_high_boost")]
    pub high_boost: f32,
    #[serde(default = "default_medium_boost")]
    pub medium_boost: f32,
    /// Engagement boost weights; `None` for sources without engagement data.
    #[serde(default)]
    pub engagement: Option<EngagementWeights>,
    /// Admission floor on raw upvotes; items below it never reach the
    /// classifier. 0 disables the gate.
    #[serde(default)]
    pub min_upvotes: i64,
    /// Item cap for per-source batches.
    #[serde(default = "default_per_source_cap")]
    pub per_source_cap: usize,
}

fn default_high_boost() -> f32 {
    10.0
}
fn default_medium_boost() -> f32 {
    5.0
}
fn default_per_source_cap() -> usize {
    5
}

/// One profile per source kind.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSet {
    pub feed_article: SourceProfile,
    pub forum_post: SourceProfile,
    pub social_post: SourceProfile,
}

impl ProfileSet {
    pub fn for_kind(&self, kind: SourceKind) -> &SourceProfile {
        match kind {
            SourceKind::FeedArticle => &self.feed_article,
            SourceKind::ForumPost => &self.forum_post,
            SourceKind::SocialPost => &self.social_post,
        }
    }

    /// Parse a profile set from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("parsing profile TOML")
    }

    /// Load from a TOML file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading profile config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load from $CURATOR_PROFILE_PATH, then config/profiles.toml, then
    /// fall back to the built-in defaults.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_PROFILE_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_PROFILE_CONFIG_PATH.to_string());
        let path = Path::new(&path);
        if path.exists() {
            match Self::from_path(path) {
                Ok(set) => return set,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %path.display(), "profile config unreadable, using builtin");
                }
            }
        }
        Self::builtin()
    }

    /// The built-in profiles the score thresholds were calibrated against.
    pub fn builtin() -> Self {
        let positive: Vec<String> = to_vec(POSITIVE_CONTEXT);
        let spam: Vec<String> = to_vec(SPAM_TERMS);
        let other: Vec<String> = to_vec(OTHER_TOPIC);
        let high: Vec<String> = to_vec(HIGH_PRIORITY);
        let medium: Vec<String> = to_vec(MEDIUM_PRIORITY);

        Self {
            // Syndication feeds come from pre-picked outlets: no topic
            // boundary, small positive boost only.
            feed_article: SourceProfile {
                base_score: 0.0,
                positive_context: positive.clone(),
                blocked_terms: spam.clone(),
                other_topic: None,
                high_priority: positive.clone(),
                medium_priority: Vec::new(),
                high_boost: 3.0,
                medium_boost: 0.0,
                engagement: None,
                min_upvotes: 0,
                per_source_cap: default_per_source_cap(),
            },
            forum_post: SourceProfile {
                base_score: 50.0,
                positive_context: positive.clone(),
                blocked_terms: spam.clone(),
                other_topic: Some(other.clone()),
                high_priority: high.clone(),
                medium_priority: medium.clone(),
                high_boost: default_high_boost(),
                medium_boost: default_medium_boost(),
                engagement: Some(EngagementWeights::default()),
                min_upvotes: 10,
                per_source_cap: default_per_source_cap(),
            },
            social_post: SourceProfile {
                base_score: 50.0,
                positive_context: positive,
                blocked_terms: spam,
                other_topic: Some(other),
                high_priority: high,
                medium_priority: medium,
                high_boost: default_high_boost(),
                medium_boost: default_medium_boost(),
                engagement: None,
                min_upvotes: 0,
                per_source_cap: default_per_source_cap(),
            },
        }
    }
}

fn to_vec(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ---- Built-in keyword data (lowercase; matching is substring, no stemming) ----

const POSITIVE_CONTEXT: &[&str] = &[
    "israel",
    "israeli",
    "israelis",
    "gaza",
    "palestine",
    "palestinian",
    "idf",
    "jerusalem",
    "netanyahu",
    "tel aviv",
    "hamas",
    "jew",
    "jewish",
    "jews",
    "zionist",
    "zionism",
    "judaism",
    "rabbi",
    "yom kippur",
    "rosh hashanah",
    "passover",
    "hanukkah",
    "shabbat",
    "gal gadot",
    "natalie portman",
    "bar refaeli",
    "yair lapid",
    "benjamin netanyahu",
    "benny gantz",
    "naftali bennett",
    "mossad",
    "shin bet",
    "knesset",
    "aliyah",
    "diaspora",
];

const SPAM_TERMS: &[&str] = &[
    "click here to",
    "subscribe now",
    "limited time offer",
    "buy now",
    "sale ends",
    "discount code",
    "porn",
    "xxx",
    "adult video",
    "sex dating",
    "online casino",
    "slot machine",
    "bet now",
    "gambling",
];

const OTHER_TOPIC: &[&str] = &[
    "ukraine",
    "ukrainian",
    "kyiv",
    "kharkiv",
    "odesa",
    "odessa",
    "luhansk",
    "donetsk",
    "kiev",
    "russia",
    "russian",
    "putin",
    "kremlin",
    "moscow",
    "france",
    "french",
    "macron",
    "paris",
    "germany",
    "german",
    "scholz",
    "berlin",
    "britain",
    "england",
    "london",
    "italy",
    "italian",
    "rome",
    "meloni",
    "spain",
    "spanish",
    "madrid",
    "china",
    "chinese",
    "beijing",
    "xi jinping",
    "japan",
    "japanese",
    "tokyo",
    "india",
    "indian",
    "modi",
    "pakistan",
    "bangladesh",
    "iran",
    "iranian",
    "tehran",
    "iraq",
    "iraqi",
    "baghdad",
    "syria",
    "syrian",
    "damascus",
    "assad",
    "lebanon",
    "lebanese",
    "beirut",
    "turkey",
    "turkish",
    "erdogan",
    "istanbul",
    "egypt",
    "egyptian",
    "cairo",
    "saudi",
    "uae",
    "dubai",
    "qatar",
    "united states",
    "america",
    "american",
    "biden",
    "trump",
    "canada",
    "canadian",
    "trudeau",
    "mexico",
    "mexican",
    "brazil",
    "brazilian",
    "argentina",
    "chile",
    "colombia",
    "south africa",
    "nigeria",
    "kenya",
    "australia",
    "australian",
];

const HIGH_PRIORITY: &[&str] = &["israel", "gaza", "hamas", "war", "attack", "netanyahu", "idf"];

const MEDIUM_PRIORITY: &[&str] = &["jerusalem", "palestine", "middle east", "trump", "iran"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_wired_per_kind() {
        let set = ProfileSet::builtin();
        assert_eq!(set.for_kind(SourceKind::FeedArticle).base_score, 0.0);
        assert_eq!(set.for_kind(SourceKind::ForumPost).base_score, 50.0);
        assert_eq!(set.for_kind(SourceKind::SocialPost).base_score, 50.0);
        assert!(set.feed_article.other_topic.is_none());
        assert!(set.forum_post.other_topic.is_some());
        assert!(set.forum_post.engagement.is_some());
        assert!(set.social_post.engagement.is_none());
    }

    #[test]
    fn toml_roundtrip_with_defaults() {
        let toml_str = r#"
[feed_article]
base_score = 0.0
positive_context = ["israel"]

[forum_post]
base_score = 50.0
high_priority = ["gaza"]
other_topic = ["macron"]
min_upvotes = 10

[forum_post.engagement]
w_upvote = 0.01
w_comment = 0.1
w_ratio = 10.0

[social_post]
base_score = 50.0
"#;
        let set = ProfileSet::from_toml_str(toml_str).expect("parse");
        assert_eq!(set.forum_post.high_boost, 10.0);
        assert_eq!(set.forum_post.medium_boost, 5.0);
        assert_eq!(set.forum_post.per_source_cap, 5);
        assert_eq!(set.forum_post.min_upvotes, 10);
        let ew = set.forum_post.engagement.expect("weights");
        assert!((ew.w_ratio - 10.0).abs() < f32::EPSILON);
    }
}
