// src/item.rs
//! Core data model: one content unit flowing through the pipeline, plus the
//! stable identifier derived from its canonical URL.

use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// Provider category of an item. Profiles (keyword sets, base score,
/// engagement weights) are keyed by this, not by individual origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    FeedArticle,
    ForumPost,
    SocialPost,
}

/// Raw engagement signals, present only for forum posts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Engagement {
    pub upvotes: i64,
    pub comments: u32,
    /// Approval ratio in <0.0, 1.0>.
    pub approval_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Content-addressed id, stable across runs for the same canonical URL.
    pub id: String,
    pub source_kind: SourceKind,
    pub title: String,
    #[serde(default)]
    pub body_text: String,
    pub url: String,
    /// Unix seconds, best effort; 0 means the adapter could not parse a date.
    pub published_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Human-readable source label, e.g. "BBC Middle East" or "r/Geopolitics".
    pub origin_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
    /// Set exactly once per run by the scorer; `None` before scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Derived from `score`; set when the item lands in a merged batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

impl Item {
    /// Build an unscored item; the id is derived from `url`.
    pub fn new(
        source_kind: SourceKind,
        title: impl Into<String>,
        body_text: impl Into<String>,
        url: impl Into<String>,
        origin_name: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            id: item_id(&url),
            source_kind,
            title: title.into(),
            body_text: body_text.into(),
            url,
            published_at: 0,
            author: None,
            origin_name: origin_name.into(),
            engagement: None,
            score: None,
            tier: None,
        }
    }

    /// Lowercased concatenation of title and body, the text the classifier
    /// and scorer match keywords against.
    pub fn combined_text(&self) -> String {
        let mut out = String::with_capacity(self.title.len() + self.body_text.len() + 1);
        out.push_str(&self.title);
        out.push(' ');
        out.push_str(&self.body_text);
        out.to_lowercase()
    }

    /// Raw popularity signal used as the secondary merge key; 0 when the
    /// source carries no engagement data.
    pub fn upvotes(&self) -> i64 {
        self.engagement.map(|e| e.upvotes).unwrap_or(0)
    }
}

/// Parse an RFC-2822 timestamp (the format syndication feeds use for
/// `pubDate`) into unix seconds; 0 on anything unparseable. Adapter-facing.
pub fn parse_rfc2822_to_unix(ts: &str) -> u64 {
    use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
        .unwrap_or(0)
}

/// Derive the stable item id: first 8 bytes of SHA-256 over the URL, hex.
pub fn item_id(url: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(16);
    for b in digest.iter().take(8) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_stable_and_url_derived() {
        let a = item_id("https://example.org/story/1");
        let b = item_id("https://example.org/story/1");
        let c = item_id("https://example.org/story/2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn new_item_has_no_score_or_tier() {
        let it = Item::new(
            SourceKind::FeedArticle,
            "Title",
            "",
            "https://example.org/x",
            "Example",
        );
        assert_eq!(it.id, item_id("https://example.org/x"));
        assert!(it.score.is_none());
        assert!(it.tier.is_none());
    }

    #[test]
    fn rfc2822_parsing_is_best_effort() {
        assert_eq!(
            parse_rfc2822_to_unix("Wed, 01 Jan 2025 00:00:00 +0000"),
            1_735_689_600
        );
        assert_eq!(parse_rfc2822_to_unix("not a date"), 0);
        assert_eq!(parse_rfc2822_to_unix(""), 0);
    }

    #[test]
    fn combined_text_lowercases_title_and_body() {
        let it = Item::new(
            SourceKind::SocialPost,
            "Breaking NEWS",
            "Some Body",
            "https://example.org/y",
            "Example",
        );
        assert_eq!(it.combined_text(), "breaking news some body");
    }
}
