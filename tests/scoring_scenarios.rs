// tests/scoring_scenarios.rs
// Hand-picked scenarios exercising the classifier -> scorer -> tier path
// with the built-in profiles.

use feed_curator::{
    BlockReason, ContentClassifier, Engagement, Item, ProfileSet, RelevanceScorer, ScoreOutcome,
    SourceKind, Tier, Verdict,
};

fn forum_item(title: &str, upvotes: i64, comments: u32, ratio: f32) -> Item {
    let mut it = Item::new(
        SourceKind::ForumPost,
        title,
        "",
        format!("https://forum.example/{}", title.len()),
        "r/test",
    );
    it.engagement = Some(Engagement {
        upvotes,
        comments,
        approval_ratio: ratio,
    });
    it
}

#[test]
fn breaking_news_scenario_allows_and_boosts() {
    let set = ProfileSet::builtin();
    let title = "Breaking: Hamas attack near Jerusalem";

    let classifier = ContentClassifier::new(&set.social_post);
    assert_eq!(classifier.classify(&title.to_lowercase()), Verdict::Allow);

    let it = Item::new(SourceKind::SocialPost, title, "", "https://social.example/1", "@wire");
    let score = RelevanceScorer::new(&set.social_post)
        .score(&it)
        .value()
        .expect("included");
    assert!(score > set.social_post.base_score, "boosts must apply");

    let tier = Tier::for_score(score);
    assert!(matches!(tier, Tier::S | Tier::A | Tier::B | Tier::C));
}

#[test]
fn off_topic_forum_post_is_excluded_entirely() {
    let set = ProfileSet::builtin();
    let it = forum_item("Macron visits Paris summit", 5, 1, 0.5);
    let outcome = RelevanceScorer::new(&set.forum_post).score(&it);
    assert_eq!(outcome, ScoreOutcome::Excluded(BlockReason::OtherTopic));
    assert!(outcome.value().is_none(), "excluded items carry no score");
}

#[test]
fn tier_of_score_is_always_labeled_and_monotonic() {
    let set = ProfileSet::builtin();
    let scorer = RelevanceScorer::new(&set.forum_post);

    let low = forum_item("shabbat dinner thread", 12, 0, 0.0);
    let high = forum_item("israel war: idf strikes hamas in gaza", 500, 120, 0.98);

    let s_low = scorer.score(&low).value().unwrap();
    let s_high = scorer.score(&high).value().unwrap();
    assert!(s_high > s_low);

    // Higher score never yields a lower tier (S orders before D in the enum).
    assert!(Tier::for_score(s_high) <= Tier::for_score(s_low));
}

#[test]
fn classify_and_score_are_pure() {
    let set = ProfileSet::builtin();
    let it = forum_item("Knesset debates the budget", 30, 4, 0.8);
    let scorer = RelevanceScorer::new(&set.forum_post);
    let first = scorer.score(&it);
    let second = scorer.score(&it);
    assert_eq!(first, second);
}

#[test]
fn engagement_contribution_matches_linear_weights() {
    let set = ProfileSet::builtin();
    let scorer = RelevanceScorer::new(&set.forum_post);

    let without = forum_item("idf briefing", 0, 0, 0.0);
    let with = forum_item("idf briefing", 200, 10, 0.5);

    let base = scorer.score(&without).value().unwrap();
    let boosted = scorer.score(&with).value().unwrap();
    // 200 * 0.01 + 10 * 0.1 + 0.5 * 10.0 = 8.0
    assert!((boosted - base - 8.0).abs() < 1e-3);
}
