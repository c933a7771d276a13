use crypto_news_bot::classify::Sentiment;
use crypto_news_bot::ingest::types::NewsItem;
use crypto_news_bot::scoring::{combine, rank, select, ScoredItem};

fn scored(link: &str, credibility: u8, market: u8, relevance: u8, urgency: u8) -> ScoredItem {
    ScoredItem {
        item: NewsItem {
            source: "Test".into(),
            title: link.into(),
            summary: String::new(),
            link: link.into(),
            published: String::new(),
            credibility,
            age: "1 minutes old".into(),
        },
        scores: combine(credibility, market, relevance, Sentiment::from_score(0), urgency),
    }
}

fn links(items: &[ScoredItem]) -> Vec<&str> {
    items.iter().map(|s| s.item.link.as_str()).collect()
}

#[test]
fn threshold_is_inclusive() {
    // 0.6 + 1.5 + 0.6 + 0 + 0.3 = 3.0
    let items = vec![scored("a", 3, 5, 3, 2), scored("b", 1, 2, 2, 2)];
    let picked = select(items, 3.0, 8);
    assert_eq!(links(&picked), vec!["a"]);
}

#[test]
fn cap_keeps_the_best() {
    let items = vec![
        scored("low", 1, 2, 2, 2),
        scored("top", 5, 5, 5, 5),
        scored("mid", 3, 4, 4, 3),
    ];
    let picked = select(items, 0.0, 2);
    assert_eq!(links(&picked), vec!["top", "mid"]);
}

#[test]
fn ties_keep_arrival_order() {
    let items = vec![
        scored("first", 4, 3, 3, 3),
        scored("second", 4, 3, 3, 3),
        scored("third", 4, 3, 3, 3),
    ];
    assert_eq!(links(&rank(items)), vec!["first", "second", "third"]);
}

#[test]
fn nothing_qualifies() {
    let items = vec![scored("a", 1, 2, 2, 2)];
    assert!(select(items, 4.5, 8).is_empty());
    assert!(select(Vec::new(), 0.0, 8).is_empty());
}
