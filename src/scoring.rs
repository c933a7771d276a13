//! Significance aggregation, ranking and selection.
//!
//! significance = 0.20*credibility + 0.30*market_impact + 0.20*relevance
//!              + 0.15*|sentiment| + 0.15*urgency
//!
//! All inputs are on a 1..5 (|sentiment| 0..5) scale, so the result lands in
//! [0, 5]. It is rounded to one decimal for display and selection; the tier is
//! decided on the unrounded sum.

use serde::{Deserialize, Serialize};

use crate::classify::{self, Sentiment};
use crate::ingest::types::NewsItem;

pub const W_CREDIBILITY: f64 = 0.20;
pub const W_MARKET_IMPACT: f64 = 0.30;
pub const W_RELEVANCE: f64 = 0.20;
pub const W_SENTIMENT: f64 = 0.15;
pub const W_URGENCY: f64 = 0.15;

pub const HIGH_IMPACT_MIN: f64 = 3.5;
pub const MEDIUM_IMPACT_MIN: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactTier {
    High,
    Medium,
    Low,
}

impl ImpactTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Impact",
            Self::Medium => "Medium Impact",
            Self::Low => "Low Impact",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::High => "🚨",
            Self::Medium => "📊",
            Self::Low => "ℹ️",
        }
    }
}

/// Per-item scores; computed once when the item passes the filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub credibility: u8,
    pub market_impact: u8,
    pub relevance: u8,
    pub sentiment: Sentiment,
    pub time_urgency: u8,
    /// Rounded to one decimal.
    pub significance: f64,
    pub tier: ImpactTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: NewsItem,
    pub scores: ScoreSet,
}

/// Raw weighted sum of the five components.
pub fn weighted_sum(
    credibility: u8,
    market_impact: u8,
    relevance: u8,
    sentiment: i32,
    urgency: u8,
) -> f64 {
    f64::from(credibility) * W_CREDIBILITY
        + f64::from(market_impact) * W_MARKET_IMPACT
        + f64::from(relevance) * W_RELEVANCE
        + f64::from(sentiment.abs()) * W_SENTIMENT
        + f64::from(urgency) * W_URGENCY
}

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn classify(significance: f64) -> ImpactTier {
    if significance >= HIGH_IMPACT_MIN {
        ImpactTier::High
    } else if significance >= MEDIUM_IMPACT_MIN {
        ImpactTier::Medium
    } else {
        ImpactTier::Low
    }
}

/// Assemble a score set from already-computed components.
pub fn combine(
    credibility: u8,
    market_impact: u8,
    relevance: u8,
    sentiment: Sentiment,
    time_urgency: u8,
) -> ScoreSet {
    let raw = weighted_sum(
        credibility,
        market_impact,
        relevance,
        sentiment.score,
        time_urgency,
    );
    ScoreSet {
        credibility,
        market_impact,
        relevance,
        sentiment,
        time_urgency,
        significance: round1(raw),
        tier: classify(raw),
    }
}

/// Run the keyword classifier over title + summary and combine with the
/// item's static credibility.
pub fn score(item: &NewsItem) -> ScoreSet {
    let (t, d) = (item.title.as_str(), item.summary.as_str());
    combine(
        item.credibility,
        classify::market_impact(t, d),
        classify::relevance(t, d),
        classify::sentiment(t, d),
        classify::time_urgency(t, d),
    )
}

pub fn score_item(item: NewsItem) -> ScoredItem {
    let scores = score(&item);
    ScoredItem { item, scores }
}

/// Highest significance first. Stable: ties keep their incoming order.
pub fn rank(mut items: Vec<ScoredItem>) -> Vec<ScoredItem> {
    items.sort_by(|a, b| b.scores.significance.total_cmp(&a.scores.significance));
    items
}

/// Keep items with `significance >= min_score`, rank, and cap at `max_count`.
pub fn select(items: Vec<ScoredItem>, min_score: f64, max_count: usize) -> Vec<ScoredItem> {
    let kept: Vec<ScoredItem> = items
        .into_iter()
        .filter(|s| s.scores.significance >= min_score)
        .collect();
    let mut ranked = rank(kept);
    ranked.truncate(max_count);
    ranked
}
