// src/ingest/types.rs
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One raw entry as parsed from a feed, before any filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    /// Source-native timestamp string; may be unparseable.
    pub published: String,
}

/// An article that passed the filter chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    /// Truncated summary.
    pub summary: String,
    /// Canonical link; the dedup identity key.
    pub link: String,
    pub published: String,
    /// Static 1–5 trust rating of the source.
    pub credibility: u8,
    /// e.g. "12 minutes old".
    pub age: String,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>, FetchError>;
    fn name(&self) -> &str;
    fn credibility(&self) -> u8;
}
