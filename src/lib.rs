// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod classify;
pub mod config;
pub mod dedup;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod pipeline;
pub mod recency;
pub mod scoring;
pub mod translate;

pub use crate::config::BotConfig;
pub use crate::dedup::DedupStore;
pub use crate::ingest::types::{FeedEntry, FeedSource, NewsItem};
pub use crate::notify::{DeliveryOutcome, Dispatcher};
pub use crate::scoring::{ImpactTier, ScoredItem};
