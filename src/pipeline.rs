//! One full bot run: ingest → select → deliver → remember.

use chrono::Utc;
use metrics::gauge;
use std::time::Duration;

use crate::config::BotConfig;
use crate::dedup::DedupStore;
use crate::ingest::{self, rss::RssFeed, types::FeedSource, FilterConfig};
use crate::notify::Dispatcher;
use crate::scoring::{self, ScoredItem};

#[derive(Debug, Default)]
pub struct RunSummary {
    pub entries_seen: usize,
    pub candidates: usize,
    pub failed_sources: Vec<String>,
    pub selected: Vec<ScoredItem>,
    pub delivered: usize,
    pub undelivered: usize,
}

/// One RSS source per configured feed, sharing a single HTTP client.
pub fn build_sources(cfg: &BotConfig) -> anyhow::Result<Vec<Box<dyn FeedSource>>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("crypto-news-bot/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let timeout = Duration::from_secs(cfg.fetch_timeout_secs);
    Ok(cfg
        .feeds
        .iter()
        .map(|f| Box::new(RssFeed::from_config(f, client.clone(), timeout)) as Box<dyn FeedSource>)
        .collect())
}

/// Items that reach at least one endpoint are recorded in `store`; items
/// whose every endpoint failed stay unseen and are retried next run.
/// Persisting the store is best effort.
pub async fn run_once(
    cfg: &BotConfig,
    sources: &[Box<dyn FeedSource>],
    dispatcher: &dyn Dispatcher,
    store: &mut DedupStore,
) -> RunSummary {
    tracing::info!(
        sources = sources.len(),
        lookback_hours = cfg.hours_lookback,
        "checking feeds"
    );

    let report = ingest::run_once(sources, store, &FilterConfig::from(cfg)).await;
    let candidates = report.candidates.len();
    let selected = scoring::select(
        report.candidates,
        cfg.min_significance_score,
        cfg.max_articles,
    );
    tracing::info!(
        candidates,
        selected = selected.len(),
        min_score = cfg.min_significance_score,
        "selected articles"
    );

    let mut summary = RunSummary {
        entries_seen: report.entries_seen,
        candidates,
        failed_sources: report.failed_sources.into_iter().map(|(n, _)| n).collect(),
        ..Default::default()
    };

    for item in &selected {
        let outcome = dispatcher.deliver(item).await;
        if outcome.is_delivered() {
            store.mark_seen(item.item.link.clone());
            summary.delivered += 1;
        } else {
            tracing::warn!(
                link = %item.item.link,
                failed = outcome.failed,
                "article not delivered; will retry next run"
            );
            summary.undelivered += 1;
        }
    }
    summary.selected = selected;

    if let Err(e) = store.persist() {
        tracing::error!(error = ?e, path = %store.path().display(), "could not persist seen articles");
    }
    gauge!("pipeline_last_run_ts").set(Utc::now().timestamp() as f64);

    tracing::info!(
        delivered = summary.delivered,
        undelivered = summary.undelivered,
        failed_sources = summary.failed_sources.len(),
        "run finished"
    );
    summary
}
