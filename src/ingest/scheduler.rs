// src/ingest/scheduler.rs
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::config::BotConfig;
use crate::dedup::DedupStore;
use crate::ingest::types::FeedSource;
use crate::notify::Dispatcher;
use crate::pipeline;

/// Run the pipeline every `interval`, forever. A tick that overruns delays
/// the next one instead of bursting.
pub async fn run_forever(
    cfg: &BotConfig,
    interval: Duration,
    sources: &[Box<dyn FeedSource>],
    dispatcher: &dyn Dispatcher,
    store: &mut DedupStore,
) {
    run_ticks(cfg, interval, sources, dispatcher, store, None).await;
}

/// Same loop, bounded to `max_ticks` runs when given.
pub async fn run_ticks(
    cfg: &BotConfig,
    interval: Duration,
    sources: &[Box<dyn FeedSource>],
    dispatcher: &dyn Dispatcher,
    store: &mut DedupStore,
    max_ticks: Option<usize>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = 0usize;
    loop {
        if max_ticks.is_some_and(|m| ticks >= m) {
            break;
        }
        ticker.tick().await;
        ticks += 1;
        let summary = pipeline::run_once(cfg, sources, dispatcher, store).await;
        tracing::info!(
            target: "ingest",
            tick = ticks,
            delivered = summary.delivered,
            next_in_secs = interval.as_secs(),
            "scheduled run complete"
        );
    }
}
