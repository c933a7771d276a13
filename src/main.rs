//! Crypto news bot entrypoint.
//! Loads config, then runs the pipeline once or on an interval.

use std::time::Duration;

use crypto_news_bot::{
    config::BotConfig, dedup::DedupStore, ingest::scheduler, metrics, notify::Delivery, pipeline,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("crypto_news_bot=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = BotConfig::load_default()?;
    if let Some(addr) = cfg.metrics_addr {
        metrics::install_exporter(addr)?;
    }

    let sources = pipeline::build_sources(&cfg)?;
    let delivery = Delivery::from_config(&cfg);
    let mut store = DedupStore::load(cfg.dedup_path.clone(), cfg.dedup_capacity);

    match cfg.interval_secs {
        Some(secs) if secs > 0 => {
            tracing::info!(interval_secs = secs, "starting scheduler");
            scheduler::run_forever(
                &cfg,
                Duration::from_secs(secs),
                &sources,
                &delivery,
                &mut store,
            )
            .await;
        }
        _ => {
            let summary = pipeline::run_once(&cfg, &sources, &delivery, &mut store).await;
            tracing::info!(
                selected = summary.selected.len(),
                delivered = summary.delivered,
                "done"
            );
        }
    }
    Ok(())
}
