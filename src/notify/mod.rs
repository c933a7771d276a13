//! Delivery of selected articles to chat platforms.
//!
//! Each configured endpoint is attempted independently; one failing webhook
//! never stops the others. Endpoint failures are reported per item through
//! [`DeliveryOutcome`] and never propagate as errors.

pub mod discord;
pub mod telegram;

use async_trait::async_trait;
use chrono::Utc;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::config::BotConfig;
use crate::scoring::ScoredItem;
use crate::translate::{build_translator, DynTranslator};

pub use discord::DiscordNotifier;
pub use telegram::TelegramNotifier;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("delivery_sent_total", "Posts accepted by an endpoint");
        describe_counter!("delivery_failed_total", "Posts rejected by an endpoint");
    });
}

/// `link` when it is an absolute http(s) URL. Guids and hashed identity
/// keys are not linkable.
pub fn web_link(link: &str) -> Option<&str> {
    let link = link.trim();
    (link.starts_with("https://") || link.starts_with("http://")).then_some(link)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub sent: usize,
    pub failed: usize,
}

impl DeliveryOutcome {
    /// At least one endpoint took it, or there was nothing to send to.
    pub fn is_delivered(&self) -> bool {
        self.sent > 0 || self.failed == 0
    }
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn deliver(&self, item: &ScoredItem) -> DeliveryOutcome;
}

pub struct Delivery {
    discord: Vec<DiscordNotifier>,
    telegram: Option<TelegramNotifier>,
    translator: DynTranslator,
    post_delay: Duration,
}

impl Delivery {
    pub fn new(
        discord: Vec<DiscordNotifier>,
        telegram: Option<TelegramNotifier>,
        translator: DynTranslator,
        post_delay: Duration,
    ) -> Self {
        ensure_metrics_described();
        Self {
            discord,
            telegram,
            translator,
            post_delay,
        }
    }

    pub fn from_config(cfg: &BotConfig) -> Self {
        let discord = cfg
            .discord_webhooks
            .iter()
            .map(|w| DiscordNotifier::new(&w.name, w.url.clone()).with_timeout(cfg.fetch_timeout_secs))
            .collect::<Vec<_>>();
        let telegram = cfg.telegram.as_ref().map(|t| {
            TelegramNotifier::new(t.token.clone(), t.chat_id.clone())
                .with_timeout(cfg.fetch_timeout_secs)
        });
        if discord.is_empty() && telegram.is_none() {
            tracing::warn!("no delivery endpoints configured; running dry");
        }
        Self::new(
            discord,
            telegram,
            build_translator(&cfg.translation),
            Duration::from_millis(cfg.post_delay_ms),
        )
    }

    pub fn endpoint_count(&self) -> usize {
        self.discord.len() + usize::from(self.telegram.is_some())
    }

    async fn deliver_discord(&self, item: &ScoredItem, out: &mut DeliveryOutcome) {
        if self.discord.is_empty() {
            return;
        }
        let title_de = self.translator.translate(&item.item.title).await;
        let summary_de = self.translator.translate(&item.item.summary).await;
        let payload = discord::build_payload(
            item,
            title_de.as_deref(),
            summary_de.as_deref(),
            Utc::now(),
        );

        for (i, hook) in self.discord.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            match hook.send(&payload).await {
                Ok(()) => {
                    out.sent += 1;
                    counter!("delivery_sent_total", "platform" => "discord").increment(1);
                    tracing::info!(webhook = hook.name(), title = %crate::ingest::preview(&item.item.title, 50), "posted to discord");
                }
                Err(e) => {
                    out.failed += 1;
                    counter!("delivery_failed_total", "platform" => "discord").increment(1);
                    tracing::warn!(webhook = hook.name(), error = %e, "discord post failed");
                }
            }
        }
    }

    async fn deliver_telegram(&self, item: &ScoredItem, out: &mut DeliveryOutcome) {
        let Some(tg) = &self.telegram else {
            return;
        };
        match tg.send(&telegram::format_message(item)).await {
            Ok(()) => {
                out.sent += 1;
                counter!("delivery_sent_total", "platform" => "telegram").increment(1);
                tracing::info!(title = %crate::ingest::preview(&item.item.title, 50), "posted to telegram");
            }
            Err(e) => {
                out.failed += 1;
                counter!("delivery_failed_total", "platform" => "telegram").increment(1);
                tracing::warn!(error = %e, "telegram post failed");
            }
        }
    }
}

#[async_trait]
impl Dispatcher for Delivery {
    async fn deliver(&self, item: &ScoredItem) -> DeliveryOutcome {
        let mut out = DeliveryOutcome::default();
        if self.endpoint_count() == 0 {
            tracing::info!(
                significance = item.scores.significance,
                title = %crate::ingest::preview(&item.item.title, 60),
                "dry run: would post"
            );
            return out;
        }
        self.deliver_discord(item, &mut out).await;
        self.deliver_telegram(item, &mut out).await;
        if !self.post_delay.is_zero() {
            tokio::time::sleep(self.post_delay).await;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_rules() {
        assert!(DeliveryOutcome { sent: 0, failed: 0 }.is_delivered());
        assert!(DeliveryOutcome { sent: 1, failed: 2 }.is_delivered());
        assert!(!DeliveryOutcome { sent: 0, failed: 1 }.is_delivered());
    }

    #[test]
    fn only_http_links_are_linkable() {
        assert_eq!(web_link("https://decrypt.co/1"), Some("https://decrypt.co/1"));
        assert_eq!(web_link("http://news.test/a"), Some("http://news.test/a"));
        assert_eq!(web_link("cryptowire-48213"), None);
        assert_eq!(web_link("urn:uuid:1234"), None);
        assert_eq!(web_link("sha256:00112233445566778899aabb"), None);
    }

    #[test]
    fn endpoints_follow_config() {
        let mut cfg = BotConfig::default();
        cfg.translation.api_key = String::new();
        assert_eq!(Delivery::from_config(&cfg).endpoint_count(), 0);

        cfg.discord_webhooks.push(crate::config::WebhookConfig {
            name: "Original Discord".into(),
            url: "https://discord.test/hook".into(),
        });
        cfg.telegram = Some(crate::config::TelegramConfig {
            token: "t".into(),
            chat_id: "1".into(),
        });
        assert_eq!(Delivery::from_config(&cfg).endpoint_count(), 2);
    }
}
