use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::classify::SentimentLabel;
use crate::ingest::truncate_chars;
use crate::notify::web_link;
use crate::scoring::{ImpactTier, ScoredItem};

const TITLE_MAX: usize = 256;
const DESCRIPTION_MAX: usize = 4096;

#[derive(Clone)]
pub struct DiscordNotifier {
    name: String,
    webhook: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl DiscordNotifier {
    pub fn new(name: &str, webhook: String) -> Self {
        Self {
            name: name.to_string(),
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn send(&self, payload: &DiscordWebhookPayload) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.webhook)
                .timeout(self.timeout)
                .json(payload)
                .send()
                .await;

            let err = match res {
                Ok(rsp) => match rsp.error_for_status_ref() {
                    Ok(_) => return Ok(()),
                    // Rejected payloads are not resent.
                    Err(e) if is_permanent(rsp.status()) => {
                        return Err(anyhow!("Discord webhook rejected payload: {e}"));
                    }
                    Err(e) => anyhow!("Discord webhook HTTP error: {e}"),
                },
                Err(e) => anyhow!("Discord webhook request failed: {e}"),
            };
            if attempt >= self.max_retries {
                return Err(err);
            }
            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
        }
    }
}

/// 4xx other than 429.
fn is_permanent(status: reqwest::StatusCode) -> bool {
    status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscordFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscordEmbed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    pub footer: DiscordFooter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscordWebhookPayload {
    pub content: Option<String>,
    pub embeds: Vec<DiscordEmbed>,
}

pub fn tier_de(tier: ImpactTier) -> &'static str {
    match tier {
        ImpactTier::High => "HOHE BEDEUTUNG",
        ImpactTier::Medium => "MITTLERE BEDEUTUNG",
        ImpactTier::Low => "GERINGE BEDEUTUNG",
    }
}

fn tier_de_title(tier: ImpactTier) -> &'static str {
    match tier {
        ImpactTier::High => "Hohe Bedeutung",
        ImpactTier::Medium => "Mittlere Bedeutung",
        ImpactTier::Low => "Geringe Bedeutung",
    }
}

pub fn sentiment_de(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Bullish => "Bullisch",
        SentimentLabel::Bearish => "Bärisch",
        SentimentLabel::Neutral => "Neutral",
    }
}

/// German embed for one article. Translated title/summary are used when
/// present, the English originals otherwise.
pub fn build_payload(
    scored: &ScoredItem,
    title_de: Option<&str>,
    summary_de: Option<&str>,
    now: DateTime<Utc>,
) -> DiscordWebhookPayload {
    let (item, s) = (&scored.item, &scored.scores);
    let stars = "⭐".repeat(usize::from(s.credibility));
    let sentiment = sentiment_de(s.sentiment.label);

    let display_title = title_de.unwrap_or(&item.title);
    let display_summary = summary_de.unwrap_or(&item.summary);

    let mut description = format!(
        "**📊 Bedeutung: {} {} (Punktzahl: {:.1}/5)**\n",
        s.tier.emoji(),
        tier_de(s.tier),
        s.significance
    );
    description.push_str(&format!(
        "**⭐ Quellenglaubwürdigkeit:** {stars} ({}/5)\n",
        s.credibility
    ));
    description.push_str(&format!(
        "**📈 Marktauswirkung:** {}/5 | **🎯 Relevanz:** {}/5 | **⏰ Dringlichkeit:** {}/5\n",
        s.market_impact, s.relevance, s.time_urgency
    ));
    description.push_str(&format!(
        "**💭 Stimmung:** {sentiment} ({:+})\n\n",
        s.sentiment.score
    ));
    description.push_str(display_summary);
    description.push_str("\n\n");
    description.push_str(&format!("**Klassifizierung:** {}\n", tier_de_title(s.tier)));
    description.push_str(&format!("**Quelle:** {}\n", item.source));
    description.push_str(&format!("**Stimmung:** {sentiment}"));

    DiscordWebhookPayload {
        content: None,
        embeds: vec![DiscordEmbed {
            title: truncate_chars(&format!("{} {}", s.tier.emoji(), display_title), TITLE_MAX),
            description: truncate_chars(&description, DESCRIPTION_MAX),
            url: web_link(&item.link).map(str::to_string),
            color: s.sentiment.label.rgb(),
            footer: DiscordFooter {
                text: format!("Crypto News Bot • {}", now.format("%Y-%m-%d %H:%M")),
            },
        }],
    }
}
