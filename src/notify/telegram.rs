use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::notify::web_link;
use crate::scoring::ScoredItem;

#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    client: Client,
    timeout: Duration,
    api_base: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            client: Client::new(),
            timeout: Duration::from_secs(10),
            api_base: "https://api.telegram.org".to_string(),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: false,
        };
        let rsp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Telegram request failed: {e}"))?;
        if !rsp.status().is_success() {
            return Err(anyhow!("Telegram HTTP {}", rsp.status().as_u16()));
        }
        Ok(())
    }
}

/// English Markdown rendition of one article.
pub fn format_message(scored: &ScoredItem) -> String {
    let (item, s) = (&scored.item, &scored.scores);
    let stars = "⭐".repeat(usize::from(s.credibility));
    let mut msg = format!("{} **{}**\n\n", s.tier.emoji(), s.tier.label().to_uppercase());
    msg.push_str(&format!("**{}**\n\n", item.title));
    msg.push_str(&format!("📊 Significance: {:.1}/5\n", s.significance));
    msg.push_str(&format!("⭐ Credibility: {stars} ({}/5)\n", s.credibility));
    msg.push_str(&format!("📈 Market Impact: {}/5\n", s.market_impact));
    msg.push_str(&format!("🎯 Relevance: {}/5\n", s.relevance));
    msg.push_str(&format!(
        "💭 Sentiment: {} ({:+})\n",
        s.sentiment.label.as_str(),
        s.sentiment.score
    ));
    msg.push_str(&format!("⏰ Time Urgency: {}/5\n\n", s.time_urgency));
    msg.push_str(&item.summary);
    match web_link(&item.link) {
        Some(link) => msg.push_str(&format!(
            "\n\nSource: {} | [Read more]({link})",
            item.source
        )),
        None => msg.push_str(&format!("\n\nSource: {}", item.source)),
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Sentiment;
    use crate::ingest::types::NewsItem;
    use crate::scoring::combine;

    #[test]
    fn message_carries_all_scores_and_link() {
        let scored = ScoredItem {
            item: NewsItem {
                source: "Decrypt".into(),
                title: "SEC reviews Bitcoin custody rules".into(),
                summary: "Regulators outline requirements.".into(),
                link: "https://decrypt.co/1".into(),
                published: String::new(),
                credibility: 4,
                age: "1 minutes old".into(),
            },
            scores: combine(4, 5, 5, Sentiment::from_score(3), 2),
        };
        let msg = format_message(&scored);
        assert!(msg.starts_with("🚨 **HIGH IMPACT**"));
        assert!(msg.contains("**SEC reviews Bitcoin custody rules**"));
        assert!(msg.contains("⭐ Credibility: ⭐⭐⭐⭐ (4/5)"));
        assert!(msg.contains("💭 Sentiment: Bullish (+3)"));
        assert!(msg.ends_with("Source: Decrypt | [Read more](https://decrypt.co/1)"));
    }

    #[test]
    fn non_url_link_is_not_rendered() {
        let scored = ScoredItem {
            item: NewsItem {
                source: "Wire".into(),
                title: "Bitcoin ETF approval lands".into(),
                summary: String::new(),
                link: "urn:uuid:1234".into(),
                published: String::new(),
                credibility: 3,
                age: "1 minutes old".into(),
            },
            scores: combine(3, 5, 5, Sentiment::from_score(0), 2),
        };
        let msg = format_message(&scored);
        assert!(msg.ends_with("Source: Wire"));
        assert!(!msg.contains("urn:uuid"));
    }
}
