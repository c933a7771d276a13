// src/config/feeds.rs
use serde::{Deserialize, Serialize};

/// One RSS source with its static credibility (1–5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    pub credibility: u8,
}

impl FeedConfig {
    pub fn new(name: &str, url: &str, credibility: u8) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            credibility,
        }
    }
}

/// Named Discord webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

/// Built-in source list used when the config file names none.
pub fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new(
            "CoinDesk",
            "https://www.coindesk.com/arc/outboundfeeds/rss/",
            4,
        ),
        FeedConfig::new("The Block", "https://www.theblock.co/rss.xml", 4),
        FeedConfig::new("Decrypt", "https://decrypt.co/feed", 4),
        FeedConfig::new("Cointelegraph", "https://cointelegraph.com/rss", 3),
        FeedConfig::new("CryptoSlate", "https://cryptoslate.com/feed/", 3),
        FeedConfig::new("Bitcoinist", "https://bitcoinist.com/feed/", 3),
    ]
}
