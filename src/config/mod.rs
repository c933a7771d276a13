//! Process configuration, built once at startup and passed down explicitly.
//!
//! Resolution order:
//! 1) `$BOT_CONFIG_PATH` (must exist if set)
//! 2) `config/bot.toml`
//! 3) built-in defaults
//!
//! Environment variables then override individual values (secrets and the
//! handful of tuning knobs the deployment sets per environment).

pub mod feeds;
pub mod translation;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub use feeds::{default_feeds, FeedConfig, TelegramConfig, WebhookConfig};
pub use translation::TranslationConfig;

pub const ENV_CONFIG_PATH: &str = "BOT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/bot.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub hours_lookback: u32,
    pub min_significance_score: f64,
    pub max_articles: usize,
    pub summary_max_chars: usize,
    pub fetch_timeout_secs: u64,
    pub dedup_path: PathBuf,
    pub dedup_capacity: usize,
    /// Pause between posts to the same platform.
    pub post_delay_ms: u64,
    /// Run forever on this period; `None` runs once and exits.
    pub interval_secs: Option<u64>,
    /// Prometheus exporter listen address; `None` disables it.
    pub metrics_addr: Option<SocketAddr>,
    pub feeds: Vec<FeedConfig>,
    pub discord_webhooks: Vec<WebhookConfig>,
    pub telegram: Option<TelegramConfig>,
    pub translation: TranslationConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            hours_lookback: 1,
            min_significance_score: 2.0,
            max_articles: 8,
            summary_max_chars: 300,
            fetch_timeout_secs: 10,
            dedup_path: PathBuf::from("processed_articles.json"),
            dedup_capacity: crate::dedup::DEFAULT_CAPACITY,
            post_delay_ms: 500,
            interval_secs: None,
            metrics_addr: None,
            feeds: default_feeds(),
            discord_webhooks: Vec::new(),
            telegram: None,
            translation: TranslationConfig::default(),
        }
    }
}

impl BotConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: BotConfig = toml::from_str(s).context("parsing bot config TOML")?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading bot config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// File (env path → default path → built-ins), then env overrides, then validation.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Self::load_from(&default)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_with(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides through `get`. Unparseable numbers are
    /// ignored with a warning; the file/default value stays.
    pub fn apply_env_with<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env::<u32>(&get, "HOURS_LOOKBACK").filter(|h| *h >= 1) {
            self.hours_lookback = v;
        }
        if let Some(v) = parse_env::<f64>(&get, "MIN_SIGNIFICANCE_SCORE").filter(|s| s.is_finite()) {
            self.min_significance_score = v.clamp(0.0, 5.0);
        }
        if let Some(v) = parse_env::<usize>(&get, "MAX_ARTICLES_PER_RUN").filter(|n| *n >= 1) {
            self.max_articles = v;
        }

        for (name, var) in [
            ("Original Discord", "DISCORD_WEBHOOK_URL"),
            ("FFI Discord", "DISCORD_WEBHOOK_FFI"),
        ] {
            let Some(url) = non_empty(&get, var) else {
                continue;
            };
            if !self.discord_webhooks.iter().any(|w| w.url == url) {
                self.discord_webhooks.push(WebhookConfig {
                    name: name.to_string(),
                    url,
                });
            }
        }

        if let (Some(token), Some(chat_id)) = (
            non_empty(&get, "TELEGRAM_BOT_TOKEN"),
            non_empty(&get, "TELEGRAM_CHAT_ID"),
        ) {
            self.telegram = Some(TelegramConfig { token, chat_id });
        }

        if let Some(key) = non_empty(&get, "OPENAI_API_KEY") {
            if self.translation.api_key.trim().is_empty()
                || self.translation.api_key.eq_ignore_ascii_case("env")
            {
                self.translation.api_key = key;
            }
        }
        self.translation.resolve_api_key(&get);
    }

    /// Misconfiguration is the one fatal error class.
    pub fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            bail!("no feeds configured");
        }
        for f in &self.feeds {
            if !(1..=5).contains(&f.credibility) {
                bail!(
                    "feed `{}` has credibility {} (expected 1..=5)",
                    f.name,
                    f.credibility
                );
            }
            if f.url.trim().is_empty() {
                bail!("feed `{}` has an empty url", f.name);
            }
        }
        if self.hours_lookback == 0 {
            bail!("hours_lookback must be >= 1");
        }
        if self.max_articles == 0 {
            bail!("max_articles must be >= 1");
        }
        if !(0.0..=5.0).contains(&self.min_significance_score) {
            bail!(
                "min_significance_score {} outside 0..=5",
                self.min_significance_score
            );
        }
        Ok(())
    }
}

fn non_empty<F>(get: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = non_empty(get, key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable env override");
            None
        }
    }
}
