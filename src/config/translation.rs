// src/config/translation.rs
use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_target_language() -> String {
    "German".to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    /// Language the Discord copy is translated into.
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// "ENV" means: read from OPENAI_API_KEY.
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: default_model(),
            target_language: default_target_language(),
            api_key: default_api_key(),
        }
    }
}

impl TranslationConfig {
    /// Replace the "ENV" placeholder using `get` (normally `std::env::var`).
    /// A missing variable leaves the key empty, which disables translation.
    pub fn resolve_api_key<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = get("OPENAI_API_KEY").unwrap_or_default();
        }
    }

    /// Enabled in config and a key is available.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty() && !self.api_key.eq_ignore_ascii_case("env")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_placeholder_resolves_from_lookup() {
        let mut cfg = TranslationConfig::default();
        cfg.resolve_api_key(|k| (k == "OPENAI_API_KEY").then(|| "sk-test".to_string()));
        assert_eq!(cfg.api_key, "sk-test");
        assert!(cfg.is_active());
    }

    #[test]
    fn missing_key_disables() {
        let mut cfg = TranslationConfig::default();
        cfg.resolve_api_key(|_| None);
        assert!(cfg.api_key.is_empty());
        assert!(!cfg.is_active());
    }

    #[test]
    fn literal_key_is_kept() {
        let mut cfg = TranslationConfig {
            api_key: "sk-literal".into(),
            ..Default::default()
        };
        cfg.resolve_api_key(|_| Some("ignored".into()));
        assert_eq!(cfg.api_key, "sk-literal");
    }
}
