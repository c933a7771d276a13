//! Translation of outgoing copy (Discord posts are localized).
//!
//! A translator returns `None` on any failure; callers then fall back to the
//! original English text. Nothing here is allowed to fail a delivery.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::TranslationConfig;

#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Option<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynTranslator = Arc<dyn Translator>;

/// Factory: OpenAI when enabled and a key is present, otherwise disabled.
pub fn build_translator(cfg: &TranslationConfig) -> DynTranslator {
    if !cfg.is_active() {
        tracing::info!("translation disabled");
        return Arc::new(DisabledTranslator);
    }
    match OpenAiTranslator::new(cfg) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            tracing::warn!(error = ?e, "could not build OpenAI client, translation disabled");
            Arc::new(DisabledTranslator)
        }
    }
}

/// Chat Completions translator. Requires an API key.
pub struct OpenAiTranslator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    target_language: String,
    endpoint: String,
}

impl OpenAiTranslator {
    pub fn new(cfg: &TranslationConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crypto-news-bot/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            target_language: cfg.target_language.clone(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        })
    }

    /// Point at a different Chat Completions-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a professional translator. Translate the following text to {}. \
             Keep technical terms and proper nouns in their original form when appropriate. \
             Provide only the {} translation.",
            self.target_language, self.target_language
        )
    }
}

#[async_trait::async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str) -> Option<String> {
        if self.api_key.is_empty() || text.trim().is_empty() {
            return None;
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let sys = self.system_prompt();
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &sys,
                },
                Msg {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.3,
            max_tokens: 500,
        };

        let resp = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "translation request failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(status = resp.status().as_u16(), "translation failed");
            return None;
        }
        let body: Resp = resp.json().await.ok()?;
        let out = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|s| !s.is_empty())?;
        tracing::debug!(
            from = %crate::ingest::preview(text, 30),
            to = %crate::ingest::preview(&out, 30),
            "translated"
        );
        Some(out)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Returns `None` always; used when translation is disabled.
pub struct DisabledTranslator;

#[async_trait::async_trait]
impl Translator for DisabledTranslator {
    async fn translate(&self, _text: &str) -> Option<String> {
        None
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}
