// src/ingest/rss.rs
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::ingest::normalize_text;
use crate::ingest::types::{FeedEntry, FeedSource};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "dc:date")]
    dc_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text", default)]
    value: String,
}

/// Parse RSS 2.0 XML into raw entries. Title and summary are normalized
/// (entities decoded, tags stripped); a missing link falls back to `guid`.
pub fn parse_entries(xml: &str) -> Result<Vec<FeedEntry>, FetchError> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).map_err(|e| FetchError::Parse(e.to_string()))?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        let link = it
            .link
            .filter(|l| !l.trim().is_empty())
            .or_else(|| it.guid.map(|g| g.value))
            .unwrap_or_default()
            .trim()
            .to_string();

        out.push(FeedEntry {
            title,
            link,
            summary: normalize_text(it.description.as_deref().unwrap_or_default()),
            published: it
                .pub_date
                .or(it.dc_date)
                .unwrap_or_default()
                .trim()
                .to_string(),
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_parse_ms").record(ms);
    Ok(out)
}

/// RSS feed source, either fetched over HTTP or served from an in-memory fixture.
pub struct RssFeed {
    name: String,
    credibility: u8,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
        timeout: Duration,
    },
}

impl RssFeed {
    pub fn from_fixture(name: &str, credibility: u8, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            credibility,
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(
        name: &str,
        credibility: u8,
        url: &str,
        client: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.to_string(),
            credibility,
            mode: Mode::Http {
                url: url.to_string(),
                client,
                timeout,
            },
        }
    }

    pub fn from_config(cfg: &FeedConfig, client: reqwest::Client, timeout: Duration) -> Self {
        Self::from_url(&cfg.name, cfg.credibility, &cfg.url, client, timeout)
    }

    async fn fetch_body(url: &str, client: &reqwest::Client, timeout: Duration) -> Result<String, FetchError> {
        let resp = client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[async_trait]
impl FeedSource for RssFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>, FetchError> {
        let entries = match &self.mode {
            Mode::Fixture(xml) => parse_entries(xml)?,
            Mode::Http {
                url,
                client,
                timeout,
            } => {
                tracing::info!(source = %self.name, credibility = self.credibility, "fetching feed");
                let body = Self::fetch_body(url, client, *timeout).await?;
                parse_entries(&body)?
            }
        };
        counter!("ingest_entries_total").increment(entries.len() as u64);
        Ok(entries)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn credibility(&self) -> u8 {
        self.credibility
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
