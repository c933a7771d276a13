// src/ingest/mod.rs
pub mod rss;
pub mod scheduler;
pub mod types;

use chrono::{NaiveDateTime, Utc};
use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

use crate::classify;
use crate::config::BotConfig;
use crate::dedup::{identity_key, DedupStore};
use crate::error::FetchError;
use crate::ingest::types::{FeedEntry, FeedSource, NewsItem};
use crate::recency;
use crate::scoring::{self, ScoredItem};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_entries_total", "Total entries parsed from feeds.");
        describe_counter!(
            "ingest_candidates_total",
            "Entries that passed every filter and were scored."
        );
        describe_counter!(
            "ingest_rejected_total",
            "Entries dropped by the filter chain, by reason."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Feed fetch/parse failures, by kind."
        );
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Normalize text: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// First `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Knobs of the filter chain.
#[derive(Clone, Copy, Debug)]
pub struct FilterConfig {
    pub lookback_hours: u32,
    pub summary_max_chars: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lookback_hours: 1,
            summary_max_chars: 300,
        }
    }
}

impl From<&BotConfig> for FilterConfig {
    fn from(cfg: &BotConfig) -> Self {
        Self {
            lookback_hours: cfg.hours_lookback,
            summary_max_chars: cfg.summary_max_chars,
        }
    }
}

/// Why an entry did not become a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotCrypto,
    AlreadySeen,
    Stale { age: String },
    PastEvent,
    DuplicateInRun,
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotCrypto => "not_crypto",
            Self::AlreadySeen => "already_seen",
            Self::Stale { .. } => "stale",
            Self::PastEvent => "past_event",
            Self::DuplicateInRun => "duplicate_in_run",
        }
    }
}

/// Run one entry through the filter chain, short-circuiting on the first miss:
/// crypto relevance → already seen → recency → past-event content → score.
pub fn evaluate_entry(
    entry: &FeedEntry,
    source: &str,
    credibility: u8,
    store: &DedupStore,
    filter: &FilterConfig,
    now: NaiveDateTime,
) -> Result<ScoredItem, Rejection> {
    if !classify::is_crypto_relevant(&entry.title, &entry.summary) {
        return Err(Rejection::NotCrypto);
    }

    if store.seen(&identity_key(entry, source)) {
        return Err(Rejection::AlreadySeen);
    }

    let (fresh, age) = recency::is_recent_at(&entry.published, filter.lookback_hours, now);
    if !fresh {
        return Err(Rejection::Stale { age });
    }

    if recency::is_about_past_event(&entry.title, &entry.summary) {
        return Err(Rejection::PastEvent);
    }

    let item = NewsItem {
        source: source.to_string(),
        title: entry.title.clone(),
        summary: truncate_chars(&entry.summary, filter.summary_max_chars),
        link: identity_key(entry, source),
        published: entry.published.clone(),
        credibility,
        age,
    };
    Ok(scoring::score_item(item))
}

/// Outcome of one ingestion pass over all sources.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Candidates in source order, then feed order. Not yet ranked.
    pub candidates: Vec<ScoredItem>,
    pub failed_sources: Vec<(String, FetchError)>,
    pub entries_seen: usize,
    pub rejected: usize,
}

/// Fetch every source concurrently, then filter and score sequentially.
pub async fn run_once(
    sources: &[Box<dyn FeedSource>],
    store: &DedupStore,
    filter: &FilterConfig,
) -> IngestReport {
    run_once_at(sources, store, filter, Utc::now().naive_utc()).await
}

/// [`run_once`] with an explicit `now` (naive UTC).
pub async fn run_once_at(
    sources: &[Box<dyn FeedSource>],
    store: &DedupStore,
    filter: &FilterConfig,
    now: NaiveDateTime,
) -> IngestReport {
    ensure_metrics_described();

    // Fan out; a failing source only yields its own Err.
    let fetched = join_all(sources.iter().map(|s| async move {
        let res = s.fetch_entries().await;
        (s, res)
    }))
    .await;

    let mut report = IngestReport::default();
    let mut accepted_this_run: HashSet<String> = HashSet::new();

    for (source, res) in fetched {
        let entries = match res {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, source = source.name(), "feed fetch failed");
                counter!("ingest_source_errors_total", "kind" => e.kind()).increment(1);
                report.failed_sources.push((source.name().to_string(), e));
                continue;
            }
        };

        let mut found = 0usize;
        for entry in &entries {
            report.entries_seen += 1;
            let verdict = evaluate_entry(
                entry,
                source.name(),
                source.credibility(),
                store,
                filter,
                now,
            )
            .and_then(|scored| {
                if accepted_this_run.insert(scored.item.link.clone()) {
                    Ok(scored)
                } else {
                    Err(Rejection::DuplicateInRun)
                }
            });

            match verdict {
                Ok(scored) => {
                    tracing::info!(
                        source = source.name(),
                        age = %scored.item.age,
                        significance = scored.scores.significance,
                        title = %preview(&scored.item.title, 50),
                        "found fresh article"
                    );
                    found += 1;
                    report.candidates.push(scored);
                }
                Err(rej) => {
                    match &rej {
                        Rejection::Stale { age } => tracing::debug!(
                            source = source.name(),
                            %age,
                            title = %preview(&entry.title, 50),
                            "skipping old article"
                        ),
                        Rejection::PastEvent => tracing::debug!(
                            source = source.name(),
                            title = %preview(&entry.title, 50),
                            "skipping article about past events"
                        ),
                        _ => {}
                    }
                    counter!("ingest_rejected_total", "reason" => rej.reason()).increment(1);
                    report.rejected += 1;
                }
            }
        }
        tracing::info!(source = source.name(), found, "new crypto articles from source");
    }

    counter!("ingest_candidates_total").increment(report.candidates.len() as u64);
    report
}

/// Char-safe prefix for log lines.
pub(crate) fn preview(s: &str, max: usize) -> String {
    let mut out = truncate_chars(s, max);
    if s.chars().count() > max {
        out.push_str("...");
    }
    out
}
