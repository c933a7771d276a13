//! Persisted set of already-delivered article identifiers.
//!
//! The store keeps identifiers in insertion order and is trimmed to the newest
//! `capacity` entries on save (oldest inserted dropped first, not LRU). An item
//! can therefore come back once enough newer items pushed it out.
//!
//! File shape:
//! ```json
//! { "articles": ["https://..."], "last_updated": "...", "last_run_time": "..." }
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ingest::types::FeedEntry;

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    articles: Vec<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    last_run_time: Option<String>,
}

/// Identity key for an entry: the link, or a hash of title + link + source
/// when the feed gives no usable link.
pub fn identity_key(entry: &FeedEntry, source: &str) -> String {
    let link = entry.link.trim();
    if !link.is_empty() {
        return link.to_string();
    }
    content_hash(&format!("{}|{}|{}", entry.title, link, source))
}

fn content_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest[..12].iter().map(|b| format!("{b:02x}")).collect();
    format!("sha256:{hex}")
}

#[derive(Debug)]
pub struct DedupStore {
    path: PathBuf,
    capacity: usize,
    order: Vec<String>,
    index: HashSet<String>,
    last_run_time: Option<String>,
}

impl DedupStore {
    /// Empty in-memory store bound to `path`; nothing is read.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
            order: Vec::new(),
            index: HashSet::new(),
            last_run_time: None,
        }
    }

    /// Load from disk. A missing or unreadable file is a cold start (empty store).
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let mut store = Self::new(path, capacity);
        match read_store_file(&store.path) {
            Ok(Some(file)) => {
                for id in file.articles {
                    store.insert(id);
                }
                store.last_run_time = file.last_run_time;
                if let Some(ts) = &store.last_run_time {
                    info!(last_run = %ts, "last successful run");
                }
                info!(count = store.len(), "loaded processed articles");
            }
            Ok(None) => info!(path = %store.path.display(), "no dedup store yet, starting empty"),
            Err(e) => warn!(error = ?e, path = %store.path.display(), "could not load dedup store, starting empty"),
        }
        store
    }

    pub fn seen(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Record `id` as delivered. Re-marking an existing id keeps its position.
    pub fn mark_seen(&mut self, id: impl Into<String>) {
        self.insert(id.into());
    }

    fn insert(&mut self, id: String) {
        if self.index.insert(id.clone()) {
            self.order.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `last_run_time` as found in the file at load.
    pub fn last_run_time(&self) -> Option<&str> {
        self.last_run_time.as_deref()
    }

    /// Identifiers in insertion order, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Drop the oldest entries beyond capacity.
    fn trim(&mut self) {
        if self.order.len() > self.capacity {
            let excess = self.order.len() - self.capacity;
            for id in self.order.drain(0..excess) {
                self.index.remove(&id);
            }
        }
    }

    /// Trim to capacity and write the file (tmp file + rename).
    pub fn persist(&mut self) -> Result<()> {
        self.trim();
        let now = Utc::now().to_rfc3339();
        let file = StoreFile {
            articles: self.order.clone(),
            last_updated: Some(now.clone()),
            last_run_time: Some(now.clone()),
        };
        let body = serde_json::to_string_pretty(&file).context("serializing dedup store")?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        self.last_run_time = Some(now);
        info!(count = self.order.len(), path = %self.path.display(), "saved processed articles");
        Ok(())
    }
}

fn read_store_file(path: &Path) -> Result<Option<StoreFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: StoreFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_and_seen() {
        let mut s = DedupStore::new("unused.json", 10);
        assert!(!s.seen("a"));
        s.mark_seen("a");
        assert!(s.seen("a"));
        s.mark_seen("a");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn trim_drops_oldest_inserted_first() {
        let mut s = DedupStore::new("unused.json", 3);
        for id in ["a", "b", "c", "d", "e"] {
            s.mark_seen(id);
        }
        // re-marking does not refresh position
        s.mark_seen("a");
        s.trim();
        assert_eq!(s.ids().collect::<Vec<_>>(), vec!["c", "d", "e"]);
        assert!(!s.seen("a"));
        assert!(!s.seen("b"));
    }

    #[test]
    fn identity_key_prefers_link() {
        let e = FeedEntry {
            title: "t".into(),
            link: " https://x.test/a ".into(),
            ..Default::default()
        };
        assert_eq!(identity_key(&e, "Src"), "https://x.test/a");
    }

    #[test]
    fn identity_key_hashes_when_link_missing() {
        let e = FeedEntry {
            title: "Same title".into(),
            ..Default::default()
        };
        let a = identity_key(&e, "CoinDesk");
        let b = identity_key(&e, "Decrypt");
        assert!(a.starts_with("sha256:"));
        assert_ne!(a, b);
        assert_eq!(a, identity_key(&e, "CoinDesk"));
    }

    #[test]
    fn content_hash_is_prefixed_lowercase_hex() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(content_hash("abc"), "sha256:ba7816bf8f01cfea414140de");
    }
}
