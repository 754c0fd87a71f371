use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::Mutex;

use crate::model::{Fingerprint, ImageResult};

/// Fingerprint keyed results for the lifetime of the owning resolver.
///
/// Grows without bound and never expires entries. `clear` is the only full
/// eviction; `mark_url_failed` drops the entries pointing at one url.
#[derive(Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<Fingerprint, ImageResult>>,
    failed_urls: Mutex<HashSet<String>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<ImageResult> {
        self.entries.lock().get(fingerprint).cloned()
    }

    pub fn set(&self, fingerprint: Fingerprint, result: ImageResult) {
        self.entries.lock().insert(fingerprint, result);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.failed_urls.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Cached entry count per source tag.
    pub fn stats_by_source(&self) -> BTreeMap<String, usize> {
        let entries = self.entries.lock();
        let mut stats = BTreeMap::new();
        for result in entries.values() {
            *stats.entry(result.source().as_tag().to_string()).or_insert(0) += 1;
        }
        stats
    }

    /// Remembers a url the consumer could not load and evicts every entry
    /// resolved to it. Returns the number of evicted entries.
    pub fn mark_url_failed(&self, url: &str) -> usize {
        self.failed_urls.lock().insert(url.to_string());
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, result| result.url() != url);
        before - entries.len()
    }

    pub fn is_url_failed(&self, url: &str) -> bool {
        self.failed_urls.lock().contains(url)
    }
}
