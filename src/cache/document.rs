//! Document cache with per-entry expiry.

use crate::debug;
use crate::source::{Clock, SystemClock};
use crate::utils::hash::ContentHash;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;

/// Cache key for a document: the kind name, with `:N` for pages past the first.
pub fn document_key(name: &str, page: u64) -> String {
    if page > 1 {
        format!("{name}:{page}")
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    /// Unix seconds after which the entry is gone.
    expires_at: i64,
}

impl<T> Entry<T> {
    fn is_live(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe document store shared by server workers.
///
/// Documents are stored as `Arc<str>` so readers never copy the body.
pub struct DocumentCache<C = SystemClock> {
    documents: RwLock<FxHashMap<String, Entry<Arc<str>>>>,
    /// Validity flags, expiring on the same schedule as documents.
    flags: RwLock<FxHashMap<String, Entry<()>>>,
    /// Fingerprint of the content the cached documents were built from.
    fingerprint: Mutex<Option<ContentHash>>,
    ttl_secs: i64,
    clock: C,
}

impl DocumentCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> DocumentCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            documents: RwLock::default(),
            flags: RwLock::default(),
            fingerprint: Mutex::new(None),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
            clock,
        }
    }

    fn now(&self) -> i64 {
        self.clock.now().to_unix_secs()
    }

    fn expiry(&self) -> i64 {
        self.now().saturating_add(self.ttl_secs)
    }

    /// Cached document, if present and not expired.
    pub fn get(&self, key: &str) -> Option<Arc<str>> {
        let now = self.now();
        let documents = self.documents.read();
        let entry = documents.get(key)?;
        entry.is_live(now).then(|| Arc::clone(&entry.value))
    }

    pub fn set(&self, key: &str, document: impl Into<Arc<str>>) {
        let entry = Entry {
            value: document.into(),
            expires_at: self.expiry(),
        };
        self.documents.write().insert(key.to_string(), entry);
    }

    /// Remove a document. Returns whether one was stored.
    pub fn delete(&self, key: &str) -> bool {
        self.documents.write().remove(key).is_some()
    }

    /// Drop every document and validity flag.
    pub fn clear_all(&self) {
        self.documents.write().clear();
        self.flags.write().clear();
    }

    pub fn is_valid(&self, key: &str) -> bool {
        let now = self.now();
        self.flags
            .read()
            .get(key)
            .is_some_and(|flag| flag.is_live(now))
    }

    pub fn validate(&self, key: &str) {
        let flag = Entry {
            value: (),
            expires_at: self.expiry(),
        };
        self.flags.write().insert(key.to_string(), flag);
    }

    pub fn invalidate(&self, key: &str) {
        self.flags.write().remove(key);
    }

    /// Cached document that is both live and marked valid.
    pub fn fresh(&self, key: &str) -> Option<Arc<str>> {
        if self.is_valid(key) {
            self.get(key)
        } else {
            None
        }
    }

    /// Store a document and mark it valid.
    pub fn store(&self, key: &str, document: impl Into<Arc<str>>) {
        self.set(key, document);
        self.validate(key);
    }

    /// Record the current content fingerprint, clearing the cache when it
    /// differs from the last one seen. Returns whether the cache was cleared.
    pub fn maybe_regenerate(&self, current: ContentHash) -> bool {
        let mut fingerprint = self.fingerprint.lock();
        match *fingerprint {
            Some(previous) if previous == current => false,
            Some(previous) => {
                debug!("cache"; "content changed ({} -> {}), clearing", previous, current);
                self.clear_all();
                *fingerprint = Some(current);
                true
            }
            None => {
                *fingerprint = Some(current);
                false
            }
        }
    }

    /// Drop expired entries.
    pub fn purge_expired(&self) -> usize {
        let now = self.now();
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|_, entry| entry.is_live(now));
        self.flags.write().retain(|_, flag| flag.is_live(now));
        before - documents.len()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that tests can move forward.
    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn new() -> Self {
            Self(AtomicI64::new(
                DateTimeUtc::from_ymd(2025, 1, 1).to_unix_secs(),
            ))
        }

        fn advance(&self, secs: i64) {
            self.0.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTimeUtc {
            DateTimeUtc::from_unix_secs(self.0.load(Ordering::SeqCst)).unwrap()
        }
    }

    fn cache(clock: &ManualClock) -> DocumentCache<&ManualClock> {
        DocumentCache::with_clock(Duration::from_secs(86_400), clock)
    }

    #[test]
    fn test_document_key() {
        assert_eq!(document_key("index", 1), "index");
        assert_eq!(document_key("post", 1), "post");
        assert_eq!(document_key("post", 2), "post:2");
    }

    #[test]
    fn test_get_set_delete() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        assert!(cache.get("post").is_none());

        cache.set("post", "<urlset/>");
        assert_eq!(cache.get("post").as_deref(), Some("<urlset/>"));
        assert_eq!(cache.len(), 1);

        assert!(cache.delete("post"));
        assert!(!cache.delete("post"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expiry() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.store("index", "<sitemapindex/>");

        clock.advance(86_399);
        assert!(cache.get("index").is_some());
        assert!(cache.is_valid("index"));

        clock.advance(1);
        assert!(cache.get("index").is_none());
        assert!(!cache.is_valid("index"));
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_validity_flags() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.set("page", "<urlset/>");
        assert!(!cache.is_valid("page"));
        assert!(cache.fresh("page").is_none());

        cache.validate("page");
        assert!(cache.is_valid("page"));
        assert!(cache.fresh("page").is_some());

        cache.invalidate("page");
        assert!(!cache.is_valid("page"));
        // The document itself survives invalidation
        assert!(cache.get("page").is_some());
    }

    #[test]
    fn test_clear_all() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.store("post", "a");
        cache.store("post:2", "b");
        cache.clear_all();
        assert!(cache.is_empty());
        assert!(!cache.is_valid("post"));
    }

    #[test]
    fn test_maybe_regenerate() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        let first = ContentHash::of("v1");

        // First fingerprint only records
        cache.store("index", "doc");
        assert!(!cache.maybe_regenerate(first));
        assert!(cache.fresh("index").is_some());

        assert!(!cache.maybe_regenerate(first));
        assert!(cache.fresh("index").is_some());

        assert!(cache.maybe_regenerate(ContentHash::of("v2")));
        assert!(cache.is_empty());
    }
}
