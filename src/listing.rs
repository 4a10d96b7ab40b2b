//! Bucket listings: one entry per object key, loaded page by page.
//!
//! A [`Listing`] is a full point-in-time enumeration of a (bucket, prefix)
//! pair, keyed by object key. [`Listing::load`] walks the storage API's
//! pagination until the listing is complete or an iteration cap is hit;
//! hitting the cap returns the partial-but-consistent table rather than an
//! error, so a capped run degrades to best-effort instead of failing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::ObjectStore;

/// One object as reported by a bucket listing.
///
/// `last_modified` is always UTC-aware; it is `None` only when the backend
/// omitted the timestamp entirely. Serde renames match the snapshot file's
/// column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A full enumeration of one (bucket, prefix) pair at one point in time.
///
/// Equality is entry-wise: same key set, and identical size and
/// last-modified for every key. The map is ordered so that serializing the
/// same table twice produces identical bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub entries: BTreeMap<String, ObjectEntry>,
}

impl Listing {
    pub fn new() -> Self {
        Listing {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ObjectEntry> {
        self.entries.get(key)
    }

    /// Insert an entry under its own key, warning if the key was already
    /// present. Duplicate keys are not expected within one bucket listing.
    pub fn insert(&mut self, entry: ObjectEntry) {
        if let Some(prev) = self.entries.insert(entry.key.clone(), entry) {
            log::warn!("duplicate key in listing, keeping later entry: {}", prev.key);
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Load the full listing for `bucket`/`prefix` from `store`.
    ///
    /// Fetches pages while the store reports more are available and fewer
    /// than `max_iterations` pages have been fetched (`0` = unbounded).
    /// Stopping at the cap is not an error: the table built so far is
    /// returned and the truncation state is logged. An empty bucket or
    /// prefix yields an empty table.
    pub fn load<S: ObjectStore>(
        store: &S,
        bucket: &str,
        prefix: &str,
        max_iterations: u32,
    ) -> Result<Listing> {
        let mut listing = Listing::new();
        let mut token: Option<String> = None;
        let mut pages: u32 = 0;

        loop {
            let page = store.list_page(bucket, prefix, token.as_deref())?;
            pages += 1;
            log::debug!("iter {pages}: {} entries", page.entries.len());

            let page_count = page.entries.len();
            for entry in page.entries {
                listing.insert(entry);
            }

            let capped = max_iterations > 0 && pages >= max_iterations;
            if page.next_token.is_none() || capped {
                // capped runs surface here too: is_truncated stays true
                // when pages remain unfetched
                log::info!(
                    "listing {bucket}/{prefix}: is_truncated: {}, qty: {page_count}",
                    page.is_truncated
                );
                break;
            }
            token = page.next_token;
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::memory::MemoryStore;
    use crate::store::{ListPage, ObjectHead};
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    // serves the same key on two consecutive pages
    struct OverlappingStore;

    impl ObjectStore for OverlappingStore {
        fn list_page(&self, _: &str, _: &str, token: Option<&str>) -> Result<ListPage> {
            let page = match token {
                None => ListPage {
                    entries: vec![ObjectEntry {
                        key: "dup.txt".into(),
                        size: 1,
                        last_modified: Some(ts(100)),
                    }],
                    is_truncated: true,
                    next_token: Some("again".into()),
                },
                Some(_) => ListPage {
                    entries: vec![ObjectEntry {
                        key: "dup.txt".into(),
                        size: 2,
                        last_modified: Some(ts(200)),
                    }],
                    is_truncated: false,
                    next_token: None,
                },
            };
            Ok(page)
        }

        fn head(&self, bucket: &str, key: &str) -> Result<ObjectHead> {
            Err(Error::Storage(format!("no such key: {bucket}/{key}")))
        }
    }

    fn store_with(keys: &[(&str, u64)], page_size: usize) -> MemoryStore {
        let mut store = MemoryStore::with_page_size(page_size);
        for (i, (key, size)) in keys.iter().enumerate() {
            store.put("bkt", key, *size, Some(ts(1_600_000_000 + i as i64)));
        }
        store
    }

    #[test]
    fn empty_bucket_yields_empty_table() {
        let store = MemoryStore::with_page_size(10);
        let listing = Listing::load(&store, "bkt", "", 0).unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn single_page_load() {
        let store = store_with(&[("a.txt", 10), ("b.txt", 20)], 10);
        let listing = Listing::load(&store, "bkt", "", 0).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.get("a.txt").unwrap().size, 10);
        assert_eq!(listing.get("b.txt").unwrap().size, 20);
    }

    #[test]
    fn merges_all_pages() {
        let keys: Vec<(String, u64)> = (0..25).map(|i| (format!("k{i:02}"), i)).collect();
        let refs: Vec<(&str, u64)> = keys.iter().map(|(k, s)| (k.as_str(), *s)).collect();
        let store = store_with(&refs, 10);

        let listing = Listing::load(&store, "bkt", "", 0).unwrap();
        assert_eq!(listing.len(), 25);
        assert_eq!(store.pages_served(), 3);
    }

    #[test]
    fn iteration_cap_returns_partial_table() {
        let keys: Vec<(String, u64)> = (0..25).map(|i| (format!("k{i:02}"), i)).collect();
        let refs: Vec<(&str, u64)> = keys.iter().map(|(k, s)| (k.as_str(), *s)).collect();
        let store = store_with(&refs, 10);

        let listing = Listing::load(&store, "bkt", "", 2).unwrap();
        // two pages of ten, no error despite five keys remaining
        assert_eq!(listing.len(), 20);
        assert_eq!(store.pages_served(), 2);
    }

    #[test]
    fn cap_of_zero_is_unbounded() {
        let keys: Vec<(String, u64)> = (0..25).map(|i| (format!("k{i:02}"), i)).collect();
        let refs: Vec<(&str, u64)> = keys.iter().map(|(k, s)| (k.as_str(), *s)).collect();
        let store = store_with(&refs, 10);

        let listing = Listing::load(&store, "bkt", "", 0).unwrap();
        assert_eq!(listing.len(), 25);
    }

    #[test]
    fn prefix_filters_keys() {
        let store = store_with(&[("logs/a", 1), ("logs/b", 2), ("data/c", 3)], 10);
        let listing = Listing::load(&store, "bkt", "logs/", 0).unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing.get("data/c").is_none());
    }

    #[test]
    fn duplicate_key_across_pages_keeps_later_entry() {
        let listing = Listing::load(&OverlappingStore, "bkt", "", 0).unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("dup.txt").unwrap().size, 2);
    }

    #[test]
    fn entry_wise_equality() {
        let mut a = Listing::new();
        a.insert(ObjectEntry {
            key: "x".into(),
            size: 1,
            last_modified: Some(ts(100)),
        });
        let mut b = Listing::new();
        b.insert(ObjectEntry {
            key: "x".into(),
            size: 1,
            last_modified: Some(ts(100)),
        });
        assert_eq!(a, b);

        b.entries.get_mut("x").unwrap().size = 2;
        assert_ne!(a, b);
    }
}
