//! Watch façade: list, compare against the stored snapshot, advance it.
//!
//! One [`Monitor`] serves any number of watch targets against the same
//! store and cache directory. Each [`Monitor::compare`] call is a full
//! cycle: enumerate the live listing, diff it against the snapshot from
//! the previous run, and persist the new listing as the next baseline.
//!
//! The snapshot only advances when something changed. A run that reports
//! no keys leaves the cache file untouched, so repeated runs against a
//! quiet bucket are idempotent down to the snapshot's bytes.

use crate::cache::SnapshotCache;
use crate::diff;
use crate::error::Result;
use crate::listing::Listing;
use crate::store::ObjectStore;

pub struct Monitor<'a, S> {
    store: &'a S,
    cache: SnapshotCache,
}

impl<'a, S: ObjectStore> Monitor<'a, S> {
    pub fn new(store: &'a S, cache: SnapshotCache) -> Self {
        Monitor { store, cache }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Run one watch cycle for `bucket`/`prefix` and return the changed
    /// keys in ascending order.
    ///
    /// On a first run every listed key is reported and the snapshot is
    /// seeded. An empty first run reports nothing and writes nothing, so
    /// the target stays in first-run state until an object appears.
    pub fn compare(&self, bucket: &str, prefix: &str, max_iterations: u32) -> Result<Vec<String>> {
        let previous = self.cache.load(bucket, prefix)?;
        let current = Listing::load(self.store, bucket, prefix, max_iterations)?;

        let mut keys: Vec<String> = diff::changed_keys(previous.as_ref(), &current)
            .into_iter()
            .collect();
        keys.sort_unstable();

        if keys.is_empty() {
            log::debug!("no modifications in {bucket}/{prefix}");
        } else {
            log::info!("{bucket}/{prefix}: {} changed keys", keys.len());
            log::debug!("changed: {}", keys.join(", "));
            self.cache.save(bucket, prefix, &current)?;
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::memory::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::Path;
    use tempfile::TempDir;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    // builds a fresh monitor per call so the store stays mutable between
    // cycles; the snapshot state lives in `dir` either way
    fn run(store: &MemoryStore, dir: &Path) -> crate::error::Result<Vec<String>> {
        let monitor = Monitor::new(store, SnapshotCache::new(dir).unwrap());
        monitor.compare("bkt", "", 0)
    }

    #[test]
    fn first_run_reports_all_keys_and_seeds_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));
        store.put("bkt", "b.txt", 2, Some(ts(200)));

        let changed = run(&store, dir.path()).unwrap();
        assert_eq!(changed, vec!["a.txt", "b.txt"]);

        let cache = SnapshotCache::new(dir.path()).unwrap();
        assert!(cache.snapshot_path("bkt", "").exists());
    }

    #[test]
    fn quiet_second_run_reports_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));

        run(&store, dir.path()).unwrap();
        let changed = run(&store, dir.path()).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn quiet_run_leaves_snapshot_bytes_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));

        run(&store, dir.path()).unwrap();
        let path = SnapshotCache::new(dir.path())
            .unwrap()
            .snapshot_path("bkt", "");
        let before = std::fs::read(&path).unwrap();

        run(&store, dir.path()).unwrap();
        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn added_object_reported_then_absorbed() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));
        run(&store, dir.path()).unwrap();

        store.put("bkt", "c.txt", 3, Some(ts(300)));
        let changed = run(&store, dir.path()).unwrap();
        assert_eq!(changed, vec!["c.txt"]);

        let changed = run(&store, dir.path()).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn deleted_object_reported() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));
        store.put("bkt", "b.txt", 2, Some(ts(200)));
        run(&store, dir.path()).unwrap();

        store.remove("bkt", "b.txt");
        let changed = run(&store, dir.path()).unwrap();
        assert_eq!(changed, vec!["b.txt"]);
    }

    #[test]
    fn overwritten_object_reported_once() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));
        run(&store, dir.path()).unwrap();

        // same key, same size, newer timestamp
        store.put("bkt", "a.txt", 1, Some(ts(500)));
        let changed = run(&store, dir.path()).unwrap();
        assert_eq!(changed, vec!["a.txt"]);
    }

    #[test]
    fn empty_first_run_writes_no_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new();

        let changed = run(&store, dir.path()).unwrap();
        assert!(changed.is_empty());

        let cache = SnapshotCache::new(dir.path()).unwrap();
        assert!(!cache.snapshot_path("bkt", "").exists());
    }

    #[test]
    fn storage_error_propagates() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.poison("connection refused");

        assert!(matches!(
            run(&store, dir.path()),
            Err(Error::Storage(_))
        ));
    }

    #[test]
    fn corrupt_snapshot_propagates() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "a.txt", 1, Some(ts(100)));

        let cache = SnapshotCache::new(dir.path()).unwrap();
        std::fs::write(cache.snapshot_path("bkt", ""), b"garbage").unwrap();

        assert!(matches!(
            run(&store, dir.path()),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn iteration_cap_is_forwarded() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::with_page_size(1);
        store.put("bkt", "a.txt", 1, Some(ts(100)));
        store.put("bkt", "b.txt", 2, Some(ts(200)));
        store.put("bkt", "c.txt", 3, Some(ts(300)));

        let monitor = Monitor::new(&store, SnapshotCache::new(dir.path()).unwrap());
        let changed = monitor.compare("bkt", "", 2).unwrap();
        assert_eq!(changed, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn prefixes_keep_separate_snapshots() {
        let dir = TempDir::new().unwrap();
        let mut store = MemoryStore::new();
        store.put("bkt", "logs/a", 1, Some(ts(100)));
        store.put("bkt", "data/b", 2, Some(ts(200)));

        let monitor = Monitor::new(&store, SnapshotCache::new(dir.path()).unwrap());
        let logs = monitor.compare("bkt", "logs/", 0).unwrap();
        let data = monitor.compare("bkt", "data/", 0).unwrap();
        assert_eq!(logs, vec!["logs/a"]);
        assert_eq!(data, vec!["data/b"]);

        // a second pass over each target is quiet
        assert!(monitor.compare("bkt", "logs/", 0).unwrap().is_empty());
        assert!(monitor.compare("bkt", "data/", 0).unwrap().is_empty());
    }
}
