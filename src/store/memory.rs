//! In-memory object store for tests and benches.
//!
//! Pagination mirrors ListObjectsV2: keys come back in ascending order,
//! the continuation token is the last key of the previous page, and
//! `is_truncated` reports whether keys remain beyond the page. A store can
//! be poisoned to make every call fail, for exercising error propagation.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::listing::ObjectEntry;

use super::{ListPage, ObjectHead, ObjectStore};

pub struct MemoryStore {
    buckets: HashMap<String, BTreeMap<String, ObjectEntry>>,
    page_size: usize,
    fail_with: Option<String>,
    pages_served: Cell<u32>,
}

impl MemoryStore {
    /// A store that pages like S3's default (1000 keys per page).
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        MemoryStore {
            buckets: HashMap::new(),
            page_size: page_size.max(1),
            fail_with: None,
            pages_served: Cell::new(0),
        }
    }

    /// Insert or overwrite an object.
    pub fn put(&mut self, bucket: &str, key: &str, size: u64, last_modified: Option<DateTime<Utc>>) {
        self.buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            ObjectEntry {
                key: key.to_string(),
                size,
                last_modified,
            },
        );
    }

    pub fn remove(&mut self, bucket: &str, key: &str) {
        if let Some(objects) = self.buckets.get_mut(bucket) {
            objects.remove(key);
        }
    }

    /// Make every subsequent call fail with a storage error.
    pub fn poison(&mut self, message: &str) {
        self.fail_with = Some(message.to_string());
    }

    /// Number of listing pages handed out since construction.
    pub fn pages_served(&self) -> u32 {
        self.pages_served.get()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryStore {
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        if let Some(msg) = &self.fail_with {
            return Err(Error::Storage(msg.clone()));
        }
        self.pages_served.set(self.pages_served.get() + 1);

        let empty = BTreeMap::new();
        let objects = self.buckets.get(bucket).unwrap_or(&empty);

        let mut matching = objects
            .values()
            .filter(|e| e.key.starts_with(prefix))
            .skip_while(|e| token.is_some_and(|t| e.key.as_str() <= t));

        let entries: Vec<ObjectEntry> = matching.by_ref().take(self.page_size).cloned().collect();
        let is_truncated = matching.next().is_some();
        let next_token = if is_truncated {
            entries.last().map(|e| e.key.clone())
        } else {
            None
        };

        Ok(ListPage {
            entries,
            is_truncated,
            next_token,
        })
    }

    fn head(&self, bucket: &str, key: &str) -> Result<ObjectHead> {
        if let Some(msg) = &self.fail_with {
            return Err(Error::Storage(msg.clone()));
        }
        self.buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|e| ObjectHead {
                size: e.size,
                last_modified: e.last_modified,
            })
            .ok_or_else(|| Error::Storage(format!("no such key: {bucket}/{key}")))
    }
}
