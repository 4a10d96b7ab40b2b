//! Storage backends.
//!
//! [`ObjectStore`] is the seam between the monitor and whatever serves the
//! bucket listing: [`s3::S3Store`] in production, [`memory::MemoryStore`]
//! in tests and benches. Both calls block; pagination state is carried in
//! the opaque continuation token, exactly as ListObjectsV2 shapes it.

pub mod memory;
pub mod s3;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::listing::ObjectEntry;

/// One page of a bucket listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub entries: Vec<ObjectEntry>,
    /// Whether the backend reported more results beyond this page.
    pub is_truncated: bool,
    /// Cursor for the next page; `None` means the listing is complete.
    pub next_token: Option<String>,
}

/// Metadata for a single object, as returned by a head request.
#[derive(Debug, Clone)]
pub struct ObjectHead {
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A paginated object-listing backend.
pub trait ObjectStore {
    /// Fetch one page of keys under `prefix`, resuming from `token`.
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage>;

    /// Fetch metadata for a single object without its body.
    fn head(&self, bucket: &str, key: &str) -> Result<ObjectHead>;
}
