//! S3-backed object store.
//!
//! The AWS SDK is async but the rest of the crate is not, so the store owns
//! a single-threaded tokio runtime and blocks on each request. Credentials
//! come from the usual provider chain (environment, profile, instance role).

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use chrono::DateTime;

use crate::error::{Error, Result};
use crate::listing::ObjectEntry;

use super::{ListPage, ObjectHead, ObjectStore};

pub struct S3Store {
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl S3Store {
    /// Build a client against AWS or, when `endpoint` is set, an
    /// S3-compatible service such as LocalStack or MinIO. Custom endpoints
    /// get path-style addressing since they rarely resolve virtual hosts.
    pub fn connect(region: Option<&str>, endpoint: Option<&str>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(Region::new(region.to_string()));
            }
            if let Some(endpoint) = endpoint {
                loader = loader.endpoint_url(endpoint);
            }
            let shared = loader.load().await;

            let builder = aws_sdk_s3::config::Builder::from(&shared);
            let config = if endpoint.is_some() {
                builder.force_path_style(true).build()
            } else {
                builder.build()
            };
            Client::from_conf(config)
        });

        Ok(S3Store { client, runtime })
    }
}

impl ObjectStore for S3Store {
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        self.runtime.block_on(async {
            let mut req = self.client.list_objects_v2().bucket(bucket);
            if !prefix.is_empty() {
                req = req.prefix(prefix);
            }
            if let Some(token) = token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| Error::Storage(format!("list {bucket}/{prefix}: {e}")))?;

            let mut entries = Vec::new();
            if let Some(contents) = resp.contents {
                for obj in contents {
                    let key = obj.key.unwrap_or_default();
                    // Directory markers carry no content worth tracking.
                    if key.is_empty() || key.ends_with('/') {
                        continue;
                    }
                    let last_modified = obj
                        .last_modified
                        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));
                    entries.push(ObjectEntry {
                        key,
                        size: obj.size.unwrap_or(0) as u64,
                        last_modified,
                    });
                }
            }

            let is_truncated = resp.is_truncated == Some(true);
            let next_token = if is_truncated {
                resp.next_continuation_token
            } else {
                None
            };

            Ok(ListPage {
                entries,
                is_truncated,
                next_token,
            })
        })
    }

    fn head(&self, bucket: &str, key: &str) -> Result<ObjectHead> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .head_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| Error::Storage(format!("head {bucket}/{key}: {e}")))?;

            Ok(ObjectHead {
                size: resp.content_length.unwrap_or(0) as u64,
                last_modified: resp
                    .last_modified
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
            })
        })
    }
}
