//! churn - New-object monitor for S3 buckets
//!
//! Lists a bucket, diffs the listing against a gzipped CSV snapshot of
//! the previous run, reports the keys that changed, and advances the
//! snapshot. A second surface checks single objects for staleness with
//! monitoring-plugin exit codes.

pub mod cache;
pub mod check;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod listing;
pub mod logging;
pub mod monitor;
pub mod platform;
pub mod store;
