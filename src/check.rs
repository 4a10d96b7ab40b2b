//! Staleness checks for individual objects, monitoring-plugin style.
//!
//! Each target is headed, its age computed from the last-modified
//! timestamp, and the age classified against a warning and a critical
//! threshold. Results map to the conventional plugin exit codes:
//! OK 0, WARN 1, CRITICAL 2, UNKNOWN 3. A target that cannot be parsed,
//! headed, or dated is UNKNOWN rather than a hard error, so one broken
//! target never stops the rest of the run.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::store::ObjectStore;

/// Check severity. Variants are declared in ascending severity so that
/// `max` picks the worst outcome of a run; note UNKNOWN sits between
/// WARNING and CRITICAL, a failed check outranks a mere warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Unknown,
    Critical,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARN",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

/// A bucket and key named on the command line.
///
/// Two spellings are accepted: a full `s3://bucket/key` URL or the bare
/// `bucket/key` form. The key may itself contain slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    pub bucket: String,
    pub key: String,
}

impl ObjectPath {
    pub fn parse(raw: &str) -> Option<ObjectPath> {
        let rest = raw.strip_prefix("s3://").unwrap_or(raw);
        let (bucket, key) = rest.split_once('/')?;
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some(ObjectPath {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

/// Result of checking one target.
#[derive(Debug)]
pub struct CheckOutcome {
    pub target: String,
    pub status: Status,
    pub detail: String,
}

/// Classify an object age against the two thresholds. Ages exactly at a
/// threshold do not breach it.
pub fn classify(age: Duration, warn: Duration, critical: Duration) -> Status {
    if age > critical {
        Status::Critical
    } else if age > warn {
        Status::Warning
    } else {
        Status::Ok
    }
}

/// Head one target and classify its staleness at time `now`.
pub fn check_object<S: ObjectStore>(
    store: &S,
    raw: &str,
    now: DateTime<Utc>,
    warn: Duration,
    critical: Duration,
) -> CheckOutcome {
    let unknown = |detail: String| CheckOutcome {
        target: raw.to_string(),
        status: Status::Unknown,
        detail,
    };

    let Some(path) = ObjectPath::parse(raw) else {
        return unknown("not a bucket/key path".to_string());
    };

    let head = match store.head(&path.bucket, &path.key) {
        Ok(head) => head,
        Err(e) => return unknown(e.to_string()),
    };

    let Some(modified) = head.last_modified else {
        return unknown("object has no last-modified timestamp".to_string());
    };

    // an object dated in the future counts as freshly modified
    let age = (now - modified).to_std().unwrap_or_default();
    CheckOutcome {
        target: raw.to_string(),
        status: classify(age, warn, critical),
        detail: format!("modified {} ago", format_age(age)),
    }
}

/// Worst status of a run; an empty run is OK.
pub fn worst(outcomes: &[CheckOutcome]) -> Status {
    outcomes
        .iter()
        .map(|o| o.status)
        .max()
        .unwrap_or(Status::Ok)
}

fn format_age(age: Duration) -> String {
    // drop sub-second noise, nobody alerts on milliseconds
    humantime::format_duration(Duration::from_secs(age.as_secs())).to_string()
}
