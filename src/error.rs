//! Error taxonomy shared by every fallible layer.
//!
//! - [`Error::Storage`] - the listing/head API call failed
//! - [`Error::Io`] - the cache directory or a snapshot file could not be
//!   created, read, or written
//! - [`Error::Corrupt`] - a snapshot file exists but cannot be decoded
//! - [`Error::Config`] - a config file or setting could not be used
//!
//! A corrupt snapshot is deliberately distinct from an absent one: absence
//! is a normal first-run state, corruption is an error the operator should
//! see. No layer below `main` catches or suppresses these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Storage API request failed (network, auth, missing bucket).
    #[error("storage request failed: {0}")]
    Storage(String),

    /// Cache directory or snapshot file I/O failed.
    #[error("cache i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file exists but could not be decoded.
    #[error("snapshot file corrupt: {0}")]
    Corrupt(String),

    /// Config file unreadable or a setting does not parse.
    #[error("config invalid: {0}")]
    Config(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }

    #[test]
    fn display_names_the_kind() {
        let e = Error::Storage("bucket does not exist".into());
        assert!(e.to_string().contains("storage request failed"));

        let e = Error::Corrupt("bad gzip header".into());
        assert!(e.to_string().contains("corrupt"));
    }
}
