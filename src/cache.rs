//! On-disk snapshot cache: one gzipped CSV file per (bucket, prefix) pair.
//!
//! The file name is the hex md5 of the bucket name concatenated with the
//! prefix, so distinct watch targets never collide and the same target
//! always maps to the same file. Rows carry `Key,Size,LastModified` with
//! timestamps in RFC 3339 UTC; rows are written in key order, so saving
//! the same table twice produces identical bytes.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use md5::{Digest, Md5};

use crate::error::{Error, Result};
use crate::listing::{Listing, ObjectEntry};

pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(SnapshotCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot file for one watch target: `<dir>/<md5(bucket + prefix)>.csv.gz`.
    pub fn snapshot_path(&self, bucket: &str, prefix: &str) -> PathBuf {
        let mut hasher = Md5::new();
        hasher.update(bucket.as_bytes());
        hasher.update(prefix.as_bytes());
        let digest = hasher.finalize();
        self.dir.join(format!("{digest:x}.csv.gz"))
    }

    /// Read the stored snapshot, or `None` if this target was never saved.
    ///
    /// A file that exists but cannot be decompressed or parsed is reported
    /// as [`Error::Corrupt`] rather than silently treated as absent, so a
    /// damaged cache never masquerades as a first run.
    pub fn load(&self, bucket: &str, prefix: &str) -> Result<Option<Listing>> {
        let path = self.snapshot_path(bucket, prefix);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        // decompress fully before parsing; csv treats a failed header
        // read as end of input, not an error
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut raw = Vec::new();
        decoder
            .read_to_end(&mut raw)
            .map_err(|e| Error::Corrupt(format!("{}: {e}", path.display())))?;

        let mut reader = csv::Reader::from_reader(raw.as_slice());
        let mut listing = Listing::new();
        for record in reader.deserialize::<ObjectEntry>() {
            let entry =
                record.map_err(|e| Error::Corrupt(format!("{}: {e}", path.display())))?;
            listing.insert(entry);
        }
        log::debug!(
            "loaded snapshot {} ({} entries)",
            path.display(),
            listing.len()
        );
        Ok(Some(listing))
    }

    /// Write `listing` as the new snapshot for this target, replacing any
    /// previous file.
    pub fn save(&self, bucket: &str, prefix: &str, listing: &Listing) -> Result<()> {
        let path = self.snapshot_path(bucket, prefix);
        let file = File::create(&path)?;
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        let mut writer = csv::Writer::from_writer(encoder);

        for entry in listing.entries.values() {
            writer
                .serialize(entry)
                .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        }
        writer.flush()?;

        let encoder = writer
            .into_inner()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let mut inner = encoder.finish()?;
        inner.flush()?;

        log::debug!(
            "saved snapshot {} ({} entries)",
            path.display(),
            listing.len()
        );
        Ok(())
    }
}
