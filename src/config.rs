//! Resolved settings: CLI flags win, then the config file, then defaults.
//!
//! The config file is TOML with kebab-case keys, read from the per-user
//! location unless `--config` names another file. An explicitly named
//! file must exist; the default one is optional. Durations in the file
//! use the same spellings the CLI accepts ("30m", "2h", "1d").

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::{CheckArgs, CompareArgs};
use crate::error::{Error, Result};
use crate::platform;

const DEFAULT_MAX_ITERATIONS: u32 = 100;
const DEFAULT_WARN: Duration = Duration::from_secs(60 * 60);
const DEFAULT_CRITICAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Raw config file contents. Everything is optional; unknown keys are
/// rejected so typos do not silently fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub cache_dir: Option<PathBuf>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub max_iterations: Option<u32>,
    pub warn: Option<String>,
    pub critical: Option<String>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<FileConfig> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    fn warn_duration(&self) -> Result<Option<Duration>> {
        parse_file_duration(self.warn.as_deref(), "warn")
    }

    fn critical_duration(&self) -> Result<Option<Duration>> {
        parse_file_duration(self.critical.as_deref(), "critical")
    }
}

/// Load the config file named on the command line, or the per-user one
/// if it exists, or empty settings.
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig> {
    match explicit {
        Some(path) => FileConfig::read(path),
        None => match platform::config_file_path() {
            Some(path) if path.exists() => FileConfig::read(&path),
            _ => Ok(FileConfig::default()),
        },
    }
}

fn parse_file_duration(value: Option<&str>, key: &str) -> Result<Option<Duration>> {
    value
        .map(|s| {
            humantime::parse_duration(s).map_err(|e| Error::Config(format!("{key} = {s:?}: {e}")))
        })
        .transpose()
}

pub struct Settings {
    pub cache_dir: PathBuf,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub max_iterations: u32,
    pub warn: Duration,
    pub critical: Duration,
}

impl Settings {
    pub fn for_compare(args: &CompareArgs, file: &FileConfig) -> Result<Self> {
        Ok(Settings {
            cache_dir: args
                .cache_dir
                .clone()
                .or_else(|| file.cache_dir.clone())
                .unwrap_or_else(|| platform::default_cache_dir(platform::detect())),
            region: args.region.clone().or_else(|| file.region.clone()),
            endpoint_url: args.endpoint_url.clone().or_else(|| file.endpoint_url.clone()),
            max_iterations: args
                .max_iterations
                .or(file.max_iterations)
                .unwrap_or(DEFAULT_MAX_ITERATIONS),
            warn: file.warn_duration()?.unwrap_or(DEFAULT_WARN),
            critical: file.critical_duration()?.unwrap_or(DEFAULT_CRITICAL),
        })
    }

    pub fn for_check(args: &CheckArgs, file: &FileConfig) -> Result<Self> {
        Ok(Settings {
            cache_dir: file
                .cache_dir
                .clone()
                .unwrap_or_else(|| platform::default_cache_dir(platform::detect())),
            region: args.region.clone().or_else(|| file.region.clone()),
            endpoint_url: args.endpoint_url.clone().or_else(|| file.endpoint_url.clone()),
            max_iterations: file.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            warn: match args.warn {
                Some(warn) => warn,
                None => file.warn_duration()?.unwrap_or(DEFAULT_WARN),
            },
            critical: match args.critical {
                Some(critical) => critical,
                None => file.critical_duration()?.unwrap_or(DEFAULT_CRITICAL),
            },
        })
    }
}
