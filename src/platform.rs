use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
    Unknown,
}

pub fn detect() -> Platform {
    match std::env::consts::OS {
        "macos" => Platform::MacOS,
        "linux" => Platform::Linux,
        "windows" => Platform::Windows,
        _ => Platform::Unknown,
    }
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Where snapshots live when no directory is configured.
///
/// Linux gets a spool directory (cron jobs usually run as a service user
/// with no home), macOS the user Library, Windows the temp directory.
/// Anything else falls back to `cache` relative to the working directory.
pub fn default_cache_dir(platform: Platform) -> PathBuf {
    match platform {
        Platform::Linux => PathBuf::from("/var/spool/churn"),
        Platform::MacOS => home_dir()
            .map(|h| h.join("Library").join("churn"))
            .unwrap_or_else(|| PathBuf::from("cache")),
        Platform::Windows => std::env::var_os("TEMP")
            .map(|t| PathBuf::from(t).join("churn"))
            .unwrap_or_else(|| PathBuf::from("cache")),
        Platform::Unknown => PathBuf::from("cache"),
    }
}

/// Per-user config file (~/.config/churn/config.toml or platform equivalent)
pub fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "churn")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
