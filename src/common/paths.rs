use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application data directory, e.g. `~/.local/share/dotsync`
pub fn dotsync_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
            home.join(".local/share")
        })
        .join("dotsync")
}

/// Directory holding the git command log, created on demand
pub fn git_logs_dir() -> Result<PathBuf> {
    let logs_dir = dotsync_data_dir().join("logs");
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("creating git logs directory at {}", logs_dir.display()))?;
    Ok(logs_dir)
}
