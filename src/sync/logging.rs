use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::paths;

/// One git invocation, as written to the debug log.
#[derive(Debug, Serialize, Deserialize)]
pub struct GitCommandLog {
    pub timestamp: DateTime<Utc>,
    pub args: Vec<String>,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub repository: String,
}

/// Appends git invocations as JSON lines while debug mode is on.
#[derive(Debug, Clone)]
pub struct GitCommandLogger {
    log_dir: Option<PathBuf>,
}

impl GitCommandLogger {
    /// Logger that writes to the application log directory when debug is enabled.
    pub fn new() -> Self {
        if !crate::ui::is_debug_enabled() {
            return Self { log_dir: None };
        }
        match paths::git_logs_dir() {
            Ok(dir) => Self { log_dir: Some(dir) },
            Err(_) => Self { log_dir: None },
        }
    }

    /// Logger writing into `dir` regardless of debug mode.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: Some(dir.into()),
        }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { log_dir: None }
    }

    pub fn log_command(
        &self,
        args: &[&str],
        exit_code: Option<i32>,
        stderr: &str,
        repository: &Path,
    ) -> Result<()> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };
        create_dir_all(log_dir).context("Failed to create git log directory")?;

        let entry = GitCommandLog {
            timestamp: Utc::now(),
            args: args.iter().map(|a| a.to_string()).collect(),
            stderr: stderr.to_string(),
            exit_code,
            success: exit_code == Some(0),
            repository: repository.display().to_string(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Self::log_file_path(log_dir))
            .context("Failed to open git log file")?;

        let json_line =
            serde_json::to_string(&entry).context("Failed to serialize git command log")?;
        writeln!(file, "{json_line}").context("Failed to write to git log file")?;

        Ok(())
    }

    fn log_file_path(log_dir: &Path) -> PathBuf {
        log_dir.join("git_commands.jsonl")
    }

    /// Logged entries, newest first.
    pub fn get_logs(&self) -> Result<Vec<GitCommandLog>> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(Vec::new());
        };
        let log_file = Self::log_file_path(log_dir);
        if !log_file.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&log_file).context("Failed to read git log file")?;

        let mut logs = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let log: GitCommandLog =
                serde_json::from_str(line).context("Failed to parse git log entry")?;
            logs.push(log);
        }

        logs.reverse();
        Ok(logs)
    }
}

impl Default for GitCommandLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_roundtrip_newest_first() {
        let dir = tempdir().unwrap();
        let logger = GitCommandLogger::in_dir(dir.path().join("logs"));
        let repo = Path::new("/tmp/dots");

        logger.log_command(&["init"], Some(0), "", repo).unwrap();
        logger
            .log_command(&["push", "origin", "main"], Some(1), "rejected", repo)
            .unwrap();

        let logs = logger.get_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].args, vec!["push", "origin", "main"]);
        assert!(!logs[0].success);
        assert_eq!(logs[0].stderr, "rejected");
        assert!(logs[1].success);
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = GitCommandLogger::disabled();
        logger
            .log_command(&["status"], Some(0), "", Path::new("/tmp"))
            .unwrap();
        assert!(logger.get_logs().unwrap().is_empty());
    }
}
