use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch working directory holding a `config.yaml`, the sources and the
/// managed dotfiles directory.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    /// Working directory the binary runs in
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory for source files referenced by the config
    pub fn sources(&self) -> PathBuf {
        self.path().join("sources")
    }

    /// Managed directory written by `dotfiles_dir`
    pub fn dotfiles(&self) -> PathBuf {
        self.path().join("dotfiles")
    }

    /// Isolated data directory for the git command log
    pub fn data_home(&self) -> PathBuf {
        self.path().join("data")
    }

    /// Write `config.yaml` with the given remote and `(source, type, name)` entries.
    pub fn write_config(&self, remote: Option<&str>, entries: &[(&PathBuf, &str, &str)]) -> Result<()> {
        let mut yaml = format!("dotfiles_dir: {}\n", self.dotfiles().display());
        if let Some(remote) = remote {
            yaml.push_str(&format!("git_repo: {remote}\n"));
        }
        if entries.is_empty() {
            yaml.push_str("paths: []\n");
        } else {
            yaml.push_str("paths:\n");
        }
        for (source, kind, name) in entries {
            yaml.push_str(&format!(
                "  - source: {}\n    type: {kind}\n    name: {name}\n",
                source.display()
            ));
        }
        std::fs::write(self.path().join("config.yaml"), yaml)?;
        Ok(())
    }
}
