use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sync::{PathSpec, RepositoryHandle, path};

pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Managed directory every entry is mirrored into
    #[serde(default)]
    pub dotfiles_dir: String,
    /// Remote registered as `origin` when the managed directory is initialized
    #[serde(default)]
    pub git_repo: Option<String>,
    #[serde(default)]
    pub paths: Vec<PathSpec>,
}

impl Config {
    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(s).context("invalid config yaml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dotfiles_dir.trim().is_empty() {
            bail!("dotfiles_dir must be set");
        }
        for (i, entry) in self.paths.iter().enumerate() {
            if entry.source.trim().is_empty() {
                bail!("paths[{i}]: source must not be empty");
            }
            if entry.label.trim().is_empty() {
                bail!("paths[{i}]: name must not be empty");
            }
        }
        Ok(())
    }

    /// The managed directory with `~` and environment references expanded.
    pub fn dotfiles_path(&self) -> PathBuf {
        path::resolve(&self.dotfiles_dir)
    }

    pub fn repository(&self) -> RepositoryHandle {
        RepositoryHandle::new(self.dotfiles_path(), self.git_repo.clone())
    }
}

/// `config.yaml` in the current working directory.
pub fn default_config_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}
