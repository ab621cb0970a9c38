use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Declared shape of a configured entry.
///
/// The declaration is advisory: an entry whose source turns out to be a
/// directory on disk is copied as a directory whatever it was declared as.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum PathKind {
    #[default]
    File,
    Directory,
}

impl From<String> for PathKind {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("directory") {
            PathKind::Directory
        } else {
            PathKind::File
        }
    }
}

impl From<PathKind> for String {
    fn from(kind: PathKind) -> Self {
        match kind {
            PathKind::File => "file".to_string(),
            PathKind::Directory => "directory".to_string(),
        }
    }
}

/// One configured synchronization entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub source: String,
    #[serde(rename = "type", default)]
    pub kind: PathKind,
    #[serde(rename = "name")]
    pub label: String,
}

impl PathSpec {
    #[cfg(test)]
    pub fn new(source: impl Into<String>, kind: PathKind, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            label: label.into(),
        }
    }
}

/// A working copy root and the remote it publishes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    root: PathBuf,
    remote_url: Option<String>,
}

impl RepositoryHandle {
    pub fn new(root: impl Into<PathBuf>, remote_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            remote_url: remote_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }
}

/// Lifecycle of one entry within a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Pending,
    InProgress,
    Succeeded,
    Failed { message: String },
}

impl TransferState {
    pub fn label(&self) -> &'static str {
        match self {
            TransferState::Pending => "TODO",
            TransferState::InProgress => "SYNCING",
            TransferState::Succeeded => "OK",
            TransferState::Failed { .. } => "ERROR",
        }
    }
}

/// Per-run record of one entry's transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub spec: PathSpec,
    pub state: TransferState,
}

impl TransferOutcome {
    pub fn pending(spec: PathSpec) -> Self {
        Self {
            spec,
            state: TransferState::Pending,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            TransferState::Failed { message } => Some(message),
            _ => None,
        }
    }
}
