use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single file or directory transfer.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("source not found: {source_path} ({cause})")]
    SourceNotFound {
        source_path: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("cannot write {}: {cause}", .path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },
}

impl TransferError {
    pub fn source_not_found(source_path: impl Into<String>, cause: std::io::Error) -> Self {
        TransferError::SourceNotFound {
            source_path: source_path.into(),
            cause,
        }
    }

    pub fn unwritable(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        TransferError::DestinationUnwritable {
            path: path.into(),
            cause,
        }
    }
}

/// Failure of a repository operation. Each variant names the stage that failed.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("{} is not a git repository yet (push once to initialize it)", .0.display())]
    NotARepository(PathBuf),

    #[error("git status failed: {0}")]
    StatusFailed(String),

    #[error("failed to init repo: {0}")]
    InitializationFailed(String),

    #[error("failed to git add: {0}")]
    StagingFailed(String),

    #[error("failed to git commit: {0}")]
    CommitFailed(String),

    #[error("failed to git push: {0}")]
    PushFailed(String),

    #[error("git is not available: {0}")]
    CommandUnavailable(String),
}

impl RepoError {
    /// Re-label an error from a sub-step as belonging to `stage`.
    ///
    /// `CommandUnavailable` is kept as is so a missing binary is never
    /// reported as a staging or commit problem.
    pub fn in_stage(self, stage: fn(String) -> RepoError) -> RepoError {
        match self {
            RepoError::CommandUnavailable(_) => self,
            other => stage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_source_not_found_message_names_raw_path() {
        let err = TransferError::source_not_found(
            "~/.zshrc",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("source not found: ~/.zshrc"), "{msg}");
    }

    #[test]
    fn test_in_stage_keeps_command_unavailable() {
        let err = RepoError::CommandUnavailable("git".into()).in_stage(RepoError::CommitFailed);
        assert!(matches!(err, RepoError::CommandUnavailable(_)));

        let err = RepoError::StatusFailed("exit 128".into()).in_stage(RepoError::StagingFailed);
        match err {
            RepoError::StagingFailed(msg) => assert!(msg.contains("exit 128")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
