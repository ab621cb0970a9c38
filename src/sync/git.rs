//! Git working copy of the managed directory.
//!
//! All git access goes through [`GitRunner`] so the publish flow can be driven
//! by a scripted fake in tests. [`SystemGit`] is the real implementation and
//! shells out to the `git` binary with the working directory pinned to the
//! repository root.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::error::RepoError;
use super::logging::GitCommandLogger;
use super::types::RepositoryHandle;

pub const PRIMARY_REMOTE: &str = "origin";
pub const MAIN_BRANCH: &str = "main";
pub const LEGACY_BRANCH: &str = "master";

// Machine-local backup identity, written to the repository's own config.
pub const COMMITTER_NAME: &str = "dotfiles";
pub const COMMITTER_EMAIL: &str = "dotfiles@local";
pub const INITIAL_COMMIT_MESSAGE: &str = "init commit";

/// Exit information of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitExit {
    pub code: Option<i32>,
    pub stderr: String,
}

impl GitExit {
    #[cfg(test)]
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn describe(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{status}: {stderr}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub exit: GitExit,
}

/// Capability to invoke git inside a directory.
pub trait GitRunner {
    /// Run git, discarding its standard output.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitExit, RepoError>;

    /// Run git and capture its standard output.
    fn run_capturing(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, RepoError>;
}

/// Runs the `git` binary found on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    logger: GitCommandLogger,
}

impl SystemGit {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
            logger: GitCommandLogger::new(),
        }
    }

    #[cfg(test)]
    pub fn with_logger(mut self, logger: GitCommandLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Full path of the git binary, if it is installed.
    pub fn locate() -> Result<PathBuf, RepoError> {
        which::which("git").map_err(|e| RepoError::CommandUnavailable(e.to_string()))
    }

    fn execute(&self, dir: &Path, args: &[&str], capture: bool) -> Result<GitOutput, RepoError> {
        if !dir.is_dir() {
            return Err(RepoError::NotARepository(dir.to_path_buf()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(if capture { Stdio::piped() } else { Stdio::null() })
            .stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| {
            RepoError::CommandUnavailable(format!("{}: {e}", self.program.display()))
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let _ = self
            .logger
            .log_command(args, output.status.code(), &stderr, dir);

        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            exit: GitExit {
                code: output.status.code(),
                stderr,
            },
        })
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitExit, RepoError> {
        self.execute(dir, args, false).map(|out| out.exit)
    }

    fn run_capturing(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, RepoError> {
        self.execute(dir, args, true)
    }
}

/// Pending changes in the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSummary {
    Clean,
    Dirty(usize),
}

impl StatusSummary {
    /// One porcelain status line per changed path.
    pub fn from_porcelain(output: &str) -> Self {
        match output.lines().filter(|line| !line.trim().is_empty()).count() {
            0 => StatusSummary::Clean,
            n => StatusSummary::Dirty(n),
        }
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusSummary::Clean => write!(f, "✓ clean"),
            StatusSummary::Dirty(1) => write!(f, "⚠ 1 change"),
            StatusSummary::Dirty(n) => write!(f, "⚠ {n} changes"),
        }
    }
}

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    NothingToCommit,
    Pushed { branch: String, message: String },
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::NothingToCommit => write!(f, "✓ nothing to commit"),
            PublishOutcome::Pushed { branch, .. } => write!(f, "✓ Pushed to {branch}"),
        }
    }
}

/// The managed directory viewed as a git working copy.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot<R: GitRunner = SystemGit> {
    handle: RepositoryHandle,
    git: R,
}

impl RepositorySnapshot<SystemGit> {
    pub fn system(handle: RepositoryHandle) -> Self {
        Self::new(handle, SystemGit::new())
    }
}

impl<R: GitRunner> RepositorySnapshot<R> {
    pub fn new(handle: RepositoryHandle, git: R) -> Self {
        Self { handle, git }
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.root().join(".git").exists()
    }

    /// Pending changes. Fails if the working copy has not been initialized yet.
    pub fn status(&self) -> Result<StatusSummary, RepoError> {
        if !self.is_initialized() {
            return Err(RepoError::NotARepository(self.handle.root().to_path_buf()));
        }
        self.query_status()
    }

    /// Create the repository if there is none. Returns whether it was created.
    ///
    /// A failed initialization removes the half-built `.git` so the next call
    /// starts over.
    pub fn ensure_initialized(&self) -> Result<bool, RepoError> {
        if self.is_initialized() {
            return Ok(false);
        }

        let root = self.handle.root();
        std::fs::create_dir_all(root).map_err(|e| {
            RepoError::InitializationFailed(format!("creating {}: {e}", root.display()))
        })?;

        if let Err(err) = self.initialize() {
            let git_dir = root.join(".git");
            if git_dir.exists() {
                if let Err(e) = std::fs::remove_dir_all(&git_dir) {
                    return Err(RepoError::InitializationFailed(format!(
                        "{err}; removing {}: {e}",
                        git_dir.display()
                    )));
                }
            }
            return Err(err);
        }

        Ok(true)
    }

    fn initialize(&self) -> Result<(), RepoError> {
        let init = RepoError::InitializationFailed;
        self.step(&["init"], init)?;
        if let Some(url) = self.handle.remote_url() {
            self.step(&["remote", "add", PRIMARY_REMOTE, url], init)?;
        }
        self.step(&["config", "user.email", COMMITTER_EMAIL], init)?;
        self.step(&["config", "user.name", COMMITTER_NAME], init)?;
        self.step(&["add", "."], init)?;
        self.step(
            &["commit", "--allow-empty", "-m", INITIAL_COMMIT_MESSAGE],
            init,
        )
    }

    /// Stage everything, commit and push.
    ///
    /// Returns [`PublishOutcome::NothingToCommit`] without creating a commit
    /// when the working copy has no changes. An empty or missing message is
    /// replaced by a timestamped one.
    pub fn commit_and_push(&self, message: Option<&str>) -> Result<PublishOutcome, RepoError> {
        self.ensure_initialized()?;

        self.step(&["add", "."], RepoError::StagingFailed)?;

        if self.query_status()? == StatusSummary::Clean {
            return Ok(PublishOutcome::NothingToCommit);
        }

        let message = match message.map(str::trim) {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => default_commit_message(),
        };

        self.step(&["commit", "-m", &message], RepoError::CommitFailed)?;

        let branch = self.push()?;
        Ok(PublishOutcome::Pushed { branch, message })
    }

    fn push(&self) -> Result<String, RepoError> {
        match self.step(&["push", PRIMARY_REMOTE, MAIN_BRANCH], RepoError::PushFailed) {
            Ok(()) => Ok(MAIN_BRANCH.to_string()),
            Err(RepoError::CommandUnavailable(msg)) => Err(RepoError::CommandUnavailable(msg)),
            Err(_) => {
                self.step(&["push", PRIMARY_REMOTE, LEGACY_BRANCH], RepoError::PushFailed)?;
                Ok(LEGACY_BRANCH.to_string())
            }
        }
    }

    fn query_status(&self) -> Result<StatusSummary, RepoError> {
        let out = self
            .git
            .run_capturing(self.handle.root(), &["status", "--porcelain"])
            .map_err(|e| e.in_stage(RepoError::StatusFailed))?;
        if !out.exit.success() {
            return Err(RepoError::StatusFailed(out.exit.describe()));
        }
        Ok(StatusSummary::from_porcelain(&out.stdout))
    }

    fn step(&self, args: &[&str], stage: fn(String) -> RepoError) -> Result<(), RepoError> {
        let exit = self
            .git
            .run(self.handle.root(), args)
            .map_err(|e| e.in_stage(stage))?;
        if exit.success() {
            Ok(())
        } else {
            Err(stage(format!("git {}: {}", args.join(" "), exit.describe())))
        }
    }
}

pub fn default_commit_message() -> String {
    format!(
        "backup from {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
