//! Synchronization engine: path resolution, transfers, the git working copy
//! and the sequential run orchestrator.

pub mod error;
pub mod git;
pub mod logging;
pub mod orchestrator;
pub mod path;
pub mod transfer;
pub mod types;

pub use git::{GitRunner, RepositorySnapshot, SystemGit};
pub use orchestrator::{RunPhase, SelectionMove, SyncOrchestrator, TransferDone, TransferJob};
pub use types::{PathKind, PathSpec, RepositoryHandle, TransferOutcome, TransferState};
