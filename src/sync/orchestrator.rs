use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::error::TransferError;
use super::git::{GitRunner, RepositorySnapshot, SystemGit};
use super::transfer;
use super::types::{PathSpec, TransferOutcome, TransferState};

/// Where the orchestrator is within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMove {
    Up,
    Down,
}

/// One transfer handed out by the orchestrator, ready to run anywhere.
#[derive(Debug, Clone)]
pub struct TransferJob {
    pub index: usize,
    pub spec: PathSpec,
    pub destination_root: PathBuf,
}

/// Completion event for a [`TransferJob`].
#[derive(Debug)]
pub struct TransferDone {
    pub index: usize,
    pub result: Result<PathBuf, TransferError>,
}

impl TransferJob {
    pub fn execute(self) -> TransferDone {
        let result = transfer::transfer(&self.spec, &self.destination_root);
        TransferDone {
            index: self.index,
            result,
        }
    }
}

/// Drives sync runs over the configured entries, one transfer at a time.
///
/// The orchestrator never performs a transfer itself: [`start_run`] and
/// [`on_transfer_complete`] hand back the next [`TransferJob`] and the caller
/// decides where it executes. Being in [`RunPhase::Running`] is the busy flag
/// that keeps a single job outstanding.
///
/// [`start_run`]: SyncOrchestrator::start_run
/// [`on_transfer_complete`]: SyncOrchestrator::on_transfer_complete
pub struct SyncOrchestrator<R: GitRunner = SystemGit> {
    destination_root: PathBuf,
    outcomes: Vec<TransferOutcome>,
    destinations: Vec<PathBuf>,
    phase: RunPhase,
    selected: usize,
    repository: RepositorySnapshot<R>,
    repo_status: String,
    last_update: Option<DateTime<Local>>,
}

impl<R: GitRunner> SyncOrchestrator<R> {
    pub fn new(
        destination_root: impl Into<PathBuf>,
        specs: Vec<PathSpec>,
        repository: RepositorySnapshot<R>,
    ) -> Self {
        let destination_root = destination_root.into();
        let destinations = display_destinations(&specs, &destination_root);
        Self {
            destination_root,
            outcomes: specs.into_iter().map(TransferOutcome::pending).collect(),
            destinations,
            phase: RunPhase::Idle,
            selected: 0,
            repository,
            repo_status: "checking...".to_string(),
            last_update: None,
        }
    }

    pub fn outcomes(&self) -> &[TransferOutcome] {
        &self.outcomes
    }

    #[cfg(test)]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, RunPhase::Running { .. })
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn repo_status(&self) -> &str {
        &self.repo_status
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    #[cfg(test)]
    pub fn repository(&self) -> &RepositorySnapshot<R> {
        &self.repository
    }

    /// Destination of entry `index`, for display. Recomputed when a run ends.
    pub fn destination_of(&self, index: usize) -> Option<&Path> {
        self.destinations.get(index).map(PathBuf::as_path)
    }

    /// Begin a run over every entry. Returns the first job, or `None` when a
    /// run is already active or there is nothing to transfer.
    pub fn start_run(&mut self) -> Option<TransferJob> {
        if self.is_running() {
            return None;
        }

        for outcome in &mut self.outcomes {
            outcome.state = TransferState::Pending;
        }

        if self.outcomes.is_empty() {
            self.finish_run();
            return None;
        }

        self.selected = 0;
        Some(self.begin(0))
    }

    /// Record the result of the job for `index` and hand out the next one.
    ///
    /// A completion for anything but the job in flight is ignored.
    pub fn on_transfer_complete(
        &mut self,
        index: usize,
        result: Result<PathBuf, TransferError>,
    ) -> Option<TransferJob> {
        if self.phase != (RunPhase::Running { index }) {
            return None;
        }

        self.outcomes[index].state = match result {
            Ok(_) => TransferState::Succeeded,
            Err(e) => TransferState::Failed {
                message: e.to_string(),
            },
        };

        let next = index + 1;
        if next < self.outcomes.len() {
            self.selected = next;
            Some(self.begin(next))
        } else {
            self.finish_run();
            None
        }
    }

    /// Run every transfer inline until the run is over.
    pub fn run_blocking<F>(&mut self, mut on_progress: F)
    where
        F: FnMut(&TransferOutcome),
    {
        let mut job = self.start_run();
        while let Some(current) = job {
            on_progress(&self.outcomes[current.index]);
            let done = current.execute();
            let index = done.index;
            job = self.on_transfer_complete(index, done.result);
            on_progress(&self.outcomes[index]);
        }
    }

    /// Commit and push the managed directory. Refused while a run is writing.
    pub fn request_push(&mut self, message: Option<&str>) {
        if self.is_running() {
            self.repo_status = "sync in progress, push later".to_string();
            return;
        }
        self.repo_status = match self.repository.commit_and_push(message) {
            Ok(outcome) => outcome.to_string(),
            Err(e) => format!("❌ Push failed: {e}"),
        };
    }

    /// Re-read the working copy status. Refused while a run is writing.
    pub fn request_status_refresh(&mut self) {
        if self.is_running() {
            return;
        }
        self.refresh_status();
    }

    pub fn move_selection(&mut self, direction: SelectionMove) {
        match direction {
            SelectionMove::Up => self.selected = self.selected.saturating_sub(1),
            SelectionMove::Down => {
                if self.selected + 1 < self.outcomes.len() {
                    self.selected += 1;
                }
            }
        }
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.state, TransferState::Failed { .. }))
            .count()
    }

    fn begin(&mut self, index: usize) -> TransferJob {
        self.phase = RunPhase::Running { index };
        self.outcomes[index].state = TransferState::InProgress;
        TransferJob {
            index,
            spec: self.outcomes[index].spec.clone(),
            destination_root: self.destination_root.clone(),
        }
    }

    fn finish_run(&mut self) {
        self.phase = RunPhase::Idle;
        self.last_update = Some(Local::now());
        self.destinations =
            display_destinations(self.outcomes.iter().map(|o| &o.spec), &self.destination_root);
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        self.repo_status = match self.repository.status() {
            Ok(summary) => summary.to_string(),
            Err(e) => format!("⚠ {e}"),
        };
    }
}

fn display_destinations<'a>(
    specs: impl IntoIterator<Item = &'a PathSpec>,
    destination_root: &Path,
) -> Vec<PathBuf> {
    specs
        .into_iter()
        .map(|spec| transfer::display_destination(spec, destination_root))
        .collect()
}
