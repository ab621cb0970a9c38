use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde_json::json;

use crate::common::{paths, progress};
use crate::config::Config;
use crate::sync::logging::GitCommandLogger;
use crate::sync::{RepositorySnapshot, SyncOrchestrator, TransferOutcome, TransferState};
use crate::ui::prelude::*;

pub fn build_orchestrator(config: &Config) -> SyncOrchestrator {
    let repository = RepositorySnapshot::system(config.repository());
    SyncOrchestrator::new(config.dotfiles_path(), config.paths.clone(), repository)
}

/// Transfer every entry once and report each result. Returns the exit code.
pub async fn sync_all(config: &Config) -> Result<i32> {
    let mut orchestrator = build_orchestrator(config);
    let total = orchestrator.outcomes().len();

    if total == 0 {
        emit(Level::Warn, "sync.empty", "No paths configured.", None);
        return Ok(0);
    }

    let orchestrator = tokio::task::spawn_blocking(move || {
        let mut spinner: Option<ProgressBar> = None;
        orchestrator.run_blocking(|outcome| report_progress(outcome, &mut spinner));
        orchestrator
    })
    .await
    .context("sync worker panicked")?;

    let failed = orchestrator.failed_count();
    let summary = format!(
        "{} Synced {}/{} entries into {}",
        char::from(NerdFont::Package),
        total - failed,
        total,
        orchestrator.destination_root().display()
    );
    let level = if failed == 0 { Level::Success } else { Level::Warn };
    emit(
        level,
        "sync.summary",
        &summary,
        Some(json!({ "total": total, "failed": failed })),
    );
    emit(
        Level::Info,
        "sync.git_status",
        &format!("{} Git: {}", char::from(NerdFont::Git), orchestrator.repo_status()),
        None,
    );

    Ok(if failed == 0 { 0 } else { 1 })
}

fn report_progress(outcome: &TransferOutcome, spinner: &mut Option<ProgressBar>) {
    let label = &outcome.spec.label;
    match &outcome.state {
        TransferState::InProgress => {
            if get_output_format() == OutputFormat::Text {
                *spinner = Some(progress::create_spinner(format!("Syncing {label}...")));
            }
        }
        TransferState::Succeeded => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            emit(
                Level::Success,
                "sync.item.ok",
                &format!("{} {label}", char::from(NerdFont::Check)),
                Some(json!({ "label": label, "source": outcome.spec.source })),
            );
        }
        TransferState::Failed { message } => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            emit(
                Level::Error,
                "sync.item.error",
                &format!("{} {label}: {message}", char::from(NerdFont::Cross)),
                Some(json!({ "label": label, "source": outcome.spec.source, "error": message })),
            );
        }
        TransferState::Pending => {}
    }
}

/// Commit and push the managed directory.
pub async fn push(config: &Config, message: Option<String>) -> Result<i32> {
    let repository = RepositorySnapshot::system(config.repository());

    let result = tokio::task::spawn_blocking(move || {
        repository.commit_and_push(message.as_deref())
    })
    .await
    .context("push worker panicked")?;

    match result {
        Ok(outcome) => {
            emit(
                Level::Success,
                "push.ok",
                &format!("{} {outcome}", char::from(NerdFont::Upload)),
                None,
            );
            Ok(0)
        }
        Err(e) => {
            emit(Level::Error, "push.error", &format!("❌ Push failed: {e}"), None);
            Ok(1)
        }
    }
}

/// Print the working copy status.
pub fn status(config: &Config) -> Result<i32> {
    let repository = RepositorySnapshot::system(config.repository());
    match repository.status() {
        Ok(summary) => {
            emit(
                Level::Info,
                "status.summary",
                &format!("{} Git: {summary}", char::from(NerdFont::Git)),
                Some(json!({ "root": repository.handle().root(), "status": summary.to_string() })),
            );
            Ok(0)
        }
        Err(e) => {
            emit(
                Level::Warn,
                "status.error",
                &format!("{} {e}", char::from(NerdFont::Warning)),
                None,
            );
            Ok(1)
        }
    }
}

/// Print the most recent git invocations recorded with `--debug`.
pub fn show_git_log(limit: usize) -> Result<i32> {
    let logger = GitCommandLogger::in_dir(paths::git_logs_dir()?);
    let logs = logger.get_logs()?;

    if logs.is_empty() {
        emit(
            Level::Info,
            "log.empty",
            "No git commands logged yet (run with --debug to record them).",
            None,
        );
        return Ok(0);
    }

    for log in logs.iter().take(limit) {
        let icon = if log.success {
            NerdFont::Check
        } else {
            NerdFont::Cross
        };
        let mut text = format!(
            "{} {} {} git {}",
            char::from(NerdFont::Clock),
            log.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            char::from(icon),
            log.args.join(" ")
        );
        if !log.success && !log.stderr.trim().is_empty() {
            text.push_str(&format!("\n    {}", log.stderr.trim()));
        }
        let level = if log.success { Level::Info } else { Level::Warn };
        emit(
            level,
            "log.entry",
            &text,
            Some(json!({
                "timestamp": log.timestamp,
                "args": log.args,
                "exit_code": log.exit_code,
                "repository": log.repository,
            })),
        );
    }

    Ok(0)
}
