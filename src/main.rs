mod commands;
mod common;
mod config;
mod sync;
mod tui;
mod ui;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::sync::SystemGit;
use crate::ui::prelude::*;

/// Mirror scattered dotfiles into one directory and publish it with git
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every git invocation to the data directory
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit JSON lines instead of colored text
    #[arg(long, global = true)]
    json: bool,

    /// Config file to read instead of ./config.yaml
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy every configured path into the dotfiles directory
    Sync,
    /// Commit all changes in the dotfiles directory and push them
    Push {
        /// Commit message (defaults to a timestamped one)
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Show pending changes in the dotfiles directory
    Status,
    /// Show recently logged git commands
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    ui::init(format, std::io::stdout().is_terminal());

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            for (i, cause) in e.chain().enumerate() {
                let line = if i == 0 {
                    format!("Error: {cause}")
                } else {
                    format!("  Caused by: {cause}")
                };
                emit(Level::Error, "fatal", &line, None);
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Some(Commands::Sync) => commands::sync_all(&load_config(cli.config)?).await,
        Some(Commands::Push { message }) => {
            commands::push(&load_config(cli.config)?, message).await
        }
        Some(Commands::Status) => commands::status(&load_config(cli.config)?),
        Some(Commands::Log { limit }) => commands::show_git_log(limit),
        None => {
            let orchestrator = commands::build_orchestrator(&load_config(cli.config)?);
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || tui::run_tui(orchestrator, runtime))
                .await
                .context("terminal UI panicked")??;
            Ok(0)
        }
    }
}

/// Load the config file; any problem here ends the process before the UI starts.
fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = Config::load(&config_path)?;

    if let Err(e) = SystemGit::locate() {
        emit(Level::Warn, "git.missing", &format!("{e}"), None);
    }
    emit(
        Level::Debug,
        "config.loaded",
        &format!(
            "Loaded {} paths from {} into {}",
            config.paths.len(),
            config_path.display(),
            config.dotfiles_path().display()
        ),
        None,
    );

    Ok(config)
}
