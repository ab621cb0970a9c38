//! Interactive sync screen.
//!
//! The control loop owns the [`SyncOrchestrator`]. Transfers run on tokio's
//! blocking pool and report back over a channel that is drained between
//! spinner ticks; the orchestrator hands out one job at a time so at most one
//! transfer is ever outstanding.

mod view;

use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Handle;

use crate::sync::{SelectionMove, SyncOrchestrator, TransferDone, TransferJob};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    BeginSync,
    Push,
    RefreshStatus,
    Move(SelectionMove),
    Quit,
}

pub fn command_for(key: &KeyEvent) -> Option<UiCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        return Some(UiCommand::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char('s') => Some(UiCommand::BeginSync),
        KeyCode::Char('p') => Some(UiCommand::Push),
        KeyCode::Char('r') => Some(UiCommand::RefreshStatus),
        KeyCode::Char('k') | KeyCode::Up => Some(UiCommand::Move(SelectionMove::Up)),
        KeyCode::Char('j') | KeyCode::Down => Some(UiCommand::Move(SelectionMove::Down)),
        _ => None,
    }
}

/// Run the sync screen until the user quits.
pub fn run_tui(orchestrator: SyncOrchestrator, runtime: Handle) -> Result<()> {
    let mut app = SyncApp::new(orchestrator, runtime)?;
    let result = app.run();
    app.cleanup()?;
    result
}

struct SyncApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    orchestrator: SyncOrchestrator,
    runtime: Handle,
    done_tx: mpsc::Sender<TransferDone>,
    done_rx: mpsc::Receiver<TransferDone>,
    spinner_frame: usize,
    cleaned_up: bool,
}

impl SyncApp {
    fn new(mut orchestrator: SyncOrchestrator, runtime: Handle) -> Result<Self> {
        orchestrator.request_status_refresh();

        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;

        let (done_tx, done_rx) = mpsc::channel();

        Ok(Self {
            terminal,
            orchestrator,
            runtime,
            done_tx,
            done_rx,
            spinner_frame: 0,
            cleaned_up: false,
        })
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.drain_completions();
            self.draw()?;

            if !event::poll(POLL_TIMEOUT)? {
                if self.orchestrator.is_running() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
                continue;
            }

            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    match command_for(&key_event) {
                        Some(UiCommand::Quit) => return Ok(()),
                        Some(command) => self.handle(command),
                        None => {}
                    }
                }
                Event::Resize(_, _) => {
                    // Redrawn on the next iteration
                }
                _ => {}
            }
        }
    }

    fn handle(&mut self, command: UiCommand) {
        match command {
            UiCommand::BeginSync => {
                if let Some(job) = self.orchestrator.start_run() {
                    self.dispatch(job);
                }
            }
            UiCommand::Push => self.orchestrator.request_push(None),
            UiCommand::RefreshStatus => self.orchestrator.request_status_refresh(),
            UiCommand::Move(direction) => self.orchestrator.move_selection(direction),
            UiCommand::Quit => {}
        }
    }

    fn dispatch(&self, job: TransferJob) {
        let tx = self.done_tx.clone();
        self.runtime.spawn_blocking(move || {
            let _ = tx.send(job.execute());
        });
    }

    fn drain_completions(&mut self) {
        while let Ok(done) = self.done_rx.try_recv() {
            if let Some(next) = self.orchestrator.on_transfer_complete(done.index, done.result) {
                self.dispatch(next);
            }
        }
    }

    fn draw(&mut self) -> Result<()> {
        let orchestrator = &self.orchestrator;
        let spinner_frame = self.spinner_frame;
        self.terminal
            .draw(|frame| view::draw(frame, orchestrator, spinner_frame))?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        self.cleaned_up = true;
        Ok(())
    }
}

impl Drop for SyncApp {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
