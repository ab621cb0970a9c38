use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use crate::common::progress::SPINNER_FRAMES;
use crate::sync::{GitRunner, SyncOrchestrator, TransferOutcome, TransferState};
use crate::ui::catppuccin::{colors, repo_status_color, state_color, state_icon};

/// Render the whole screen from the orchestrator's current state.
pub fn draw<R: GitRunner>(frame: &mut Frame, orchestrator: &SyncOrchestrator<R>, spinner_frame: usize) {
    let area = frame.area();

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::MAUVE))
        .title(Span::styled(
            " 📦 DOTFILES ",
            Style::default()
                .fg(colors::MAUVE)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [list_area, status_area, help_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .areas(inner);

    let items: Vec<ListItem> = orchestrator
        .outcomes()
        .iter()
        .enumerate()
        .map(|(i, outcome)| {
            let dest = orchestrator
                .destination_of(i)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            ListItem::new(row(outcome, &dest, spinner_frame))
        })
        .collect();

    let mut state = ListState::default();
    if !orchestrator.outcomes().is_empty() {
        state.select(Some(orchestrator.selected()));
    }
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(colors::SURFACE0)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, list_area, &mut state);

    frame.render_widget(status_line(orchestrator), status_area);
    frame.render_widget(help_line(), help_area);
}

fn row(outcome: &TransferOutcome, dest: &str, spinner_frame: usize) -> Line<'static> {
    let color = state_color(&outcome.state);
    let state = match outcome.state {
        TransferState::InProgress => SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()].to_string(),
        ref other => other.label().to_string(),
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", state_icon(&outcome.state)), Style::default().fg(color)),
        Span::styled(
            outcome.spec.label.clone(),
            Style::default().fg(colors::TEXT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  → {dest}  "), Style::default().fg(colors::OVERLAY1)),
        Span::styled(format!("[{state}]"), Style::default().fg(color)),
    ];
    if let Some(err) = outcome.error_message() {
        spans.push(Span::styled(format!(" {err}"), Style::default().fg(colors::RED)));
    }
    Line::from(spans)
}

fn status_line<R: GitRunner>(orchestrator: &SyncOrchestrator<R>) -> Paragraph<'static> {
    let status = orchestrator.repo_status().to_string();
    let mut spans = Vec::new();
    if let Some(at) = orchestrator.last_update() {
        spans.push(Span::styled(
            format!("Last update: {} | ", at.format("%H:%M:%S")),
            Style::default().fg(colors::SUBTEXT0),
        ));
    }
    spans.push(Span::styled("Git: ", Style::default().fg(colors::SUBTEXT0)));
    spans.push(Span::styled(
        status.clone(),
        Style::default().fg(repo_status_color(&status)),
    ));
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors::SURFACE1)),
    )
}

fn help_line() -> Paragraph<'static> {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(colors::BLUE)
                .add_modifier(Modifier::BOLD),
        )
    };
    let text = Style::default().fg(colors::OVERLAY1);
    Paragraph::new(Line::from(vec![
        Span::styled("[", text),
        key("s"),
        Span::styled("] Sync | [", text),
        key("p"),
        Span::styled("] Push | [", text),
        key("r"),
        Span::styled("] Refresh | [↑↓] Navigate | [", text),
        key("q"),
        Span::styled("] Quit", text),
    ]))
}
