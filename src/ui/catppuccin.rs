use ratatui::style::Color;

use crate::sync::TransferState;

/// Catppuccin Mocha colors used by the terminal UI.
#[allow(dead_code)]
pub mod colors {
    use ratatui::style::Color;

    pub const MAUVE: Color = Color::Rgb(0xcb, 0xa6, 0xf7);
    pub const RED: Color = Color::Rgb(0xf3, 0x8b, 0xa8);
    pub const PEACH: Color = Color::Rgb(0xfa, 0xb3, 0x87);
    pub const YELLOW: Color = Color::Rgb(0xf9, 0xe2, 0xaf);
    pub const GREEN: Color = Color::Rgb(0xa6, 0xe3, 0xa1);
    pub const SKY: Color = Color::Rgb(0x89, 0xdc, 0xeb);
    pub const BLUE: Color = Color::Rgb(0x89, 0xb4, 0xfa);
    pub const LAVENDER: Color = Color::Rgb(0xb4, 0xbe, 0xfe);

    pub const SURFACE0: Color = Color::Rgb(0x31, 0x32, 0x44);
    pub const SURFACE1: Color = Color::Rgb(0x45, 0x47, 0x5a);
    pub const OVERLAY1: Color = Color::Rgb(0x7f, 0x84, 0x9c);
    pub const SUBTEXT0: Color = Color::Rgb(0xa6, 0xad, 0xc8);
    pub const TEXT: Color = Color::Rgb(0xcd, 0xd6, 0xf4);
    pub const CRUST: Color = Color::Rgb(0x11, 0x11, 0x1b);
}

/// Row color for an entry's state.
pub fn state_color(state: &TransferState) -> Color {
    match state {
        TransferState::Pending => colors::OVERLAY1,
        TransferState::InProgress => colors::YELLOW,
        TransferState::Succeeded => colors::GREEN,
        TransferState::Failed { .. } => colors::RED,
    }
}

/// Status icon for an entry's state.
pub fn state_icon(state: &TransferState) -> &'static str {
    match state {
        TransferState::Pending => "○",
        TransferState::InProgress => "◐",
        TransferState::Succeeded => "✓",
        TransferState::Failed { .. } => "✗",
    }
}

/// Color of the repository status line, picked from its leading marker.
pub fn repo_status_color(status: &str) -> Color {
    if status.starts_with('✓') {
        colors::GREEN
    } else if status.starts_with('❌') {
        colors::RED
    } else if status.starts_with('⚠') {
        colors::PEACH
    } else {
        colors::SUBTEXT0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_rows_are_red() {
        let failed = TransferState::Failed {
            message: "source not found".into(),
        };
        assert_eq!(state_color(&failed), colors::RED);
        assert_eq!(state_icon(&failed), "✗");
        assert_eq!(state_color(&TransferState::Succeeded), colors::GREEN);
    }

    #[test]
    fn test_repo_status_color_follows_marker() {
        assert_eq!(repo_status_color("✓ clean"), colors::GREEN);
        assert_eq!(repo_status_color("⚠ 2 changes"), colors::PEACH);
        assert_eq!(repo_status_color("❌ Push failed: x"), colors::RED);
        assert_eq!(repo_status_color("checking..."), colors::SUBTEXT0);
    }
}
