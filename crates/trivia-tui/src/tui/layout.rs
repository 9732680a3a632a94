// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Scoreboard (3 rows)                               |
// +--------------------------------------------------+
// | Main Panel (board or team setup)                  |
// |                                                   |
// +--------------------------------------------------+
// | Notice / prompt line (1 row)                      |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The question modal and confirmation dialogs are drawn on top of the main
// panel and are not part of this layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: screen, current turn, board progress.
    pub status_bar: Rect,
    /// Team scores, one box per team.
    pub scoreboard: Rect,
    /// Question board during play, team rows during setup.
    pub main_panel: Rect,
    /// Last notice, or the file path prompt while it is being typed.
    pub notice: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // scoreboard
            Constraint::Min(8),    // main panel
            Constraint::Length(1), // notice
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        scoreboard: vertical[1],
        main_panel: vertical[2],
        notice: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
