// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest snapshot from the app
// orchestrator plus purely local state (cursors, text prompts, the quit
// dialog). The app pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use trivia_core::{CellId, Screen};

use crate::protocol::{AppSnapshot, Notice, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// What keystrokes are currently being collected for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a new name for setup row `index`.
    EditName { index: usize, buffer: String },
    /// Typing the path of a question file.
    LoadPath { buffer: String },
}

/// TUI-local state for rendering.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest projection of the game.
    pub snapshot: AppSnapshot,
    /// Highlighted board cell during play.
    pub board_cursor: CellId,
    /// Highlighted row on the setup screen.
    pub setup_cursor: usize,
    pub input_mode: InputMode,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    /// Last notice from the app, shown until the next key press.
    pub notice: Option<Notice>,
}

impl ViewState {
    /// Replace the snapshot and pull the cursors back inside the new board
    /// and row list.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.snapshot = snapshot;
        self.clamp_cursors();
    }

    pub fn clamp_cursors(&mut self) {
        let rows = self.snapshot.setup_rows.len();
        self.setup_cursor = self.setup_cursor.min(rows.saturating_sub(1));

        let columns = &self.snapshot.board.columns;
        let category = self.board_cursor.category.min(columns.len().saturating_sub(1));
        let cells = columns.get(category).map_or(0, |c| c.cells.len());
        let position = self.board_cursor.position.min(cells.saturating_sub(1));
        self.board_cursor = CellId::new(category, position);

        if let InputMode::EditName { index, .. } = self.input_mode {
            if index >= rows || self.snapshot.screen != Screen::Setup {
                self.input_mode = InputMode::Normal;
            }
        }
    }

    /// Whether the question modal is showing.
    pub fn question_open(&self) -> bool {
        self.snapshot.question.is_some()
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::scoreboard::render(frame, layout.scoreboard, state);
    match state.snapshot.screen {
        Screen::Setup => widgets::setup::render(frame, layout.main_panel, state),
        Screen::Play => widgets::board::render(frame, layout.main_panel, state),
    }
    widgets::notice::render(frame, layout.notice, state);
    render_help_bar(frame, &layout, state);

    // Overlays, topmost last
    if state.question_open() {
        widgets::question_modal::render(frame, layout.main_panel, state);
    }
    if state.snapshot.reset_pending {
        widgets::confirm::render(
            frame,
            frame.area(),
            " Reset? ",
            "Discard teams and scores?",
        );
    }
    if state.confirm_quit {
        widgets::confirm::render(frame, frame.area(), " Quit? ", "Really quit?");
    }
}

/// Key hints for whatever currently has the keyboard.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit || state.snapshot.reset_pending {
        return " y:Yes | n/Esc:No";
    }
    match state.input_mode {
        InputMode::EditName { .. } => return " Enter:Save | Esc:Cancel",
        InputMode::LoadPath { .. } => return " Enter:Load | Esc:Cancel",
        InputMode::Normal => {}
    }
    match (&state.snapshot.screen, &state.snapshot.question) {
        (Screen::Setup, _) => {
            " j/k:Select | a:Add | d:Remove | e:Rename | c:Color | s:Start | o:Load | q:Quit"
        }
        (Screen::Play, Some(q)) if q.revealed => " Enter/Esc:Close",
        (Screen::Play, Some(_)) => " y:Correct | n:Incorrect | Esc:Close",
        (Screen::Play, None) => " Arrows/hjkl:Move | Enter:Open | o:Load | r:Reset | q:Quit",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    // Mouse and resize events are picked up by the next render
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
