// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (cursor movement,
// text prompts, the quit dialog).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use trivia_core::{CellId, Screen};

use super::{InputMode, ViewState};
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally by
/// mutating `ViewState` (or ignored).
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    view_state.notice = None;

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match view_state.input_mode {
        InputMode::EditName { .. } => return handle_edit_name(key_event, view_state),
        InputMode::LoadPath { .. } => return handle_load_path(key_event, view_state),
        InputMode::Normal => {}
    }

    match view_state.snapshot.screen {
        Screen::Setup => handle_setup(key_event, view_state),
        Screen::Play if view_state.snapshot.reset_pending => handle_confirm_reset(key_event),
        Screen::Play if view_state.question_open() => handle_question(key_event, view_state),
        Screen::Play => handle_board(key_event, view_state),
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_confirm_reset(key_event: KeyEvent) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserCommand::ConfirmReset),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UserCommand::CancelReset),
        _ => None,
    }
}

/// Typing a team name. Enter saves, Esc discards.
fn handle_edit_name(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let InputMode::EditName { index, buffer } = &mut view_state.input_mode else {
        return None;
    };
    match key_event.code {
        KeyCode::Enter => {
            let cmd = UserCommand::RenameTeam {
                index: *index,
                name: std::mem::take(buffer),
            };
            view_state.input_mode = InputMode::Normal;
            Some(cmd)
        }
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            None
        }
        KeyCode::Backspace => {
            buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            None
        }
        _ => None,
    }
}

/// Typing a question file path. Enter loads, Esc discards.
fn handle_load_path(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let InputMode::LoadPath { buffer } = &mut view_state.input_mode else {
        return None;
    };
    match key_event.code {
        KeyCode::Enter => {
            let path = buffer.trim().to_string();
            view_state.input_mode = InputMode::Normal;
            (!path.is_empty()).then(|| UserCommand::LoadQuestions(PathBuf::from(path)))
        }
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            None
        }
        KeyCode::Backspace => {
            buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            None
        }
        _ => None,
    }
}

fn handle_setup(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let rows = view_state.snapshot.setup_rows.len();
    let cursor = view_state.setup_cursor;
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.setup_cursor = cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if cursor + 1 < rows {
                view_state.setup_cursor = cursor + 1;
            }
            None
        }
        KeyCode::Char('a') => Some(UserCommand::AddTeam),
        KeyCode::Char('d') | KeyCode::Delete => {
            (cursor < rows).then_some(UserCommand::RemoveTeam(cursor))
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(row) = view_state.snapshot.setup_rows.get(cursor) {
                view_state.input_mode = InputMode::EditName {
                    index: cursor,
                    buffer: row.name.clone(),
                };
            }
            None
        }
        KeyCode::Char('c') => (cursor < rows).then_some(UserCommand::CycleTeamColor(cursor)),
        KeyCode::Char('s') => Some(UserCommand::StartGame),
        KeyCode::Char('o') => {
            start_path_prompt(view_state);
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// The question modal has the keyboard. Before judging: y/c marks correct,
/// n/x incorrect, Esc closes unjudged. After judging any of Enter, Esc or
/// space closes.
fn handle_question(key_event: KeyEvent, view_state: &ViewState) -> Option<UserCommand> {
    let revealed = view_state
        .snapshot
        .question
        .as_ref()
        .is_some_and(|q| q.revealed);

    match (revealed, key_event.code) {
        (false, KeyCode::Char('y') | KeyCode::Char('c')) => {
            Some(UserCommand::Judge { correct: true })
        }
        (false, KeyCode::Char('n') | KeyCode::Char('x')) => {
            Some(UserCommand::Judge { correct: false })
        }
        (false, KeyCode::Esc) => Some(UserCommand::CloseQuestion),
        (true, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) => {
            Some(UserCommand::CloseQuestion)
        }
        _ => None,
    }
}

fn handle_board(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => {
            move_cursor(view_state, -1, 0);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            move_cursor(view_state, 1, 0);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(view_state, 0, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(view_state, 0, 1);
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let cell = view_state.board_cursor;
            let selectable = view_state
                .snapshot
                .board
                .cell(cell)
                .is_some_and(|c| c.selectable);
            selectable.then_some(UserCommand::OpenQuestion(cell))
        }
        KeyCode::Char('o') => {
            start_path_prompt(view_state);
            None
        }
        KeyCode::Char('r') => Some(UserCommand::RequestReset),
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

fn start_path_prompt(view_state: &mut ViewState) {
    view_state.input_mode = InputMode::LoadPath {
        buffer: String::new(),
    };
}

/// Move the board cursor by whole columns/rows, staying on the board.
fn move_cursor(view_state: &mut ViewState, dx: isize, dy: isize) {
    let columns = &view_state.snapshot.board.columns;
    if columns.is_empty() {
        return;
    }
    let CellId { category, position } = view_state.board_cursor;
    let category = category
        .saturating_add_signed(dx)
        .min(columns.len() - 1);
    let rows = columns[category].cells.len();
    let position = position
        .saturating_add_signed(dy)
        .min(rows.saturating_sub(1));
    view_state.board_cursor = CellId::new(category, position);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
