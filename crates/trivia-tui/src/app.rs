// Application state and orchestration logic.
//
// The central event loop that applies user commands from the TUI to the game
// controller, runs question-file reads in the background, and pushes UI
// updates to the TUI render loop.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use trivia_core::{Game, LoadError};

use crate::config::Config;
use crate::protocol::{AppSnapshot, LoadEvent, Notice, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub game: Game,
    /// Sender for load completions; spawned reads use a clone of this sender
    /// to hand file contents back to the main event loop.
    pub load_tx: mpsc::Sender<LoadEvent>,
    /// Path of the most recently requested load, until it completes.
    pub pending_load: Option<PathBuf>,
    pub load_task: Option<tokio::task::JoinHandle<()>>,
}

impl AppState {
    pub fn new(config: Config, game: Game, load_tx: mpsc::Sender<LoadEvent>) -> Self {
        AppState {
            config,
            game,
            load_tx,
            pending_load: None,
            load_task: None,
        }
    }

    /// Project the game into everything the TUI draws.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let board = self.game.board();
        AppSnapshot {
            screen: self.game.screen(),
            setup_rows: self.game.setup_rows().to_vec(),
            board: self.game.render_board(),
            scoreboard: self.game.render_scoreboard(),
            question: self.game.show_question(),
            answer: self.game.show_answer().map(str::to_string),
            reset_pending: self.game.is_reset_pending(),
            answered: board.answered_count(),
            total: board.cell_count(),
            currency_symbol: self.game.rules().currency_symbol.clone(),
            loading: self.pending_load.clone(),
        }
    }

    /// Start reading a question file in the background.
    ///
    /// Any read still in flight is aborted; should its completion already be
    /// queued, the game rejects it as stale.
    pub fn start_load(&mut self, path: PathBuf) {
        self.cancel_load_task();

        let ticket = self.game.begin_load();
        info!(
            "Loading questions from {} (load #{})",
            path.display(),
            ticket.generation
        );
        self.pending_load = Some(path.clone());

        let tx = self.load_tx.clone();
        self.load_task = Some(tokio::spawn(async move {
            let result = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                });
            let _ = tx.send(LoadEvent { ticket, path, result }).await;
        }));
    }

    pub fn cancel_load_task(&mut self) {
        if let Some(handle) = self.load_task.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Completions of background question-file reads
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut load_rx: mpsc::Receiver<LoadEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    send_snapshot(&state, &ui_tx).await;

    let mut load_open = true;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Load completions (only poll when channel is open) ---
            event = load_rx.recv(), if load_open => {
                match event {
                    Some(event) => {
                        handle_load_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("Load channel closed");
                        load_open = false;
                    }
                }
            }
        }
    }

    state.cancel_load_task();
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(snapshot))).await;
}

async fn send_notice(ui_tx: &mpsc::Sender<UiUpdate>, notice: Notice) {
    let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let game = &mut state.game;
    match cmd {
        UserCommand::AddTeam => {
            let row = game.add_team_row();
            info!("Added team row '{}'", row.name);
        }
        UserCommand::RemoveTeam(index) => {
            if let Err(e) = game.remove_team_row(index) {
                send_notice(ui_tx, Notice::error(e.to_string())).await;
            }
        }
        UserCommand::RenameTeam { index, name } => {
            if let Err(e) = game.rename_team_row(index, &name) {
                debug!("Rename ignored: {}", e);
            }
        }
        UserCommand::CycleTeamColor(index) => {
            if let Err(e) = game.cycle_team_color(index) {
                debug!("Color change ignored: {}", e);
            }
        }
        UserCommand::StartGame => {
            if let Err(e) = game.start_game() {
                warn!("Could not start game: {}", e);
                send_notice(ui_tx, Notice::error(e.to_string())).await;
            }
        }
        UserCommand::OpenQuestion(cell) => {
            if !game.open_question(cell) {
                debug!("Ignored selection of cell {:?}", cell);
            }
        }
        UserCommand::Judge { correct } => match game.judge(correct) {
            Ok(j) => info!(
                "Team {} judged {} for {:+} (now {})",
                j.team,
                if j.correct { "correct" } else { "incorrect" },
                j.delta,
                j.new_score
            ),
            Err(e) => debug!("Judge ignored: {}", e),
        },
        UserCommand::CloseQuestion => {
            if let Err(e) = game.close_question() {
                debug!("Close ignored: {}", e);
            }
        }
        UserCommand::RequestReset => {
            if let Err(e) = game.request_reset() {
                debug!("Reset request ignored: {}", e);
            }
        }
        UserCommand::ConfirmReset => {
            if let Err(e) = game.confirm_reset() {
                debug!("Reset confirmation ignored: {}", e);
            }
        }
        UserCommand::CancelReset => {
            game.cancel_reset();
        }
        UserCommand::LoadQuestions(path) => {
            state.start_load(path);
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }

    send_snapshot(state, ui_tx).await;
}

/// Apply a finished question-file read.
async fn handle_load_event(
    state: &mut AppState,
    event: LoadEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let LoadEvent {
        ticket,
        path,
        result,
    } = event;

    match state.game.finish_load(ticket, result) {
        Ok(summary) => {
            state.pending_load = None;
            state.load_task = None;
            send_notice(
                ui_tx,
                Notice::info(format!(
                    "Custom questions loaded: {} categories, {} questions",
                    summary.categories, summary.questions
                )),
            )
            .await;
        }
        Err(LoadError::Stale { .. }) => {
            debug!("Dropped stale read of {}", path.display());
            return;
        }
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            state.pending_load = None;
            state.load_task = None;
            send_notice(
                ui_tx,
                Notice::error(format!("Error loading {}: {}", path.display(), e)),
            )
            .await;
        }
    }

    send_snapshot(state, ui_tx).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, LoggingConfig, QuestionsConfig};
    use crate::protocol::NoticeLevel;
    use trivia_core::{CellId, Screen};

    fn test_config() -> Config {
        let rules = trivia_core::Rules::default();
        Config {
            game: GameConfig {
                currency_symbol: rules.currency_symbol,
                initial_teams: rules.initial_teams,
                incorrect_color: rules.incorrect_color,
                palette: rules.palette,
            },
            questions: QuestionsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn create_test_app_state() -> (AppState, mpsc::Receiver<LoadEvent>) {
        let config = test_config();
        let game = Game::new(config.rules());
        let (load_tx, load_rx) = mpsc::channel(8);
        (AppState::new(config, game, load_tx), load_rx)
    }

    /// Drain everything currently queued on the UI channel.
    fn drain(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> Vec<UiUpdate> {
        let mut out = Vec::new();
        while let Ok(u) = ui_rx.try_recv() {
            out.push(u);
        }
        out
    }

    fn last_snapshot(updates: &[UiUpdate]) -> AppSnapshot {
        updates
            .iter()
            .rev()
            .find_map(|u| match u {
                UiUpdate::StateSnapshot(s) => Some((**s).clone()),
                _ => None,
            })
            .expect("expected a snapshot")
    }

    fn notices(updates: &[UiUpdate]) -> Vec<Notice> {
        updates
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn snapshot_on_setup_screen() {
        let (state, _load_rx) = create_test_app_state();
        let snap = state.build_snapshot();
        assert_eq!(snap.screen, Screen::Setup);
        assert_eq!(snap.setup_rows.len(), 2);
        assert!(snap.scoreboard.is_empty());
        assert!(snap.question.is_none());
        assert_eq!(snap.answered, 0);
        assert_eq!(snap.total, 25);
        assert_eq!(snap.board.columns.len(), 5);
    }

    #[tokio::test]
    async fn start_game_and_judge_updates_snapshot() {
        let (mut state, _load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_user_command(&mut state, UserCommand::StartGame, &ui_tx).await;
        handle_user_command(
            &mut state,
            UserCommand::OpenQuestion(CellId::new(0, 1)),
            &ui_tx,
        )
        .await;
        let snap = last_snapshot(&drain(&mut ui_rx));
        assert_eq!(snap.screen, Screen::Play);
        let question = snap.question.expect("question should be open");
        assert_eq!(question.value_label, "$200");
        assert!(snap.answer.is_none());

        handle_user_command(&mut state, UserCommand::Judge { correct: true }, &ui_tx).await;
        let snap = last_snapshot(&drain(&mut ui_rx));
        assert!(snap.answer.is_some());
        assert_eq!(snap.answered, 1);
        assert_eq!(snap.scoreboard[0].score, 200);

        handle_user_command(&mut state, UserCommand::CloseQuestion, &ui_tx).await;
        let snap = last_snapshot(&drain(&mut ui_rx));
        assert!(snap.question.is_none());
        assert!(snap.scoreboard[1].active);
    }

    #[tokio::test]
    async fn remove_at_minimum_sends_one_error_notice() {
        let (mut state, _load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_user_command(&mut state, UserCommand::RemoveTeam(0), &ui_tx).await;
        let updates = drain(&mut ui_rx);
        let n = notices(&updates);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].level, NoticeLevel::Error);
        assert_eq!(n[0].text, "need at least 2 teams");
        assert_eq!(last_snapshot(&updates).setup_rows.len(), 2);
    }

    #[tokio::test]
    async fn blank_team_names_block_start() {
        let (mut state, _load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_user_command(
            &mut state,
            UserCommand::RenameTeam {
                index: 1,
                name: "   ".into(),
            },
            &ui_tx,
        )
        .await;
        handle_user_command(&mut state, UserCommand::StartGame, &ui_tx).await;
        let updates = drain(&mut ui_rx);
        assert_eq!(notices(&updates).len(), 1);
        assert_eq!(last_snapshot(&updates).screen, Screen::Setup);
    }

    #[tokio::test]
    async fn flow_misuse_is_silent() {
        let (mut state, _load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_user_command(&mut state, UserCommand::Judge { correct: true }, &ui_tx).await;
        handle_user_command(&mut state, UserCommand::CloseQuestion, &ui_tx).await;
        handle_user_command(&mut state, UserCommand::ConfirmReset, &ui_tx).await;
        assert!(notices(&drain(&mut ui_rx)).is_empty());
    }

    #[tokio::test]
    async fn reset_round_trip_returns_to_setup() {
        let (mut state, _load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        handle_user_command(&mut state, UserCommand::StartGame, &ui_tx).await;
        handle_user_command(&mut state, UserCommand::RequestReset, &ui_tx).await;
        assert!(last_snapshot(&drain(&mut ui_rx)).reset_pending);

        handle_user_command(&mut state, UserCommand::CancelReset, &ui_tx).await;
        let snap = last_snapshot(&drain(&mut ui_rx));
        assert!(!snap.reset_pending);
        assert_eq!(snap.screen, Screen::Play);

        handle_user_command(&mut state, UserCommand::RequestReset, &ui_tx).await;
        handle_user_command(&mut state, UserCommand::ConfirmReset, &ui_tx).await;
        let snap = last_snapshot(&drain(&mut ui_rx));
        assert_eq!(snap.screen, Screen::Setup);
        assert!(snap.scoreboard.is_empty());
    }

    #[tokio::test]
    async fn background_load_replaces_board_and_reports_success() {
        let (mut state, mut load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let path = temp_file(
            "trivia_app_load_ok.json",
            r#"{ "Rust": [ { "value": 100, "question": "q", "answer": "a" } ] }"#,
        );

        handle_user_command(&mut state, UserCommand::LoadQuestions(path.clone()), &ui_tx).await;
        assert_eq!(last_snapshot(&drain(&mut ui_rx)).loading, Some(path.clone()));

        let event = load_rx.recv().await.expect("load should complete");
        handle_load_event(&mut state, event, &ui_tx).await;
        let updates = drain(&mut ui_rx);
        let n = notices(&updates);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].level, NoticeLevel::Info);
        assert_eq!(n[0].text, "Custom questions loaded: 1 categories, 1 questions");

        let snap = last_snapshot(&updates);
        assert!(snap.loading.is_none());
        assert_eq!(snap.board.columns.len(), 1);
        assert_eq!(snap.board.columns[0].header, "Rust");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn malformed_file_reports_one_error_and_keeps_bank() {
        let (mut state, mut load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let path = temp_file("trivia_app_load_bad.json", "{ not json");

        state.start_load(path.clone());
        let event = load_rx.recv().await.expect("load should complete");
        handle_load_event(&mut state, event, &ui_tx).await;

        let updates = drain(&mut ui_rx);
        let n = notices(&updates);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].level, NoticeLevel::Error);
        assert!(n[0].text.starts_with("Error loading"));
        assert_eq!(last_snapshot(&updates).board.columns.len(), 5);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_file_reports_read_error() {
        let (mut state, mut load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let path = std::env::temp_dir().join("trivia_app_definitely_missing.json");
        let _ = std::fs::remove_file(&path);

        state.start_load(path);
        let event = load_rx.recv().await.expect("load should complete");
        assert!(matches!(event.result, Err(LoadError::Io { .. })));
        handle_load_event(&mut state, event, &ui_tx).await;

        let n = notices(&drain(&mut ui_rx));
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn stale_completion_is_dropped_without_notice() {
        let (mut state, _load_rx) = create_test_app_state();
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        let old = state.game.begin_load();
        let _new = state.game.begin_load();
        state.pending_load = Some(PathBuf::from("new.json"));

        let event = LoadEvent {
            ticket: old,
            path: PathBuf::from("old.json"),
            result: Ok(r#"{ "Old": [ { "value": 1, "question": "q", "answer": "a" } ] }"#.into()),
        };
        handle_load_event(&mut state, event, &ui_tx).await;

        assert!(drain(&mut ui_rx).is_empty());
        assert_eq!(state.pending_load, Some(PathBuf::from("new.json")));
        assert_eq!(state.game.bank().categories()[0].name, "HTML Structure");
    }

    #[tokio::test]
    async fn run_sends_initial_snapshot_and_stops_on_quit() {
        let (state, load_rx) = create_test_app_state();
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(cmd_rx, load_rx, ui_tx, state));

        match ui_rx.recv().await {
            Some(UiUpdate::StateSnapshot(s)) => assert_eq!(s.screen, Screen::Setup),
            other => panic!("expected initial snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::AddTeam).await.unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::StateSnapshot(s)) => assert_eq!(s.setup_rows.len(), 3),
            other => panic!("expected snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }
}
