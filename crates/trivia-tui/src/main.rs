// Trivia board entry point.
//
// Startup sequence:
// 1. Parse command line
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, not terminal)
// 4. Build the game controller
// 5. Create mpsc channels
// 6. Spawn app logic task, queueing the startup question file if any
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use trivia_core::Game;
use trivia_tui::app;
use trivia_tui::config::{self, Config};
use trivia_tui::tui;

#[derive(Debug, Parser)]
#[command(name = "trivia", version, about = "Team trivia board for the terminal")]
struct Cli {
    /// Question file (JSON) to load at startup, relative to the current
    /// directory. Overrides `[questions] path`.
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Directory holding `config/` (and optionally `defaults/`). Defaults to
    /// the current directory.
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse command line
    let cli = Cli::parse();

    // 2. Load config
    let base_dir = match cli.config_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let config = config::load_config_in(&base_dir).context("failed to load configuration")?;

    // 3. Initialize tracing
    init_tracing(&config, &base_dir)?;
    info!("Trivia board starting up");
    info!(
        "Config loaded: {} palette colors, {} initial teams, currency '{}'",
        config.game.palette.len(),
        config.game.initial_teams,
        config.game.currency_symbol
    );

    // 4. Build the game controller on the built-in questions
    let game = Game::new(config.rules());

    // 5. Create mpsc channels
    let (load_tx, load_rx) = mpsc::channel(8);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let startup_questions = cli
        .questions
        .clone()
        .or_else(|| config.questions.resolved_path(&base_dir));
    let mut app_state = app::AppState::new(config, game, load_tx);

    // 6. Spawn app logic task
    if let Some(path) = startup_questions {
        app_state.start_load(path);
    }
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, load_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Trivia board shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
/// The log directory is resolved against `base_dir`.
fn init_tracing(config: &Config, base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join(&config.logging.directory);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("trivia.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
