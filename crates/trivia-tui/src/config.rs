// Configuration loading and parsing (config/game.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use trivia_core::setup::MIN_TEAMS;
use trivia_core::{HexColor, Rules};

/// Shipped copy of `defaults/game.toml`, written out when the binary runs
/// somewhere without a `defaults/` directory.
const EMBEDDED_GAME_TOML: &str = include_str!("../defaults/game.toml");

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub questions: QuestionsConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// game.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire game.toml file.
#[derive(Debug, Clone, Deserialize)]
struct GameFile {
    game: GameSection,
    #[serde(default)]
    questions: QuestionsConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct GameSection {
    currency_symbol: String,
    initial_teams: usize,
    incorrect_color: String,
    palette: Vec<String>,
}

/// The `[game]` section with colors parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub currency_symbol: String,
    pub initial_teams: usize,
    pub incorrect_color: HexColor,
    pub palette: Vec<HexColor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionsConfig {
    /// Question file to load at startup.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl QuestionsConfig {
    /// The startup question file, with a relative path taken from
    /// `base_dir` like the log directory.
    pub fn resolved_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.path.as_ref().map(|p| base_dir.join(p))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
            directory: default_log_directory(),
        }
    }
}

fn default_log_filter() -> String {
    "trivia=info,trivia_tui=info,trivia_core=info,warn".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

impl Config {
    /// Game rules for the core controller.
    pub fn rules(&self) -> Rules {
        Rules {
            palette: self.game.palette.clone(),
            incorrect_color: self.game.incorrect_color,
            currency_symbol: self.game.currency_symbol.clone(),
            initial_teams: self.game.initial_teams,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/game.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config_in()`, which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let game_path = base_dir.join("config").join("game.toml");
    let text = read_file(&game_path)?;
    let file: GameFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: game_path.clone(),
        source: e,
    })?;

    let game = validate_game(file.game)?;
    let config = Config {
        game,
        questions: file.questions,
        logging: file.logging,
    };
    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
///
/// When there is no `defaults/` directory and no `config/game.toml`, the
/// embedded default game.toml is written instead.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    if !defaults_dir.exists() {
        let target = config_dir.join("game.toml");
        return if write_new(&target, EMBEDDED_GAME_TOML.as_bytes())? {
            Ok(vec![target])
        } else {
            Ok(vec![])
        };
    }

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let target = config_dir.join(file_name);
        if write_new(&target, &content)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Ensure defaults are in place under `base_dir`, then load.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Create `target` with `content` unless it already exists. Returns whether
/// the file was written.
fn write_new(target: &Path, content: &[u8]) -> Result<bool, ConfigError> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

fn parse_color(field: &str, value: &str) -> Result<HexColor, ConfigError> {
    value.parse().map_err(|e: trivia_core::color::ColorParseError| {
        ConfigError::ValidationError {
            field: field.to_string(),
            message: e.to_string(),
        }
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_game(raw: GameSection) -> Result<GameConfig, ConfigError> {
    let incorrect_color = parse_color("game.incorrect_color", &raw.incorrect_color)?;
    let palette = raw
        .palette
        .iter()
        .enumerate()
        .map(|(i, c)| parse_color(&format!("game.palette[{i}]"), c))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GameConfig {
        currency_symbol: raw.currency_symbol,
        initial_teams: raw.initial_teams,
        incorrect_color,
        palette,
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.game.palette.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "game.palette".into(),
            message: "must contain at least one color".into(),
        });
    }

    if config.game.initial_teams < MIN_TEAMS {
        return Err(ConfigError::ValidationError {
            field: "game.initial_teams".into(),
            message: format!(
                "must be at least {MIN_TEAMS}, got {}",
                config.game.initial_teams
            ),
        });
    }

    if config.game.currency_symbol.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "game.currency_symbol".into(),
            message: "must not be empty".into(),
        });
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the trivia-tui crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/trivia-tui/defaults").exists() {
            cwd.join("crates/trivia-tui")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/game.toml` set to `game_toml`.
    fn temp_with_game_toml(name: &str, game_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/game.toml"), game_toml).unwrap();
        tmp
    }

    fn default_game_toml() -> String {
        fs::read_to_string(project_root().join("defaults/game.toml")).unwrap()
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = temp_with_game_toml("trivia_config_valid", &default_game_toml());
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.game.currency_symbol, "$");
        assert_eq!(config.game.initial_teams, 2);
        assert_eq!(config.game.incorrect_color.to_string(), "#f56565");
        assert_eq!(config.game.palette.len(), 8);
        assert_eq!(config.game.palette[0].to_string(), "#4949b4");
        assert!(config.questions.path.is_none());
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert!(config.logging.filter.contains("trivia_core=info"));

        let rules = config.rules();
        assert_eq!(rules.palette, config.game.palette);
        assert_eq!(rules.initial_teams, 2);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn embedded_defaults_match_shipped_file() {
        assert_eq!(EMBEDDED_GAME_TOML, default_game_toml());
    }

    #[test]
    fn optional_sections_may_be_omitted() {
        let toml = r##"
[game]
currency_symbol = "€"
initial_teams = 3
incorrect_color = "#000000"
palette = ["#ffffff"]
"##;
        let tmp = temp_with_game_toml("trivia_config_minimal", toml);
        let config = load_config_from(&tmp).expect("should load minimal config");
        assert_eq!(config.game.currency_symbol, "€");
        assert_eq!(config.game.initial_teams, 3);
        assert!(config.questions.path.is_none());
        assert_eq!(config.logging.filter, default_log_filter());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn questions_path_is_read() {
        let toml = default_game_toml().replace(
            "# path = \"questions/custom.json\"",
            "path = \"questions/custom.json\"",
        );
        let tmp = temp_with_game_toml("trivia_config_questions_path", &toml);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(
            config.questions.path,
            Some(PathBuf::from("questions/custom.json"))
        );
        assert_eq!(
            config.questions.resolved_path(&tmp),
            Some(tmp.join("questions").join("custom.json"))
        );
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn absolute_questions_path_is_kept() {
        let abs = std::env::temp_dir().join("custom.json");
        let questions = QuestionsConfig {
            path: Some(abs.clone()),
        };
        assert_eq!(questions.resolved_path(Path::new("/somewhere/else")), Some(abs));
        assert_eq!(QuestionsConfig::default().resolved_path(Path::new(".")), None);
    }

    #[test]
    fn rejects_initial_teams_below_two() {
        let toml = default_game_toml().replace("initial_teams = 2", "initial_teams = 1");
        let tmp = temp_with_game_toml("trivia_config_one_team", &toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "game.initial_teams"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_palette_color() {
        let toml = default_game_toml().replace("\"#F77D2B\"", "\"orange\"");
        let tmp = temp_with_game_toml("trivia_config_bad_palette", &toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "game.palette[2]");
                assert!(message.contains("orange"));
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_incorrect_color() {
        let toml = default_game_toml().replace(
            "incorrect_color = \"#f56565\"",
            "incorrect_color = \"red\"",
        );
        let tmp = temp_with_game_toml("trivia_config_bad_incorrect", &toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "game.incorrect_color")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_palette() {
        let toml = r##"
[game]
currency_symbol = "$"
initial_teams = 2
incorrect_color = "#f56565"
palette = []
"##;
        let tmp = temp_with_game_toml("trivia_config_empty_palette", toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "game.palette"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_currency_symbol() {
        let toml = default_game_toml().replace("currency_symbol = \"$\"", "currency_symbol = \" \"");
        let tmp = temp_with_game_toml("trivia_config_blank_currency", &toml);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "game.currency_symbol")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_game_toml() {
        let tmp = std::env::temp_dir().join("trivia_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("game.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_with_game_toml("trivia_config_invalid", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("game.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("trivia_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();

        fs::copy(
            project_root().join("defaults/game.toml"),
            defaults_dir.join("game.toml"),
        )
        .unwrap();
        fs::write(defaults_dir.join("questions.json.example"), "{}").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/game.toml").exists());
        assert!(!tmp.join("config/questions.json.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = temp_with_game_toml("trivia_config_ensure_skips", "# custom\n");
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults/game.toml"),
            defaults_dir.join("game.toml"),
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config/game.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_without_defaults_writes_embedded() {
        let tmp = std::env::temp_dir().join("trivia_config_embedded");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        let config = load_config_from(&tmp).expect("embedded defaults should load");
        assert_eq!(config.game.initial_teams, 2);

        // A second run leaves the now-existing file alone.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }
}
