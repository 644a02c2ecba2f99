// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

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
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    league: LeagueConfig,
    timer: TimerConfig,
    websocket: WebsocketSection,
    data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Seat order; the list length is the team count.
    pub teams: Vec<String>,
    /// The host user's seat index.
    #[serde(default)]
    pub my_seat: usize,
    /// Bench slots per roster, on top of the fixed starting lineup.
    pub bench_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimerConfig {
    /// Per-pick countdown in seconds.
    pub pick_seconds: u32,
    /// Per-pick countdown when fast mode is on (demo/simulated drafts).
    pub fast_pick_seconds: u32,
    /// Fast mode accelerates the clock only; ordering and fairness logic
    /// are unaffected.
    #[serde(default)]
    pub fast_mode: bool,
}

impl TimerConfig {
    /// The per-pick duration the clock should use.
    pub fn effective_pick_seconds(&self) -> u32 {
        if self.fast_mode {
            self.fast_pick_seconds
        } else {
            self.pick_seconds
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WebsocketSection {
    port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the static player reference CSV.
    pub players: String,
    /// Live ranking feed URL. Absent disables the live fetch.
    #[serde(default)]
    pub rankings_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub timer: TimerConfig,
    pub ws_port: u16,
    pub data: DataConfig,
}

impl Config {
    pub fn team_count(&self) -> usize {
        self.league.teams.len()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/draft.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let draft_path = base_dir.join("config").join("draft.toml");
    let draft_text = read_file(&draft_path)?;
    let draft_file: DraftFile =
        toml::from_str(&draft_text).map_err(|e| ConfigError::ParseError {
            path: draft_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: draft_file.league,
        timer: draft_file.timer,
        ws_port: draft_file.websocket.port,
        data: draft_file.data,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

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

        // Skip .example template files.
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, keep the user's copy.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let team_count = config.league.teams.len();
    if team_count < 2 {
        return Err(ConfigError::ValidationError {
            field: "league.teams".into(),
            message: format!("at least 2 teams required, got {team_count}"),
        });
    }

    if config.league.my_seat >= team_count {
        return Err(ConfigError::ValidationError {
            field: "league.my_seat".into(),
            message: format!(
                "must be a seat index below the team count ({team_count}), got {}",
                config.league.my_seat
            ),
        });
    }

    if config.league.bench_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.bench_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.timer.pick_seconds == 0 {
        return Err(ConfigError::ValidationError {
            field: "timer.pick_seconds".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.timer.fast_pick_seconds == 0 {
        return Err(ConfigError::ValidationError {
            field: "timer.fast_pick_seconds".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.data.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must be a non-empty path".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
