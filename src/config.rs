// Configuration loading and parsing (teams.toml, engine.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::champions::{Role, ROLE_ORDER};
use crate::draft::state::DraftPlayer;

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
    pub teams: TeamsConfig,
    pub engine: EngineConfig,
    pub credentials: CredentialsConfig,
    pub ws_port: u16,
    pub llm: LlmConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// teams.toml structs
// ---------------------------------------------------------------------------

/// Both sides' identities and rosters.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamsConfig {
    pub blue: TeamSection,
    pub red: TeamSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamSection {
    pub name: String,
    /// Roster in pick-slot order (TOP, JGL, MID, ADC, SUP). May be empty
    /// when no roster data is configured; the engine degrades comfort and
    /// denial scoring accordingly.
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl TeamSection {
    /// Convert the configured roster into draft players, validating roles.
    pub fn to_draft_players(&self) -> Result<Vec<DraftPlayer>, ConfigError> {
        self.players
            .iter()
            .map(|p| {
                let role = Role::from_str_role(&p.role).ok_or_else(|| {
                    ConfigError::ValidationError {
                        field: format!("players.{}.role", p.id),
                        message: format!("unknown role '{}'", p.role),
                    }
                })?;
                Ok(DraftPlayer {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    role,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire engine.toml file.
#[derive(Debug, Clone, Deserialize)]
struct EngineFile {
    #[serde(default)]
    scoring: ScoringWeights,
    #[serde(default)]
    engine: EngineKnobs,
    websocket: WebsocketSection,
    llm: LlmConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct WebsocketSection {
    port: u16,
}

#[derive(Debug, Clone, Deserialize)]
struct EngineKnobs {
    top_k: usize,
    min_role_candidates: usize,
}

impl Default for EngineKnobs {
    fn default() -> Self {
        EngineKnobs {
            top_k: 8,
            min_role_candidates: 3,
        }
    }
}

/// Additive factor weights for the recommendation engine. All values are
/// score points except `comfort_games_saturation`, which is the games count
/// at which the comfort multiplier saturates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub comfort_max: f64,
    pub comfort_games_saturation: f64,
    pub meta_max: f64,
    pub counter_per_matchup: f64,
    pub counter_cap: f64,
    pub synergy_per_pair: f64,
    pub synergy_cap: f64,
    pub denial_max: f64,
    pub need_bonus: f64,
    pub role_fit_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            comfort_max: 30.0,
            comfort_games_saturation: 10.0,
            meta_max: 20.0,
            counter_per_matchup: 8.0,
            counter_cap: 20.0,
            synergy_per_pair: 7.0,
            synergy_cap: 15.0,
            denial_max: 25.0,
            need_bonus: 10.0,
            role_fit_bonus: 8.0,
        }
    }
}

/// The public engine config assembled from the engine.toml sections.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    /// Number of recommendations returned per request.
    pub top_k: usize,
    /// Below this many on-role candidates the pick pool widens to every
    /// available champion (flex-pick fallback).
    pub min_role_candidates: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let knobs = EngineKnobs::default();
        EngineConfig {
            scoring: ScoringWeights::default(),
            top_k: knobs.top_k,
            min_role_candidates: knobs.min_role_candidates,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    /// Whether to stream a draft review automatically when a session
    /// completes all 20 actions.
    pub auto_review: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub champions: String,
    pub matchups: String,
    pub synergies: String,
    pub meta: String,
    pub traits: String,
    pub pools: String,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_teams(text: &str, path: &Path) -> Result<TeamsConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_engine(text: &str, path: &Path) -> Result<EngineFile, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate configuration from `config/teams.toml`,
/// `config/engine.toml`, and (optionally) `config/credentials.toml`, all
/// relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- teams.toml (required) ---
    let teams_path = config_dir.join("teams.toml");
    let teams = parse_teams(&read_file(&teams_path)?, &teams_path)?;

    // --- engine.toml (required) ---
    let engine_path = config_dir.join("engine.toml");
    let engine_file = parse_engine(&read_file(&engine_path)?, &engine_path)?;

    let engine = EngineConfig {
        scoring: engine_file.scoring,
        top_k: engine_file.engine.top_k,
        min_role_candidates: engine_file.engine.min_role_candidates,
    };

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let text = read_file(&credentials_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        teams,
        engine,
        credentials,
        ws_port: engine_file.websocket.port,
        llm: engine_file.llm,
        data_paths: engine_file.data_paths,
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

        // Skip .example template files
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
                // Config file already present; never overwrite user edits.
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

/// Load configuration from the current working directory, copying default
/// config files into place on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = std::env::current_dir().map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to determine current directory: {e}"),
    })?;
    ensure_config_files(&base_dir)?;
    load_config_from(&base_dir)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    for (label, team) in [("blue", &config.teams.blue), ("red", &config.teams.red)] {
        if team.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("{label}.name"),
                message: "team name must not be empty".into(),
            });
        }
        if !team.players.is_empty() {
            if team.players.len() != ROLE_ORDER.len() {
                return Err(ConfigError::ValidationError {
                    field: format!("{label}.players"),
                    message: format!(
                        "roster must have exactly {} players or be empty, got {}",
                        ROLE_ORDER.len(),
                        team.players.len()
                    ),
                });
            }
            let players = team.to_draft_players()?;
            for (slot, player) in players.iter().enumerate() {
                let expected = ROLE_ORDER[slot];
                if player.role != expected {
                    return Err(ConfigError::ValidationError {
                        field: format!("{label}.players[{slot}].role"),
                        message: format!(
                            "roster must be in pick-slot order; expected {} got {}",
                            expected.display_str(),
                            player.role.display_str()
                        ),
                    });
                }
            }
        }
    }

    let w = &config.engine.scoring;
    let weight_fields = [
        ("scoring.comfort_max", w.comfort_max),
        ("scoring.meta_max", w.meta_max),
        ("scoring.counter_per_matchup", w.counter_per_matchup),
        ("scoring.counter_cap", w.counter_cap),
        ("scoring.synergy_per_pair", w.synergy_per_pair),
        ("scoring.synergy_cap", w.synergy_cap),
        ("scoring.denial_max", w.denial_max),
        ("scoring.need_bonus", w.need_bonus),
        ("scoring.role_fit_bonus", w.role_fit_bonus),
    ];
    for (field, value) in weight_fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: format!("must be a non-negative number, got {value}"),
            });
        }
    }
    if !w.comfort_games_saturation.is_finite() || w.comfort_games_saturation <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "scoring.comfort_games_saturation".into(),
            message: "must be a positive number".into(),
        });
    }

    if config.engine.top_k == 0 {
        return Err(ConfigError::ValidationError {
            field: "engine.top_k".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".into(),
            message: "must be at least 1".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TEAMS_TOML: &str = r#"
        [blue]
        name = "Cloud Surge"

        [[blue.players]]
        id = "blue_top"
        name = "Stonewall"
        role = "TOP"

        [[blue.players]]
        id = "blue_jgl"
        name = "Riverking"
        role = "JGL"

        [[blue.players]]
        id = "blue_mid"
        name = "Prism"
        role = "MID"

        [[blue.players]]
        id = "blue_adc"
        name = "Quickdraw"
        role = "ADC"

        [[blue.players]]
        id = "blue_sup"
        name = "Lantern"
        role = "SUP"

        [red]
        name = "Ember Watch"
    "#;

    const ENGINE_TOML: &str = r#"
        [scoring]
        comfort_max = 25.0

        [engine]
        top_k = 5
        min_role_candidates = 2

        [websocket]
        port = 9271

        [llm]
        model = "claude-sonnet-4-5"
        max_tokens = 1024
        auto_review = true

        [data_paths]
        champions = "data/champions.csv"
        matchups = "data/matchups.csv"
        synergies = "data/synergies.csv"
        meta = "data/meta.csv"
        traits = "data/traits.csv"
        pools = "data/pools.csv"
    "#;

    fn dummy_path() -> PathBuf {
        PathBuf::from("test.toml")
    }

    fn parsed_config() -> Config {
        let teams = parse_teams(TEAMS_TOML, &dummy_path()).unwrap();
        let engine_file = parse_engine(ENGINE_TOML, &dummy_path()).unwrap();
        Config {
            teams,
            engine: EngineConfig {
                scoring: engine_file.scoring,
                top_k: engine_file.engine.top_k,
                min_role_candidates: engine_file.engine.min_role_candidates,
            },
            credentials: CredentialsConfig::default(),
            ws_port: engine_file.websocket.port,
            llm: engine_file.llm,
            data_paths: engine_file.data_paths,
        }
    }

    #[test]
    fn parses_teams_and_engine() {
        let config = parsed_config();
        assert_eq!(config.teams.blue.name, "Cloud Surge");
        assert_eq!(config.teams.blue.players.len(), 5);
        assert!(config.teams.red.players.is_empty());
        assert_eq!(config.ws_port, 9271);
        assert_eq!(config.engine.top_k, 5);
        assert_eq!(config.engine.min_role_candidates, 2);
        // Overridden weight picked up; untouched ones keep defaults.
        assert_eq!(config.engine.scoring.comfort_max, 25.0);
        assert_eq!(config.engine.scoring.meta_max, 20.0);
        assert!(config.llm.auto_review);
    }

    #[test]
    fn roster_converts_to_draft_players_in_slot_order() {
        let config = parsed_config();
        let players = config.teams.blue.to_draft_players().unwrap();
        assert_eq!(players.len(), 5);
        for (slot, player) in players.iter().enumerate() {
            assert_eq!(player.role, ROLE_ORDER[slot]);
        }
        assert_eq!(players[3].name, "Quickdraw");
    }

    #[test]
    fn validation_accepts_good_config() {
        assert!(validate(&parsed_config()).is_ok());
    }

    #[test]
    fn validation_rejects_wrong_roster_order() {
        let mut config = parsed_config();
        config.teams.blue.players.swap(0, 1);
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn validation_rejects_partial_roster() {
        let mut config = parsed_config();
        config.teams.blue.players.pop();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn validation_rejects_negative_weight() {
        let mut config = parsed_config();
        config.engine.scoring.denial_max = -1.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn validation_rejects_zero_top_k() {
        let mut config = parsed_config();
        config.engine.top_k = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let mut config = parsed_config();
        config.teams.blue.players[0].role = "FOUNTAIN".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn default_engine_config_is_valid() {
        let mut config = parsed_config();
        config.engine = EngineConfig::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.engine.top_k, 8);
    }
}
