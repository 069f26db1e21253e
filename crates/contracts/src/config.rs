//! Service configuration with environment overrides.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SQLITE_PATH: &str = "syllabus_logs.sqlite";
pub const DEFAULT_BOARD_SIZE: f64 = 600.0;
/// Diameter of a token at release scale (2 * 22 * 3.0). A narrower board
/// cannot hold a freshly released token between opposite walls.
pub const MIN_BOARD_SIZE: f64 = 132.0;
pub const DEFAULT_NARRATIVE_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_NARRATIVE_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoardConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_SIZE,
            height: DEFAULT_BOARD_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NarrativeConfig {
    /// Base URL; the model name and `:generateContent` are appended.
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_NARRATIVE_ENDPOINT.to_string(),
            model: DEFAULT_NARRATIVE_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyllabusConfig {
    pub schema_version: String,
    pub sqlite_path: String,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl Default for SyllabusConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION_V1.to_string(),
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            board: BoardConfig::default(),
            narrative: NarrativeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl SyllabusConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays `SYLLABUS_*` variables on the defaults. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("SYLLABUS_SQLITE_PATH") {
            config.sqlite_path = path;
        }

        if let Some(raw) = get("SYLLABUS_BOARD_SIZE") {
            config.board = parse_board_size(&raw)?;
        }

        if let Some(model) = get("SYLLABUS_NARRATIVE_MODEL") {
            config.narrative.model = model;
        }

        if let Some(endpoint) = get("SYLLABUS_NARRATIVE_ENDPOINT") {
            config.narrative.endpoint = endpoint.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

/// Accepts `600` (square) or `800x600`; each side must be at least [`MIN_BOARD_SIZE`].
fn parse_board_size(raw: &str) -> Result<BoardConfig, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "SYLLABUS_BOARD_SIZE",
        value: raw.to_string(),
    };
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= MIN_BOARD_SIZE)
            .ok_or_else(invalid)
    };

    match raw.split_once(['x', 'X']) {
        Some((width, height)) => Ok(BoardConfig {
            width: parse(width)?,
            height: parse(height)?,
        }),
        None => {
            let side = parse(raw)?;
            Ok(BoardConfig {
                width: side,
                height: side,
            })
        }
    }
}
