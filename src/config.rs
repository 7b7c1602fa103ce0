//! Runtime configuration: engine tables and server settings from the environment.

use crate::logic::ScoringTable;
use std::path::PathBuf;

/// Static configuration consumed by the bracket engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub scoring: ScoringTable,
    /// Gap between consecutive matches of a phase.
    pub match_stride_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringTable::standard(),
            match_stride_minutes: 120,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
    #[error("failed to read scoring config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scoring config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for the web binary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Players and referees loaded at startup.
    pub roster_csv: Option<PathBuf>,
    pub engine: EngineConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Read HOST, PORT, SCORING_TABLE, SCORING_CONFIG, MATCH_STRIDE_MINUTES and ROSTER_CSV.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = match lookup("PORT") {
            Some(value) => parse_var("PORT", value)?,
            None => default_port(),
        };

        let mut engine = EngineConfig::default();
        if let Some(value) = lookup("SCORING_TABLE") {
            engine.scoring = match value.trim() {
                "standard" => ScoringTable::standard(),
                "progressive" => ScoringTable::progressive(),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "SCORING_TABLE",
                        value: value.clone(),
                    })
                }
            };
        }
        if let Some(path) = lookup("SCORING_CONFIG") {
            engine.scoring = load_scoring_table(PathBuf::from(path))?;
        }
        if let Some(value) = lookup("MATCH_STRIDE_MINUTES") {
            engine.match_stride_minutes = parse_var("MATCH_STRIDE_MINUTES", value)?;
        }

        Ok(Self {
            host,
            port,
            roster_csv: lookup("ROSTER_CSV").map(PathBuf::from),
            engine,
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

/// Load a [`ScoringTable`] from a JSON file.
pub fn load_scoring_table(path: PathBuf) -> Result<ScoringTable, ConfigError> {
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    serde_json::from_str(&text).map_err(|source| ConfigError::Json { path, source })
}
