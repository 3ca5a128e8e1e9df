use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{DepartureRecord, RouteEntry};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Route directory used to label departures
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    #[serde(default)]
    pub timetable: TimetableSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Base URL of the remote planner API, without the `/api` suffix
    #[serde(default = "default_planner_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: default_planner_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Where the admin timetable is loaded from at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableSource {
    /// JSON file holding an array of departure records
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Records given inline; used when no file is configured
    #[serde(default)]
    pub departures: Vec<DepartureRecord>,
}

impl TimetableSource {
    pub fn load(&self) -> Result<Vec<DepartureRecord>, ConfigError> {
        match &self.file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
                serde_json::from_str(&content)
                    .map_err(|e| ConfigError::InvalidTimetable(e.to_string()))
            }
            None => Ok(self.departures.clone()),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_planner_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("Invalid timetable: {0}")]
    InvalidTimetable(String),
}
