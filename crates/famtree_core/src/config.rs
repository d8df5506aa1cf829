//! Application configuration.
//!
//! # Responsibility
//! - Describe every tunable of the family tree core in one serde struct.
//! - Load it from JSON and reject values that would break the view or chart.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - `load` and `from_json_str` only return configs that passed `validate`.

use crate::graph::ChartOptions;
use crate::logging::normalize_level;
use crate::viewport::controller::ViewportController;
use crate::viewport::storage::FileViewportStorage;
use crate::viewport::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Family database file. `None` means a local-only, in-memory session.
    pub db_path: Option<PathBuf>,
    /// Directory holding persisted view state. `None` keeps it in memory.
    pub viewport_dir: Option<PathBuf>,
    pub chart: ChartOptions,
    pub viewport: ViewportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            db_path: None,
            viewport_dir: None,
            chart: ChartOptions::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Restores the persisted view state from `viewport_dir`.
    ///
    /// `None` when no directory is configured.
    pub fn restore_viewport(&self) -> Option<ViewportController<FileViewportStorage>> {
        let dir = self.viewport_dir.as_deref()?;
        Some(ViewportController::restore(
            self.viewport.clone(),
            FileViewportStorage::new(dir),
        ))
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;

        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }

        for (name, style) in [
            ("chart.person_style", &self.chart.person_style),
            ("chart.marriage_style", &self.chart.marriage_style),
        ] {
            if style.contains(['\n', '\r']) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a single line"
                )));
            }
        }

        self.viewport
            .validate()
            .map_err(|reason| ConfigError::Invalid(format!("viewport: {reason}")))
    }
}

/// Configuration load failures.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
