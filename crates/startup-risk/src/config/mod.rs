use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::RiskConfig;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    /// Scoring configuration new engines are built with.
    pub risk: RiskConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("STARTUP_RISK_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("STARTUP_RISK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let risk = match env::var_os("STARTUP_RISK_CONFIG") {
            Some(path) if !path.is_empty() => load_risk_config(Path::new(&path))?,
            _ => RiskConfig::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            risk,
        })
    }
}

/// Reads and validates a JSON scoring configuration. Missing fields take the
/// built-in defaults.
pub fn load_risk_config(path: &Path) -> Result<RiskConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadRiskConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RiskConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseRiskConfig {
            path: path.to_path_buf(),
            source,
        })?;
    config
        .validate()
        .map_err(|problems| ConfigError::InvalidRiskConfig {
            path: path.to_path_buf(),
            problems,
        })?;
    Ok(config)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    ReadRiskConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseRiskConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidRiskConfig {
        path: PathBuf,
        problems: Vec<String>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadRiskConfig { path, .. } => {
                write!(f, "STARTUP_RISK_CONFIG {} could not be read", path.display())
            }
            ConfigError::ParseRiskConfig { path, source } => write!(
                f,
                "STARTUP_RISK_CONFIG {} is not a valid risk config: {source}",
                path.display()
            ),
            ConfigError::InvalidRiskConfig { path, problems } => write!(
                f,
                "STARTUP_RISK_CONFIG {} is invalid: {}",
                path.display(),
                problems.join("; ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadRiskConfig { source, .. } => Some(source),
            ConfigError::ParseRiskConfig { source, .. } => Some(source),
            ConfigError::InvalidRiskConfig { .. } => None,
        }
    }
}
