//! Reporter configuration from `revstats.toml` or the sidecar environment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{Identity, ValidationError};

/// Environment variable carrying the namespace.
pub const ENV_NAMESPACE: &str = "SERVING_NAMESPACE";
/// Environment variable carrying the configuration name.
pub const ENV_CONFIG: &str = "SERVING_CONFIGURATION";
/// Environment variable carrying the revision name.
pub const ENV_REVISION: &str = "SERVING_REVISION";
/// Environment variable carrying the pod name.
pub const ENV_POD: &str = "SERVING_POD";
/// Optional environment variable overriding the reporting period.
pub const ENV_REPORTING_PERIOD: &str = "REPORTING_PERIOD";

const DEFAULT_REPORTING_PERIOD: &str = "1s";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

/// Identity and reporting cadence for one reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReporterConfig {
    pub namespace: String,
    pub config: String,
    pub revision: String,
    pub pod: String,
    /// Duration string: `"1s"`, `"500ms"`, `"2m"`, or bare seconds.
    #[serde(default = "default_reporting_period")]
    pub reporting_period: String,
}

fn default_reporting_period() -> String {
    DEFAULT_REPORTING_PERIOD.to_string()
}

impl ReporterConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// The four identity variables are required; a variable that is set
    /// but empty passes through and fails identity validation instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingEnv(key));

        Ok(Self {
            namespace: required(ENV_NAMESPACE)?,
            config: required(ENV_CONFIG)?,
            revision: required(ENV_REVISION)?,
            pod: required(ENV_POD)?,
            reporting_period: lookup(ENV_REPORTING_PERIOD)
                .unwrap_or_else(default_reporting_period),
        })
    }

    /// Parse the configured reporting period.
    pub fn reporting_period(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.reporting_period)
            .ok_or_else(|| ConfigError::InvalidDuration(self.reporting_period.clone()))
    }

    /// Validate and build the workload identity.
    pub fn identity(&self) -> Result<Identity, ValidationError> {
        Identity::new(
            self.namespace.as_str(),
            self.config.as_str(),
            self.revision.as_str(),
            self.pod.as_str(),
        )
    }
}

/// Parse a duration string such as `"5s"`, `"500ms"`, `"2m"`, or `"10"`
/// (bare numbers are seconds).
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
