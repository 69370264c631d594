//! Error types for the reporter and its gauge registry.

use thiserror::Error;

use revstats_core::ValidationError;

/// Failures raised by a [`GaugeRegistry`](crate::GaugeRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("gauge already registered: {0}")]
    AlreadyRegistered(String),

    #[error("label mismatch for {gauge}: {reason}")]
    LabelMismatch { gauge: &'static str, reason: String },

    #[error("no series for {0} with the given labels")]
    NotFound(&'static str),

    #[error("prometheus error: {0}")]
    Prometheus(String),
}

impl From<prometheus::Error> for RegistryError {
    fn from(err: prometheus::Error) -> Self {
        match err {
            prometheus::Error::AlreadyReg => RegistryError::AlreadyRegistered(err.to_string()),
            other => RegistryError::Prometheus(other.to_string()),
        }
    }
}

/// Errors returned by [`StatsReporter`](crate::StatsReporter).
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

pub type ReporterResult<T> = Result<T, ReporterError>;
