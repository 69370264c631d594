//! revstats-core — shared types for the revstats reporter.
//!
//! Holds the workload [`Identity`] and its label schema, the
//! [`RequestStatsReport`] produced by the upstream collector each tick,
//! and [`ReporterConfig`] loading from TOML or the sidecar environment.

pub mod config;
pub mod identity;
pub mod types;

pub use config::{ConfigError, ReporterConfig, parse_duration};
pub use identity::{
    Identity, LABEL_NAMES, LABEL_CONFIG, LABEL_NAMESPACE, LABEL_POD, LABEL_REVISION,
    ValidationError, validate_reporting_period,
};
pub use types::RequestStatsReport;
