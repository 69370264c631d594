//! revstats-metrics — per-revision request metrics for a serving sidecar.
//!
//! Converts the interval counts produced by the upstream collector into
//! per-second rates, passes concurrency averages through, and publishes
//! them with process uptime as gauges labeled by the workload identity.
//!
//! # Architecture
//!
//! ```text
//! StatsReporter
//!   ├── new() ← validates identity + period, binds gauge series
//!   └── report() ← called once per reporting tick
//!         ├── GaugeRegistry::series() × 5, all resolved first
//!         └── GaugeSeries::set() × 5
//!
//! PrometheusRegistry (GaugeRegistry)
//!   ├── five GaugeVecs keyed by LABEL_NAMES
//!   ├── get() → read path for one label combination
//!   └── render() → text exposition
//!
//! run_report_loop() ← drains an mpsc channel of RequestStatsReport
//! ```

pub mod driver;
pub mod error;
pub mod gauges;
pub mod registry;
pub mod reporter;

pub use driver::{LoopSummary, run_report_loop};
pub use error::{RegistryError, ReporterError};
pub use gauges::StatGauge;
pub use registry::{GaugeRegistry, GaugeSeries, PrometheusRegistry};
pub use reporter::StatsReporter;
