//! Shared types used across revstats crates.

use serde::{Deserialize, Serialize};

/// Request statistics for one reporting interval, as produced by the
/// upstream collector.
///
/// Counts cover the interval since the previous report; concurrencies are
/// averages over that interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestStatsReport {
    /// Non-proxied requests completed in the interval.
    pub request_count: f64,
    /// Proxied requests completed in the interval.
    pub proxied_request_count: f64,
    /// Average non-proxied requests in flight.
    pub average_concurrency: f64,
    /// Average proxied requests in flight.
    pub average_proxied_concurrency: f64,
}
