//! The fixed set of gauges a reporter publishes.

/// One of the five gauges written on every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatGauge {
    RequestsPerSecond,
    ProxiedRequestsPerSecond,
    AverageConcurrentRequests,
    AverageProxiedConcurrentRequests,
    ProcessUptime,
}

impl StatGauge {
    pub const ALL: [StatGauge; 5] = [
        StatGauge::RequestsPerSecond,
        StatGauge::ProxiedRequestsPerSecond,
        StatGauge::AverageConcurrentRequests,
        StatGauge::AverageProxiedConcurrentRequests,
        StatGauge::ProcessUptime,
    ];

    /// Exposition name of the gauge.
    pub fn name(self) -> &'static str {
        match self {
            StatGauge::RequestsPerSecond => "requests_per_second",
            StatGauge::ProxiedRequestsPerSecond => "proxied_requests_per_second",
            StatGauge::AverageConcurrentRequests => "average_concurrent_requests",
            StatGauge::AverageProxiedConcurrentRequests => "average_proxied_concurrent_requests",
            StatGauge::ProcessUptime => "process_uptime_seconds",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            StatGauge::RequestsPerSecond => "Number of requests received per second.",
            StatGauge::ProxiedRequestsPerSecond => {
                "Number of proxied requests received per second."
            }
            StatGauge::AverageConcurrentRequests => {
                "Number of requests currently being handled by this pod."
            }
            StatGauge::AverageProxiedConcurrentRequests => {
                "Number of proxied requests currently being handled by this pod."
            }
            StatGauge::ProcessUptime => "The number of seconds that the process has been up.",
        }
    }

    /// Position of this gauge in [`StatGauge::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
