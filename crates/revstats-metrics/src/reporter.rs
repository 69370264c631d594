//! Stats reporter — turns one interval's request stats into gauge values.
//!
//! Request counts are divided by the reporting period so consumers see a
//! per-second rate whatever the cadence. Concurrency averages are already
//! period-independent and are published unchanged.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use revstats_core::{Identity, RequestStatsReport, validate_reporting_period};

use crate::error::ReporterResult;
use crate::gauges::StatGauge;
use crate::registry::{GaugeRegistry, GaugeSeries};

/// Publishes request rates, concurrency, and uptime for one workload identity.
pub struct StatsReporter {
    identity: Identity,
    reporting_period: Duration,
    /// Set once at construction; uptime is measured from here.
    start_time: Instant,
    registry: Arc<dyn GaugeRegistry>,
}

impl StatsReporter {
    /// Validate the identity and period, then bind the gauge series.
    ///
    /// Fields are checked in order namespace, config, revision, pod; the
    /// first empty one is reported. A zero period is rejected.
    pub fn new(
        namespace: &str,
        config: &str,
        revision: &str,
        pod: &str,
        reporting_period: Duration,
        registry: Arc<dyn GaugeRegistry>,
    ) -> ReporterResult<Self> {
        let identity = Identity::new(namespace, config, revision, pod)?;
        Self::with_identity(identity, reporting_period, registry)
    }

    /// Build a reporter for an already validated identity.
    pub fn with_identity(
        identity: Identity,
        reporting_period: Duration,
        registry: Arc<dyn GaugeRegistry>,
    ) -> ReporterResult<Self> {
        let reporting_period = validate_reporting_period(reporting_period)?;
        registry.bind(&identity)?;

        info!(
            namespace = identity.namespace(),
            config = identity.config(),
            revision = identity.revision(),
            pod = identity.pod(),
            period_ms = reporting_period.as_millis() as u64,
            "stats reporter bound"
        );

        Ok(Self {
            identity,
            reporting_period,
            start_time: Instant::now(),
            registry,
        })
    }

    /// Publish one interval's stats, overwriting the previous values.
    ///
    /// All five series are resolved before any value is written, so a
    /// registry failure leaves the previous snapshot untouched. Inputs are
    /// trusted: negative or NaN values pass straight through.
    pub fn report(&self, stats: &RequestStatsReport) -> ReporterResult<()> {
        let period_secs = self.reporting_period.as_secs_f64();
        let uptime = self.uptime().as_secs_f64();

        let values = [
            (StatGauge::RequestsPerSecond, stats.request_count / period_secs),
            (
                StatGauge::ProxiedRequestsPerSecond,
                stats.proxied_request_count / period_secs,
            ),
            (StatGauge::AverageConcurrentRequests, stats.average_concurrency),
            (
                StatGauge::AverageProxiedConcurrentRequests,
                stats.average_proxied_concurrency,
            ),
            (StatGauge::ProcessUptime, uptime),
        ];

        let series = values
            .iter()
            .map(|&(gauge, _)| self.registry.series(gauge, &self.identity))
            .collect::<Result<Vec<_>, _>>()?;
        for (series, (_, value)) in series.iter().zip(values) {
            series.set(value);
        }

        debug!(
            revision = self.identity.revision(),
            rps = values[0].1,
            proxied_rps = values[1].1,
            concurrency = stats.average_concurrency,
            proxied_concurrency = stats.average_proxied_concurrency,
            uptime,
            "stats reported"
        );
        Ok(())
    }

    /// Time elapsed since construction.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn reporting_period(&self) -> Duration {
        self.reporting_period
    }
}
