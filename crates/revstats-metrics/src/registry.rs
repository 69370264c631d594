//! Gauge registry abstraction and its Prometheus-backed implementation.
//!
//! The reporter only ever writes through [`GaugeRegistry`]; the hosting
//! process owns the registry and decides how it is scraped.

use std::collections::HashMap;

use prometheus::core::Collector;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::debug;

use revstats_core::{Identity, LABEL_NAMES};

use crate::error::RegistryError;
use crate::gauges::StatGauge;

/// A resolved gauge series for one label combination. Writing cannot fail.
pub trait GaugeSeries: Send + Sync {
    fn set(&self, value: f64);
}

impl GaugeSeries for prometheus::Gauge {
    fn set(&self, value: f64) {
        prometheus::Gauge::set(self, value);
    }
}

/// Write side of a metrics registry holding the reporter gauges.
///
/// Implementations must tolerate concurrent writes to distinct label
/// combinations.
pub trait GaugeRegistry: Send + Sync {
    /// Resolve the series of `gauge` for `identity`, creating it if absent.
    fn series(
        &self,
        gauge: StatGauge,
        identity: &Identity,
    ) -> Result<Box<dyn GaugeSeries>, RegistryError>;

    /// Make sure every gauge has a series for `identity`.
    fn bind(&self, identity: &Identity) -> Result<(), RegistryError> {
        for gauge in StatGauge::ALL {
            self.series(gauge, identity)?;
        }
        Ok(())
    }
}

/// [`GaugeRegistry`] backed by a `prometheus::Registry`.
///
/// The five gauge vectors are registered once, on construction; reporters
/// sharing this value all write into the same vectors.
pub struct PrometheusRegistry {
    registry: Registry,
    /// Indexed by [`StatGauge::index`].
    gauges: Vec<GaugeVec>,
}

impl PrometheusRegistry {
    /// Create the gauges in a fresh, private registry.
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_registry(Registry::new())
    }

    /// Register the gauges into an existing registry.
    ///
    /// Fails with [`RegistryError::AlreadyRegistered`] if the registry
    /// already holds gauges with these names.
    pub fn with_registry(registry: Registry) -> Result<Self, RegistryError> {
        let mut gauges = Vec::with_capacity(StatGauge::ALL.len());
        for gauge in StatGauge::ALL {
            let vec = GaugeVec::new(Opts::new(gauge.name(), gauge.help()), &LABEL_NAMES)?;
            registry.register(Box::new(vec.clone()))?;
            gauges.push(vec);
        }
        debug!(gauges = gauges.len(), "reporter gauges registered");
        Ok(Self { registry, gauges })
    }

    /// The underlying prometheus registry, for the scrape side.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read the current value of `gauge` for an explicit label map.
    ///
    /// The label names must be exactly [`LABEL_NAMES`]. Reading never
    /// creates a series: an unknown combination is [`RegistryError::NotFound`].
    pub fn get(&self, gauge: StatGauge, labels: &HashMap<&str, &str>) -> Result<f64, RegistryError> {
        if labels.len() != LABEL_NAMES.len()
            || LABEL_NAMES.iter().any(|name| !labels.contains_key(name))
        {
            let mut got: Vec<_> = labels.keys().copied().collect();
            got.sort_unstable();
            return Err(RegistryError::LabelMismatch {
                gauge: gauge.name(),
                reason: format!("expected {LABEL_NAMES:?}, got {got:?}"),
            });
        }

        for family in self.vec(gauge).collect() {
            for metric in family.get_metric() {
                let matches = metric
                    .get_label()
                    .iter()
                    .all(|pair| labels.get(pair.get_name()) == Some(&pair.get_value()));
                if matches {
                    return Ok(metric.get_gauge().get_value());
                }
            }
        }
        Err(RegistryError::NotFound(gauge.name()))
    }

    /// Number of label combinations currently held by `gauge`.
    pub fn series_count(&self, gauge: StatGauge) -> usize {
        self.vec(gauge)
            .collect()
            .iter()
            .map(|family| family.get_metric().len())
            .sum()
    }

    /// Render the whole registry in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, RegistryError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| RegistryError::Prometheus(e.to_string()))
    }

    fn vec(&self, gauge: StatGauge) -> &GaugeVec {
        &self.gauges[gauge.index()]
    }
}

impl GaugeRegistry for PrometheusRegistry {
    fn series(
        &self,
        gauge: StatGauge,
        identity: &Identity,
    ) -> Result<Box<dyn GaugeSeries>, RegistryError> {
        let series = self
            .vec(gauge)
            .get_metric_with_label_values(&identity.label_values())
            .map_err(|e| label_error(gauge, e))?;
        Ok(Box::new(series))
    }
}

fn label_error(gauge: StatGauge, err: prometheus::Error) -> RegistryError {
    RegistryError::LabelMismatch {
        gauge: gauge.name(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(pod: &str) -> Identity {
        Identity::new("default", "helloworld-go", "helloworld-go-00001", pod).unwrap()
    }

    #[test]
    fn bind_creates_zeroed_series() {
        let registry = PrometheusRegistry::new().unwrap();
        let id = identity("pod-a");
        registry.bind(&id).unwrap();

        for gauge in StatGauge::ALL {
            assert_eq!(registry.series_count(gauge), 1);
            assert_eq!(registry.get(gauge, &id.labels()).unwrap(), 0.0);
        }
    }

    #[test]
    fn set_then_get() {
        let registry = PrometheusRegistry::new().unwrap();
        let id = identity("pod-a");
        registry.series(StatGauge::RequestsPerSecond, &id).unwrap().set(12.5);

        assert_eq!(
            registry.get(StatGauge::RequestsPerSecond, &id.labels()).unwrap(),
            12.5
        );
    }

    #[test]
    fn get_unknown_combination_is_not_found() {
        let registry = PrometheusRegistry::new().unwrap();
        registry.bind(&identity("pod-a")).unwrap();

        let err = registry
            .get(StatGauge::RequestsPerSecond, &identity("pod-b").labels())
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound("requests_per_second")));
        // Reading did not create the series.
        assert_eq!(registry.series_count(StatGauge::RequestsPerSecond), 1);
    }

    #[test]
    fn get_with_wrong_label_names() {
        let registry = PrometheusRegistry::new().unwrap();
        let id = identity("pod-a");
        registry.bind(&id).unwrap();

        let labels: HashMap<&str, &str> = HashMap::from([
            ("destination_namespace", "default"),
            ("destination_config", "helloworld-go"),
            ("destination_revision", "helloworld-go-00001"),
            ("destination_pod", "pod-a"),
        ]);
        let err = registry
            .get(StatGauge::RequestsPerSecond, &labels)
            .unwrap_err();
        assert!(matches!(err, RegistryError::LabelMismatch { .. }));
    }

    #[test]
    fn distinct_identities_get_distinct_series() {
        let registry = PrometheusRegistry::new().unwrap();
        let a = identity("pod-a");
        let b = identity("pod-b");
        registry.series(StatGauge::AverageConcurrentRequests, &a).unwrap().set(1.0);
        registry.series(StatGauge::AverageConcurrentRequests, &b).unwrap().set(2.0);

        assert_eq!(registry.series_count(StatGauge::AverageConcurrentRequests), 2);
        assert_eq!(
            registry.get(StatGauge::AverageConcurrentRequests, &a.labels()).unwrap(),
            1.0
        );
        assert_eq!(
            registry.get(StatGauge::AverageConcurrentRequests, &b.labels()).unwrap(),
            2.0
        );
    }

    #[test]
    fn double_registration_fails() {
        let shared = Registry::new();
        PrometheusRegistry::with_registry(shared.clone()).unwrap();

        let err = PrometheusRegistry::with_registry(shared).err().unwrap();
        assert!(matches!(err, RegistryError::AlreadyRegistered(_)));
    }

    #[test]
    fn render_contains_gauges_and_labels() {
        let registry = PrometheusRegistry::new().unwrap();
        let id = identity("pod-a");
        registry.series(StatGauge::RequestsPerSecond, &id).unwrap().set(3.0);

        let output = registry.render().unwrap();
        assert!(output.contains("# TYPE requests_per_second gauge"));
        assert!(output.contains("destination_pod=\"pod-a\""));
        assert!(output.contains("destination_configuration=\"helloworld-go\""));
    }
}
