//! Workload identity and the label schema shared by writers and readers.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// Label carrying the workload namespace.
pub const LABEL_NAMESPACE: &str = "destination_namespace";
/// Label carrying the logical service (configuration) name.
pub const LABEL_CONFIG: &str = "destination_configuration";
/// Label carrying the revision name.
pub const LABEL_REVISION: &str = "destination_revision";
/// Label carrying the pod name.
pub const LABEL_POD: &str = "destination_pod";

/// Label names in the order [`Identity::label_values`] yields values.
pub const LABEL_NAMES: [&str; 4] = [LABEL_NAMESPACE, LABEL_CONFIG, LABEL_REVISION, LABEL_POD];

/// Construction-time validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("namespace must not be empty")]
    EmptyNamespace,

    #[error("config must not be empty")]
    EmptyConfig,

    #[error("revision must not be empty")]
    EmptyRevision,

    #[error("pod must not be empty")]
    EmptyPod,

    #[error("reporting period must be positive")]
    ZeroReportingPeriod,
}

/// The (namespace, config, revision, pod) tuple a reporter publishes under.
///
/// All four fields are non-empty; this is checked once in [`Identity::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    namespace: String,
    config: String,
    revision: String,
    pod: String,
}

impl Identity {
    /// Validate and build an identity. Fields are checked in declaration
    /// order and the first empty one is reported.
    pub fn new(
        namespace: impl Into<String>,
        config: impl Into<String>,
        revision: impl Into<String>,
        pod: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (namespace, config, revision, pod) =
            (namespace.into(), config.into(), revision.into(), pod.into());

        if namespace.is_empty() {
            return Err(ValidationError::EmptyNamespace);
        }
        if config.is_empty() {
            return Err(ValidationError::EmptyConfig);
        }
        if revision.is_empty() {
            return Err(ValidationError::EmptyRevision);
        }
        if pod.is_empty() {
            return Err(ValidationError::EmptyPod);
        }

        Ok(Self {
            namespace,
            config,
            revision,
            pod,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn pod(&self) -> &str {
        &self.pod
    }

    /// Label values ordered to match [`LABEL_NAMES`].
    pub fn label_values(&self) -> [&str; 4] {
        [&self.namespace, &self.config, &self.revision, &self.pod]
    }

    /// Label name → value map for this identity.
    pub fn labels(&self) -> HashMap<&'static str, &str> {
        LABEL_NAMES.into_iter().zip(self.label_values()).collect()
    }
}

/// Reject a zero reporting period. `Duration` already excludes negatives.
pub fn validate_reporting_period(period: Duration) -> Result<Duration, ValidationError> {
    if period.is_zero() {
        return Err(ValidationError::ZeroReportingPeriod);
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMESPACE: &str = "default";
    const CONFIG: &str = "helloworld-go";
    const REVISION: &str = "helloworld-go-00001";
    const POD: &str = "helloworld-go-00001-deployment-8ff587cc9-7g9gc";

    #[test]
    fn valid_identity() {
        let id = Identity::new(NAMESPACE, CONFIG, REVISION, POD).unwrap();
        assert_eq!(id.namespace(), NAMESPACE);
        assert_eq!(id.config(), CONFIG);
        assert_eq!(id.revision(), REVISION);
        assert_eq!(id.pod(), POD);
    }

    #[test]
    fn empty_namespace() {
        let err = Identity::new("", CONFIG, REVISION, POD).unwrap_err();
        assert_eq!(err.to_string(), "namespace must not be empty");
    }

    #[test]
    fn empty_config() {
        let err = Identity::new(NAMESPACE, "", REVISION, POD).unwrap_err();
        assert_eq!(err.to_string(), "config must not be empty");
    }

    #[test]
    fn empty_revision() {
        let err = Identity::new(NAMESPACE, CONFIG, "", POD).unwrap_err();
        assert_eq!(err.to_string(), "revision must not be empty");
    }

    #[test]
    fn empty_pod() {
        let err = Identity::new(NAMESPACE, CONFIG, REVISION, "").unwrap_err();
        assert_eq!(err.to_string(), "pod must not be empty");
    }

    #[test]
    fn first_empty_field_wins() {
        assert_eq!(
            Identity::new("", "", "", "").unwrap_err(),
            ValidationError::EmptyNamespace
        );
        assert_eq!(
            Identity::new(NAMESPACE, CONFIG, "", "").unwrap_err(),
            ValidationError::EmptyRevision
        );
    }

    #[test]
    fn whitespace_is_not_empty() {
        // Only emptiness is checked, no format validation.
        assert!(Identity::new(" ", " ", " ", " ").is_ok());
    }

    #[test]
    fn labels_follow_schema_order() {
        let id = Identity::new(NAMESPACE, CONFIG, REVISION, POD).unwrap();
        assert_eq!(id.label_values(), [NAMESPACE, CONFIG, REVISION, POD]);

        let labels = id.labels();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[LABEL_NAMESPACE], NAMESPACE);
        assert_eq!(labels[LABEL_CONFIG], CONFIG);
        assert_eq!(labels[LABEL_REVISION], REVISION);
        assert_eq!(labels[LABEL_POD], POD);
    }

    #[test]
    fn zero_period_rejected() {
        assert_eq!(
            validate_reporting_period(Duration::ZERO).unwrap_err(),
            ValidationError::ZeroReportingPeriod
        );
        assert_eq!(
            validate_reporting_period(Duration::from_millis(1)).unwrap(),
            Duration::from_millis(1)
        );
    }
}
