//! Experiment Record - registration entry for a bandit experiment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered experiment.
///
/// Created once by whichever module owns the experiment; the scorer only
/// reads it (for display names in score events and reports).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentRecord {
    experiment_id: String,
    namespace: String,
    name: Option<String>,
    registered_at: DateTime<Utc>,
}

impl ExperimentRecord {
    /// Create a record registered now.
    ///
    /// # Arguments
    ///
    /// * `experiment_id` - Opaque experiment identifier
    /// * `namespace` - Owning module or component
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::builder(experiment_id, namespace).build()
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(
        experiment_id: impl Into<String>,
        namespace: impl Into<String>,
    ) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(experiment_id, namespace)
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the owning namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the human-readable name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Re-registration: new owner and timestamp; the name is replaced only
    /// when a new one is given.
    pub(crate) fn reregister(
        &mut self,
        namespace: &str,
        name: Option<&str>,
        registered_at: DateTime<Utc>,
    ) {
        namespace.clone_into(&mut self.namespace);
        if let Some(name) = name {
            self.name = Some(name.to_string());
        }
        self.registered_at = registered_at;
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    experiment_id: String,
    namespace: String,
    name: Option<String>,
    registered_at: DateTime<Utc>,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            namespace: namespace.into(),
            name: None,
            registered_at: Utc::now(),
        }
    }

    /// Set the human-readable name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a custom registration timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn registered_at(mut self, registered_at: DateTime<Utc>) -> Self {
        self.registered_at = registered_at;
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        ExperimentRecord {
            experiment_id: self.experiment_id,
            namespace: self.namespace,
            name: self.name,
            registered_at: self.registered_at,
        }
    }
}
