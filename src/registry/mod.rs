//! Experiment Registry
//!
//! Tracks which experiments exist, who owns them, and their display names.
//! Registration is an upsert, so owners can call `register` on every
//! request without checking first.

mod experiment_record;

pub use experiment_record::{ExperimentRecord, ExperimentRecordBuilder};

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::{Error, Result};

/// Concurrent in-memory experiment registry.
pub struct ExperimentRegistry {
    records: DashMap<String, ExperimentRecord, FxBuildHasher>,
    clock: Arc<dyn Clock>,
}

impl ExperimentRegistry {
    /// Create an empty registry on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty registry with an explicit time source.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::with_hasher(FxBuildHasher),
            clock,
        }
    }

    /// Register (or re-register) an experiment.
    ///
    /// Re-registration updates the namespace and registration time, and
    /// replaces the name only when `name` is `Some`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for an empty id or namespace.
    pub fn register(&self, experiment_id: &str, namespace: &str, name: Option<&str>) -> Result<()> {
        if experiment_id.is_empty() {
            return Err(Error::InvalidArgument("experiment id must not be empty".into()));
        }
        if namespace.is_empty() {
            return Err(Error::InvalidArgument("namespace must not be empty".into()));
        }

        let now = self.clock.now();
        self.records
            .entry(experiment_id.to_string())
            .and_modify(|record| record.reregister(namespace, name, now))
            .or_insert_with(|| {
                let builder =
                    ExperimentRecord::builder(experiment_id, namespace).registered_at(now);
                match name {
                    Some(name) => builder.name(name).build(),
                    None => builder.build(),
                }
            });

        debug!(experiment_id, namespace, "experiment registered");
        Ok(())
    }

    /// Check whether an experiment is registered.
    #[must_use]
    pub fn is_registered(&self, experiment_id: &str) -> bool {
        self.records.contains_key(experiment_id)
    }

    /// Owning namespace of an experiment.
    #[must_use]
    pub fn owner(&self, experiment_id: &str) -> Option<String> {
        self.records
            .get(experiment_id)
            .map(|record| record.namespace().to_string())
    }

    /// Human-readable name of an experiment.
    #[must_use]
    pub fn experiment_name(&self, experiment_id: &str) -> Option<String> {
        self.records
            .get(experiment_id)
            .and_then(|record| record.name().map(str::to_string))
    }

    /// Full record for an experiment.
    #[must_use]
    pub fn get(&self, experiment_id: &str) -> Option<ExperimentRecord> {
        self.records.get(experiment_id).map(|record| record.value().clone())
    }

    /// All experiments as `experiment_id -> namespace`.
    #[must_use]
    pub fn all(&self) -> BTreeMap<String, String> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().namespace().to_string()))
            .collect()
    }

    /// All records, most recently registered first (ties by id).
    #[must_use]
    pub fn records(&self) -> Vec<ExperimentRecord> {
        let mut records: Vec<ExperimentRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| {
            b.registered_at()
                .cmp(&a.registered_at())
                .then_with(|| a.experiment_id().cmp(b.experiment_id()))
        });
        records
    }

    /// Remove an experiment. Returns the removed record.
    pub fn unregister(&self, experiment_id: &str) -> Option<ExperimentRecord> {
        self.records.remove(experiment_id).map(|(_, record)| record)
    }

    /// Number of registered experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ExperimentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExperimentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentRegistry")
            .field("experiments", &self.records.len())
            .finish_non_exhaustive()
    }
}
