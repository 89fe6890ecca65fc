//! Lookup table from resource id to recorded response.

use std::collections::HashMap;
use std::sync::Arc;
use tracetime_core::ResourceId;
use tracetime_trace::{ResourceRecord, TraceModel};

/// Every recorded resource of a trace, by id
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
    by_id: HashMap<ResourceId, Arc<ResourceRecord>>,
}

impl ResourceIndex {
    /// Flatten a trace into the index
    ///
    /// Walks pages, frames, each action's resources, then frame-level
    /// resources. A repeated id overwrites the earlier record: recorders
    /// re-emit ids, and the last emission is the one kept.
    #[must_use]
    pub fn build(model: &TraceModel) -> Self {
        let mut by_id = HashMap::new();
        let mut overwritten = 0usize;

        for page in &model.pages {
            for record in page.resources() {
                if by_id
                    .insert(record.resource_id.clone(), Arc::new(record.clone()))
                    .is_some()
                {
                    overwritten += 1;
                }
            }
        }

        tracing::debug!(
            resources = by_id.len(),
            overwritten,
            "built resource index"
        );

        Self { by_id }
    }

    /// Look up a resource
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&Arc<ResourceRecord>> {
        self.by_id.get(id)
    }

    /// Number of distinct ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
