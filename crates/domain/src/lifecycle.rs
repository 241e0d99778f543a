//! Entity lifecycle outcomes and the counters that track them.

use crate::error::Resource;

/// What a delete request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was physically removed.
    Removed,
    /// The row had dependents and was marked inactive instead.
    Deactivated,
}

impl DeleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteOutcome::Removed => "removed",
            DeleteOutcome::Deactivated => "deactivated",
        }
    }
}

pub(crate) fn record_created(resource: Resource) {
    metrics::counter!("catalog_entities_created_total", "entity" => resource.metric_label())
        .increment(1);
}

pub(crate) fn record_updated(resource: Resource) {
    metrics::counter!("catalog_entities_updated_total", "entity" => resource.metric_label())
        .increment(1);
}

pub(crate) fn record_deleted(resource: Resource, outcome: DeleteOutcome) {
    match outcome {
        DeleteOutcome::Removed => {
            metrics::counter!("catalog_entities_deleted_total", "entity" => resource.metric_label())
                .increment(1);
        }
        DeleteOutcome::Deactivated => {
            metrics::counter!(
                "catalog_entities_deactivated_total",
                "entity" => resource.metric_label()
            )
            .increment(1);
        }
    }
}
