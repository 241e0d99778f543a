//! Domain error types.

use std::fmt;

use catalog_store::StoreError;
use thiserror::Error;
use validator::ValidationErrors;

/// The catalog entities, named the way they appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Category,
    Brand,
    Product,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Category => "Categoria",
            Resource::Brand => "Marca",
            Resource::Product => "Producto",
        }
    }

    /// Label used for metrics.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Resource::Category => "category",
            Resource::Brand => "brand",
            Resource::Product => "product",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input failed field validation. No store access happened.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An entity, key or reference does not resolve.
    #[error("{resource} not found with {field}: '{value}'")]
    NotFound {
        resource: Resource,
        field: &'static str,
        value: String,
    },

    /// A unique field collides with another row.
    #[error("{resource} already exists with {field}: '{value}'")]
    AlreadyExists {
        resource: Resource,
        field: &'static str,
        value: String,
    },

    /// An error occurred in the catalog store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn not_found(resource: Resource, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            resource,
            field,
            value: value.to_string(),
        }
    }

    pub fn already_exists(resource: Resource, field: &'static str, value: impl ToString) -> Self {
        DomainError::AlreadyExists {
            resource,
            field,
            value: value.to_string(),
        }
    }

    /// Returns true for outcomes the caller is expected to handle.
    pub fn is_expected(&self) -> bool {
        !matches!(self, DomainError::Store(_))
    }
}
