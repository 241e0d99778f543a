//! HTTP route handlers.

pub mod brands;
pub mod categories;
pub mod health;
pub mod metrics;
pub mod products;

use std::str::FromStr;

use catalog_store::CatalogStore;
use domain::{BrandService, CategoryService, ProductService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: CatalogStore> {
    pub categories: CategoryService<S>,
    pub brands: BrandService<S>,
    pub products: ProductService<S>,
}

impl<S: CatalogStore + Clone> AppState<S> {
    /// Builds the three services over one shared store.
    pub fn new(store: S) -> Self {
        Self {
            categories: CategoryService::new(store.clone()),
            brands: BrandService::new(store.clone()),
            products: ProductService::new(store),
        }
    }
}

/// Parses an entity id from a path segment.
pub(crate) fn parse_id<T: FromStr>(raw: &str, name: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {name}: '{raw}'")))
}
