//! Storage layer for the catalog: record types, product queries, and the
//! `CatalogStore` trait with in-memory and PostgreSQL implementations.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::{BrandId, CategoryId, Page, PageRequest, ProductId, SortDirection};
pub use error::{Result, StoreError};
pub use memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use query::{ProductQuery, ProductSort, ProductSortField};
pub use record::{
    Brand, BrandFields, Category, CategoryFields, Owner, Product, ProductFields, constraints,
};
pub use store::{CatalogStore, CatalogStoreExt};
