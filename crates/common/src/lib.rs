//! Shared types for the catalog service: typed entity ids and pagination.

pub mod page;
pub mod types;

pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, SortDirection};
pub use types::{BrandId, CategoryId, ProductId};
