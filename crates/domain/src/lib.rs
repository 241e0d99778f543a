//! Domain layer for the catalog service.
//!
//! This crate provides:
//! - Validated input types for categories, brands and products
//! - `CategoryService`, `BrandService` and `ProductService`, which enforce
//!   uniqueness, reference checks and the deactivate-instead-of-delete rule
//! - `DomainError` with the catalog's not-found and already-exists messages

pub mod brand;
pub mod category;
pub mod error;
pub mod lifecycle;
pub mod product;
pub mod validation;

pub use brand::{BrandPatch, BrandService, NewBrand};
pub use category::{CategoryPatch, CategoryService, NewCategory};
pub use error::{DomainError, Resource};
pub use lifecycle::DeleteOutcome;
pub use product::{NewProduct, ProductPatch, ProductService};
