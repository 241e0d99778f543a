//! Brand inputs and service.

mod model;
mod service;

pub use model::{BrandPatch, NewBrand};
pub use service::BrandService;
