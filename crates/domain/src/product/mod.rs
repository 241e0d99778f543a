//! Product inputs and service.

mod model;
mod service;

pub use model::{NewProduct, ProductPatch};
pub use service::ProductService;
