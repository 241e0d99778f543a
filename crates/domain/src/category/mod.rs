//! Category inputs and service.

mod model;
mod service;

pub use model::{CategoryPatch, NewCategory};
pub use service::CategoryService;
