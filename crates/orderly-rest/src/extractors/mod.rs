//! Custom Axum extractors.

mod pagination;
mod payload;
mod resource_id;

pub use pagination::*;
pub use payload::*;
pub use resource_id::*;
