//! Domain entities.

pub mod history;
pub mod order;
pub mod user;

pub use history::*;
pub use order::*;
pub use user::*;
