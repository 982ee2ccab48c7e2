//! # Orderly Core
//!
//! Core types, traits, and error definitions for Orderly.
//! This crate provides the entities, the pagination and validation layers,
//! and the seams (`Resource`, `Repository`) shared by every other crate.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
