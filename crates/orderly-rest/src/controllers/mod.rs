//! REST API controllers.

pub mod health_controller;
pub mod resource_controller;

pub use health_controller::*;
