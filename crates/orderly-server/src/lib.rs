//! # Orderly Server Library
//!
//! Wiring for the Orderly server: dependency assembly, the application
//! lifecycle, and startup output.

pub mod app;
pub mod di;
pub mod startup;
