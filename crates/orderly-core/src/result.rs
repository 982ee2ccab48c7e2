//! Result type aliases for Orderly.

use crate::OrderlyError;

/// A specialized `Result` type for Orderly operations.
pub type OrderlyResult<T> = Result<T, OrderlyError>;
