//! Pagination types for list operations.
//!
//! Listing is bounded by a `take`/`skip` pair. Both default to `-1`, which
//! means "unbounded" for `take` and "no offset" for `skip`.

use crate::{OrderlyError, OrderlyResult};
use serde::{Deserialize, Serialize};

/// Sentinel meaning "unbounded" (take) or "no offset" (skip).
pub const UNBOUNDED: i32 = -1;

/// Parses a textual range parameter.
///
/// Absent or empty input yields [`UNBOUNDED`]. Anything else must be a
/// base-10 integer representable in 32 bits, with an optional sign.
///
/// # Errors
///
/// Returns `OrderlyError::Parse` naming the parameter and the raw input.
pub fn parse_range_param(name: &str, raw: Option<&str>) -> OrderlyResult<i32> {
    match raw {
        None | Some("") => Ok(UNBOUNDED),
        Some(value) => value
            .parse::<i32>()
            .map_err(|_| OrderlyError::parse(name, value)),
    }
}

/// A `take`/`skip` window over a creation-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListRange {
    /// Maximum number of rows; negative means unbounded.
    pub take: i32,
    /// Number of leading rows to skip; non-positive means none.
    pub skip: i32,
}

impl ListRange {
    /// Creates a range from already-parsed values.
    #[must_use]
    pub const fn new(take: i32, skip: i32) -> Self {
        Self { take, skip }
    }

    /// The unbounded listing with no offset.
    #[must_use]
    pub const fn all() -> Self {
        Self::new(UNBOUNDED, UNBOUNDED)
    }

    /// Parses both parameters from their raw textual form.
    ///
    /// # Errors
    ///
    /// Returns `OrderlyError::Parse` for the first parameter that is
    /// present, non-empty, and not a 32-bit integer.
    pub fn parse(take: Option<&str>, skip: Option<&str>) -> OrderlyResult<Self> {
        Ok(Self::new(
            parse_range_param("take", take)?,
            parse_range_param("skip", skip)?,
        ))
    }

    /// Returns the limit for database queries, `None` when unbounded.
    #[must_use]
    pub fn limit(&self) -> Option<i64> {
        (self.take >= 0).then(|| i64::from(self.take))
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.skip.max(0))
    }

    /// Applies the window to an in-memory, already ordered sequence.
    #[must_use]
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let rest = items.iter().skip(offset);
        match self.limit() {
            Some(limit) => rest
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => rest.cloned().collect(),
        }
    }
}

impl Default for ListRange {
    fn default() -> Self {
        Self::all()
    }
}
