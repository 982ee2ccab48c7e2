//! Typed ID wrappers for domain entities.
//!
//! Identifiers are assigned by the store (`BIGSERIAL`), so there is no
//! `new()` constructor: an entity that has not been persisted carries
//! the zero id.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the inner integer.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Whether the store has assigned this id yet.
            #[must_use]
            pub const fn is_assigned(self) -> bool {
                self.0 > 0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(i64::from(id))
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// A strongly-typed wrapper for user IDs.
    UserId
);

entity_id!(
    /// A strongly-typed wrapper for order IDs.
    OrderId
);

entity_id!(
    /// A strongly-typed wrapper for history IDs.
    HistoryId
);
