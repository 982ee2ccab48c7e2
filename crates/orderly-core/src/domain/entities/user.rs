//! User entity.

use crate::domain::now_millis;
use crate::{FieldSpec, FieldValue, HistoryId, Resource, Schema, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer, optionally attached to a History.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,

    /// User's full name.
    pub full_name: String,

    /// Whether the user has not ordered before.
    pub first_order: bool,

    /// The History this user belongs to.
    pub histories_id: Option<HistoryId>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates an unsaved user.
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: UserId::default(),
            full_name: full_name.into(),
            first_order: true,
            histories_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Attaches the user to a History.
    #[must_use]
    pub const fn with_history(mut self, histories_id: HistoryId) -> Self {
        self.histories_id = Some(histories_id);
        self
    }

    /// Whether the row has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

const fn default_first_order() -> bool {
    true
}

/// Inbound data for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(default, alias = "FullName")]
    pub full_name: String,

    #[serde(default = "default_first_order", alias = "FirstOrder")]
    pub first_order: bool,

    #[serde(default, alias = "HistoriesID")]
    pub histories_id: Option<HistoryId>,
}

impl Schema for User {
    const NAME: &'static str = "User";
    const KIND: &'static str = "user";

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[FieldSpec::required("FullName")];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "FullName" => Some(FieldValue::Text(&self.full_name)),
            _ => None,
        }
    }
}

impl Resource for User {
    type Id = UserId;
    type Payload = UserPayload;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> UserId {
        self.id
    }

    fn draft(payload: UserPayload) -> Self {
        let mut user = Self::new(String::new());
        user.apply(payload);
        user
    }

    fn apply(&mut self, payload: UserPayload) {
        self.full_name = payload.full_name;
        self.first_order = payload.first_order;
        self.histories_id = payload.histories_id;
    }

    fn history_ref(&self) -> Option<HistoryId> {
        self.histories_id
    }
}
