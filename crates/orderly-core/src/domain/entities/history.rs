//! History aggregate.

use crate::domain::now_millis;
use crate::{FieldSpec, FieldValue, HistoryId, Order, Resource, Schema, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parent aggregate linking at most one User to a set of Orders.
///
/// `user` and `orders` are filled by the store on every read; they are
/// never written through the History itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct History {
    pub id: HistoryId,

    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub user: Option<User>,

    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub orders: Vec<Order>,

    pub descriptions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl History {
    /// Creates an unsaved history.
    #[must_use]
    pub fn new(descriptions: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: HistoryId::default(),
            user: None,
            orders: Vec::new(),
            descriptions: descriptions.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Inbound data for creating or replacing a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPayload {
    #[serde(default, alias = "Descriptions")]
    pub descriptions: String,
}

impl Schema for History {
    const NAME: &'static str = "History";
    const KIND: &'static str = "history";

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[FieldSpec::required("Descriptions")];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "Descriptions" => Some(FieldValue::Text(&self.descriptions)),
            _ => None,
        }
    }
}

impl Resource for History {
    type Id = HistoryId;
    type Payload = HistoryPayload;

    const COLLECTION: &'static str = "histories";

    fn id(&self) -> HistoryId {
        self.id
    }

    fn draft(payload: HistoryPayload) -> Self {
        Self::new(payload.descriptions)
    }

    fn apply(&mut self, payload: HistoryPayload) {
        self.descriptions = payload.descriptions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{validate, HistoryId};

    #[test]
    fn test_history_creation() {
        let history = History::new("first purchase");
        assert!(history.user.is_none());
        assert!(history.orders.is_empty());
        assert!(history.history_ref().is_none());
    }

    #[test]
    fn test_descriptions_required() {
        let violations = validate(&History::draft(HistoryPayload {
            descriptions: String::new(),
        }))
        .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].namespace, "History.Descriptions");
    }

    #[test]
    fn test_apply_keeps_associations() {
        let mut history = History::new("a");
        history.user = Some(User::new("Ada").with_history(HistoryId(1)));
        history.apply(HistoryPayload {
            descriptions: "b".to_string(),
        });
        assert_eq!(history.descriptions, "b");
        assert!(history.user.is_some());
    }

    #[test]
    fn test_history_deserializes_without_associations() {
        let json = serde_json::json!({
            "id": 3,
            "descriptions": "x",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });
        let history: History = serde_json::from_value(json).unwrap();
        assert_eq!(history.id, HistoryId(3));
        assert!(history.user.is_none());
        assert!(history.orders.is_empty());
    }
}
