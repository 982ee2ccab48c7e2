//! Order entity.

use crate::domain::{now_millis, truncate_millis};
use crate::{FieldSpec, FieldValue, HistoryId, OrderId, Resource, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A priced, expiring order, optionally attached to a History.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    /// Price in minor units. Must be at least 1.
    pub price: i64,
    pub expired_at: DateTime<Utc>,
    pub histories_id: Option<HistoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates an unsaved order.
    #[must_use]
    pub fn new(name: impl Into<String>, price: i64, expired_at: DateTime<Utc>) -> Self {
        let now = now_millis();
        Self {
            id: OrderId::default(),
            name: name.into(),
            price,
            expired_at: truncate_millis(expired_at),
            histories_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Attaches the order to a History.
    #[must_use]
    pub const fn with_history(mut self, histories_id: HistoryId) -> Self {
        self.histories_id = Some(histories_id);
        self
    }
}

/// Inbound data for creating or replacing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    #[serde(default, alias = "Name")]
    pub name: String,

    #[serde(default, alias = "Price")]
    pub price: i64,

    #[serde(alias = "ExpiredAt")]
    pub expired_at: DateTime<Utc>,

    #[serde(default, alias = "HistoriesID")]
    pub histories_id: Option<HistoryId>,
}

impl Schema for Order {
    const NAME: &'static str = "Order";
    const KIND: &'static str = "order";

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[FieldSpec::required("Name"), FieldSpec::min("Price", 1)];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "Name" => Some(FieldValue::Text(&self.name)),
            "Price" => Some(FieldValue::Int(self.price)),
            _ => None,
        }
    }
}

impl Resource for Order {
    type Id = OrderId;
    type Payload = OrderPayload;

    const COLLECTION: &'static str = "orders";

    fn id(&self) -> OrderId {
        self.id
    }

    fn draft(payload: OrderPayload) -> Self {
        let mut order = Self::new(String::new(), 0, payload.expired_at);
        order.apply(payload);
        order
    }

    fn apply(&mut self, payload: OrderPayload) {
        self.name = payload.name;
        self.price = payload.price;
        self.expired_at = truncate_millis(payload.expired_at);
        self.histories_id = payload.histories_id;
    }

    fn history_ref(&self) -> Option<HistoryId> {
        self.histories_id
    }
}
