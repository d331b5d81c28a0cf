use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Entity;

/// Order lifecycle states. `InProgress` is the only non-terminal state; see
/// [`crate::workflow`] for the guarded transitions out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "IN_PROGRESS" => Ok(OrderStatus::InProgress),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("invalid order status: {other}")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::InProgress)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub description: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFields {
    pub description: String,
    pub status: OrderStatus,
}

/// Request body for POST and PUT on orders.
///
/// POST ignores `status` entirely. PUT overwrites the stored status when one
/// is supplied and keeps it otherwise (new records fall back to
/// `IN_PROGRESS`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderPayload {
    pub description: String,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl OrderPayload {
    /// Fields for a brand-new order: status is always `IN_PROGRESS`.
    pub fn into_new_fields(self) -> OrderFields {
        OrderFields {
            description: self.description,
            status: OrderStatus::InProgress,
        }
    }

    /// Fields for a full replace over `existing` (if any).
    pub fn into_replacement(self, existing: Option<&Order>) -> OrderFields {
        let fallback = existing.map_or(OrderStatus::InProgress, |o| o.status);
        OrderFields {
            description: self.description,
            status: self.status.unwrap_or(fallback),
        }
    }
}

impl Entity for Order {
    type Fields = OrderFields;

    const NAME: &'static str = "Order";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_parts(id: i64, fields: OrderFields) -> Self {
        Self {
            id,
            description: fields.description,
            status: fields.status,
        }
    }

    fn into_fields(self) -> OrderFields {
        OrderFields {
            description: self.description,
            status: self.status,
        }
    }
}
