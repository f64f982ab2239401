//! Order events consumed from the host shop

use crate::models::OrderStatus;
use serde::{Deserialize, Serialize};

/// Host shop order event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEvent {
    /// A new order was placed
    Created { order_id: u64 },
    /// An order moved between statuses
    StatusChanged {
        order_id: u64,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> u64 {
        match self {
            OrderEvent::Created { order_id } | OrderEvent::StatusChanged { order_id, .. } => {
                *order_id
            }
        }
    }

    /// Whether this event should produce an invoice
    pub fn triggers_invoice(&self) -> bool {
        matches!(self, OrderEvent::StatusChanged { new_status, .. } if new_status.is_paid())
    }
}
