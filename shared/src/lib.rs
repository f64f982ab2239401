//! Shared types for the invoice bridge
//!
//! Order and invoice models, email payload shapes, order events and the
//! metadata keys persisted on host orders.

pub mod email;
pub mod event;
pub mod meta;
pub mod models;

// Re-exports
pub use email::{EmailMessage, EmailShape};
pub use event::OrderEvent;
pub use models::{Order, OrderStatus};
pub use serde::{Deserialize, Serialize};
