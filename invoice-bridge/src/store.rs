//! Order storage seam
//!
//! The host shop owns orders; the bridge reads them and appends metadata and
//! notes through [`OrderStore`]. [`MemoryOrderStore`] backs tests and the
//! operator CLI.

use crate::BridgeResult;
use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::Order;
use std::collections::HashMap;

/// Host order storage
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load_order(&self, order_id: u64) -> BridgeResult<Option<Order>>;

    /// Metadata value, `None` when unset
    async fn get_meta(&self, order_id: u64, key: &str) -> BridgeResult<Option<String>>;

    /// Insert or overwrite a metadata value
    async fn set_meta(&self, order_id: u64, key: &str, value: &str) -> BridgeResult<()>;

    /// Append a note to the order history
    async fn add_note(&self, order_id: u64, note: &str) -> BridgeResult<()>;
}

/// In-memory order store
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: DashMap<u64, Order>,
    meta: DashMap<u64, HashMap<String, String>>,
    notes: DashMap<u64, Vec<String>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_order(&self, order: Order) {
        self.orders.insert(order.id, order);
    }

    /// Notes added to an order, oldest first
    pub fn notes(&self, order_id: u64) -> Vec<String> {
        self.notes
            .get(&order_id)
            .map(|n| n.value().clone())
            .unwrap_or_default()
    }

    pub fn meta(&self, order_id: u64, key: &str) -> Option<String> {
        self.meta
            .get(&order_id)
            .and_then(|m| m.value().get(key).cloned())
    }

    /// All metadata of an order
    pub fn all_meta(&self, order_id: u64) -> HashMap<String, String> {
        self.meta
            .get(&order_id)
            .map(|m| m.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn load_order(&self, order_id: u64) -> BridgeResult<Option<Order>> {
        Ok(self.orders.get(&order_id).map(|o| o.value().clone()))
    }

    async fn get_meta(&self, order_id: u64, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.meta(order_id, key))
    }

    async fn set_meta(&self, order_id: u64, key: &str, value: &str) -> BridgeResult<()> {
        self.meta
            .entry(order_id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn add_note(&self, order_id: u64, note: &str) -> BridgeResult<()> {
        self.notes
            .entry(order_id)
            .or_default()
            .push(note.to_string());
        Ok(())
    }
}
