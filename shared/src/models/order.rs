//! Order Model
//!
//! Read-only view of a host shop order. The host system owns these records;
//! the invoice bridge only reads them and appends metadata and notes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Order status as reported by the host shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    /// Custom status registered by another plugin
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
            OrderStatus::Other(s) => s,
        }
    }

    /// Paid states that trigger invoicing
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Completed)
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        // Host systems sometimes report statuses with a "wc-" prefix
        let value = value.strip_prefix("wc-").unwrap_or(value);
        match value {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "on-hold" => OrderStatus::OnHold,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            "refunded" => OrderStatus::Refunded,
            "failed" => OrderStatus::Failed,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        OrderStatus::from(value.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing address
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BillingAddress {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

impl BillingAddress {
    /// "First Last", trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Tyre catalogue attributes attached to a product
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProductAttributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub diameter: Option<String>,
    pub season: Option<String>,
    pub load_index: Option<String>,
    pub speed_index: Option<String>,
}

/// Merchandise line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: i32,
    /// Line total in currency unit (tax excluded by the host)
    pub total: f64,
    /// Tax charged on the line in currency unit
    #[serde(default)]
    pub total_tax: f64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub attributes: Option<ProductAttributes>,
}

impl LineItem {
    /// Line total including tax
    pub fn total_with_tax(&self) -> f64 {
        self.total + self.total_tax
    }
}

/// Shipping line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingLine {
    pub method_title: String,
    pub total: f64,
    #[serde(default)]
    pub total_tax: f64,
}

impl ShippingLine {
    pub fn total_with_tax(&self) -> f64 {
        self.total + self.total_tax
    }
}

/// Order-level fee (never invoiced)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeLine {
    pub name: String,
    pub total: f64,
    #[serde(default)]
    pub total_tax: f64,
}

/// Shop order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    /// Customer-facing order number, also used as variable symbol
    pub number: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub billing: BillingAddress,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(default)]
    pub fee_lines: Vec<FeeLine>,
    /// Gateway code, e.g. "bacs" or "stripe_cc"
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_method_title: String,
    pub currency: String,
    #[serde(default)]
    pub customer_note: Option<String>,
    pub created_at: NaiveDateTime,
}
