//! Invoice Model
//!
//! Request body for `POST invoice/`. Field names follow the provider's wire
//! format, so some of them are terse (`vs`, `round_invoice`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Regular invoice document type
pub const INVOICE_TYPE_REGULAR: u8 = 1;
/// Mathematical rounding of the invoice total
pub const ROUND_MATHEMATICAL: u8 = 2;
/// Fixed VAT rate in percent
pub const VAT_RATE_PERCENT: u32 = 21;
/// Unit label for line items ("pieces")
pub const UNIT_PIECES: &str = "ks";
/// Default customer country when billing has none
pub const DEFAULT_COUNTRY: &str = "CZ";

/// Customer block of an invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub company: String,
}

/// Invoice line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceItem {
    pub text: String,
    pub quantity: i32,
    /// Unit price excluding VAT, rounded to 2 decimal places
    pub unit_price: f64,
    pub vat_rate: u32,
    pub unit: String,
}

/// Invoice creation payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoicePayload {
    #[serde(rename = "type")]
    pub kind: u8,
    /// Issue date
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    /// Variable symbol (order number)
    pub vs: String,
    pub calculate_vat: u8,
    pub round_invoice: u8,
    pub payment_method: u32,
    pub customer: InvoiceCustomer,
    pub items: Vec<InvoiceItem>,
    pub note: String,
    pub currency: String,
}
