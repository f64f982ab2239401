//! Invoice construction
//!
//! - `payload`: order → invoice body
//! - `payment`: gateway code → provider payment method
//! - `money`: VAT arithmetic

pub mod money;
pub mod payload;
pub mod payment;

pub use payload::{build_invoice_payload, compose_note, describe_line_item, sanitize_description};
pub use payment::map_payment_method;
