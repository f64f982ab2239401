//! Data models
//!
//! Host shop orders (input) and provider invoices (output).

pub mod invoice;
pub mod order;

// Re-exports
pub use invoice::*;
pub use order::*;
