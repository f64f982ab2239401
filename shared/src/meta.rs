//! Order metadata keys written by the invoice bridge
//!
//! Other tooling reads these keys from the host shop, so they must not change.

pub const INVOICE_ID: &str = "_vyfakturuj_invoice_id";
pub const INVOICE_NUMBER: &str = "_vyfakturuj_invoice_number";
/// Local timestamp `YYYY-MM-DD HH:MM:SS` of the last successful send
pub const PDF_SENT: &str = "_vyfakturuj_pdf_sent";
pub const PDF_SENT_EMAIL: &str = "_vyfakturuj_pdf_sent_email";
pub const PDF_SENT_METHOD: &str = "_vyfakturuj_pdf_sent_method";

/// Delivery channel tag for sends performed through the provider API
pub const CHANNEL_API: &str = "api";

/// Timestamp format of [`PDF_SENT`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
