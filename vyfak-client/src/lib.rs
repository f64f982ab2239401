//! Vyfak Client - HTTP client for the Vyfakturuj.cz invoicing API
//!
//! Basic-authenticated JSON calls against `https://api.vyfakturuj.cz/2.0/`:
//! invoices, invoice emails, contacts and a connectivity test.

pub mod config;
pub mod error;
pub mod http;
pub mod response;

pub use config::{DEFAULT_ENDPOINT_URL, ProviderConfig};
pub use error::{ClientError, ClientResult};
pub use http::{InvoiceApi, VyfakClient};
pub use response::{ApiReply, ApiResponse, RequestInfo};
