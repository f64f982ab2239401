//! Bridge error types

use thiserror::Error;
use vyfak_client::ClientError;

/// Workflow error type
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport or client-side failure talking to the provider
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Provider answered without what the step needs
    #[error("Failed to create invoice: {0}")]
    Provider(String),

    /// Order data that cannot be invoiced
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Order #{0} not found")]
    OrderNotFound(u64),

    #[error("No invoice stored for order #{0}")]
    NoInvoice(u64),

    /// Login or API key missing
    #[error("API not initialized: login and API key are required")]
    NotConfigured,

    #[error("Customer email not found in order")]
    MissingEmail,

    #[error("Failed to send email via API after {0} attempts")]
    DeliveryExhausted(usize),

    /// Event queue already handed to another consumer
    #[error("Event source error: {0}")]
    EventSource(String),

    /// Host order storage failure
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for workflow operations
pub type BridgeResult<T> = Result<T, BridgeError>;
