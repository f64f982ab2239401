//! Invoice Bridge - shop orders → Vyfakturuj.cz invoices
//!
//! When an order is paid, builds an invoice from its lines and billing
//! address, creates it through the provider API once, then asks the provider
//! to email the PDF to the customer. Identifiers and delivery details are
//! stored as order metadata.
//!
//! # Module structure
//!
//! ```text
//! invoice-bridge/src/
//! ├── core/       # configuration
//! ├── invoice/    # payload builder, payment mapping, VAT arithmetic
//! ├── delivery.rs # PDF email attempts
//! ├── workflow.rs # order → invoice state machine, operator actions
//! ├── store.rs    # host order storage seam
//! ├── worker.rs   # order event subscription
//! └── utils/      # logging
//! ```

pub mod core;
pub mod delivery;
pub mod error;
pub mod invoice;
pub mod store;
pub mod utils;
pub mod worker;
pub mod workflow;

// Re-export public types
pub use core::BridgeConfig;
pub use delivery::{DeliveryPolicy, DeliveryReport, deliver_invoice_pdf};
pub use error::{BridgeError, BridgeResult};
pub use store::{MemoryOrderStore, OrderStore};
pub use worker::{ChannelEventSource, InvoiceWorker, OrderEventSource};
pub use workflow::{DeliveryOutcome, InvoiceBridge, InvoiceStatus, WorkflowSettings};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
