//! Order → invoice workflow
//!
//! ```text
//! NoInvoice ──create──► InvoiceCreated ──deliver──► PdfDelivered
//!     │                       ▲                └──► PdfDeliveryFailed (note only)
//!     └── stored id ──────────┘
//! ```
//!
//! The stored invoice id makes re-entry idempotent: a second trigger skips
//! creation and retries delivery. The check is a plain read-then-write, so two
//! concurrent triggers for the same order can still both create an invoice.

use crate::delivery::{DeliveryPolicy, DeliveryReport, deliver_invoice_pdf};
use crate::invoice::build_invoice_payload;
use crate::store::OrderStore;
use crate::{BridgeError, BridgeResult};
use shared::models::Order;
use shared::{EmailMessage, OrderEvent, meta};
use std::sync::Arc;
use vyfak_client::InvoiceApi;

/// Workflow settings
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Shop name used in invoice emails
    pub site_name: String,
    pub delivery: DeliveryPolicy,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            site_name: "Online Store".to_string(),
            delivery: DeliveryPolicy::default(),
        }
    }
}

/// Result of a best-effort delivery
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered(DeliveryReport),
    /// Failure reason, also recorded as an order note
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered(_))
    }
}

/// Invoice state of an order, as stored in its metadata
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct InvoiceStatus {
    pub invoice_id: Option<String>,
    pub invoice_number: Option<String>,
    pub pdf_sent_at: Option<String>,
    pub pdf_sent_email: Option<String>,
    pub pdf_sent_method: Option<String>,
}

impl InvoiceStatus {
    pub fn has_invoice(&self) -> bool {
        self.invoice_id.is_some()
    }

    pub fn is_pdf_sent(&self) -> bool {
        self.pdf_sent_at.is_some()
    }
}

/// Connects order events to the invoicing API
pub struct InvoiceBridge<A: ?Sized, S: ?Sized> {
    api: Arc<A>,
    store: Arc<S>,
    settings: WorkflowSettings,
}

impl<A, S> InvoiceBridge<A, S>
where
    A: InvoiceApi + ?Sized,
    S: OrderStore + ?Sized,
{
    pub fn new(api: Arc<A>, store: Arc<S>, settings: WorkflowSettings) -> Self {
        Self {
            api,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// React to a host order event. Never fails; problems are logged and,
    /// where an order exists, noted on it.
    pub async fn handle_event(&self, event: &OrderEvent) {
        match event {
            OrderEvent::Created { order_id } => {
                tracing::info!(order_id, "New order created");
            }
            OrderEvent::StatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                if event.triggers_invoice() {
                    tracing::info!(
                        order_id,
                        from = %old_status,
                        to = %new_status,
                        "Order paid, invoicing"
                    );
                    // Errors are already logged
                    let _ = self.create_invoice_for_order(*order_id).await;
                } else {
                    tracing::debug!(order_id, to = %new_status, "Status change ignored");
                }
            }
        }
    }

    /// Create the invoice for an order (once) and deliver its PDF
    ///
    /// Returns the invoice id, either freshly created or already stored.
    /// Delivery problems do not fail this call.
    pub async fn create_invoice_for_order(&self, order_id: u64) -> BridgeResult<String> {
        let result = self.try_create_invoice(order_id).await;
        if let Err(e) = &result {
            tracing::error!(order_id, error = %e, "Error creating invoice");
        }
        result
    }

    async fn try_create_invoice(&self, order_id: u64) -> BridgeResult<String> {
        let order = self
            .store
            .load_order(order_id)
            .await?
            .ok_or(BridgeError::OrderNotFound(order_id))?;

        if let Some(existing) = self.stored_invoice_id(order_id).await? {
            tracing::info!(order_id, invoice_id = %existing, "Invoice already created");
            self.send_invoice_pdf(&order, &existing).await;
            return Ok(existing);
        }

        let today = chrono::Local::now().date_naive();
        let payload = build_invoice_payload(&order, today)?;
        if let Ok(json) = serde_json::to_string(&payload) {
            tracing::debug!(order_id, payload = %json, "Invoice creation data");
        }

        let reply = self.api.create_invoice(&payload).await?;
        tracing::debug!(order_id, reply = %reply, "Invoice creation response");

        let invoice_id = reply
            .id()
            .ok_or_else(|| BridgeError::Provider(reply.to_string()))?;
        let invoice_number = reply.number().unwrap_or_default();

        self.store
            .set_meta(order_id, meta::INVOICE_ID, &invoice_id)
            .await?;
        self.store
            .set_meta(order_id, meta::INVOICE_NUMBER, &invoice_number)
            .await?;
        self.store
            .add_note(
                order_id,
                &format!("Vyfakturuj.cz invoice created. ID: {}", invoice_id),
            )
            .await?;

        tracing::info!(order_id, invoice_id = %invoice_id, number = %invoice_number, "Invoice created");

        self.send_invoice_pdf(&order, &invoice_id).await;
        Ok(invoice_id)
    }

    /// Operator action: deliver the stored invoice again
    pub async fn resend_pdf(&self, order_id: u64) -> BridgeResult<DeliveryOutcome> {
        let order = self
            .store
            .load_order(order_id)
            .await?
            .ok_or(BridgeError::OrderNotFound(order_id))?;
        let invoice_id = self
            .stored_invoice_id(order_id)
            .await?
            .ok_or(BridgeError::NoInvoice(order_id))?;

        Ok(self.send_invoice_pdf(&order, &invoice_id).await)
    }

    /// Best-effort PDF delivery: failures end up as a single order note
    pub async fn send_invoice_pdf(&self, order: &Order, invoice_id: &str) -> DeliveryOutcome {
        match self.try_send_invoice_pdf(order, invoice_id).await {
            Ok(report) => DeliveryOutcome::Delivered(report),
            Err(e) => {
                tracing::error!(order_id = order.id, invoice_id, error = %e, "Error sending PDF invoice via API");
                let note = format!("Error sending PDF invoice via API: {}", e);
                if let Err(note_err) = self.store.add_note(order.id, &note).await {
                    tracing::error!(order_id = order.id, error = %note_err, "Failed to record delivery failure");
                }
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_send_invoice_pdf(
        &self,
        order: &Order,
        invoice_id: &str,
    ) -> BridgeResult<DeliveryReport> {
        let recipient = order.billing.email.trim();
        if recipient.is_empty() {
            return Err(BridgeError::MissingEmail);
        }

        let message = EmailMessage::invoice(
            recipient,
            &order.billing.full_name(),
            &order.number,
            &self.settings.site_name,
        );

        let report =
            deliver_invoice_pdf(self.api.as_ref(), &self.settings.delivery, invoice_id, &message)
                .await?;

        let sent_at = chrono::Local::now()
            .format(meta::TIMESTAMP_FORMAT)
            .to_string();
        self.store.set_meta(order.id, meta::PDF_SENT, &sent_at).await?;
        self.store
            .set_meta(order.id, meta::PDF_SENT_EMAIL, recipient)
            .await?;
        self.store
            .set_meta(order.id, meta::PDF_SENT_METHOD, meta::CHANNEL_API)
            .await?;
        self.store
            .add_note(
                order.id,
                &format!("PDF invoice sent via Vyfakturuj API to email: {}", recipient),
            )
            .await?;

        Ok(report)
    }

    /// Stored invoice metadata for an order
    pub async fn invoice_status(&self, order_id: u64) -> BridgeResult<InvoiceStatus> {
        Ok(InvoiceStatus {
            invoice_id: self.stored_invoice_id(order_id).await?,
            invoice_number: self.meta_value(order_id, meta::INVOICE_NUMBER).await?,
            pdf_sent_at: self.meta_value(order_id, meta::PDF_SENT).await?,
            pdf_sent_email: self.meta_value(order_id, meta::PDF_SENT_EMAIL).await?,
            pdf_sent_method: self.meta_value(order_id, meta::PDF_SENT_METHOD).await?,
        })
    }

    async fn stored_invoice_id(&self, order_id: u64) -> BridgeResult<Option<String>> {
        self.meta_value(order_id, meta::INVOICE_ID).await
    }

    /// Metadata value, empty strings count as unset
    async fn meta_value(&self, order_id: u64, key: &str) -> BridgeResult<Option<String>> {
        Ok(self
            .store
            .get_meta(order_id, key)
            .await?
            .filter(|v| !v.is_empty()))
    }
}
