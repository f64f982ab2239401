//! Invoice PDF delivery
//!
//! Asks the provider to email the invoice PDF, trying an ordered list of
//! send-mail body shapes:
//!
//! ```text
//! attempt 1: probe (test=true) ──ok──► send with shape[0]
//!                    └──failed──► send with probe_fallback
//! attempt 2: pause, send with shape[1]
//! attempt n: pause, send with shape[n-1]   (transport errors escalate here)
//! ```

use crate::{BridgeError, BridgeResult};
use shared::{EmailMessage, EmailShape};
use std::time::Duration;
use vyfak_client::{ApiReply, InvoiceApi};

/// Pause between send attempts
pub const DEFAULT_ATTEMPT_PAUSE: Duration = Duration::from_secs(3);

/// How delivery attempts are made
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPolicy {
    /// One attempt per shape, in order
    pub shapes: Vec<EmailShape>,
    /// Issue a test send before the first attempt
    pub probe_first: bool,
    /// Shape for the first attempt when the probe fails
    pub probe_fallback: EmailShape,
    /// Pause before every attempt but the first
    pub pause: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            shapes: EmailShape::DEFAULT_ORDER.to_vec(),
            probe_first: true,
            probe_fallback: EmailShape::Secondary,
            pause: DEFAULT_ATTEMPT_PAUSE,
        }
    }
}

impl DeliveryPolicy {
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_shapes(mut self, shapes: Vec<EmailShape>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_probe(mut self, probe_first: bool) -> Self {
        self.probe_first = probe_first;
        self
    }
}

/// Successful delivery
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub invoice_id: String,
    pub recipient: String,
    /// 1-based attempt that succeeded
    pub attempt: usize,
    pub shape: EmailShape,
}

/// Provider accepted the send: HTTP 200/201, `success == true` or `status == "ok"`
pub fn is_delivery_success(http_code: u16, reply: &ApiReply) -> bool {
    matches!(http_code, 200 | 201) || reply.is_success_flag() || reply.is_status_ok()
}

/// `HTTP: 422, Error: ..., Message: ...`
pub fn failure_reason(http_code: u16, reply: &ApiReply) -> String {
    let mut reason = format!("HTTP: {}", http_code);
    if let Some(error) = reply.get("error") {
        reason.push_str(&format!(", Error: {}", display_value(error)));
    }
    if let Some(message) = reply.get("message") {
        reason.push_str(&format!(", Message: {}", display_value(message)));
    }
    reason
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Email the invoice PDF through the provider
///
/// Returns the successful attempt, or the error of the last attempt.
pub async fn deliver_invoice_pdf<A>(
    api: &A,
    policy: &DeliveryPolicy,
    invoice_id: &str,
    message: &EmailMessage,
) -> BridgeResult<DeliveryReport>
where
    A: InvoiceApi + ?Sized,
{
    let max_attempts = policy.shapes.len();
    if max_attempts == 0 {
        return Err(BridgeError::Validation(
            "delivery policy has no email shapes".to_string(),
        ));
    }

    for (index, planned) in policy.shapes.iter().enumerate() {
        let attempt = index + 1;
        let mut shape = *planned;

        if attempt > 1 && !policy.pause.is_zero() {
            tokio::time::sleep(policy.pause).await;
        }

        if attempt == 1 && policy.probe_first {
            shape = probe_shape(api, invoice_id, shape, policy.probe_fallback, message).await;
        }

        tracing::info!(
            invoice_id,
            attempt,
            shape = %shape,
            "Sending invoice email"
        );

        let body = shape.render(message);
        match api.send_invoice_mail(invoice_id, &body).await {
            Ok(response) => {
                let http_code = response.http_code();
                let reply = &response.reply;
                if is_delivery_success(http_code, reply) {
                    tracing::info!(
                        invoice_id,
                        attempt,
                        recipient = %message.recipient,
                        "Invoice email sent"
                    );
                    return Ok(DeliveryReport {
                        invoice_id: invoice_id.to_string(),
                        recipient: message.recipient.clone(),
                        attempt,
                        shape,
                    });
                }

                tracing::warn!(
                    invoice_id,
                    attempt,
                    reason = %failure_reason(http_code, reply),
                    "Provider rejected invoice email"
                );
            }
            Err(e) => {
                tracing::warn!(invoice_id, attempt, error = %e, "Invoice email attempt failed");
                if attempt == max_attempts {
                    return Err(e.into());
                }
            }
        }
    }

    Err(BridgeError::DeliveryExhausted(max_attempts))
}

/// Test-send `shape`; on failure use `fallback` for the real send
async fn probe_shape<A>(
    api: &A,
    invoice_id: &str,
    shape: EmailShape,
    fallback: EmailShape,
    message: &EmailMessage,
) -> EmailShape
where
    A: InvoiceApi + ?Sized,
{
    match api.send_invoice_mail_test(invoice_id, &shape.render(message)).await {
        Ok(response) => {
            if response.info.is_success() {
                tracing::debug!(invoice_id, shape = %shape, "Email shape probe passed");
                shape
            } else {
                tracing::warn!(invoice_id, shape = %shape, fallback = %fallback, "Email shape probe rejected");
                fallback
            }
        }
        Err(e) => {
            tracing::warn!(invoice_id, error = %e, fallback = %fallback, "Email shape probe failed");
            fallback
        }
    }
}
