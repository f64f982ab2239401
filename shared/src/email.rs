//! Email payload shapes for `invoice/{id}/do/send-mail/`
//!
//! The provider has accepted different body layouts over time, so delivery
//! tries an ordered list of shapes rather than a single fixed one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Content of an invoice email, independent of the wire shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Standard invoice email for an order
    pub fn invoice(
        recipient: impl Into<String>,
        customer_name: &str,
        order_number: &str,
        site_name: &str,
    ) -> Self {
        let customer_name = match customer_name.trim() {
            "" => "Dear Customer",
            name => name,
        };
        Self {
            recipient: recipient.into(),
            subject: format!("Invoice for order #{} - {}", order_number, site_name),
            body: format!(
                "Hello {customer_name}!\n\n\
                 Thank you for your purchase at {site_name}.\n\
                 Please find attached the invoice for order #{order_number}.\n\n\
                 Best regards,\n{site_name} Team"
            ),
        }
    }
}

/// Wire layout of the send-mail body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailShape {
    /// `{to, subject, message}`
    Primary,
    /// `{email, subject, message}`
    Secondary,
    /// `{email}`
    Minimal,
}

impl EmailShape {
    /// Default attempt order
    pub const DEFAULT_ORDER: [EmailShape; 3] =
        [EmailShape::Primary, EmailShape::Secondary, EmailShape::Minimal];

    pub fn label(&self) -> &'static str {
        match self {
            EmailShape::Primary => "main (to)",
            EmailShape::Secondary => "alternative (email)",
            EmailShape::Minimal => "simple (email only)",
        }
    }

    /// Render the JSON body for this shape
    pub fn render(&self, message: &EmailMessage) -> Value {
        let mut body = Map::new();
        match self {
            EmailShape::Primary => {
                body.insert("to".into(), Value::from(message.recipient.as_str()));
                body.insert("subject".into(), Value::from(message.subject.as_str()));
                body.insert("message".into(), Value::from(message.body.as_str()));
            }
            EmailShape::Secondary => {
                body.insert("email".into(), Value::from(message.recipient.as_str()));
                body.insert("subject".into(), Value::from(message.subject.as_str()));
                body.insert("message".into(), Value::from(message.body.as_str()));
            }
            EmailShape::Minimal => {
                body.insert("email".into(), Value::from(message.recipient.as_str()));
            }
        }
        Value::Object(body)
    }
}

impl FromStr for EmailShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "to" => Ok(EmailShape::Primary),
            "secondary" | "email" => Ok(EmailShape::Secondary),
            "minimal" | "simple" => Ok(EmailShape::Minimal),
            other => Err(format!("unknown email shape '{}'", other)),
        }
    }
}

impl std::fmt::Display for EmailShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
