//! Invoice payload construction
//!
//! Turns a shop order into the provider's invoice body: merchandise lines and
//! paid shipping become invoice items with tax-exclusive unit prices, fees are
//! left out, and the order context goes into the free-text note.

use super::money::{require_finite, unit_price_without_vat};
use super::payment::map_payment_method;
use crate::BridgeResult;
use chrono::{Days, NaiveDate};
use shared::models::{
    DEFAULT_COUNTRY, INVOICE_TYPE_REGULAR, InvoiceCustomer, InvoiceItem, InvoicePayload,
    LineItem, Order, ProductAttributes, ROUND_MATHEMATICAL, UNIT_PIECES, VAT_RATE_PERCENT,
};

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Days between issue date and due date
pub const DUE_IN_DAYS: u64 = 14;

/// Last line of every invoice note
pub const VAT_DISCLAIMER: &str = "NOTE: Prices already include VAT 21%";

/// Build the invoice payload for an order issued on `today`
pub fn build_invoice_payload(order: &Order, today: NaiveDate) -> BridgeResult<InvoicePayload> {
    let mut items = Vec::with_capacity(order.items.len() + order.shipping_lines.len());

    for item in &order.items {
        require_finite(item.total, "item total")?;
        require_finite(item.total_tax, "item tax")?;

        let total_with_tax = item.total_with_tax();
        let unit_price = unit_price_without_vat(total_with_tax, item.quantity);
        let text = describe_line_item(item, &order.number);

        tracing::debug!(
            order_id = order.id,
            text = %text,
            quantity = item.quantity,
            unit_price,
            total_with_tax,
            "Invoice item"
        );

        items.push(InvoiceItem {
            text,
            quantity: item.quantity,
            unit_price,
            vat_rate: VAT_RATE_PERCENT,
            unit: UNIT_PIECES.to_string(),
        });
    }

    for shipping in &order.shipping_lines {
        require_finite(shipping.total, "shipping total")?;
        require_finite(shipping.total_tax, "shipping tax")?;

        let total_with_tax = shipping.total_with_tax();
        if total_with_tax <= 0.0 {
            continue;
        }

        items.push(InvoiceItem {
            text: format!("Shipping: {}", shipping.method_title),
            quantity: 1,
            unit_price: unit_price_without_vat(total_with_tax, 1),
            vat_rate: VAT_RATE_PERCENT,
            unit: UNIT_PIECES.to_string(),
        });
    }

    // Fee lines are never invoiced

    let due_date = today
        .checked_add_days(Days::new(DUE_IN_DAYS))
        .unwrap_or(today);

    tracing::debug!(order_id = order.id, items = items.len(), "Invoice payload built");

    Ok(InvoicePayload {
        kind: INVOICE_TYPE_REGULAR,
        date: today,
        due_date,
        vs: order.number.clone(),
        calculate_vat: 1,
        round_invoice: ROUND_MATHEMATICAL,
        payment_method: map_payment_method(&order.payment_method),
        customer: build_customer(order),
        items,
        note: compose_note(order),
        currency: order.currency.clone(),
    })
}

/// Customer block from the billing address
///
/// Name falls back to the email, then to `Customer #{id}`.
pub fn build_customer(order: &Order) -> InvoiceCustomer {
    let billing = &order.billing;

    let mut name = billing.full_name();
    if name.is_empty() {
        name = if billing.email.trim().is_empty() {
            format!("Customer #{}", order.id)
        } else {
            billing.email.clone()
        };
    }

    let country = if billing.country.trim().is_empty() {
        DEFAULT_COUNTRY.to_string()
    } else {
        billing.country.clone()
    };

    InvoiceCustomer {
        name,
        email: billing.email.clone(),
        phone: billing.phone.clone(),
        address: billing.address_1.clone(),
        address2: billing.address_2.clone(),
        city: billing.city.clone(),
        state: billing.state.clone(),
        zip: billing.postcode.clone(),
        country,
        company: billing.company.clone(),
    }
}

/// Item description: name, SKU and tyre attributes, sanitized
pub fn describe_line_item(item: &LineItem, order_number: &str) -> String {
    let mut description = item.name.trim().to_string();

    if let Some(sku) = item.sku.as_deref().filter(|s| !s.is_empty()) {
        description.push_str(&format!(" (SKU: {})", sku));
    }

    if let Some(attributes) = &item.attributes {
        let summary = attribute_summary(attributes);
        if !summary.is_empty() {
            description.push_str(" - ");
            description.push_str(&summary);
        }
    }

    sanitize_description(&description, order_number)
}

/// Space-joined brand, model, `W/H RD`, season and `{load}{speed}`
pub fn attribute_summary(attributes: &ProductAttributes) -> String {
    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    let mut parts: Vec<String> = Vec::new();

    if let Some(brand) = present(&attributes.brand) {
        parts.push(brand.to_string());
    }
    if let Some(model) = present(&attributes.model) {
        parts.push(model.to_string());
    }
    if let (Some(width), Some(height), Some(diameter)) = (
        present(&attributes.width),
        present(&attributes.height),
        present(&attributes.diameter),
    ) {
        parts.push(format!("{}/{} R{}", width, height, diameter));
    }
    if let Some(season) = present(&attributes.season) {
        parts.push(season.to_string());
    }
    if let (Some(load), Some(speed)) = (
        present(&attributes.load_index),
        present(&attributes.speed_index),
    ) {
        parts.push(format!("{}{}", load, speed));
    }

    parts.join(" ")
}

/// Truncate to [`MAX_DESCRIPTION_LEN`] characters, then replace characters the
/// provider rejects: `/` and `\` become `_`, quotes are dropped, line breaks
/// and tabs become spaces.
pub fn sanitize_description(raw: &str, order_number: &str) -> String {
    let cleaned: String = raw
        .chars()
        .take(MAX_DESCRIPTION_LEN)
        .filter_map(|c| match c {
            '/' | '\\' => Some('_'),
            '"' | '\'' => None,
            '\n' | '\r' | '\t' => Some(' '),
            other => Some(other),
        })
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        format!("Item from order #{}", order_number)
    } else {
        cleaned.to_string()
    }
}

/// Free-text invoice note
pub fn compose_note(order: &Order) -> String {
    let mut lines = vec![
        format!("Order from online store #{}", order.number),
        format!(
            "Order date: {}",
            order.created_at.format("%d.%m.%Y %H:%M:%S")
        ),
        format!("Payment method: {}", order.payment_method_title),
    ];

    if !order.shipping_lines.is_empty() {
        let names: Vec<&str> = order
            .shipping_lines
            .iter()
            .map(|s| s.method_title.as_str())
            .collect();
        lines.push(format!("Shipping: {}", names.join(", ")));
    }

    if let Some(note) = order.customer_note.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("Note: {}", note));
    }

    lines.push(VAT_DISCLAIMER.to_string());
    lines.join("\n")
}
