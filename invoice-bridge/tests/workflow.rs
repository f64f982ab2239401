// invoice-bridge/tests/workflow.rs
// Order → invoice → PDF delivery

mod common;

use common::{Call, bridge_with, failure_notes, sample_order};
use invoice_bridge::{BridgeError, DeliveryOutcome, OrderStore};
use serde_json::json;
use shared::meta;
use shared::models::OrderStatus;
use shared::{EmailShape, OrderEvent};
use vyfak_client::ClientError;

#[tokio::test]
async fn test_paid_order_gets_invoice_and_pdf() {
    let (bridge, api, store) = bridge_with(vec![sample_order(1042)]);

    let invoice_id = bridge.create_invoice_for_order(1042).await.unwrap();
    assert_eq!(invoice_id, "5001");

    assert_eq!(store.meta(1042, meta::INVOICE_ID).as_deref(), Some("5001"));
    assert_eq!(store.meta(1042, meta::INVOICE_NUMBER).as_deref(), Some("2024-0001"));
    assert_eq!(
        store.meta(1042, meta::PDF_SENT_EMAIL).as_deref(),
        Some("jana@example.cz")
    );
    assert_eq!(store.meta(1042, meta::PDF_SENT_METHOD).as_deref(), Some("api"));
    let sent_at = store.meta(1042, meta::PDF_SENT).unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(&sent_at, meta::TIMESTAMP_FORMAT).is_ok());

    assert_eq!(
        store.notes(1042),
        vec![
            "Vyfakturuj.cz invoice created. ID: 5001".to_string(),
            "PDF invoice sent via Vyfakturuj API to email: jana@example.cz".to_string(),
        ]
    );

    // probe + one send with the primary shape
    assert_eq!(api.probe_count(), 1);
    let sent = api.sent_bodies();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["to"], "jana@example.cz");
    assert_eq!(sent[0]["subject"], "Invoice for order #1042 - Pneu Shop");
}

#[tokio::test]
async fn test_submitted_payload() {
    let (bridge, api, _store) = bridge_with(vec![sample_order(1042)]);
    bridge.create_invoice_for_order(1042).await.unwrap();

    let payload = api
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::Create(p) => Some(p),
            _ => None,
        })
        .unwrap();
    assert_eq!(payload.vs, "1042");
    assert_eq!(payload.items.len(), 1);
    assert_eq!(payload.items[0].unit_price, 100.0);
    assert_eq!(payload.items[0].vat_rate, 21);
    assert_eq!(payload.customer.name, "Jana Novakova");
    assert_eq!(payload.payment_method, 1);
    assert_eq!((payload.due_date - payload.date).num_days(), 14);
}

#[tokio::test]
async fn test_second_trigger_reuses_stored_invoice() {
    let (bridge, api, store) = bridge_with(vec![sample_order(7)]);

    let first = bridge.create_invoice_for_order(7).await.unwrap();
    let second = bridge.create_invoice_for_order(7).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(api.create_count(), 1);
    assert_eq!(store.meta(7, meta::INVOICE_ID).as_deref(), Some("5001"));
    // delivery runs again on re-entry
    assert_eq!(api.sent_bodies().len(), 2);
}

#[tokio::test]
async fn test_probe_transport_failure_switches_to_email_shape() {
    let (bridge, api, store) = bridge_with(vec![sample_order(3)]);
    api.script_probe(Err("connection reset".into()));

    bridge.create_invoice_for_order(3).await.unwrap();

    let sent = api.sent_bodies();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["email"], "jana@example.cz");
    assert!(sent[0].get("to").is_none());
    assert!(sent[0].get("subject").is_some());
    assert!(store.meta(3, meta::PDF_SENT).is_some());
}

#[tokio::test]
async fn test_probe_rejection_switches_to_email_shape() {
    let (bridge, api, _store) = bridge_with(vec![sample_order(4)]);
    api.script_probe(Ok((422, json!({"error": "Unknown field: to"}))));

    bridge.create_invoice_for_order(4).await.unwrap();

    let sent = api.sent_bodies();
    assert!(sent[0].get("to").is_none());
    assert_eq!(sent[0]["email"], "jana@example.cz");
}

#[tokio::test]
async fn test_all_attempts_failing_is_best_effort() {
    let (bridge, api, store) = bridge_with(vec![sample_order(9)]);
    for _ in 0..3 {
        api.script_send(Ok((422, json!({"error": "Invalid recipient"}))));
    }

    let result = bridge.create_invoice_for_order(9).await;
    assert_eq!(result.unwrap(), "5001");

    let sent = api.sent_bodies();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], EmailShape::Primary.render(&message_for(9)));
    assert_eq!(sent[1], EmailShape::Secondary.render(&message_for(9)));
    assert_eq!(sent[2], json!({"email": "jana@example.cz"}));

    let failures = failure_notes(&store, 9);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("after 3 attempts"));
    assert!(store.meta(9, meta::PDF_SENT).is_none());
    assert!(store.meta(9, meta::PDF_SENT_EMAIL).is_none());
    assert!(store.meta(9, meta::PDF_SENT_METHOD).is_none());
}

#[tokio::test]
async fn test_transport_error_on_last_attempt_is_recorded() {
    let (bridge, api, store) = bridge_with(vec![sample_order(10)]);
    api.script_send(Ok((500, json!({}))))
        .script_send(Ok((500, json!({}))))
        .script_send(Err("operation timed out".into()));

    bridge.create_invoice_for_order(10).await.unwrap();

    let failures = failure_notes(&store, 10);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("operation timed out"));
    assert!(store.meta(10, meta::PDF_SENT).is_none());
}

#[tokio::test]
async fn test_transport_error_before_last_attempt_is_retried() {
    let (bridge, api, store) = bridge_with(vec![sample_order(11)]);
    api.script_send(Err("connection reset".into()));

    let outcome = {
        bridge.create_invoice_for_order(11).await.unwrap();
        bridge.invoice_status(11).await.unwrap()
    };

    assert!(outcome.is_pdf_sent());
    assert_eq!(api.sent_bodies().len(), 2);
    assert!(failure_notes(&store, 11).is_empty());
}

#[tokio::test]
async fn test_status_ok_counts_as_delivered() {
    let (bridge, api, store) = bridge_with(vec![sample_order(12)]);
    api.script_send(Ok((202, json!({"status": "ok"}))));

    bridge.create_invoice_for_order(12).await.unwrap();

    assert_eq!(api.sent_bodies().len(), 1);
    assert!(store.meta(12, meta::PDF_SENT).is_some());
}

#[tokio::test]
async fn test_reply_without_id_aborts_without_mutation() {
    let (bridge, api, store) = bridge_with(vec![sample_order(20)]);
    api.script_create(Ok((400, json!({"error": "vs is required"}))));

    let result = bridge.create_invoice_for_order(20).await;
    assert!(matches!(result, Err(BridgeError::Provider(_))));

    assert!(store.all_meta(20).is_empty());
    assert!(store.notes(20).is_empty());
    assert!(api.sent_bodies().is_empty());
}

#[tokio::test]
async fn test_create_transport_error_aborts() {
    let (bridge, api, store) = bridge_with(vec![sample_order(21)]);
    api.script_create(Err("dns error".into()));

    let result = bridge.create_invoice_for_order(21).await;
    assert!(matches!(
        result,
        Err(BridgeError::Client(ClientError::Transport(_)))
    ));
    assert!(store.all_meta(21).is_empty());
    assert!(store.notes(21).is_empty());

    // the next trigger creates it
    assert_eq!(bridge.create_invoice_for_order(21).await.unwrap(), "5001");
    assert_eq!(api.create_count(), 2);
}

#[tokio::test]
async fn test_unknown_order() {
    let (bridge, api, _store) = bridge_with(vec![]);
    assert!(matches!(
        bridge.create_invoice_for_order(404).await,
        Err(BridgeError::OrderNotFound(404))
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_missing_email_fails_delivery_without_calls() {
    let mut order = sample_order(30);
    order.billing.email.clear();
    let (bridge, api, store) = bridge_with(vec![order]);

    bridge.create_invoice_for_order(30).await.unwrap();

    assert_eq!(api.probe_count(), 0);
    assert!(api.sent_bodies().is_empty());
    let failures = failure_notes(&store, 30);
    assert_eq!(
        failures,
        vec!["Error sending PDF invoice via API: Customer email not found in order".to_string()]
    );
}

#[tokio::test]
async fn test_events_trigger_on_paid_statuses_only() {
    let (bridge, api, _store) = bridge_with(vec![sample_order(40)]);

    bridge.handle_event(&OrderEvent::Created { order_id: 40 }).await;
    bridge
        .handle_event(&OrderEvent::StatusChanged {
            order_id: 40,
            old_status: OrderStatus::Pending,
            new_status: OrderStatus::OnHold,
        })
        .await;
    assert!(api.calls().is_empty());

    bridge
        .handle_event(&OrderEvent::StatusChanged {
            order_id: 40,
            old_status: OrderStatus::OnHold,
            new_status: OrderStatus::Completed,
        })
        .await;
    assert_eq!(api.create_count(), 1);
}

#[tokio::test]
async fn test_event_for_missing_order_does_not_panic() {
    let (bridge, api, _store) = bridge_with(vec![]);
    bridge
        .handle_event(&OrderEvent::StatusChanged {
            order_id: 1,
            old_status: OrderStatus::Pending,
            new_status: OrderStatus::Processing,
        })
        .await;
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_resend_pdf() {
    let (bridge, api, store) = bridge_with(vec![sample_order(50)]);

    assert!(matches!(
        bridge.resend_pdf(50).await,
        Err(BridgeError::NoInvoice(50))
    ));

    store.set_meta(50, meta::INVOICE_ID, "8800").await.unwrap();
    let outcome = bridge.resend_pdf(50).await.unwrap();
    assert!(outcome.is_delivered());
    assert_eq!(api.create_count(), 0);
    assert!(api.calls().iter().any(|c| matches!(c, Call::Send { id, .. } if id == "8800")));
}

#[tokio::test]
async fn test_resend_failure_is_reported() {
    let (bridge, api, store) = bridge_with(vec![sample_order(51)]);
    store.set_meta(51, meta::INVOICE_ID, "8801").await.unwrap();
    for _ in 0..3 {
        api.script_send(Ok((503, json!({"message": "maintenance"}))));
    }

    let outcome = bridge.resend_pdf(51).await.unwrap();
    assert!(matches!(outcome, DeliveryOutcome::Failed(_)));
    assert_eq!(failure_notes(&store, 51).len(), 1);
}

#[tokio::test]
async fn test_invoice_status() {
    let (bridge, _api, _store) = bridge_with(vec![sample_order(60)]);

    let before = bridge.invoice_status(60).await.unwrap();
    assert!(!before.has_invoice());

    bridge.create_invoice_for_order(60).await.unwrap();
    let after = bridge.invoice_status(60).await.unwrap();
    assert_eq!(after.invoice_id.as_deref(), Some("5001"));
    assert_eq!(after.invoice_number.as_deref(), Some("2024-0001"));
    assert_eq!(after.pdf_sent_method.as_deref(), Some("api"));
    assert!(after.is_pdf_sent());
}

fn message_for(order_id: u64) -> shared::EmailMessage {
    shared::EmailMessage::invoice(
        "jana@example.cz",
        "Jana Novakova",
        &order_id.to_string(),
        "Pneu Shop",
    )
}
