// invoice-bridge/tests/common/mod.rs
// Scripted provider and sample orders shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use invoice_bridge::{DeliveryPolicy, InvoiceBridge, MemoryOrderStore, WorkflowSettings};
use parking_lot::Mutex;
use serde_json::{Value, json};
use shared::models::{BillingAddress, InvoicePayload, LineItem, Order, OrderStatus, ShippingLine};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use vyfak_client::{ApiReply, ApiResponse, ClientError, ClientResult, InvoiceApi, RequestInfo};

/// `Ok((http_code, body))` or `Err(transport message)`
pub type Scripted = Result<(u16, Value), String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Test,
    Create(InvoicePayload),
    Get(String),
    Probe { id: String, body: Value },
    Send { id: String, body: Value },
}

/// Provider double answering from per-endpoint queues
///
/// Empty queues answer with success.
#[derive(Default)]
pub struct FakeApi {
    create_replies: Mutex<VecDeque<Scripted>>,
    probe_replies: Mutex<VecDeque<Scripted>>,
    send_replies: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Call>>,
    last: Mutex<Option<RequestInfo>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_create(&self, reply: Scripted) -> &Self {
        self.create_replies.lock().push_back(reply);
        self
    }

    pub fn script_probe(&self, reply: Scripted) -> &Self {
        self.probe_replies.lock().push_back(reply);
        self
    }

    pub fn script_send(&self, reply: Scripted) -> &Self {
        self.send_replies.lock().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Create(_)))
            .count()
    }

    pub fn probe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Probe { .. }))
            .count()
    }

    /// Bodies of real send-mail calls, in order
    pub fn sent_bodies(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    fn answer(
        &self,
        queue: &Mutex<VecDeque<Scripted>>,
        default: (u16, Value),
        sent: Option<Value>,
    ) -> ClientResult<ApiResponse> {
        let scripted = queue.lock().pop_front().unwrap_or(Ok(default));
        match scripted {
            Ok((http_code, body)) => {
                let info = RequestInfo {
                    http_code,
                    data_sent: sent,
                };
                *self.last.lock() = Some(info.clone());
                Ok(ApiResponse {
                    info,
                    reply: match body {
                        Value::String(raw) => ApiReply::Raw(raw),
                        other => ApiReply::Json(other),
                    },
                })
            }
            Err(message) => Err(ClientError::Transport(message)),
        }
    }
}

#[async_trait]
impl InvoiceApi for FakeApi {
    async fn test(&self) -> ClientResult<ApiReply> {
        self.calls.lock().push(Call::Test);
        Ok(ApiReply::Json(json!({"status": "ok"})))
    }

    async fn create_invoice(&self, payload: &InvoicePayload) -> ClientResult<ApiReply> {
        self.calls.lock().push(Call::Create(payload.clone()));
        self.answer(
            &self.create_replies,
            (201, json!({"id": 5001, "number": "2024-0001"})),
            serde_json::to_value(payload).ok(),
        )
        .map(|response| response.reply)
    }

    async fn get_invoice(&self, id: &str) -> ClientResult<ApiReply> {
        self.calls.lock().push(Call::Get(id.to_string()));
        Ok(ApiReply::Json(json!({"id": id})))
    }

    async fn send_invoice_mail(&self, id: &str, data: &Value) -> ClientResult<ApiResponse> {
        self.calls.lock().push(Call::Send {
            id: id.to_string(),
            body: data.clone(),
        });
        self.answer(
            &self.send_replies,
            (200, json!({"success": true})),
            Some(data.clone()),
        )
    }

    async fn send_invoice_mail_test(&self, id: &str, data: &Value) -> ClientResult<ApiResponse> {
        self.calls.lock().push(Call::Probe {
            id: id.to_string(),
            body: data.clone(),
        });
        self.answer(
            &self.probe_replies,
            (200, json!({"success": true, "test": true})),
            Some(data.clone()),
        )
    }

    fn last_info(&self) -> Option<RequestInfo> {
        self.last.lock().clone()
    }
}

pub fn sample_order(id: u64) -> Order {
    Order {
        id,
        number: id.to_string(),
        status: OrderStatus::Processing,
        billing: BillingAddress {
            first_name: "Jana".into(),
            last_name: "Novakova".into(),
            email: "jana@example.cz".into(),
            phone: "+420 777 123 456".into(),
            address_1: "Masarykova 12".into(),
            city: "Brno".into(),
            postcode: "60200".into(),
            country: "CZ".into(),
            ..Default::default()
        },
        items: vec![LineItem {
            name: "Winter tyre".into(),
            quantity: 1,
            total: 100.0,
            total_tax: 21.0,
            sku: None,
            attributes: None,
        }],
        shipping_lines: vec![ShippingLine {
            method_title: "Free shipping".into(),
            total: 0.0,
            total_tax: 0.0,
        }],
        fee_lines: vec![],
        payment_method: "bacs".into(),
        payment_method_title: "Direct bank transfer".into(),
        currency: "CZK".into(),
        customer_note: None,
        created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}

pub fn settings() -> WorkflowSettings {
    WorkflowSettings {
        site_name: "Pneu Shop".into(),
        delivery: DeliveryPolicy::default().with_pause(Duration::ZERO),
    }
}

pub type TestBridge = InvoiceBridge<FakeApi, MemoryOrderStore>;

/// Bridge over a fresh store holding `orders`
pub fn bridge_with(
    orders: Vec<Order>,
) -> (TestBridge, Arc<FakeApi>, Arc<MemoryOrderStore>) {
    let api = Arc::new(FakeApi::new());
    let store = Arc::new(MemoryOrderStore::new());
    for order in orders {
        store.insert_order(order);
    }
    let bridge = InvoiceBridge::new(api.clone(), store.clone(), settings());
    (bridge, api, store)
}

/// Notes that record a delivery failure
pub fn failure_notes(store: &MemoryOrderStore, order_id: u64) -> Vec<String> {
    store
        .notes(order_id)
        .into_iter()
        .filter(|n| n.starts_with("Error sending PDF invoice via API"))
        .collect()
}
