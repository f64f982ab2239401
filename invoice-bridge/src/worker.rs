//! Invoice Worker - consumes host order events
//!
//! ```text
//! host shop ──publish──► ChannelEventSource (bounded mpsc)
//!                               │
//!                               └── take_receiver ──► InvoiceWorker ──► InvoiceBridge
//! ```
//!
//! Events are handled one at a time, in arrival order. `publish` waits for
//! room when the queue is full, so a slow provider delays the host instead of
//! dropping paid orders.

use crate::store::OrderStore;
use crate::workflow::InvoiceBridge;
use crate::{BridgeError, BridgeResult};
use parking_lot::Mutex;
use shared::OrderEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use vyfak_client::InvoiceApi;

/// Default event buffer
const EVENT_BUFFER: usize = 256;

/// Arc-wrapped OrderEvent
pub type ArcOrderEvent = Arc<OrderEvent>;

/// Source of host order events
pub trait OrderEventSource: Send + Sync {
    /// Hand out the event queue. A source has one consumer; later calls get `None`.
    fn take_receiver(&self) -> Option<mpsc::Receiver<ArcOrderEvent>>;
}

/// Bounded queue the host adapter publishes into
#[derive(Debug)]
pub struct ChannelEventSource {
    tx: mpsc::Sender<ArcOrderEvent>,
    rx: Mutex<Option<mpsc::Receiver<ArcOrderEvent>>>,
}

impl ChannelEventSource {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUFFER)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Queue an event, waiting while the queue is full
    ///
    /// Returns `false` once the consumer is gone.
    pub async fn publish(&self, event: OrderEvent) -> bool {
        let order_id = event.order_id();
        if self.tx.send(Arc::new(event)).await.is_err() {
            tracing::error!(order_id, "Invoice worker gone, order event dropped");
            return false;
        }
        true
    }

    /// Extra producer handle; the queue closes when every sender is dropped
    pub fn sender(&self) -> mpsc::Sender<ArcOrderEvent> {
        self.tx.clone()
    }
}

impl Default for ChannelEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderEventSource for ChannelEventSource {
    fn take_receiver(&self) -> Option<mpsc::Receiver<ArcOrderEvent>> {
        self.rx.lock().take()
    }
}

/// Feeds order events into the invoice workflow
pub struct InvoiceWorker<A: ?Sized, S: ?Sized> {
    bridge: Arc<InvoiceBridge<A, S>>,
}

impl<A, S> InvoiceWorker<A, S>
where
    A: InvoiceApi + ?Sized + 'static,
    S: OrderStore + ?Sized + 'static,
{
    pub fn new(bridge: Arc<InvoiceBridge<A, S>>) -> Self {
        Self { bridge }
    }

    /// Take the queue of `source` and process events on a background task
    pub fn spawn(self, source: &dyn OrderEventSource) -> BridgeResult<tokio::task::JoinHandle<()>> {
        let rx = source.take_receiver().ok_or_else(|| {
            BridgeError::EventSource("event queue already has a consumer".to_string())
        })?;
        Ok(tokio::spawn(self.run(rx)))
    }

    /// Process events until every sender is dropped
    pub async fn run(self, mut event_rx: mpsc::Receiver<ArcOrderEvent>) {
        tracing::info!("InvoiceWorker started");

        while let Some(event) = event_rx.recv().await {
            self.bridge.handle_event(&event).await;
        }

        tracing::info!("Event queue closed, InvoiceWorker stopped");
    }
}
