use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Ledger events emitted after a transaction commits.
///
/// Emission is observability only: the atomic unit is the database
/// transaction, and a dropped event never rolls back a committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    StockMoved {
        transaction_id: i64,
        item_id: i64,
        from_bin_location_id: i64,
        to_bin_location_id: i64,
        quantity: i32,
    },
    StockAdjusted {
        transaction_id: i64,
        position_id: i64,
        item_id: i64,
        delta: i32,
        new_quantity: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Background consumer draining the event channel into structured logs.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::StockMoved {
                transaction_id,
                item_id,
                from_bin_location_id,
                to_bin_location_id,
                quantity,
            } => {
                info!(
                    transaction_id,
                    item_id,
                    from_bin_location_id,
                    to_bin_location_id,
                    quantity,
                    "stock moved"
                );
            }
            Event::StockAdjusted {
                transaction_id,
                position_id,
                item_id,
                delta,
                new_quantity,
            } => {
                info!(
                    transaction_id,
                    position_id, item_id, delta, new_quantity, "stock adjusted"
                );
            }
        }
    }

    info!("Event processing loop stopped");
}
