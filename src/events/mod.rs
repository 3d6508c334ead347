use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the service layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A price-list import run finished (possibly with partial success)
    ImportCompleted {
        actor_id: Uuid,
        department_id: Uuid,
        file_name: String,
        created: u64,
        updated: u64,
        skipped: u64,
        timestamp: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; delivery is best-effort and failures are only warned.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to publish event: {}", e);
        }
    }
}

/// Background consumer draining the event channel.
/// Currently only logs; downstream subscribers hook in here.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ImportCompleted {
                actor_id,
                department_id,
                file_name,
                created,
                updated,
                skipped,
                ..
            } => {
                info!(
                    %actor_id,
                    %department_id,
                    file_name,
                    created,
                    updated,
                    skipped,
                    "import completed"
                );
            }
        }
    }
    info!("Event channel closed; processor exiting");
}
