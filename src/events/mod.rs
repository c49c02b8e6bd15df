//! Order event publishing.
//!
//! # Data Flow
//! ```text
//! POST /orders
//!     → serialize OrderEvent (JSON)
//!     → EventPublisher::create_batch (size-bounded)
//!     → EventBatch::try_add (false when the payload does not fit)
//!     → EventPublisher::send (nats.rs publishes to the configured subject)
//! ```

pub mod nats;

use async_trait::async_trait;
use thiserror::Error;

pub use nats::NatsPublisher;

/// Errors raised by the event bus client.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The client could not be constructed or the bus is unreachable.
    #[error("event bus unavailable: {0}")]
    Unavailable(String),

    /// The batch was rejected while sending.
    #[error("failed to publish events: {0}")]
    Send(String),
}

/// A size-bounded group of serialized events sent together.
#[derive(Debug, Clone)]
pub struct EventBatch {
    max_bytes: usize,
    size_bytes: usize,
    events: Vec<Vec<u8>>,
}

impl EventBatch {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            size_bytes: 0,
            events: Vec::new(),
        }
    }

    /// Add `payload` if it fits in the remaining space.
    pub fn try_add(&mut self, payload: Vec<u8>) -> bool {
        match self.size_bytes.checked_add(payload.len()) {
            Some(total) if total <= self.max_bytes => {
                self.size_bytes = total;
                self.events.push(payload);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn into_events(self) -> Vec<Vec<u8>> {
        self.events
    }
}

/// Outbound event bus client.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Start an empty batch sized for this bus.
    async fn create_batch(&self) -> Result<EventBatch, PublishError>;

    /// Send every event in `batch`, in order.
    async fn send(&self, batch: EventBatch) -> Result<(), PublishError>;
}
