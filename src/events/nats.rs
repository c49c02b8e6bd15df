//! NATS-backed event publisher.

use async_nats::ConnectOptions;
use async_trait::async_trait;

use crate::config::EventsConfig;
use crate::events::{EventBatch, EventPublisher, PublishError};

/// Publishes order events to a NATS subject.
pub struct NatsPublisher {
    client: async_nats::Client,
    subject: String,
    max_batch_bytes: usize,
}

impl NatsPublisher {
    /// Build the client without waiting for the server.
    ///
    /// The connection is established (and re-established) in the background.
    pub async fn connect(config: &EventsConfig) -> Result<Self, PublishError> {
        let client = ConnectOptions::new()
            .name("storefront")
            .retry_on_initial_connect()
            .connect(config.url.as_str())
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        tracing::info!(url = %config.url, subject = %config.subject, "Event bus client created");

        Ok(Self {
            client,
            subject: config.subject.clone(),
            max_batch_bytes: config.max_batch_bytes,
        })
    }

    /// Configured batch size, narrowed to the server's payload limit once known.
    fn batch_limit(&self) -> usize {
        match self.client.server_info().max_payload {
            0 => self.max_batch_bytes,
            server_max => self.max_batch_bytes.min(server_max),
        }
    }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    async fn create_batch(&self) -> Result<EventBatch, PublishError> {
        Ok(EventBatch::new(self.batch_limit()))
    }

    async fn send(&self, batch: EventBatch) -> Result<(), PublishError> {
        let count = batch.len();
        for payload in batch.into_events() {
            self.client
                .publish(self.subject.clone(), payload.into())
                .await
                .map_err(|e| PublishError::Send(e.to_string()))?;
        }
        self.client
            .flush()
            .await
            .map_err(|e| PublishError::Send(e.to_string()))?;

        tracing::debug!(subject = %self.subject, events = count, "Batch published");
        Ok(())
    }
}
