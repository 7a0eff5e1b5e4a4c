use anyhow::{Context, Result};
use async_nats::jetstream;
use async_trait::async_trait;
use bytes::Bytes;

/// Publish a payload to a JetStream subject and await the stream's
/// acknowledgment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JetStreamPublisher: Send + Sync {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()>;
}

#[async_trait]
impl JetStreamPublisher for jetstream::Context {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()> {
        let ack = jetstream::Context::publish(self, subject, payload)
            .await
            .context("Failed to publish message to JetStream")?;

        ack.await
            .context("Failed to receive JetStream acknowledgment")?;

        Ok(())
    }
}
