use anyhow::{Context, Result};
use async_nats::jetstream::{self, consumer::PullConsumer, AckKind};
use futures::StreamExt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Callback invoked for each delivered payload.
pub type PayloadHandler = Box<dyn Fn(&[u8]) -> Result<()> + Send + Sync>;

/// Long-lived pull consumer that drains a stream and hands payloads to a
/// handler callback.
///
/// An empty poll is not an error. A failed poll or a rejected payload is
/// logged and the loop continues; only the cancellation token stops it.
pub struct StreamConsumer {
    consumer: PullConsumer,
    batch_size: usize,
    max_wait: Duration,
    handler: PayloadHandler,
}

impl StreamConsumer {
    pub async fn new(
        jetstream: &jetstream::Context,
        stream_name: &str,
        consumer_name: &str,
        batch_size: usize,
        max_wait_secs: u64,
        handler: PayloadHandler,
    ) -> Result<Self> {
        debug!(
            stream = stream_name,
            consumer = consumer_name,
            "Creating JetStream pull consumer"
        );

        // Create or get existing durable consumer
        let consumer = jetstream
            .create_consumer_on_stream(
                jetstream::consumer::pull::Config {
                    name: Some(consumer_name.to_string()),
                    durable_name: Some(consumer_name.to_string()),
                    filter_subject: stream_name.to_string(),
                    ack_policy: jetstream::consumer::AckPolicy::Explicit,
                    ..Default::default()
                },
                stream_name,
            )
            .await
            .context("Failed to create consumer")?;

        info!(
            stream = stream_name,
            consumer = consumer_name,
            "Consumer created successfully"
        );

        Ok(Self {
            consumer,
            batch_size,
            max_wait: Duration::from_secs(max_wait_secs),
            handler,
        })
    }

    pub async fn run(&self, ctx: CancellationToken) -> Result<()> {
        info!("Starting consumer loop");

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!("Received shutdown signal, stopping consumer");
                    break;
                }
                result = self.poll_once() => {
                    if let Err(e) = result {
                        error!(error = %e, "Error polling stream");
                        // Continue consuming despite errors
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!("Consumer stopped gracefully");
        Ok(())
    }

    async fn poll_once(&self) -> Result<()> {
        let mut messages = self
            .consumer
            .fetch()
            .max_messages(self.batch_size)
            .expires(self.max_wait)
            .messages()
            .await
            .context("Failed to fetch messages")?;

        while let Some(result) = messages.next().await {
            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "Error receiving message from batch");
                    continue;
                }
            };

            match (self.handler)(&message.payload) {
                Ok(()) => {
                    if let Err(e) = message.ack().await {
                        error!(error = %e, "Failed to acknowledge message");
                    }
                }
                Err(e) => {
                    // Malformed payloads are terminated rather than
                    // redelivered; the loop itself keeps running.
                    warn!(
                        error = %e,
                        subject = %message.subject,
                        "Handler rejected message"
                    );
                    if let Err(e) = message.ack_with(AckKind::Term).await {
                        error!(error = %e, "Failed to terminate message");
                    }
                }
            }
        }

        Ok(())
    }
}
