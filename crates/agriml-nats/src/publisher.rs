use crate::traits::JetStreamPublisher;
use agriml_domain::{DomainError, DomainResult, EnvelopeProducer, PublishEnvelope};
use anyhow::anyhow;
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Tuning for the asynchronous publish path.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Envelopes buffered between request handlers and the worker.
    pub queue_capacity: usize,
    /// Publish attempts per envelope before it is dropped.
    pub max_attempts: u32,
    /// Pause between publish attempts.
    pub retry_backoff: Duration,
    /// How long the worker flushes enqueued envelopes during shutdown.
    pub shutdown_grace: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(250),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Counters for the observable failure signals on the publish path.
///
/// Data loss is allowed only after the retry budget is exhausted or the
/// queue rejects an envelope, and both cases are recorded here in addition
/// to being logged.
#[derive(Debug, Default)]
pub struct PublishMetrics {
    /// Envelopes rejected at enqueue time (queue full or worker gone).
    pub dropped_enqueues: AtomicU64,
    /// Envelopes dropped after the retry budget was exhausted.
    pub exhausted_publishes: AtomicU64,
}

/// Create a connected producer handle and worker pair.
///
/// The handle is cheap to clone and shared by all request handlers; the
/// worker owns the JetStream publish side and runs as a single long-lived
/// task until shutdown.
pub fn publish_channel(
    jetstream: Arc<dyn JetStreamPublisher>,
    config: PublisherConfig,
) -> (QueuedEnvelopeProducer, PublishWorker) {
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    let metrics = Arc::new(PublishMetrics::default());

    let producer = QueuedEnvelopeProducer {
        tx,
        metrics: metrics.clone(),
    };
    let worker = PublishWorker {
        rx,
        jetstream,
        config,
        metrics,
    };
    (producer, worker)
}

/// Non-blocking front of the publish path: hands envelopes to the worker
/// over a bounded queue.
#[derive(Clone)]
pub struct QueuedEnvelopeProducer {
    tx: mpsc::Sender<PublishEnvelope>,
    metrics: Arc<PublishMetrics>,
}

impl QueuedEnvelopeProducer {
    pub fn metrics(&self) -> &PublishMetrics {
        &self.metrics
    }
}

impl EnvelopeProducer for QueuedEnvelopeProducer {
    fn enqueue(&self, envelope: PublishEnvelope) -> DomainResult<()> {
        let stream = envelope.stream.clone();
        if let Err(e) = self.tx.try_send(envelope) {
            self.metrics.dropped_enqueues.fetch_add(1, Ordering::Relaxed);
            warn!(stream = %stream, error = %e, "Publish queue rejected envelope");
            return Err(DomainError::PublishError(anyhow!(
                "publish queue rejected envelope for stream {stream}: {e}"
            )));
        }
        Ok(())
    }
}

/// Single long-lived task that drains the publish queue and delivers
/// envelopes to JetStream with bounded retries.
pub struct PublishWorker {
    rx: mpsc::Receiver<PublishEnvelope>,
    jetstream: Arc<dyn JetStreamPublisher>,
    config: PublisherConfig,
    metrics: Arc<PublishMetrics>,
}

impl PublishWorker {
    /// Run until shutdown.
    ///
    /// On cancellation, envelopes already enqueued are flushed within the
    /// configured grace period before the worker exits.
    pub async fn run(mut self, ctx: CancellationToken) -> Result<(), anyhow::Error> {
        info!("Starting publish worker");

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!("Received shutdown signal, flushing publish queue");
                    self.rx.close();
                    let grace = self.config.shutdown_grace;
                    if tokio::time::timeout(grace, self.flush()).await.is_err() {
                        warn!(
                            grace_secs = grace.as_secs(),
                            "Publish queue flush timed out"
                        );
                    }
                    break;
                }
                maybe_envelope = self.rx.recv() => match maybe_envelope {
                    Some(envelope) => self.publish_with_retry(envelope).await,
                    None => break,
                }
            }
        }

        info!("Publish worker stopped");
        Ok(())
    }

    async fn flush(&mut self) {
        while let Some(envelope) = self.rx.recv().await {
            self.publish_with_retry(envelope).await;
        }
    }

    async fn publish_with_retry(&self, envelope: PublishEnvelope) {
        let PublishEnvelope { stream, payload } = envelope;
        let payload = Bytes::from(payload);

        for attempt in 1..=self.config.max_attempts {
            match self.jetstream.publish(stream.clone(), payload.clone()).await {
                Ok(()) => {
                    debug!(
                        stream = %stream,
                        size_bytes = payload.len(),
                        "Published envelope"
                    );
                    return;
                }
                Err(e) if attempt < self.config.max_attempts => {
                    warn!(
                        error = %e,
                        stream = %stream,
                        attempt,
                        "Publish attempt failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                Err(e) => {
                    self.metrics
                        .exhausted_publishes
                        .fetch_add(1, Ordering::Relaxed);
                    error!(
                        error = %e,
                        stream = %stream,
                        attempts = self.config.max_attempts,
                        "Dropping envelope after exhausting publish retries"
                    );
                }
            }
        }
    }
}
