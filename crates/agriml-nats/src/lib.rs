mod client;
mod consumer;
mod publisher;
mod traits;

pub use client::NatsClient;
pub use consumer::{PayloadHandler, StreamConsumer};
pub use publisher::{
    publish_channel, PublishMetrics, PublishWorker, PublisherConfig, QueuedEnvelopeProducer,
};
pub use traits::JetStreamPublisher;
