use crate::envelope::PublishEnvelope;
use crate::error::DomainResult;

/// Hands envelopes to the asynchronous publish path.
///
/// `enqueue` must not block the caller: implementations either accept the
/// envelope immediately or report that it could not be queued. Delivery to
/// the broker happens off the request's critical path.
#[cfg_attr(test, mockall::automock)]
pub trait EnvelopeProducer: Send + Sync {
    fn enqueue(&self, envelope: PublishEnvelope) -> DomainResult<()>;
}
