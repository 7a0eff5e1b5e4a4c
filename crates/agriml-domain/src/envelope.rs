use serde::Serialize;

/// Serialized payload plus the stream it is destined for.
///
/// Constructed by a domain service for the duration of one publish call and
/// handed to the producer, which takes ownership from there.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishEnvelope {
    pub stream: String,
    pub payload: Vec<u8>,
}

impl PublishEnvelope {
    /// Build an envelope holding `value` serialized as JSON.
    pub fn json<T: Serialize>(
        stream: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            stream: stream.into(),
            payload: serde_json::to_vec(value)?,
        })
    }
}
