use crate::envelope::PublishEnvelope;
use crate::error::{DomainError, DomainResult};
use crate::producer::EnvelopeProducer;
use crate::types::SoilMoistureReading;
use std::sync::Arc;
use tracing::{info, warn};

/// Moisture level (percent) below which a low-moisture warning is raised.
pub const LOW_MOISTURE_LEVEL: f64 = 10.0;

/// Domain service for soil moisture ingest from edge devices.
///
/// Readings are logged, checked for the low-moisture anomaly, and forwarded
/// to the soil moisture stream. Forwarding is best effort, like the weather
/// publish path.
pub struct SoilMoistureService {
    producer: Arc<dyn EnvelopeProducer>,
    soil_moisture_stream: String,
}

impl SoilMoistureService {
    pub fn new(producer: Arc<dyn EnvelopeProducer>, soil_moisture_stream: String) -> Self {
        Self {
            producer,
            soil_moisture_stream,
        }
    }

    /// Record one reading and forward it to the soil moisture stream.
    pub fn record_reading(&self, reading: SoilMoistureReading) -> DomainResult<()> {
        validate_reading(&reading)?;

        info!(
            device_id = %reading.device_id,
            moisture_level = reading.moisture_level,
            temperature = reading.temperature,
            ph_level = reading.ph_level,
            timestamp = reading.timestamp,
            "Received soil moisture reading"
        );

        if reading.moisture_level < LOW_MOISTURE_LEVEL {
            warn!(
                device_id = %reading.device_id,
                moisture_level = reading.moisture_level,
                "Low soil moisture detected"
            );
        }

        match PublishEnvelope::json(&self.soil_moisture_stream, &reading) {
            Ok(envelope) => {
                if let Err(e) = self.producer.enqueue(envelope) {
                    warn!(
                        error = %e,
                        stream = %self.soil_moisture_stream,
                        device_id = %reading.device_id,
                        "Failed to enqueue soil moisture reading for publishing"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize soil moisture reading");
            }
        }

        Ok(())
    }
}

fn validate_reading(reading: &SoilMoistureReading) -> DomainResult<()> {
    if reading.device_id.trim().is_empty() {
        return Err(DomainError::InvalidReading(
            "device_id must not be empty".to_string(),
        ));
    }

    for (field, value) in [
        ("moisture_level", reading.moisture_level),
        ("temperature", reading.temperature),
        ("ph_level", reading.ph_level),
    ] {
        if !value.is_finite() {
            return Err(DomainError::InvalidReading(format!(
                "{field} must be a finite number"
            )));
        }
    }
    Ok(())
}
