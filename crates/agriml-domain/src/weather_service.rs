use crate::decision_engine;
use crate::envelope::PublishEnvelope;
use crate::error::{DomainError, DomainResult};
use crate::producer::EnvelopeProducer;
use crate::types::{IrrigationDecision, WeatherObservation};
use std::sync::Arc;
use tracing::{info, warn};

/// Domain service for the weather decision request path.
///
/// Flow:
/// 1. Validate the observation
/// 2. Evaluate the irrigation rules
/// 3. Hand the serialized observation to the publish path (best effort)
/// 4. Return the decision to the caller
///
/// Publishing is a side channel: the reply never waits on the broker, and
/// enqueue or serialization failures are logged without failing the request.
pub struct WeatherService {
    producer: Arc<dyn EnvelopeProducer>,
    observation_stream: String,
}

impl WeatherService {
    pub fn new(producer: Arc<dyn EnvelopeProducer>, observation_stream: String) -> Self {
        Self {
            producer,
            observation_stream,
        }
    }

    /// Produce an irrigation decision for one observation.
    pub fn process_observation(
        &self,
        observation: WeatherObservation,
    ) -> DomainResult<IrrigationDecision> {
        validate_observation(&observation)?;

        info!(
            temperature = observation.temperature,
            humidity = observation.humidity,
            rainfall = observation.rainfall,
            wind_speed = observation.wind_speed,
            timestamp = observation.timestamp,
            "Received weather observation"
        );

        let decision = decision_engine::evaluate(&observation);

        match PublishEnvelope::json(&self.observation_stream, &observation) {
            Ok(envelope) => {
                if let Err(e) = self.producer.enqueue(envelope) {
                    warn!(
                        error = %e,
                        stream = %self.observation_stream,
                        "Failed to enqueue observation for publishing"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize observation for publishing");
            }
        }

        Ok(decision)
    }
}

/// Out-of-range readings are evaluated as-is; only non-finite values are
/// rejected since the rule comparisons cannot order them.
fn validate_observation(observation: &WeatherObservation) -> DomainResult<()> {
    for (field, value) in [
        ("temperature", observation.temperature),
        ("humidity", observation.humidity),
        ("rainfall", observation.rainfall),
        ("wind_speed", observation.wind_speed),
    ] {
        if !value.is_finite() {
            return Err(DomainError::InvalidObservation(format!(
                "{field} must be a finite number"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::MockEnvelopeProducer;
    use anyhow::anyhow;

    fn observation() -> WeatherObservation {
        WeatherObservation {
            temperature: 36.5,
            humidity: 50.0,
            rainfall: 5.0,
            wind_speed: 0.0,
            timestamp: 1625247600,
        }
    }

    #[test]
    fn publishes_observation_to_configured_stream() {
        let mut producer = MockEnvelopeProducer::new();
        producer
            .expect_enqueue()
            .withf(|envelope: &PublishEnvelope| {
                envelope.stream == "weather_observations"
                    && serde_json::from_slice::<WeatherObservation>(&envelope.payload)
                        .map(|decoded| decoded == observation())
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = WeatherService::new(Arc::new(producer), "weather_observations".to_string());

        let decision = service.process_observation(observation()).unwrap();
        assert_eq!(decision.decision, "Increase irrigation due to high temperature");
        assert_eq!(decision.timestamp, 1625247600);
    }

    #[test]
    fn enqueue_failure_does_not_fail_the_request() {
        // Broker decoupling: the reply is produced even when the publish
        // path rejects the envelope.
        let mut producer = MockEnvelopeProducer::new();
        producer
            .expect_enqueue()
            .times(1)
            .returning(|_| Err(DomainError::PublishError(anyhow!("broker unreachable"))));

        let service = WeatherService::new(Arc::new(producer), "weather_observations".to_string());

        let decision = service.process_observation(observation()).unwrap();
        assert_eq!(decision.decision, "Increase irrigation due to high temperature");
        assert_eq!(
            decision.recommendation,
            "Increase irrigation frequency and volume by 20%."
        );
    }

    #[test]
    fn non_finite_reading_is_rejected_before_publishing() {
        let mut producer = MockEnvelopeProducer::new();
        producer.expect_enqueue().times(0);

        let service = WeatherService::new(Arc::new(producer), "weather_observations".to_string());

        let result = service.process_observation(WeatherObservation {
            temperature: f64::NAN,
            ..observation()
        });
        assert!(matches!(result, Err(DomainError::InvalidObservation(_))));

        let service_err = service
            .process_observation(WeatherObservation {
                humidity: f64::INFINITY,
                ..observation()
            })
            .unwrap_err();
        assert!(service_err.to_string().contains("humidity"));
    }

    #[test]
    fn negative_readings_are_accepted() {
        let mut producer = MockEnvelopeProducer::new();
        producer.expect_enqueue().times(1).returning(|_| Ok(()));

        let service = WeatherService::new(Arc::new(producer), "weather_observations".to_string());

        let decision = service
            .process_observation(WeatherObservation {
                temperature: -12.0,
                humidity: -5.0,
                ..observation()
            })
            .unwrap();
        assert_eq!(decision.decision, "Increase irrigation due to low humidity");
    }
}
