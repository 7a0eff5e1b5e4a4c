use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use agriml_domain::WeatherService;
use agriml_proto::agriml::v1::weather_processing_service_server::WeatherProcessingService as WeatherProcessingServiceTrait;
use agriml_proto::agriml::v1::{WeatherData, WeatherDecision};

use crate::conversions::{to_domain_observation, to_proto_decision};
use crate::error::domain_error_to_status;

/// gRPC handler for WeatherProcessingService
/// Handles Proto → Domain mapping and error conversion
pub struct WeatherProcessingHandler {
    domain_service: Arc<WeatherService>,
}

impl WeatherProcessingHandler {
    pub fn new(domain_service: Arc<WeatherService>) -> Self {
        Self { domain_service }
    }
}

#[tonic::async_trait]
impl WeatherProcessingServiceTrait for WeatherProcessingHandler {
    async fn process_weather_data(
        &self,
        request: Request<WeatherData>,
    ) -> Result<Response<WeatherDecision>, Status> {
        let req = request.into_inner();

        debug!(timestamp = req.timestamp, "Received ProcessWeatherData request");

        // Convert proto → domain
        let observation = to_domain_observation(req);

        // Call domain service
        let decision = self
            .domain_service
            .process_observation(observation)
            .map_err(domain_error_to_status)?;

        info!(
            decision = %decision.decision,
            timestamp = decision.timestamp,
            "Produced irrigation decision"
        );

        // Convert domain → proto
        Ok(Response::new(to_proto_decision(decision)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriml_domain::{DomainResult, EnvelopeProducer, PublishEnvelope, WeatherObservation};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProducer {
        envelopes: Mutex<Vec<PublishEnvelope>>,
    }

    impl EnvelopeProducer for RecordingProducer {
        fn enqueue(&self, envelope: PublishEnvelope) -> DomainResult<()> {
            self.envelopes.lock().unwrap().push(envelope);
            Ok(())
        }
    }

    fn handler() -> (WeatherProcessingHandler, Arc<RecordingProducer>) {
        let producer = Arc::new(RecordingProducer::default());
        let service = Arc::new(WeatherService::new(
            producer.clone(),
            "weather_observations".to_string(),
        ));
        (WeatherProcessingHandler::new(service), producer)
    }

    #[tokio::test]
    async fn high_temperature_request_yields_decision_and_republish() {
        let (handler, producer) = handler();

        let response = handler
            .process_weather_data(Request::new(WeatherData {
                temperature: 36.5,
                humidity: 50.0,
                rainfall: 5.0,
                wind_speed: 0.0,
                timestamp: 1625247600,
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.decision, "Increase irrigation due to high temperature");
        assert_eq!(
            response.recommendation,
            "Increase irrigation frequency and volume by 20%."
        );
        assert_eq!(response.timestamp, 1625247600);

        let envelopes = producer.envelopes.lock().unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].stream, "weather_observations");
        let republished: WeatherObservation =
            serde_json::from_slice(&envelopes[0].payload).unwrap();
        assert_eq!(republished.timestamp, 1625247600);
    }

    #[tokio::test]
    async fn non_finite_field_maps_to_invalid_argument() {
        let (handler, producer) = handler();

        let status = handler
            .process_weather_data(Request::new(WeatherData {
                temperature: f64::NAN,
                humidity: 50.0,
                rainfall: 0.0,
                wind_speed: 0.0,
                timestamp: 1625247600,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(producer.envelopes.lock().unwrap().is_empty());
    }
}
