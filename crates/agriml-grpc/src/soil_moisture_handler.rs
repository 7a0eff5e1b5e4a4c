use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::debug;

use agriml_domain::SoilMoistureService;
use agriml_proto::agriml::v1::soil_moisture_service_server::SoilMoistureService as SoilMoistureServiceTrait;
use agriml_proto::agriml::v1::{SoilMoistureData, StreamResponse};

use crate::conversions::to_domain_reading;
use crate::error::domain_error_to_status;

/// gRPC handler for SoilMoistureService
pub struct SoilMoistureHandler {
    domain_service: Arc<SoilMoistureService>,
}

impl SoilMoistureHandler {
    pub fn new(domain_service: Arc<SoilMoistureService>) -> Self {
        Self { domain_service }
    }
}

#[tonic::async_trait]
impl SoilMoistureServiceTrait for SoilMoistureHandler {
    async fn stream_soil_moisture_data(
        &self,
        request: Request<SoilMoistureData>,
    ) -> Result<Response<StreamResponse>, Status> {
        let req = request.into_inner();

        debug!(
            device_id = %req.device_id,
            timestamp = req.timestamp,
            "Received StreamSoilMoistureData request"
        );

        let reading = to_domain_reading(req);

        self.domain_service
            .record_reading(reading)
            .map_err(domain_error_to_status)?;

        Ok(Response::new(StreamResponse {
            status: "Data received and forwarded".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriml_domain::{DomainResult, EnvelopeProducer, PublishEnvelope};
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

    fn handler() -> (SoilMoistureHandler, Arc<RecordingProducer>) {
        let producer = Arc::new(RecordingProducer::default());
        let service = Arc::new(SoilMoistureService::new(
            producer.clone(),
            "soil_moisture".to_string(),
        ));
        (SoilMoistureHandler::new(service), producer)
    }

    #[tokio::test]
    async fn reading_is_accepted_and_forwarded() {
        let (handler, producer) = handler();

        let response = handler
            .stream_soil_moisture_data(Request::new(SoilMoistureData {
                device_id: "device123".to_string(),
                moisture_level: 42.5,
                temperature: 21.0,
                ph_level: 6.8,
                timestamp: 1625247600,
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.status, "Data received and forwarded");
        let envelopes = producer.envelopes.lock().unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].stream, "soil_moisture");
    }

    #[tokio::test]
    async fn missing_device_id_maps_to_invalid_argument() {
        let (handler, producer) = handler();

        let status = handler
            .stream_soil_moisture_data(Request::new(SoilMoistureData {
                device_id: String::new(),
                moisture_level: 42.5,
                temperature: 21.0,
                ph_level: 6.8,
                timestamp: 1625247600,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(producer.envelopes.lock().unwrap().is_empty());
    }
}
