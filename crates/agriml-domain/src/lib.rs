pub mod decision_engine;
pub mod envelope;
pub mod error;
pub mod producer;
pub mod soil_moisture_service;
pub mod types;
pub mod weather_service;

pub use envelope::PublishEnvelope;
pub use error::{DomainError, DomainResult};
pub use producer::EnvelopeProducer;
pub use soil_moisture_service::SoilMoistureService;
pub use types::{IrrigationDecision, SoilMoistureReading, WeatherObservation};
pub use weather_service::WeatherService;
