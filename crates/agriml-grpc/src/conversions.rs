use agriml_domain::{IrrigationDecision, SoilMoistureReading, WeatherObservation};
use agriml_proto::agriml::v1::{SoilMoistureData, WeatherData, WeatherDecision};

pub fn to_domain_observation(data: WeatherData) -> WeatherObservation {
    WeatherObservation {
        temperature: data.temperature,
        humidity: data.humidity,
        rainfall: data.rainfall,
        wind_speed: data.wind_speed,
        timestamp: data.timestamp,
    }
}

pub fn to_proto_decision(decision: IrrigationDecision) -> WeatherDecision {
    WeatherDecision {
        decision: decision.decision,
        timestamp: decision.timestamp,
        recommendation: decision.recommendation,
    }
}

pub fn to_domain_reading(data: SoilMoistureData) -> SoilMoistureReading {
    SoilMoistureReading {
        device_id: data.device_id,
        moisture_level: data.moisture_level,
        temperature: data.temperature,
        ph_level: data.ph_level,
        timestamp: data.timestamp,
    }
}
