use crate::types::{IrrigationDecision, WeatherObservation};

/// Rainfall above this (mm) delays irrigation regardless of other readings.
pub const HEAVY_RAINFALL_MM: f64 = 10.0;
/// Temperature above this (degrees C) calls for more irrigation.
pub const HIGH_TEMPERATURE_C: f64 = 35.0;
/// Wind speed above this (km/h) makes sprinkler irrigation wasteful.
pub const HIGH_WIND_SPEED_KMH: f64 = 20.0;
/// Humidity below this (percent) stresses crops.
pub const LOW_HUMIDITY_PCT: f64 = 30.0;

/// Evaluate the irrigation rules for one observation.
///
/// Rules are checked in priority order and the first match wins; the
/// thresholds and their ordering are part of the public contract. The
/// function is total over the input domain and pure: the same observation
/// always yields the same decision, with the observation's timestamp
/// echoed into the decision.
pub fn evaluate(observation: &WeatherObservation) -> IrrigationDecision {
    let (decision, recommendation) = if observation.rainfall > HEAVY_RAINFALL_MM {
        (
            "Delay irrigation due to heavy rainfall",
            "Suspend irrigation for 24 hours and monitor soil moisture.",
        )
    } else if observation.temperature > HIGH_TEMPERATURE_C {
        (
            "Increase irrigation due to high temperature",
            "Increase irrigation frequency and volume by 20%.",
        )
    } else if observation.wind_speed > HIGH_WIND_SPEED_KMH {
        (
            "Adjust irrigation due to high wind speed",
            "Use drip irrigation to reduce evaporation losses.",
        )
    } else if observation.humidity < LOW_HUMIDITY_PCT {
        (
            "Increase irrigation due to low humidity",
            "Increase irrigation frequency to prevent crop stress.",
        )
    } else {
        (
            "Normal irrigation schedule",
            "Maintain current irrigation practices.",
        )
    };

    IrrigationDecision {
        decision: decision.to_string(),
        recommendation: recommendation.to_string(),
        timestamp: observation.timestamp,
    }
}
