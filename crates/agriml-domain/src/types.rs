use serde::{Deserialize, Serialize};

/// One weather measurement tuple submitted for decisioning.
///
/// All fields are caller-supplied readings; values outside physically
/// plausible ranges are evaluated as-is. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    /// Unix seconds.
    pub timestamp: i64,
}

/// The irrigation action produced for one observation.
///
/// The timestamp echoes the observation's so callers can correlate the two.
#[derive(Debug, Clone, PartialEq)]
pub struct IrrigationDecision {
    /// Short action label.
    pub decision: String,
    /// Actionable text for the grower.
    pub recommendation: String,
    pub timestamp: i64,
}

/// One soil moisture reading reported by an edge device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilMoistureReading {
    pub device_id: String,
    pub moisture_level: f64,
    pub temperature: f64,
    pub ph_level: f64,
    /// Unix seconds.
    pub timestamp: i64,
}
