//! Sends one weather observation to a locally running decision service.
//!
//! Usage: `cargo run -p agriml-server --example send_observation`

use agriml_proto::agriml::v1::weather_processing_service_client::WeatherProcessingServiceClient;
use agriml_proto::agriml::v1::WeatherData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = WeatherProcessingServiceClient::connect("http://127.0.0.1:50052").await?;

    let response = client
        .process_weather_data(tonic::Request::new(WeatherData {
            temperature: 36.5,
            humidity: 50.0,
            rainfall: 5.0,
            wind_speed: 0.0,
            timestamp: 1625247600,
        }))
        .await?
        .into_inner();

    println!("decision: {}", response.decision);
    println!("recommendation: {}", response.recommendation);
    println!("timestamp: {}", response.timestamp);

    Ok(())
}
