use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{error, info};

use agriml_domain::{SoilMoistureService, WeatherService};
use agriml_proto::agriml::v1::soil_moisture_service_server::SoilMoistureServiceServer;
use agriml_proto::agriml::v1::weather_processing_service_server::WeatherProcessingServiceServer;

use crate::soil_moisture_handler::SoilMoistureHandler;
use crate::weather_handler::WeatherProcessingHandler;

/// gRPC server configuration
pub struct GrpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50052,
        }
    }
}

/// Run the gRPC server with graceful shutdown
pub async fn run_grpc_server(
    config: GrpcServerConfig,
    weather_service: Arc<WeatherService>,
    soil_moisture_service: Arc<SoilMoistureService>,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid gRPC listen address")?;

    info!("Starting gRPC server on {}", addr);

    let weather_handler = WeatherProcessingHandler::new(weather_service);
    let soil_moisture_handler = SoilMoistureHandler::new(soil_moisture_service);

    // Build server with graceful shutdown
    let server = Server::builder()
        .add_service(WeatherProcessingServiceServer::new(weather_handler))
        .add_service(SoilMoistureServiceServer::new(soil_moisture_handler))
        .serve_with_shutdown(addr, async move {
            cancellation_token.cancelled().await;
            info!("gRPC server shutdown signal received");
        });

    match server.await {
        Ok(_) => {
            info!("gRPC server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            error!("gRPC server error: {}", e);
            Err(e.into())
        }
    }
}
