mod config;
mod runner;
mod telemetry;

use agriml_domain::{SoilMoistureService, WeatherObservation, WeatherService};
use agriml_grpc::{run_grpc_server, GrpcServerConfig};
use agriml_nats::{publish_channel, NatsClient, PublisherConfig, StreamConsumer};
use anyhow::Context;
use config::ServiceConfig;
use runner::Runner;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_telemetry(&config.log_level) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    info!(
        grpc_host = %config.grpc_host,
        grpc_port = config.grpc_port,
        nats_url = %config.nats_url,
        "Starting agriml weather decision service"
    );

    if let Err(e) = run(config).await {
        error!("Service exited with error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServiceConfig) -> Result<(), anyhow::Error> {
    // One broker connection for the process lifetime; producers and
    // consumers share it and never open their own.
    let nats_client = NatsClient::connect(
        &config.nats_url,
        Duration::from_secs(config.nats_connect_timeout_secs),
    )
    .await?;
    nats_client
        .ensure_stream(&config.weather_stream, "Stream for weather observations")
        .await?;
    nats_client
        .ensure_stream(&config.soil_moisture_stream, "Stream for soil moisture readings")
        .await?;

    let (producer, publish_worker) = publish_channel(
        Arc::new(nats_client.jetstream().clone()),
        PublisherConfig {
            queue_capacity: config.publish_queue_capacity,
            max_attempts: config.publish_max_attempts,
            retry_backoff: Duration::from_millis(config.publish_retry_backoff_ms),
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        },
    );
    let producer = Arc::new(producer);

    let weather_service = Arc::new(WeatherService::new(
        producer.clone(),
        config.weather_stream.clone(),
    ));
    let soil_moisture_service = Arc::new(SoilMoistureService::new(
        producer.clone(),
        config.soil_moisture_stream.clone(),
    ));

    let grpc_config = GrpcServerConfig {
        host: config.grpc_host.clone(),
        port: config.grpc_port,
    };

    let mut runner = Runner::new()
        .with_process(move |ctx| {
            run_grpc_server(grpc_config, weather_service, soil_moisture_service, ctx)
        })
        .with_process(move |ctx| publish_worker.run(ctx))
        .with_closer_timeout(Duration::from_secs(config.shutdown_grace_secs));

    if config.consumer_enabled {
        let consumer = StreamConsumer::new(
            nats_client.jetstream(),
            &config.weather_stream,
            &config.consumer_name,
            config.consumer_batch_size,
            config.consumer_max_wait_secs,
            Box::new(log_observation),
        )
        .await
        .context("Failed to create observation consumer")?;
        runner = runner.with_process(move |ctx| async move { consumer.run(ctx).await });
    }

    runner
        .with_closer(move || async move {
            nats_client.close().await;
            Ok(())
        })
        .run()
        .await
}

/// Downstream consumer callback: decode and log each republished observation.
fn log_observation(payload: &[u8]) -> Result<(), anyhow::Error> {
    let observation: WeatherObservation =
        serde_json::from_slice(payload).context("Failed to decode observation payload")?;

    info!(
        temperature = observation.temperature,
        humidity = observation.humidity,
        rainfall = observation.rainfall,
        wind_speed = observation.wind_speed,
        timestamp = observation.timestamp,
        "Consumed weather observation"
    );

    Ok(())
}
