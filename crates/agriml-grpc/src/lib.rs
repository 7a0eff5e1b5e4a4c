pub mod conversions;
pub mod error;
pub mod server;
pub mod soil_moisture_handler;
pub mod weather_handler;

pub use server::{run_grpc_server, GrpcServerConfig};
pub use soil_moisture_handler::SoilMoistureHandler;
pub use weather_handler::WeatherProcessingHandler;
