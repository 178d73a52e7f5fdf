pub mod advisor;
pub mod config;
pub mod error;
pub mod footprint;
pub mod telemetry;
