mod cli;
mod estimate;
mod infra;
mod routes;
mod server;

use climate_sense::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
