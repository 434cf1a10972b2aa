mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use freight_intel::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
