mod cli;
mod dataset;
mod export;
mod infra;
mod routes;
mod server;

use talentflow::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
