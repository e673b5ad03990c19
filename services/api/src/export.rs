use crate::dataset::Dataset;
use crate::infra::InMemoryEntityStore;
use chrono::{NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talentflow::analytics::{AnalyticsSession, DirectoryDelivery, QueryError, SessionState};
use talentflow::config::AppConfig;
use talentflow::error::AppError;
use talentflow::telemetry;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// JSON dataset with `jobs` and `candidates`; built-in demo data when omitted
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Output directory (defaults to APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    /// Date stamped into the file name (YYYY-MM-DD, defaults to today in UTC)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let ExportArgs { dataset, out, date } = args;
    let dataset = Dataset::load(dataset.as_deref())?;
    let directory = out.unwrap_or_else(|| config.analytics.export_dir.clone());
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let store = Arc::new(InMemoryEntityStore::new(dataset));
    let session = AnalyticsSession::new(store, config.analytics.session_settings());
    let delivery = DirectoryDelivery::new(directory);
    info!(
        directory = %delivery.directory().display(),
        prefix = %session.settings().export_prefix,
        %date,
        "running analytics export"
    );

    match export_once(&session, &delivery, date).await? {
        Some(path) => {
            info!(path = %path.display(), "analytics export written");
            println!("Analytics export written to {}", path.display());
        }
        None => println!("Nothing to export"),
    }

    Ok(())
}

/// One refresh followed by an export; a failed refresh becomes an error.
pub(crate) async fn export_once(
    session: &AnalyticsSession<InMemoryEntityStore>,
    delivery: &DirectoryDelivery,
    date: NaiveDate,
) -> Result<Option<PathBuf>, AppError> {
    if let SessionState::Failed(message) = session.refresh().await {
        return Err(QueryError::new(message).into());
    }

    let artifact = session.export_to(delivery, date)?;
    Ok(artifact.map(|artifact| delivery.path_for(&artifact)))
}
