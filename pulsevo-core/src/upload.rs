use std::path::Path;

use tracing::info;

use crate::api::DashboardApi;
use crate::error::{PulsevoError, PulsevoResult};
use crate::models::UploadSummary;

pub const NOT_CSV_MESSAGE: &str = "Please upload a CSV file";

/// Accept only paths with a `.csv` extension, in any case.
pub fn validate_csv_path(path: &Path) -> PulsevoResult<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(())
    } else {
        Err(PulsevoError::invalid_upload(NOT_CSV_MESSAGE))
    }
}

/// Validate, read, and post a CSV task export.
///
/// A bad extension fails before the file is opened or the backend contacted.
pub async fn upload_tasks(api: &dyn DashboardApi, path: &Path) -> PulsevoResult<UploadSummary> {
    validate_csv_path(path)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("tasks.csv")
        .to_string();
    let contents = tokio::fs::read(path).await?;

    let summary = api.upload_tasks(&file_name, contents).await?;
    info!(
        file_name = %file_name,
        added = summary.tasks_added,
        skipped = summary.tasks_skipped,
        "Upload complete"
    );
    Ok(summary)
}
