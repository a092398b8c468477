//! Ping command - check that the API process is up.

use dashboard_shared_types::LivenessStatus;

use crate::client::{ApiClient, LIVENESS_PATH};
use crate::output::{print_item, success};
use crate::OutputFormat;

/// Execute the ping command.
pub async fn execute(api_url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let liveness: LivenessStatus = client.get(LIVENESS_PATH).await?;

    match format {
        OutputFormat::Table => success(&format!(
            "{} is up (status: {})",
            client.base_url(),
            liveness.status
        )),
        _ => print_item(&liveness, format)?,
    }
    Ok(())
}
