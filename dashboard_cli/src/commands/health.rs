//! Health command - engine connectivity and swarm membership.

use dashboard_shared_types::HealthStatus;

use crate::client::ApiClient;
use crate::error::CliError;
use crate::output::{print_item, success};
use crate::OutputFormat;

/// Execute the health command. Fails when the engine is disconnected.
pub async fn execute(api_url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let health = client.health().await?;

    match format {
        OutputFormat::Table => print_summary(&health),
        _ => print_item(&health, format)?,
    }

    if let Some(message) = health.error() {
        return Err(CliError::Disconnected(message.to_string()).into());
    }
    Ok(())
}

pub(crate) fn print_summary(health: &HealthStatus) {
    let Some(swarm) = health.swarm() else {
        println!("  Engine:    disconnected");
        return;
    };

    success("Engine connected");
    println!(
        "  Swarm:     {}",
        if swarm.swarm_active { "active" } else { "inactive" }
    );
    println!(
        "  Node ID:   {}",
        swarm.swarm_node_id.as_deref().unwrap_or("-")
    );
    println!("  Managers:  {}", swarm.swarm_managers);
    println!("  Nodes:     {}", swarm.swarm_nodes);
}
