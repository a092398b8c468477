//! Status command - engine health, nodes and services in one view.

use clap::Args;
use serde::Serialize;

use dashboard_shared_types::{HealthStatus, NodeInfo, ServiceInfo};

use crate::client::{ApiClient, NODES_PATH, SERVICES_PATH};
use crate::commands::health;
use crate::commands::nodes::{node_rows, NodeRow};
use crate::commands::services::{service_rows, ServiceRow};
use crate::output::{self, print_data, print_item, section};
use crate::OutputFormat;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Show only nodes
    #[arg(long, conflicts_with = "services_only")]
    nodes_only: bool,

    /// Show only services
    #[arg(long)]
    services_only: bool,
}

/// Combined snapshot for JSON and YAML output.
#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    health: Option<HealthStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<Vec<NodeRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    services: Option<Vec<ServiceRow>>,
}

/// Query every requested section. A failing section is reported and left out.
async fn collect(args: &StatusArgs, client: &ApiClient) -> StatusReport {
    let mut report = StatusReport {
        health: None,
        nodes: None,
        services: None,
    };

    // Engine health first (unless filtering)
    if !args.nodes_only && !args.services_only {
        match client.health().await {
            Ok(status) => report.health = Some(status),
            Err(e) => output::error(&format!("Failed to get engine health: {}", e)),
        }
    }

    if !args.services_only {
        match client.get::<Vec<NodeInfo>>(NODES_PATH).await {
            Ok(nodes) => report.nodes = Some(node_rows(nodes, None)),
            Err(e) => output::error(&format!("Failed to get nodes: {}", e)),
        }
    }

    if !args.nodes_only {
        match client.get::<Vec<ServiceInfo>>(SERVICES_PATH).await {
            Ok(services) => report.services = Some(service_rows(services, None)),
            Err(e) => output::error(&format!("Failed to get services: {}", e)),
        }
    }

    report
}

/// Execute the status command.
pub async fn execute(args: StatusArgs, api_url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let report = collect(&args, &client).await;

    if format != OutputFormat::Table {
        print_item(&report, format)?;
        return Ok(());
    }

    if let Some(status) = &report.health {
        section("Engine");
        health::print_summary(status);
        if let Some(message) = status.error() {
            output::warn(&format!("Engine disconnected: {}", message));
        }
    }
    if let Some(nodes) = &report.nodes {
        section("Nodes");
        print_data(nodes, format)?;
    }
    if let Some(services) = &report.services {
        section("Services");
        print_data(services, format)?;
    }

    Ok(())
}
