//! Nodes command - list swarm nodes.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use dashboard_shared_types::NodeInfo;

use crate::client::{ApiClient, NODES_PATH};
use crate::output::print_data;
use crate::OutputFormat;

/// Arguments for the nodes command.
#[derive(Args)]
pub struct NodesArgs {
    /// Only show nodes in this state (ready, down, ...)
    #[arg(short, long)]
    status: Option<String>,
}

/// A node as shown in tables.
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<NodeInfo> for NodeRow {
    fn from(node: NodeInfo) -> Self {
        Self {
            id: node.id,
            hostname: node.hostname,
            status: node.status,
        }
    }
}

pub(crate) fn node_rows(nodes: Vec<NodeInfo>, status: Option<&str>) -> Vec<NodeRow> {
    nodes
        .into_iter()
        .filter(|n| status.map_or(true, |s| n.status.eq_ignore_ascii_case(s)))
        .map(NodeRow::from)
        .collect()
}

/// Execute the nodes command.
pub async fn execute(args: NodesArgs, api_url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let nodes: Vec<NodeInfo> = client.get(NODES_PATH).await?;

    print_data(&node_rows(nodes, args.status.as_deref()), format)?;
    Ok(())
}
