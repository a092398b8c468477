// Swarm Dashboard API Binary
//
// Entry point for both the agent and the gateway role.

use anyhow::Result;
use clap::Parser;

use dashboard_api::bootstrap;
use dashboard_api::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    bootstrap::launch(cli).await
}
