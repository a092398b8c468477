// Swarm Dashboard CLI
//
// Command-line client for the swarm dashboard API.

mod client;
mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::{nodes::NodesArgs, services::ServicesArgs, status::StatusArgs};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Parser)]
#[command(name = "swarmdash")]
#[command(version)]
#[command(about = "Swarm dashboard CLI - inspect swarm nodes and services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dashboard API URL (gateway or agent)
    #[arg(long, global = true, default_value = "http://localhost:3001", env = "SWARMDASH_API_URL")]
    api_url: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Log HTTP requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Engine connectivity and swarm membership
    Health,

    /// List swarm nodes
    Nodes(NodesArgs),

    /// List swarm services
    Services(ServicesArgs),

    /// Engine health, nodes and services together
    Status(StatusArgs),

    /// Check that the API is up
    Ping,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "dashboard_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let api_url = cli.api_url.as_str();
    let format = cli.output;

    match cli.command {
        Commands::Health => commands::health::execute(api_url, format).await,
        Commands::Nodes(args) => commands::nodes::execute(args, api_url, format).await,
        Commands::Services(args) => commands::services::execute(args, api_url, format).await,
        Commands::Status(args) => commands::status::execute(args, api_url, format).await,
        Commands::Ping => commands::ping::execute(api_url, format).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["swarmdash", "nodes"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Table);
        assert!(matches!(cli.command, Commands::Nodes(_)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "swarmdash",
            "services",
            "--output",
            "yaml",
            "--api-url",
            "http://gateway:3001",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Yaml);
        assert_eq!(cli.api_url, "http://gateway:3001");
    }
}
