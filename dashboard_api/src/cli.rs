//! Command-line interface of the `dashboard-api` binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use user_config::DashboardConfig;

use crate::state::Role;

#[derive(Debug, Parser)]
#[command(name = "dashboard-api")]
#[command(version)]
#[command(about = "Read-only swarm cluster API for the dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on [default: 8090 for agent, 3001 for gateway]
    #[arg(short, long, global = true, env = "PORT")]
    pub port: Option<u16>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,

    /// Per-attempt timeout for engine or upstream requests
    #[arg(long, global = true)]
    pub fetch_timeout_secs: Option<u64>,

    /// Attempts per engine or upstream request, including the first
    #[arg(long, global = true)]
    pub fetch_attempts: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve cluster state read from the local container engine
    Agent(AgentArgs),

    /// Serve cluster state relayed from an upstream agent
    Gateway(GatewayArgs),
}

#[derive(Debug, Args)]
pub struct AgentArgs {
    /// Engine endpoint (unix:///var/run/docker.sock, tcp://host:2375)
    #[arg(long, env = "DOCKER_HOST")]
    pub engine_host: Option<String>,

    /// Pin engine API requests to a version, e.g. 1.43
    #[arg(long)]
    pub engine_api_version: Option<String>,
}

#[derive(Debug, Args)]
pub struct GatewayArgs {
    /// Base URL of the upstream agent. Agents that serve raw engine JSON on
    /// /api/docker/* also need --upstream-path-prefix /api/docker
    #[arg(long, env = "DOCKER_SOCKET_AGENT_URL")]
    pub upstream_url: Option<String>,

    /// Allowed CORS origin of the dashboard frontend
    #[arg(long, env = "DOCKER_FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Path prefix of the upstream's raw routes [default: /api/docker/raw]
    #[arg(long)]
    pub upstream_path_prefix: Option<String>,
}

impl Cli {
    pub fn role(&self) -> Role {
        match self.command {
            Command::Agent(_) => Role::Agent,
            Command::Gateway(_) => Role::Gateway,
        }
    }

    /// Override file settings with whatever was given on the command line or
    /// through the environment.
    pub fn apply_to(&self, config: &mut DashboardConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = Some(port);
        }
        if self.log_json {
            config.logging.json = true;
        }
        if let Some(addr) = self.metrics_addr {
            config.metrics.listen = Some(addr);
        }
        if let Some(timeout) = self.fetch_timeout_secs {
            config.fetch.timeout_secs = timeout;
        }
        if let Some(attempts) = self.fetch_attempts {
            config.fetch.attempts = attempts;
        }

        match &self.command {
            Command::Agent(args) => {
                if let Some(host) = &args.engine_host {
                    config.agent.engine_host = Some(host.clone());
                }
                if let Some(version) = &args.engine_api_version {
                    config.agent.api_version = Some(version.clone());
                }
            }
            Command::Gateway(args) => {
                if let Some(url) = &args.upstream_url {
                    config.gateway.upstream_url = Some(url.clone());
                }
                if let Some(origin) = &args.frontend_url {
                    config.gateway.frontend_url = Some(origin.clone());
                }
                if let Some(prefix) = &args.upstream_path_prefix {
                    config.gateway.upstream_path_prefix = prefix.clone();
                }
            }
        }
    }
}
