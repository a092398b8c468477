//! Turning resolved configuration into a running server.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use cluster_source::{
    EngineConfig, EngineEndpoint, EngineSource, FetchPolicy, RelayConfig, RelaySource,
};
use cluster_source_interface::ClusterSource;
use observability::{init_tracing, install_prometheus_exporter, TracingConfig};
use user_config::{DashboardConfig, FetchConfig, LoggingConfig};

use crate::cli::Cli;
use crate::error::StartupError;
use crate::server::{ApiServer, ServerOptions};
use crate::state::{ApiState, Role};

pub fn fetch_policy(fetch: &FetchConfig) -> FetchPolicy {
    FetchPolicy {
        timeout: fetch.timeout(),
        attempts: fetch.attempts,
        retry_delay: fetch.retry_delay(),
    }
}

pub fn tracing_config(logging: &LoggingConfig) -> TracingConfig {
    TracingConfig::default()
        .with_filter(logging.filter.clone())
        .with_json(logging.json)
}

/// The cluster source for `role`: the engine for agents, the upstream for
/// gateways.
pub fn build_source(
    role: Role,
    config: &DashboardConfig,
) -> Result<Arc<dyn ClusterSource>, StartupError> {
    let policy = fetch_policy(&config.fetch);

    match role {
        Role::Agent => {
            let endpoint = match &config.agent.engine_host {
                Some(host) => host.parse::<EngineEndpoint>()?,
                None => EngineEndpoint::from_env(),
            };
            let source = EngineSource::new(
                EngineConfig {
                    endpoint,
                    api_version: config.agent.api_version.clone(),
                },
                policy,
            )?;
            Ok(Arc::new(source))
        }
        Role::Gateway => {
            let upstream = config
                .gateway
                .upstream_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .ok_or(StartupError::MissingUpstream)?;
            let relay = RelayConfig::new(upstream)
                .with_path_prefix(config.gateway.upstream_path_prefix.clone());
            Ok(Arc::new(RelaySource::new(relay, policy)?))
        }
    }
}

pub fn server_options(role: Role, config: &DashboardConfig) -> ServerOptions {
    ServerOptions {
        host: config.server.host.clone(),
        port: config.server.port.unwrap_or_else(|| role.default_port()),
        cors_origin: match role {
            Role::Agent => None,
            Role::Gateway => config.gateway.frontend_url.clone(),
        },
    }
}

/// Resolve configuration, install logging and metrics, and serve until shutdown.
pub async fn launch(cli: Cli) -> anyhow::Result<()> {
    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate()?;

    init_tracing(&tracing_config(&config.logging))?;

    let role = cli.role();
    info!(
        "Starting swarm dashboard {} v{}",
        role,
        env!("CARGO_PKG_VERSION")
    );

    if let Some(addr) = config.metrics.listen {
        install_prometheus_exporter(addr)?;
        info!("Prometheus metrics available on http://{}/metrics", addr);
    }

    let source = build_source(role, &config)?;
    info!("Reading cluster state from {}", source.describe());

    let state = ApiState::new(role, source);
    state.metrics.describe();

    ApiServer::new(state, server_options(role, &config))?
        .run()
        .await?;

    Ok(())
}
