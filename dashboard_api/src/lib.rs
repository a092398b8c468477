// Swarm Dashboard API Library
//
// HTTP API exposing a read-only view of swarm nodes, services and engine
// health to the dashboard. The same router serves both roles: agents read the
// container engine, gateways relay to an upstream agent.

pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult, StartupError};
pub use routes::{cors_layer, create_router};
pub use server::{ApiServer, ServerOptions};
pub use state::{ApiState, Role};
