//! Subcommand implementations.

pub mod health;
pub mod nodes;
pub mod ping;
pub mod services;
pub mod status;
