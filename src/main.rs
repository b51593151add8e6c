//! embermud - EmberWorld multi-user virtual world server.
//!
//! A line-oriented MUD server built around a cooperative tick scheduler:
//! connections authenticate on their own task, admitted sessions are polled
//! once per tick, and at most one command per session is dispatched per pass.

mod config;
mod dispatch;
mod error;
mod games;
mod items;
mod network;
mod scheduler;
mod state;
mod store;
mod text;
mod world;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::Realm;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "embermud.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        info!(path = %config_path, "No config file found, using defaults");
        Config::default()
    };

    info!(
        server = %config.server.name,
        admin = %config.server.admin,
        "Starting embermud"
    );

    // Shared server context: registry, world, persistence, config-derived info
    let realm = Arc::new(Realm::new(&config)?);
    info!(
        rooms = realm.world.read().room_count(),
        data_dir = %config.data.dir.display(),
        "World built and profile store ready"
    );

    // Bind before spawning anything; a bind failure is fatal
    let gateway = Gateway::bind(config.listen, Arc::clone(&realm)).await?;
    info!(addr = %config.listen, "EmberWorld ready to rock");

    // One long-lived scheduler task, one accept loop. The scheduler
    // returns cleanly on shutdown; any failure (accept error, persistence
    // failure during admission or a reap) takes the process down.
    tokio::select! {
        result = gateway.run() => result?,
        result = scheduler::run(Arc::clone(&realm)) => result?,
        reason = realm.fatal_raised() => anyhow::bail!("{reason}"),
    }

    info!("Goodbye");
    Ok(())
}
