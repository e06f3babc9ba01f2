//! Fleetloop daemon - commits monitored samples on a fixed tick

use fleetloop_actuator::ScriptActuator;
use fleetloop_controller::{ControlLoop, ControllerConfig, Topology};
use fleetloop_repository::Repository;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = fleetloop_common::VERSION, "Starting Fleetloop controller...");

    let config = ControllerConfig::load()?;
    tracing::info!(
        dry_run = config.actuator.dry_run,
        script = %config.actuator.script,
        "Loaded configuration"
    );

    let repository = Arc::new(Repository::new());
    if let Some(path) = &config.control.topology_path {
        let objectives = Topology::from_path(path)?.apply(&repository)?;
        tracing::info!(%path, objectives = objectives.len(), "Loaded topology");
    }

    let actuator = Arc::new(ScriptActuator::new(
        config.actuator.command(),
        config.actuator.dry_run,
    ));
    let control = Arc::new(ControlLoop::new(
        repository,
        actuator,
        config.actuator.timeout(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let interval = config.control.tick_interval();
    let worker = {
        let control = control.clone();
        tokio::spawn(async move { control.run(interval, shutdown_rx).await })
    };

    tracing::info!("Fleetloop controller started successfully");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(true);
    worker.await?;

    Ok(())
}
