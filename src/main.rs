//! `mailrecord` HTTP service.
//!
//! Reads configuration from the environment once, builds the transport and
//! store, and serves the API until Ctrl-C. Only startup errors end the
//! process; per-request failures become error responses.

use std::error::Error;

use mailrecord::{providers, server, store, Config, EmailPipeline};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    init_logging(&config.log_level);

    tracing::info!(
        version = mailrecord::VERSION,
        provider = config.transport.kind.as_str(),
        store = %config.store.uri,
        namespace = %config.store.namespace,
        "Starting mailrecord"
    );

    let transport = providers::from_config(config.transport)?;
    let store = store::connect(config.store).await?;
    let app = server::router(EmailPipeline::new(transport, store));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves,
/// so the server keeps running instead of shutting down at once.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
