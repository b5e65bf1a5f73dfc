pub mod api; // HTTP API
pub mod config;
pub mod dataset; // Reference report dataset
pub mod export;
pub mod model_service; // Exclusive model access
pub mod pipeline;
pub mod sample_pdf;

use anyhow::Context;

use crate::api::{start_api_server, ApiContext};
use crate::config::ServiceConfig;

/// Serve the HTTP API until Ctrl-C.
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let addr: std::net::SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_addr))?;

    tracing::info!(
        "{} starting v{} (summary: {}, diagnosis: {})",
        config::APP_NAME,
        config::APP_VERSION,
        config.summary_model,
        config.active_diagnosis_model()
    );

    let ctx = ApiContext::new(config);
    let mut server = start_api_server(ctx, addr)
        .await
        .map_err(anyhow::Error::msg)?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    server.shutdown();
    server.wait().await;
    Ok(())
}
