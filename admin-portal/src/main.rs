use admin_portal::config::get_configuration;
use admin_portal::startup::Application;
use dotenvy::dotenv;
use portal_core::observability::logging::init_tracing;
use portal_core::observability::metrics::init_metrics;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "admin-portal",
        &configuration.server.log_level,
        configuration.server.otlp_endpoint.as_deref(),
    );

    init_metrics();

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let app = Application::build(configuration).await?;

    info!("Starting admin-portal on {}", address);
    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
