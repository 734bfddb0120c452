use anyhow::Result;
use cluster_stats::{AppConfig, build_api_server, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load_from_env()?;
    init_tracing(&config.logging());

    info!("Starting cluster stats server with environment-based config");
    let server = build_api_server(&config);

    server
        .serve()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}
