use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::{
    aggregator::StatsAggregator,
    config::AppConfig,
    fallback::{DemoFallback, FallbackPolicy, StrictFallback},
    server::ApiServer,
    source::KubeConnector,
};

pub fn fallback_policy(config: &AppConfig) -> Arc<dyn FallbackPolicy> {
    if config.demo_fallback {
        Arc::new(DemoFallback)
    } else {
        Arc::new(StrictFallback)
    }
}

/// Aggregator talking to the cluster the process runs in (or the current
/// kubeconfig context). The client is built lazily on the first request.
pub fn build_aggregator(config: &AppConfig) -> StatsAggregator {
    StatsAggregator::new(
        Arc::new(KubeConnector::new(config.kube())),
        fallback_policy(config),
        config.cluster_name(),
    )
}

/// Build a fully-wired ApiServer from environment variables.
pub fn build_api_server_from_env() -> Result<ApiServer> {
    let config = AppConfig::load_from_env()?;
    Ok(build_api_server(&config))
}

pub fn build_api_server(config: &AppConfig) -> ApiServer {
    let aggregator = build_aggregator(config);
    info!(
        cluster = aggregator.cluster_name(),
        demo_fallback = config.demo_fallback,
        "Cluster stats aggregator ready"
    );
    ApiServer::new(Arc::new(aggregator), config.server())
}
