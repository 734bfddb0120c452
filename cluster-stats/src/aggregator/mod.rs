pub mod compute;

use crate::errors::{ClusterError, StatsError};
use crate::fallback::FallbackPolicy;
use crate::models::{
    ClusterSnapshot, NamespaceStats, NodeStats, PartialStats, PodStats,
    ServiceStats, UsageStats,
};
use crate::source::{ClusterConnector, ClusterDataSource, StaticConnector};
use compute::{node_stats, pod_stats, service_stats, usage_stats};
use std::sync::Arc;
use tracing::{error, warn};

/// Builds cluster snapshots from independent, fault-isolated sub-queries.
#[derive(Clone)]
pub struct StatsAggregator {
    connector: Arc<dyn ClusterConnector>,
    policy: Arc<dyn FallbackPolicy>,
    cluster_name: String,
}

impl StatsAggregator {
    pub fn new(
        connector: Arc<dyn ClusterConnector>,
        policy: Arc<dyn FallbackPolicy>,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            policy,
            cluster_name: cluster_name.into(),
        }
    }

    pub fn with_source<S: ClusterDataSource>(
        source: S,
        policy: Arc<dyn FallbackPolicy>,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self::new(
            Arc::new(StaticConnector::new(source)),
            policy,
            cluster_name,
        )
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Collect one snapshot. Sub-query failures only blank their own fields;
    /// anything else is answered with the policy's fallback snapshot, or
    /// returned as an error when the policy has none.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(cluster = %self.cluster_name)
    )]
    pub async fn collect(&self) -> Result<ClusterSnapshot, StatsError> {
        match self.collect_live().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                error!(error = %e, "Error getting cluster stats");
                match self.policy.snapshot() {
                    Some(snapshot) => {
                        warn!("serving fallback cluster snapshot");
                        Ok(snapshot)
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn collect_live(&self) -> Result<ClusterSnapshot, StatsError> {
        let source = self.connector.connect().await?;
        let policy = self.policy.clone();
        let snapshot = ClusterSnapshot::new(self.cluster_name.clone());
        // A panic inside the task surfaces as a JoinError.
        let handle = tokio::spawn(gather(source, policy, snapshot));
        Ok(handle.await?)
    }
}

async fn gather(
    source: Arc<dyn ClusterDataSource>,
    policy: Arc<dyn FallbackPolicy>,
    mut snapshot: ClusterSnapshot,
) -> ClusterSnapshot {
    let source = source.as_ref();
    let (nodes, pods, services, namespaces, usage) = tokio::join!(
        fetch_nodes(source),
        fetch_pods(source),
        fetch_services(source),
        fetch_namespaces(source),
        fetch_usage(source),
    );

    merge(&mut snapshot, "nodes", nodes);
    merge(&mut snapshot, "pods", pods);
    merge(&mut snapshot, "services", services);
    merge(&mut snapshot, "namespaces", namespaces);
    merge_usage(&mut snapshot, usage, policy.as_ref());
    snapshot
}

fn merge<P: PartialStats>(
    snapshot: &mut ClusterSnapshot,
    query: &'static str,
    result: Result<P, ClusterError>,
) {
    match result {
        Ok(stats) => stats.apply(snapshot),
        Err(e) => warn!(query, error = %e, "Error fetching {}", query),
    }
}

fn merge_usage(
    snapshot: &mut ClusterSnapshot,
    result: Result<UsageStats, ClusterError>,
    policy: &dyn FallbackPolicy,
) {
    let (cpu, memory) = match result {
        Ok(stats) => (stats.cpu, stats.memory),
        Err(e) => {
            warn!(error = %e, "Metrics not available");
            (None, None)
        }
    };
    UsageStats {
        cpu: Some(cpu.unwrap_or_else(|| policy.cpu_usage())),
        memory: Some(memory.unwrap_or_else(|| policy.memory_usage())),
    }
    .apply(snapshot);
}

async fn fetch_nodes(
    source: &dyn ClusterDataSource,
) -> Result<NodeStats, ClusterError> {
    Ok(node_stats(&source.list_nodes().await?))
}

async fn fetch_pods(
    source: &dyn ClusterDataSource,
) -> Result<PodStats, ClusterError> {
    Ok(pod_stats(&source.list_pods().await?))
}

async fn fetch_services(
    source: &dyn ClusterDataSource,
) -> Result<ServiceStats, ClusterError> {
    Ok(service_stats(&source.list_services().await?))
}

async fn fetch_namespaces(
    source: &dyn ClusterDataSource,
) -> Result<NamespaceStats, ClusterError> {
    Ok(NamespaceStats {
        count: source.list_namespaces().await?.len(),
    })
}

/// Capacity comes from its own node listing, independent of `fetch_nodes`.
async fn fetch_usage(
    source: &dyn ClusterDataSource,
) -> Result<UsageStats, ClusterError> {
    let samples = source.list_node_metrics().await?;
    let nodes = source.list_nodes().await?;
    usage_stats(&samples, &nodes)
}
