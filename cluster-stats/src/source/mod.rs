mod k8s;

pub use k8s::{KubeConnector, KubeDataSource};

use crate::errors::ClusterError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Node, Pod, Service};
use std::sync::Arc;

/// Raw usage sample of a single node as reported by the metrics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUsage {
    pub name: String,
    pub cpu: String,
    pub memory: String,
}

/// Read-only view of the cluster control plane.
#[async_trait]
pub trait ClusterDataSource: Send + Sync + 'static {
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError>;

    /// Pods across all namespaces.
    async fn list_pods(&self) -> Result<Vec<Pod>, ClusterError>;

    /// Services across all namespaces.
    async fn list_services(&self) -> Result<Vec<Service>, ClusterError>;

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError>;

    /// Fails when no metrics backend is installed.
    async fn list_node_metrics(&self) -> Result<Vec<NodeUsage>, ClusterError>;
}

/// Produces the data source used for one collection.
#[async_trait]
pub trait ClusterConnector: Send + Sync + 'static {
    async fn connect(
        &self,
    ) -> Result<Arc<dyn ClusterDataSource>, ClusterError>;
}

/// Connector handing out an already constructed data source.
pub struct StaticConnector {
    source: Arc<dyn ClusterDataSource>,
}

impl StaticConnector {
    pub fn new<S: ClusterDataSource>(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

#[async_trait]
impl ClusterConnector for StaticConnector {
    async fn connect(
        &self,
    ) -> Result<Arc<dyn ClusterDataSource>, ClusterError> {
        Ok(self.source.clone())
    }
}
