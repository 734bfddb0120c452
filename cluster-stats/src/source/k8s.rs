use super::{ClusterConnector, ClusterDataSource, NodeUsage};
use crate::{config::KubeConfig, errors::ClusterError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Node, Pod, Service};
use kube::api::{Api, ListParams};
use kube::core::{DynamicObject, GroupVersionKind};
use kube::discovery::ApiResource;
use kube::{Client, ResourceExt};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Data source backed by the Kubernetes API server and metrics-server.
#[derive(Clone)]
pub struct KubeDataSource {
    client: Client,
}

impl KubeDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn node_metrics_api(&self) -> Api<DynamicObject> {
        let gvk =
            GroupVersionKind::gvk("metrics.k8s.io", "v1beta1", "NodeMetrics");
        let ar = ApiResource::from_gvk_with_plural(&gvk, "nodes");
        Api::all_with(self.client.clone(), &ar)
    }
}

fn usage_field(
    obj: &DynamicObject,
    field: &'static str,
) -> Result<String, ClusterError> {
    obj.data
        .get("usage")
        .and_then(|usage| usage.get(field))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(ClusterError::MissingField(field))
}

#[async_trait]
impl ClusterDataSource for KubeDataSource {
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        let api: Api<Node> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_pods(&self) -> Result<Vec<Pod>, ClusterError> {
        let api: Api<Pod> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_services(&self) -> Result<Vec<Service>, ClusterError> {
        let api: Api<Service> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_node_metrics(&self) -> Result<Vec<NodeUsage>, ClusterError> {
        let list = self
            .node_metrics_api()
            .list(&ListParams::default())
            .await?;
        list.items
            .iter()
            .map(|obj| -> Result<NodeUsage, ClusterError> {
                Ok(NodeUsage {
                    name: obj.name_any(),
                    cpu: usage_field(obj, "cpu")?,
                    memory: usage_field(obj, "memory")?,
                })
            })
            .collect()
    }
}

/// Builds a client from the inferred environment (in-cluster service
/// account or local kubeconfig) on first use. A failed build is retried on
/// the next call.
pub struct KubeConnector {
    config: KubeConfig,
    client: OnceCell<Client>,
}

impl KubeConnector {
    pub fn new(config: KubeConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn build_client(&self) -> Result<Client, ClusterError> {
        let mut kube_config = kube::Config::infer().await?;
        kube_config.connect_timeout = Some(self.config.connect_timeout);
        kube_config.read_timeout = Some(self.config.read_timeout);
        info!(
            cluster_url = %kube_config.cluster_url,
            "Kubernetes client configured"
        );
        Ok(Client::try_from(kube_config)?)
    }
}

#[async_trait]
impl ClusterConnector for KubeConnector {
    async fn connect(
        &self,
    ) -> Result<Arc<dyn ClusterDataSource>, ClusterError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                debug!("initializing Kubernetes client");
                self.build_client().await
            })
            .await?;
        Ok(Arc::new(KubeDataSource::new(client.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_metrics(value: serde_json::Value) -> DynamicObject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_usage_field_reads_nested_quantities() {
        let obj = node_metrics(json!({
            "apiVersion": "metrics.k8s.io/v1beta1",
            "kind": "NodeMetrics",
            "metadata": { "name": "node-a" },
            "timestamp": "2024-01-01T00:00:00Z",
            "window": "20s",
            "usage": { "cpu": "250000000n", "memory": "1048576Ki" }
        }));
        assert_eq!(usage_field(&obj, "cpu").unwrap(), "250000000n");
        assert_eq!(usage_field(&obj, "memory").unwrap(), "1048576Ki");
    }

    #[test]
    fn test_usage_field_missing() {
        let obj = node_metrics(json!({
            "apiVersion": "metrics.k8s.io/v1beta1",
            "kind": "NodeMetrics",
            "metadata": { "name": "node-a" }
        }));
        assert!(matches!(
            usage_field(&obj, "cpu"),
            Err(ClusterError::MissingField("cpu"))
        ));
    }
}
