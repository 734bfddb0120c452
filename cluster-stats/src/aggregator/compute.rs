use crate::errors::ClusterError;
use crate::models::{
    NodeStats, PodStats, ServiceStats, UsageStats, Utilization,
};
use crate::quantity::{KIB_PER_GIB, parse_cpu_cores, parse_memory_kib};
use crate::source::NodeUsage;
use k8s_openapi::api::core::v1::{Node, Pod, Service};

fn is_ready(node: &Node) -> bool {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conds| {
            conds.iter().any(|c| c.type_ == "Ready" && c.status == "True")
        })
        .unwrap_or(false)
}

fn kubelet_version(node: &Node) -> Option<String> {
    node.status
        .as_ref()
        .and_then(|s| s.node_info.as_ref())
        .map(|info| info.kubelet_version.clone())
        .filter(|v| !v.is_empty())
}

pub fn node_stats(nodes: &[Node]) -> NodeStats {
    NodeStats {
        count: nodes.len(),
        ready: nodes.iter().filter(|n| is_ready(n)).count(),
        version: nodes.first().and_then(kubelet_version),
    }
}

pub fn pod_stats(pods: &[Pod]) -> PodStats {
    let running = pods
        .iter()
        .filter(|p| {
            p.status.as_ref().and_then(|s| s.phase.as_deref())
                == Some("Running")
        })
        .count();
    PodStats {
        count: pods.len(),
        running,
    }
}

/// Everything except headless ClusterIP services counts as active.
fn is_active(service: &Service) -> bool {
    let Some(spec) = service.spec.as_ref() else {
        return true;
    };
    !(spec.type_.as_deref() == Some("ClusterIP")
        && spec.cluster_ip.as_deref() == Some("None"))
}

pub fn service_stats(services: &[Service]) -> ServiceStats {
    ServiceStats {
        count: services.len(),
        active: services.iter().filter(|s| is_active(s)).count(),
    }
}

fn parse_or_invalid(
    parse: fn(&str) -> Option<f64>,
    field: &'static str,
    value: &str,
) -> Result<f64, ClusterError> {
    parse(value).ok_or_else(|| ClusterError::InvalidQuantity {
        field,
        value: value.to_string(),
    })
}

fn capacity<'a>(node: &'a Node, resource: &str) -> Option<&'a str> {
    node.status
        .as_ref()
        .and_then(|s| s.capacity.as_ref())
        .and_then(|c| c.get(resource))
        .map(|q| q.0.as_str())
}

/// Cluster-wide CPU and memory utilization from per-node usage samples and
/// per-node capacity. Nodes without a capacity entry contribute nothing.
pub fn usage_stats(
    samples: &[NodeUsage],
    nodes: &[Node],
) -> Result<UsageStats, ClusterError> {
    let mut cpu_used = 0.0;
    let mut memory_used_gib = 0.0;
    for sample in samples {
        cpu_used +=
            parse_or_invalid(parse_cpu_cores, "cpu usage", &sample.cpu)?;
        let memory_kib =
            parse_or_invalid(parse_memory_kib, "memory usage", &sample.memory)?;
        memory_used_gib += memory_kib / KIB_PER_GIB;
    }

    let mut cpu_capacity = 0.0;
    let mut memory_capacity_gib = 0.0;
    for node in nodes {
        if let Some(cpu) = capacity(node, "cpu") {
            cpu_capacity +=
                parse_or_invalid(parse_cpu_cores, "cpu capacity", cpu)?;
        }
        if let Some(memory) = capacity(node, "memory") {
            memory_capacity_gib +=
                parse_or_invalid(parse_memory_kib, "memory capacity", memory)?
                    / KIB_PER_GIB;
        }
    }

    Ok(UsageStats {
        cpu: Utilization::from_ratio(cpu_used, cpu_capacity),
        memory: Utilization::from_ratio(memory_used_gib, memory_capacity_gib),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    fn service(type_: &str, cluster_ip: &str) -> Service {
        serde_json::from_value(json!({
            "metadata": { "name": "svc" },
            "spec": { "type": type_, "clusterIP": cluster_ip }
        }))
        .unwrap()
    }

    fn sized_node(cpu: &str, memory: &str) -> Node {
        node(json!({
            "metadata": { "name": "n" },
            "status": { "capacity": { "cpu": cpu, "memory": memory } }
        }))
    }

    fn sample(cpu: &str, memory: &str) -> NodeUsage {
        NodeUsage {
            name: "n".into(),
            cpu: cpu.into(),
            memory: memory.into(),
        }
    }

    #[test]
    fn test_readiness_requires_ready_true() {
        let not_ready = node(json!({
            "metadata": {},
            "status": { "conditions": [
                { "type": "Ready", "status": "False" },
                { "type": "Disk", "status": "True" }
            ] }
        }));
        let ready = node(json!({
            "metadata": {},
            "status": {
                "conditions": [{ "type": "Ready", "status": "True" }],
                "nodeInfo": {
                    "architecture": "amd64",
                    "bootID": "",
                    "containerRuntimeVersion": "containerd://1.7.0",
                    "kernelVersion": "6.1.0",
                    "kubeProxyVersion": "v1.29.1",
                    "kubeletVersion": "v1.29.1",
                    "machineID": "",
                    "operatingSystem": "linux",
                    "osImage": "Ubuntu",
                    "systemUUID": ""
                }
            }
        }));
        let no_status = node(json!({ "metadata": {} }));

        let stats = node_stats(&[not_ready.clone(), ready.clone(), no_status]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.ready, 1);
        // version comes from the first node only
        assert_eq!(stats.version, None);

        let stats = node_stats(&[ready, not_ready]);
        assert_eq!(stats.version.as_deref(), Some("v1.29.1"));
    }

    #[test]
    fn test_empty_node_list() {
        let stats = node_stats(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.ready, 0);
        assert_eq!(stats.version, None);
    }

    #[test]
    fn test_pod_phases() {
        let pods: Vec<Pod> = ["Running", "Pending", "Running", "Succeeded"]
            .iter()
            .map(|phase| {
                serde_json::from_value(json!({
                    "metadata": {},
                    "status": { "phase": phase }
                }))
                .unwrap()
            })
            .collect();
        let stats = pod_stats(&pods);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.running, 2);
    }

    #[test]
    fn test_headless_services_are_inactive() {
        let services = vec![
            service("ClusterIP", "None"),
            service("ClusterIP", "10.96.0.10"),
            service("NodePort", "None"),
            service("LoadBalancer", "10.96.4.2"),
        ];
        let stats = service_stats(&services);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.active, 3);
        assert!(!is_active(&services[0]));
        assert!(is_active(&services[1]));
    }

    #[test]
    fn test_usage_percentages() {
        let nodes = vec![sized_node("2", "4Gi"), sized_node("2", "4Gi")];
        let samples = vec![
            sample("500000000n", "1048576Ki"),
            sample("1000m", "2Gi"),
        ];
        let stats = usage_stats(&samples, &nodes).unwrap();
        // 1.5 of 4 cores, 3 of 8 GiB
        assert_eq!(stats.cpu, Some(Utilization::Percent(38)));
        assert_eq!(stats.memory, Some(Utilization::Percent(38)));
    }

    #[test]
    fn test_zero_capacity_yields_none() {
        let nodes = vec![sized_node("0", "4Gi")];
        let samples = vec![sample("100m", "1Gi")];
        let stats = usage_stats(&samples, &nodes).unwrap();
        assert_eq!(stats.cpu, None);
        assert_eq!(stats.memory, Some(Utilization::Percent(25)));

        let stats = usage_stats(&samples, &[]).unwrap();
        assert_eq!(stats.cpu, None);
        assert_eq!(stats.memory, None);
    }

    #[test]
    fn test_malformed_quantity_is_an_error() {
        let nodes = vec![sized_node("2", "4Gi")];
        let err = usage_stats(&[sample("lots", "1Gi")], &nodes).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::InvalidQuantity {
                field: "cpu usage",
                ..
            }
        ));
    }
}
