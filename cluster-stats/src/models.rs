use serde::{Serialize, Serializer};
use std::fmt;

pub const NOT_AVAILABLE: &str = "N/A";

/// Utilization rendered as `"<int>%"` or `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utilization {
    Percent(u32),
    #[default]
    Unavailable,
}

impl Utilization {
    /// Rounded percentage of `used` over `capacity`, or `None` when the
    /// ratio is undefined.
    pub fn from_ratio(used: f64, capacity: f64) -> Option<Self> {
        if !used.is_finite() || !capacity.is_finite() || capacity <= 0.0 {
            return None;
        }
        let pct = (100.0 * used / capacity).round().clamp(0.0, 100.0);
        Some(Utilization::Percent(pct as u32))
    }

    pub fn percent(&self) -> Option<u32> {
        match self {
            Utilization::Percent(p) => Some(*p),
            Utilization::Unavailable => None,
        }
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Utilization::Percent(p) => write!(f, "{}%", p),
            Utilization::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Utilization {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Point-in-time aggregate of cluster statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    pub cluster_name: String,
    pub node_count: usize,
    pub node_ready: usize,
    pub pod_count: usize,
    pub pod_running: usize,
    pub service_count: usize,
    pub service_active: usize,
    pub namespace_count: usize,
    pub cpu_usage: Utilization,
    pub memory_usage: Utilization,
    pub k8s_version: String,
}

impl ClusterSnapshot {
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            node_count: 0,
            node_ready: 0,
            pod_count: 0,
            pod_running: 0,
            service_count: 0,
            service_active: 0,
            namespace_count: 0,
            cpu_usage: Utilization::Unavailable,
            memory_usage: Utilization::Unavailable,
            k8s_version: NOT_AVAILABLE.to_string(),
        }
    }
}

/// One sub-query's contribution to a snapshot. Each implementation writes a
/// disjoint set of fields.
pub trait PartialStats {
    fn apply(self, snapshot: &mut ClusterSnapshot);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStats {
    pub count: usize,
    pub ready: usize,
    pub version: Option<String>,
}

impl PartialStats for NodeStats {
    fn apply(self, snapshot: &mut ClusterSnapshot) {
        snapshot.node_count = self.count;
        snapshot.node_ready = self.ready;
        snapshot.k8s_version =
            self.version.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PodStats {
    pub count: usize,
    pub running: usize,
}

impl PartialStats for PodStats {
    fn apply(self, snapshot: &mut ClusterSnapshot) {
        snapshot.pod_count = self.count;
        snapshot.pod_running = self.running;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStats {
    pub count: usize,
    pub active: usize,
}

impl PartialStats for ServiceStats {
    fn apply(self, snapshot: &mut ClusterSnapshot) {
        snapshot.service_count = self.count;
        snapshot.service_active = self.active;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceStats {
    pub count: usize,
}

impl PartialStats for NamespaceStats {
    fn apply(self, snapshot: &mut ClusterSnapshot) {
        snapshot.namespace_count = self.count;
    }
}

/// `None` marks a resource whose total capacity was zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageStats {
    pub cpu: Option<Utilization>,
    pub memory: Option<Utilization>,
}

impl PartialStats for UsageStats {
    fn apply(self, snapshot: &mut ClusterSnapshot) {
        if let Some(cpu) = self.cpu {
            snapshot.cpu_usage = cpu;
        }
        if let Some(memory) = self.memory {
            snapshot.memory_usage = memory;
        }
    }
}
