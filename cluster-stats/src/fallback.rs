use crate::config::DEFAULT_CLUSTER_NAME;
use crate::models::{ClusterSnapshot, Utilization};
use rand::Rng;
use std::ops::RangeInclusive;

pub const DEMO_CPU_RANGE: RangeInclusive<u32> = 20..=59;
pub const DEMO_MEMORY_RANGE: RangeInclusive<u32> = 30..=79;

/// What to report when live data cannot be obtained.
pub trait FallbackPolicy: Send + Sync + 'static {
    /// Used when the metrics query fails or CPU capacity is zero.
    fn cpu_usage(&self) -> Utilization;

    /// Used when the metrics query fails or memory capacity is zero.
    fn memory_usage(&self) -> Utilization;

    /// Replaces the whole snapshot when the data source is unreachable.
    /// `None` surfaces the failure to the caller instead.
    fn snapshot(&self) -> Option<ClusterSnapshot>;
}

/// Plausible synthetic values so dashboards always have something to show.
#[derive(Debug, Clone, Default)]
pub struct DemoFallback;

impl DemoFallback {
    pub fn demo_snapshot() -> ClusterSnapshot {
        ClusterSnapshot {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            node_count: 3,
            node_ready: 3,
            pod_count: 12,
            pod_running: 12,
            service_count: 5,
            service_active: 5,
            namespace_count: 7,
            cpu_usage: Utilization::Percent(35),
            memory_usage: Utilization::Percent(42),
            k8s_version: "v1.27.3".to_string(),
        }
    }
}

impl FallbackPolicy for DemoFallback {
    fn cpu_usage(&self) -> Utilization {
        Utilization::Percent(rand::rng().random_range(DEMO_CPU_RANGE))
    }

    fn memory_usage(&self) -> Utilization {
        Utilization::Percent(rand::rng().random_range(DEMO_MEMORY_RANGE))
    }

    fn snapshot(&self) -> Option<ClusterSnapshot> {
        Some(Self::demo_snapshot())
    }
}

/// Reports only what was observed.
#[derive(Debug, Clone, Default)]
pub struct StrictFallback;

impl FallbackPolicy for StrictFallback {
    fn cpu_usage(&self) -> Utilization {
        Utilization::Unavailable
    }

    fn memory_usage(&self) -> Utilization {
        Utilization::Unavailable
    }

    fn snapshot(&self) -> Option<ClusterSnapshot> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_values_stay_in_range() {
        let policy = DemoFallback;
        for _ in 0..200 {
            let cpu = policy.cpu_usage().percent().unwrap();
            let memory = policy.memory_usage().percent().unwrap();
            assert!(DEMO_CPU_RANGE.contains(&cpu), "cpu {cpu}");
            assert!(DEMO_MEMORY_RANGE.contains(&memory), "memory {memory}");
        }
    }

    #[test]
    fn test_strict_reports_nothing() {
        let policy = StrictFallback;
        assert_eq!(policy.cpu_usage(), Utilization::Unavailable);
        assert_eq!(policy.memory_usage(), Utilization::Unavailable);
        assert!(policy.snapshot().is_none());
    }
}
