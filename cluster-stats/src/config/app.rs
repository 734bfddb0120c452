use anyhow::Result;
use envconfig::Envconfig;
use std::time::Duration;

pub const DEFAULT_CLUSTER_NAME: &str = "gke-rancher-testdrive";

#[derive(Debug, Clone, Envconfig)]
pub struct AppConfig {
    // Server configuration
    #[envconfig(from = "SERVER_HOST", default = "0.0.0.0")]
    pub server_host: String,

    #[envconfig(from = "PORT", default = "3000")]
    pub server_port: u16,

    // Cluster configuration
    #[envconfig(from = "CLUSTER_NAME")]
    pub cluster_name: Option<String>,

    /// Substitute synthetic values when live data is unavailable.
    #[envconfig(from = "DEMO_FALLBACK", default = "true")]
    pub demo_fallback: bool,

    #[envconfig(from = "KUBE_CONNECT_TIMEOUT_SECS", default = "5")]
    pub kube_connect_timeout_seconds: u64,

    #[envconfig(from = "KUBE_READ_TIMEOUT_SECS", default = "10")]
    pub kube_read_timeout_seconds: u64,

    // Observability configuration
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    #[envconfig(from = "LOG_FORMAT", default = "plain")]
    pub log_format: String,
}

impl AppConfig {
    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Self> {
        Ok(Self::init_from_env()?)
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
        }
    }

    /// Display name of the cluster; blank values count as unset.
    pub fn cluster_name(&self) -> String {
        self.cluster_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CLUSTER_NAME)
            .to_string()
    }

    pub fn kube(&self) -> KubeConfig {
        KubeConfig {
            connect_timeout: Duration::from_secs(
                self.kube_connect_timeout_seconds,
            ),
            read_timeout: Duration::from_secs(self.kube_read_timeout_seconds),
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        let json_format = match self.log_format.to_ascii_lowercase().as_str()
        {
            "json" | "structured" => true,
            // plain, text and pretty all map to the human readable format
            _ => false,
        };
        LoggingConfig {
            log_level: self.log_level.clone(),
            json_format,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct KubeConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub json_format: bool,
}
