pub mod aggregator;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod logging;
pub mod models;
pub mod quantity;
pub mod server;
pub mod source;

pub use aggregator::StatsAggregator;
pub use config::*;
pub use errors::*;
pub use fallback::{DemoFallback, FallbackPolicy, StrictFallback};
pub use models::*;
pub use server::{ApiServer, AppState};
pub use source::{
    ClusterConnector, ClusterDataSource, KubeConnector, NodeUsage,
    StaticConnector,
};

pub use bootstrap::{build_api_server, build_api_server_from_env};
pub use logging::init_tracing;
