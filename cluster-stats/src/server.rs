use crate::{
    aggregator::StatsAggregator,
    api::{create_middleware_stack, handlers},
    config::ServerConfig,
};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<StatsAggregator>,
}

pub struct ApiServer {
    app: Router,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(aggregator: Arc<StatsAggregator>, config: ServerConfig) -> Self {
        let state = AppState { aggregator };
        Self {
            app: build_router(state),
            config,
        }
    }

    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("Cluster stats server listening on {}", listener.local_addr()?);
        info!("Stats available at: http://{}/api/stats", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Consume and return the underlying Axum Router so callers can serve it
    /// themselves (e.g. driving it directly in tests).
    pub fn into_router(self) -> Router {
        self.app
    }
}

/// Routes are GET-only; every other method or path answers with a JSON 404.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/stats",
            get(handlers::get_stats).fallback(handlers::not_found),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(create_middleware_stack())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        )
        .expect("failed to install signal handler")
        .recv()
        .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
