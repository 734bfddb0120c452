use thiserror::Error;

/// Failure of a single sub-query against the cluster.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Client configuration error: {0}")]
    Config(String),

    #[error("Invalid quantity for {field}: '{value}'")]
    InvalidQuantity { field: &'static str, value: String },

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl From<kube::config::InferConfigError> for ClusterError {
    fn from(value: kube::config::InferConfigError) -> Self {
        ClusterError::Config(value.to_string())
    }
}

/// Failure of the aggregation as a whole.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Cluster data source unavailable: {0}")]
    SourceUnavailable(#[from] ClusterError),

    #[error("Stats collection failed: {0}")]
    Collection(String),
}

impl From<tokio::task::JoinError> for StatsError {
    fn from(value: tokio::task::JoinError) -> Self {
        StatsError::Collection(value.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};
        use serde_json::json;

        let (status, error_message) = match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
