use crate::{errors::ApiError, models::ClusterSnapshot, server::AppState};
use axum::{Json, extract::State};
use tracing::error;

pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ClusterSnapshot>, ApiError> {
    match state.aggregator.collect().await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to fetch cluster stats: {}", e);
            Err(ApiError::InternalServerError(
                "Failed to fetch cluster stats".to_string(),
            ))
        }
    }
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
