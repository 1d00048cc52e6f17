use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Course API",
            "version": version,
            "endpoints": {
                "greeting": "/greeting[/:lang] (public), /headers, /image (bearer token)",
                "trivia": "/categories, /categories/:id/questions, /questions, /search, /quizzes (public)",
                "drinks": "/drinks (public GET), /drinks-detail, /drinks/:id (permission scoped)",
                "donors": "/donors[/:id] (permission scoped)",
                "health": "/health (public)"
            }
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.store.ping().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}

/// Fallback for unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::resource_not_found()
}
