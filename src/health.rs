//! Health endpoints: liveness is unconditional, readiness pings the database.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

pub fn health_router() -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/", get(health))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

async fn health(State(db): State<Arc<DatabaseConnection>>) -> impl IntoResponse {
    readiness(State(db)).await
}

async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": HealthStatus::Up,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

async fn readiness(State(db): State<Arc<DatabaseConnection>>) -> impl IntoResponse {
    match crate::db::check_connection(&db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": HealthStatus::Up,
                "database": "up",
                "timestamp": Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": HealthStatus::Down,
                "database": "down",
                "error": e.to_string(),
                "timestamp": Utc::now().to_rfc3339(),
            })),
        ),
    }
}
