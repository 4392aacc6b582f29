use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "TalentHub API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Announcement and notification service for the TalentHub platform",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "notifications": "/api/notifications",
            "admin": "/admin"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
