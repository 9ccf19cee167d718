use axum::http::StatusCode;

/// Liveness probe; answers without touching the database.
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
