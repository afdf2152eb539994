use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Liveness endpoint for load balancers.
///
/// Always 200 while the process is up; the `database` field says whether the
/// store answered.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.users.ping().await {
        Ok(()) => "Connected",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "Disconnected"
        }
    };

    let response = HealthResponse {
        status: "OK".to_string(),
        database: db_status.to_string(),
    };

    (StatusCode::OK, Json(response))
}
