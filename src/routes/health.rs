use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = if state.pool.is_closed() { "closed" } else { "open" };
    let body = json!({
        "status": "ok",
        "database_pool": database,
    });
    (StatusCode::OK, Json(body))
}
