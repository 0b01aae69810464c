use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{error::Result, middleware::auth::AuthUser, models::role::Capabilities, AppState};

#[utoipa::path(
    get,
    path = "/api/advisors",
    responses(
        (status = 200, description = "Active advisors in distribution order"),
        (status = 403, description = "Caller may not manage advisors")
    )
)]
pub async fn list_advisors(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::MANAGE_ADVISORS)?;
    let advisors = state.advisor_service.list_active().await?;
    Ok(Json(advisors))
}
