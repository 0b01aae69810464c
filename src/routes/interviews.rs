use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{CreateInterviewPayload, InterviewListQuery, UpdateInterviewPayload},
    error::Result,
    middleware::auth::AuthUser,
    models::{
        interview::{Interview, InterviewChanges, NewInterview},
        role::Capabilities,
    },
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(
        ("candidate_id" = Option<Uuid>, Query, description = "Only this candidate's interviews"),
        ("status" = Option<String>, Query, description = "pending, completed or cancelled")
    ),
    responses(
        (status = 200, description = "Interviews in calendar order", body = Vec<Interview>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_interviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list(&query, user.candidate_scope())
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview found", body = Json<Interview>),
        (status = 404, description = "Interview not found")
    )
)]
pub async fn get_interview(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get(id, user.candidate_scope()).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<Interview>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found")
    )
)]
pub async fn create_interview(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInterviewPayload>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::SCHEDULE_INTERVIEWS)?;
    payload.validate()?;
    let new = NewInterview::try_from(payload)?;

    // Advisors schedule only for their own candidates.
    state
        .candidate_service
        .get(new.candidate_id, user.candidate_scope())
        .await?;

    let interview = state.interview_service.create(new).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[utoipa::path(
    put,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<Interview>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Interview not found")
    )
)]
pub async fn update_interview(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::SCHEDULE_INTERVIEWS)?;
    payload.validate()?;
    let changes = InterviewChanges::try_from(payload)?;
    let interview = state
        .interview_service
        .update(id, changes, user.candidate_scope())
        .await?;
    Ok(Json(interview))
}

#[utoipa::path(
    delete,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 204, description = "Interview deleted"),
        (status = 404, description = "Interview not found")
    )
)]
pub async fn delete_interview(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::SCHEDULE_INTERVIEWS)?;
    state
        .interview_service
        .delete(id, user.candidate_scope())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
