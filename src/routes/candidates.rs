use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CandidateList, CandidateListQuery, CandidateStats, CreateCandidatePayload,
        UpdateCandidatePayload,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::{
        candidate::{Candidate, CandidateStatus, NewCandidate},
        role::Capabilities,
    },
    utils::{time, validation::non_blank},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Matches name, email, phone or position"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Paginated candidates", body = Json<CandidateList>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_candidates(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let list = state
        .candidate_service
        .list(&query, user.candidate_scope())
        .await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = Json<Candidate>),
        (status = 404, description = "Candidate not found")
    )
)]
pub async fn get_candidate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get(id, user.candidate_scope()).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = CreateCandidatePayload,
    responses(
        (status = 201, description = "Candidate created", body = Json<Candidate>),
        (status = 400, description = "Invalid payload, phone already registered or advisor_id is not an active advisor")
    )
)]
pub async fn create_candidate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::MANAGE_CANDIDATES)?;
    payload.validate()?;

    let phone = payload.phone.trim().to_string();
    if state.candidate_service.phone_exists(&phone).await? {
        return Err(Error::BadRequest(format!(
            "A candidate with phone {} is already registered",
            phone
        )));
    }

    let status = match non_blank(payload.status) {
        Some(raw) => raw.parse::<CandidateStatus>().map_err(Error::BadRequest)?,
        None => CandidateStatus::Active,
    };

    // Advisors can only create candidates for themselves.
    let advisor_id = match user.candidate_scope() {
        Some(own_id) => Some(own_id),
        None => match payload.advisor_id {
            Some(id) => Some(state.advisor_service.ensure_assignable(id).await?.id),
            None => None,
        },
    };

    let candidate = state
        .candidate_service
        .create(NewCandidate {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone,
            status,
            position: non_blank(payload.position),
            notes: non_blank(payload.notes),
            advisor_id,
            registered_at: time::now(),
        })
        .await?;

    tracing::info!(candidate_id = %candidate.id, folio = %candidate.folio, "candidate created");
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[utoipa::path(
    put,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    request_body = UpdateCandidatePayload,
    responses(
        (status = 200, description = "Candidate updated", body = Json<Candidate>),
        (status = 400, description = "Invalid payload or advisor_id is not an active advisor"),
        (status = 404, description = "Candidate not found")
    )
)]
pub async fn update_candidate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::MANAGE_CANDIDATES)?;
    payload.validate()?;

    // Reassignment is an administrator decision.
    if user.candidate_scope().is_some() {
        payload.advisor_id = None;
    } else if let Some(id) = payload.advisor_id {
        state.advisor_service.ensure_assignable(id).await?;
    }

    let candidate = state
        .candidate_service
        .update(id, payload, user.candidate_scope())
        .await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 204, description = "Candidate deleted"),
        (status = 403, description = "Caller may not delete candidates"),
        (status = 404, description = "Candidate not found")
    )
)]
pub async fn delete_candidate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::DELETE_CANDIDATES)?;
    state.candidate_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Candidate counts by status", body = Json<CandidateStats>),
        (status = 403, description = "Caller may not view statistics")
    )
)]
pub async fn candidate_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::VIEW_STATS)?;
    let stats = state.candidate_service.stats().await?;
    Ok(Json(stats))
}
