use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::tracking_dto::{
        FolioCheckResponse, NextInterview, RecoverFolioRequest, RecoverFolioResponse,
        TimelineResponse, TrackingResponse,
    },
    error::{Error, Result},
    models::{candidate::Candidate, interview::Interview},
    services::timeline::build_timeline,
    utils::folio::normalize_folio,
    AppState,
};

impl From<Interview> for NextInterview {
    fn from(interview: Interview) -> Self {
        let kind_label = interview
            .kind()
            .map(|k| k.label().to_string())
            .unwrap_or_else(|| interview.kind.clone());
        Self {
            date: interview.scheduled_on,
            time: interview.starts_at,
            kind: interview.kind,
            kind_label,
        }
    }
}

impl From<Candidate> for TrackingResponse {
    fn from(candidate: Candidate) -> Self {
        let status_label = candidate
            .status()
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| candidate.status.clone());
        Self {
            folio: candidate.folio,
            name: candidate.name,
            status: candidate.status,
            status_label,
            position: candidate.position,
            registered_at: candidate.registered_at,
            updated_at: candidate.updated_at,
            next_interview: None,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/public/tracking/{folio}",
    params(
        ("folio" = String, Path, description = "Tracking code, e.g. REC-1A2B3C4D")
    ),
    responses(
        (status = 200, description = "Current status of the application", body = Json<TrackingResponse>),
        (status = 404, description = "Unknown folio"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn track_by_folio(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> Result<impl IntoResponse> {
    let candidate = find_application(&state, &folio).await?;
    let next = state.interview_service.next_pending(candidate.id).await?;

    let mut response = TrackingResponse::from(candidate);
    response.next_interview = next.map(NextInterview::from);
    Ok(Json(response))
}

async fn find_application(state: &AppState, folio: &str) -> Result<Candidate> {
    state
        .candidate_service
        .find_by_folio(&normalize_folio(folio))
        .await?
        .ok_or_else(|| Error::NotFound("No application found for this folio".into()))
}

#[utoipa::path(
    get,
    path = "/api/public/tracking/{folio}/timeline",
    params(
        ("folio" = String, Path, description = "Tracking code, e.g. REC-1A2B3C4D")
    ),
    responses(
        (status = 200, description = "Progress of the application stage by stage", body = Json<TimelineResponse>),
        (status = 404, description = "Unknown folio"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn tracking_timeline(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> Result<impl IntoResponse> {
    let candidate = find_application(&state, &folio).await?;
    let interviews = state.interview_service.for_candidate(candidate.id).await?;
    Ok(Json(build_timeline(&candidate, &interviews)))
}

#[utoipa::path(
    get,
    path = "/api/public/verify-folio/{folio}",
    params(
        ("folio" = String, Path, description = "Tracking code to check")
    ),
    responses(
        (status = 200, description = "The folio exists", body = Json<FolioCheckResponse>),
        (status = 404, description = "The folio does not exist", body = Json<FolioCheckResponse>),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn verify_folio(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> Result<impl IntoResponse> {
    let exists = state
        .candidate_service
        .folio_exists(&normalize_folio(&folio))
        .await?;
    let status = if exists { StatusCode::OK } else { StatusCode::NOT_FOUND };
    Ok((
        status,
        Json(FolioCheckResponse {
            success: exists,
            exists,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/public/recover-folio",
    request_body = RecoverFolioRequest,
    responses(
        (status = 200, description = "Folio of the matching application", body = Json<RecoverFolioResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "No application matches")
    )
)]
pub async fn recover_folio(
    State(state): State<AppState>,
    Json(payload): Json<RecoverFolioRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .find_by_email_and_phone(&payload.email, &payload.phone)
        .await?
        .ok_or_else(|| Error::NotFound("No application matches that email and phone".into()))?;
    Ok(Json(RecoverFolioResponse {
        folio: candidate.folio,
    }))
}
