use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    dto::candidate_dto::BulkExportRequest,
    error::Result,
    middleware::auth::AuthUser,
    models::role::Capabilities,
    services::export_service::ExportService,
    AppState,
};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[utoipa::path(
    post,
    path = "/api/candidates/export",
    request_body = BulkExportRequest,
    responses(
        (status = 200, description = "XLSX workbook"),
        (status = 403, description = "Caller may not export")
    )
)]
/// Export selected candidates, or all of them when no ids are given, as XLSX.
pub async fn export_candidates(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkExportRequest>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::EXPORT_CANDIDATES)?;

    let ids = payload.candidate_ids.filter(|ids| !ids.is_empty());
    let candidates = state.candidate_service.list_for_export(ids.as_deref()).await?;
    let advisor_emails = state.advisor_service.email_map().await?;

    let buffer = ExportService::generate_candidates_xlsx(&candidates, &advisor_emails)?;
    tracing::info!(user_id = %user.id, rows = candidates.len(), "candidates exported");

    let filename = format!("reclutas_{}.xlsx", chrono::Utc::now().format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
