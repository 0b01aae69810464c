use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Json},
};
use bytes::Bytes;

use crate::{
    dto::import_dto::{ImportReport, ImportRunsQuery},
    error::{Error, Result},
    middleware::auth::AuthUser,
    models::role::Capabilities,
    AppState,
};

pub const UPLOAD_FIELD: &str = "file";
const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

pub fn is_spreadsheet_name(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.iter().any(|ok| ext.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        Error::BadRequest(e.body_text())
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !is_spreadsheet_name(&file_name) {
            return Err(Error::BadRequest(format!(
                "Unsupported file '{}': upload an .xlsx or .xls workbook",
                file_name
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;
        return Ok(Upload { file_name, bytes });
    }

    Err(Error::BadRequest(format!(
        "Missing '{}' field in multipart body",
        UPLOAD_FIELD
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/imports",
    responses(
        (status = 200, description = "Import finished, possibly with rejected rows", body = Json<ImportReport>),
        (status = 400, description = "Structural problem with the upload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not import")
    )
)]
/// Multipart upload with the workbook in the `file` field.
pub async fn import_spreadsheet(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::IMPORT_SPREADSHEET)?;

    let upload = read_upload(&mut multipart).await?;
    tracing::info!(
        user_id = %user.id,
        file = %upload.file_name,
        bytes = upload.bytes.len(),
        "spreadsheet import requested"
    );

    let report = state.import_service.import_workbook(&upload.bytes).await?;

    // The candidates are already committed; a missing audit row must not fail the request.
    if let Err(e) = state
        .import_run_service
        .record(Some(user.id), &upload.file_name, &report)
        .await
    {
        tracing::error!(error = %e, "failed to record import run");
    }

    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/admin/imports",
    params(
        ("limit" = Option<i64>, Query, description = "Number of runs to return")
    ),
    responses(
        (status = 200, description = "Most recent import runs first"),
        (status = 403, description = "Caller may not import")
    )
)]
pub async fn list_import_runs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ImportRunsQuery>,
) -> Result<impl IntoResponse> {
    user.require(Capabilities::IMPORT_SPREADSHEET)?;
    let runs = state.import_run_service.list_recent(query.limit).await?;
    Ok(Json(runs))
}
