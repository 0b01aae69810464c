use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        // --- Import ---
        routes::import::import_spreadsheet,
        routes::import::list_import_runs,
        // --- Candidates ---
        routes::candidates::list_candidates,
        routes::candidates::get_candidate,
        routes::candidates::create_candidate,
        routes::candidates::update_candidate,
        routes::candidates::delete_candidate,
        routes::candidates::candidate_stats,
        routes::export::export_candidates,
        // --- Interviews ---
        routes::interviews::list_interviews,
        routes::interviews::get_interview,
        routes::interviews::create_interview,
        routes::interviews::update_interview,
        routes::interviews::delete_interview,
        // --- Advisors ---
        routes::advisors::list_advisors,
        // --- Public ---
        routes::tracking::track_by_folio,
        routes::tracking::recover_folio,
        routes::tracking::tracking_timeline,
        routes::tracking::verify_folio,
    ),
    tags(
        (name = "reclutas", description = "Recruiting backend API")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_import_endpoint() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/api/admin/imports"]["post"].is_object());
        assert!(doc["paths"]["/api/public/tracking/{folio}"]["get"].is_object());
    }

    #[test]
    fn document_lists_interview_and_timeline_endpoints() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/api/interviews"]["post"].is_object());
        assert!(doc["paths"]["/api/interviews/{id}"]["delete"].is_object());
        assert!(doc["paths"]["/api/public/tracking/{folio}/timeline"]["get"].is_object());
        assert!(doc["paths"]["/api/public/verify-folio/{folio}"]["get"].is_object());
    }
}
