pub mod advisors;
pub mod candidates;
pub mod docs;
pub mod export;
pub mod health;
pub mod import;
pub mod interviews;
pub mod tracking;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{
    config::get_config,
    middleware::{
        auth::require_bearer_auth,
        rate_limit::{new_rps_state, rps_middleware},
    },
    AppState,
};

/// Every HTTP route of the service, with auth and rate limiting applied.
pub fn app(state: AppState) -> Router {
    let config = get_config();

    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi_json));

    let public_api = Router::new()
        .route("/api/public/tracking/:folio", get(tracking::track_by_folio))
        .route(
            "/api/public/tracking/:folio/timeline",
            get(tracking::tracking_timeline),
        )
        .route("/api/public/verify-folio/:folio", get(tracking::verify_folio))
        .route("/api/public/recover-folio", post(tracking::recover_folio))
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(config.public_rps),
            rps_middleware,
        ));

    let protected_api = Router::new()
        .route(
            "/api/admin/imports",
            post(import::import_spreadsheet)
                .get(import::list_import_runs)
                .layer(DefaultBodyLimit::max(config.import_max_bytes)),
        )
        .route("/api/advisors", get(advisors::list_advisors))
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route("/api/candidates/export", post(export::export_candidates))
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate)
                .put(candidates::update_candidate)
                .delete(candidates::delete_candidate),
        )
        .route(
            "/api/interviews",
            get(interviews::list_interviews).post(interviews::create_interview),
        )
        .route(
            "/api/interviews/:id",
            get(interviews::get_interview)
                .put(interviews::update_interview)
                .delete(interviews::delete_interview),
        )
        .route("/api/stats", get(candidates::candidate_stats))
        .route_layer(axum::middleware::from_fn(require_bearer_auth));

    base_routes
        .merge(public_api)
        .merge(protected_api)
        .with_state(state)
}
