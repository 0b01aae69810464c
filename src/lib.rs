pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    advisor_service::AdvisorService, candidate_service::CandidateService,
    import_run_service::ImportRunService, import_service::ImportService,
    interview_service::InterviewService,
};
use sqlx::PgPool;

pub type SpreadsheetImporter = ImportService<CandidateService, AdvisorService>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub candidate_service: CandidateService,
    pub advisor_service: AdvisorService,
    pub import_service: SpreadsheetImporter,
    pub import_run_service: ImportRunService,
    pub interview_service: InterviewService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let candidate_service = CandidateService::new(pool.clone());
        let advisor_service = AdvisorService::new(pool.clone());
        let import_service = ImportService::new(
            candidate_service.clone(),
            advisor_service.clone(),
            config.import_max_error_details,
        );
        let import_run_service = ImportRunService::new(pool.clone());
        let interview_service = InterviewService::new(pool.clone());

        Self {
            pool,
            candidate_service,
            advisor_service,
            import_service,
            import_run_service,
            interview_service,
        }
    }
}
