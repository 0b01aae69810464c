pub mod advisor_service;
pub mod candidate_service;
pub mod distribution;
pub mod export_service;
pub mod import_run_service;
pub mod import_service;
pub mod interview_service;
pub mod row_validator;
pub mod sheet_reader;
pub mod timeline;
