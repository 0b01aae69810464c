pub mod candidate_dto;
pub mod import_dto;
pub mod interview_dto;
pub mod tracking_dto;
