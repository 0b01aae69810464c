use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rejected or failed spreadsheet row, numbered as in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub row: usize,
    pub reason: String,
}

/// Outcome of one import run, returned to the uploader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    pub total_processed: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Rows assigned per advisor email, including advisors that received none.
    pub distribution: BTreeMap<String, usize>,
    pub error_details: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRunsQuery {
    pub limit: Option<i64>,
}
