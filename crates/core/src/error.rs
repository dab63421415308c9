#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to parse CSV dataset: {0}")]
    Csv(csv::Error),
    #[error("failed to parse JSON dataset: {0}")]
    Json(serde_json::Error),
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid page size {0} (allowed: 10, 20, 50, 100)")]
    InvalidPageSize(usize),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("patient {patient_id} has no recorded {field}")]
    IncompleteRecord {
        patient_id: String,
        field: &'static str,
    },
}

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
