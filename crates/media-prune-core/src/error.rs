use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unsupported sort option: {0} (expected size, added, gap, last_activity or inactivity)")]
    UnsupportedSort(String),

    #[error("unsupported sort order: {0} (expected asc or desc)")]
    UnsupportedOrder(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
