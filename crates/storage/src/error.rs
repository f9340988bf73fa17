use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{} is missing a header row", .0.display())]
    MissingHeader(PathBuf),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}
