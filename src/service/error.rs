use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Data service has not been initialized")]
    NotInitialized,

    #[error("Release data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read release data from {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("Failed to parse release data: {0}")]
    Parse(#[from] csv::Error),
}
