use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Required data files not found in {dir}: {missing:?}")]
    RequiredFilesNotFound { dir: PathBuf, missing: Vec<String> },
    #[error("Metadata file not found in the provided directory")]
    MetadataFileNotFound,
    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),
}
