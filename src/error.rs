use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("Data file for {city} not found: {}", path.display())]
    SourceNotFound { city: String, path: PathBuf },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Input closed while waiting for {0}")]
    InputClosed(String),
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
