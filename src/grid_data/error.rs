use crate::error::ClimateError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridDataError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    // Errors during parquet writing (inside blocking task)
    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet cache file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download or decompression failed")]
    DownloadIo(#[from] std::io::Error),

    #[error("Failed to parse grid catalogue JSON")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error processing CSV data for grid cell '{grid_id}'")]
    CsvReadIo {
        grid_id: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing CSV data for grid cell '{grid_id}'")]
    CsvReadPolars {
        grid_id: String,
        #[source]
        source: PolarsError,
    },

    #[error("Polars operation failed for grid cell '{grid_id}': {source}")]
    PolarsError {
        grid_id: String,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' for grid cell '{grid_id}'")]
    MissingColumn { grid_id: String, column: String },

    #[error("Missing value in column '{column}' at row {row} for grid cell '{grid_id}'")]
    MissingValue {
        grid_id: String,
        column: String,
        row: usize,
    },

    #[error("Unparseable timestamp '{value}' for grid cell '{grid_id}'")]
    TimestampParse {
        grid_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Grid cell '{0}' is not in the catalogue")]
    UnknownGridId(String),

    #[error("Invalid series for grid cell")]
    InvalidSeries(#[source] ClimateError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
