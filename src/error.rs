use crate::grid_data::error::GridDataError;
use crate::types::grid_point::GridPoint;
use crate::types::variable::Variable;
use chrono::NaiveDateTime;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the computational core. All of them are terminal for the
/// current request.
#[derive(Debug, Error)]
pub enum ClimateError {
    #[error("Coordinate ({latitude}, {longitude}) lies outside the supported region")]
    OutOfDomain { latitude: f64, longitude: f64 },

    #[error(
        "No usable grid cells: {} candidate(s) rejected [{}]",
        .rejected.len(),
        join_ids(.rejected)
    )]
    InsufficientGridData { rejected: Vec<GridPoint> },

    #[error("Invalid target elevation {elevation:?}: {reason}")]
    InvalidElevation {
        elevation: Option<f64>,
        reason: String,
    },

    #[error("Physically inconsistent input in '{series}' at {timestamp}: {variable} = {value}")]
    PhysicallyInconsistentInput {
        series: String,
        timestamp: NaiveDateTime,
        variable: Variable,
        value: f64,
    },

    #[error("Month {month} has {available} complete year(s), at least {required} required")]
    InsufficientHistory {
        month: u32,
        available: usize,
        required: usize,
    },

    #[error("Series for grid cell '{grid_id}' is not aligned: {detail}")]
    MisalignedSeries { grid_id: String, detail: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

fn join_ids(points: &[GridPoint]) -> String {
    points
        .iter()
        .map(|p| p.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ArcClimateError {
    #[error(transparent)]
    Climate(#[from] ClimateError),

    #[error(transparent)]
    GridData(#[from] GridDataError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to build output frame")]
    OutputFrame(#[source] PolarsError),

    #[error("Failed to write CSV file '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing CSV file '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_grid_data_lists_rejected_ids() {
        let err = ClimateError::InsufficientGridData {
            rejected: vec![
                GridPoint::new("a", 36.0, 140.0, -1.0),
                GridPoint::new("b", 36.1, 140.0, 0.0),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("2 candidate(s)"));
        assert!(message.contains("a, b"));
    }

    #[test]
    fn test_core_error_converts_transparently() {
        let err: ArcClimateError = ClimateError::InvalidConfiguration("p < 1".into()).into();
        assert_eq!(err.to_string(), "Invalid configuration: p < 1");
    }
}
