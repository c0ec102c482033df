//! Retrieval of grid cells and their basic-dataset series.
//!
//! The core pipeline never performs I/O itself; it receives cells from a
//! [`GridDataProvider`]. Two providers ship with the crate:
//!
//! - [`InMemoryGridProvider`] over cells the caller already holds.
//! - [`MsmGridProvider`] over a mirror of the MSM basic dataset, with an
//!   on-disk cache (bincode catalogue, one parquet file per cell).

pub mod data_loader;
pub mod error;
pub mod extractor;
pub mod in_memory;
pub mod locator;
pub mod msm;

use crate::types::coordinates::LatLon;
use crate::types::grid_point::GridCell;
use std::future::Future;

pub use error::GridDataError;
pub use in_memory::InMemoryGridProvider;
pub use locator::GridLocator;
pub use msm::MsmGridProvider;

/// Source of grid cells around a target location.
pub trait GridDataProvider: Send + Sync {
    /// Returns up to `count` cells nearest to `target`, nearest first, each
    /// with its hourly series.
    fn neighbours(
        &self,
        target: LatLon,
        count: usize,
    ) -> impl Future<Output = Result<Vec<GridCell>, GridDataError>> + Send;
}
