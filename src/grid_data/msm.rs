use crate::grid_data::data_loader::GridDataLoader;
use crate::grid_data::error::GridDataError;
use crate::grid_data::extractor::frame_to_series;
use crate::grid_data::locator::GridLocator;
use crate::grid_data::GridDataProvider;
use crate::types::coordinates::LatLon;
use crate::types::grid_point::{GridCell, GridPoint};
use futures_util::future::try_join_all;
use log::debug;
use std::path::Path;
use tokio::task;

/// Provider backed by a mirror of the MSM basic dataset.
///
/// The mirror serves `grid/points.json.gz` (a JSON list of grid points) and
/// one `msm/{id}.csv.gz` file per cell. Both are cached under the cache folder
/// so that each file is downloaded once; every request then scans the cached
/// parquet files of its cells afresh.
pub struct MsmGridProvider {
    locator: GridLocator,
    loader: GridDataLoader,
}

impl MsmGridProvider {
    /// Opens the provider, loading (or first downloading) the grid catalogue.
    pub async fn new(base_url: &str, cache_folder: &Path) -> Result<Self, GridDataError> {
        tokio::fs::create_dir_all(cache_folder)
            .await
            .map_err(|e| GridDataError::CacheDirCreation(cache_folder.to_path_buf(), e))?;
        let locator = GridLocator::new(cache_folder, base_url).await?;
        Ok(Self {
            locator,
            loader: GridDataLoader::new(cache_folder, base_url),
        })
    }

    pub fn locator(&self) -> &GridLocator {
        &self.locator
    }

    /// Fetches a single cell by id.
    pub async fn cell(&self, grid_id: &str) -> Result<GridCell, GridDataError> {
        let point = self
            .locator
            .get(grid_id)
            .cloned()
            .ok_or_else(|| GridDataError::UnknownGridId(grid_id.to_string()))?;
        self.load_cell(point).await
    }

    async fn load_cell(&self, point: GridPoint) -> Result<GridCell, GridDataError> {
        let frame = self.loader.get_frame(&point.id).await?;
        let grid_id = point.id.clone();
        let series = task::spawn_blocking(move || frame_to_series(frame, &grid_id)).await??;
        debug!("Loaded {} hours for grid cell {}", series.len(), point.id);
        Ok(GridCell::new(point, series))
    }
}

impl GridDataProvider for MsmGridProvider {
    async fn neighbours(
        &self,
        target: LatLon,
        count: usize,
    ) -> Result<Vec<GridCell>, GridDataError> {
        let points = self.locator.nearest(target, count);
        try_join_all(points.into_iter().map(|(point, _)| self.load_cell(point))).await
    }
}
