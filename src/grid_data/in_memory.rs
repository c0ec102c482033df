use crate::grid_data::error::GridDataError;
use crate::grid_data::GridDataProvider;
use crate::types::coordinates::LatLon;
use crate::types::grid_point::GridCell;

/// Provider over caller-supplied cells, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGridProvider {
    cells: Vec<GridCell>,
}

impl InMemoryGridProvider {
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// The `count` cells nearest to `target`, nearest first. Ties keep
    /// insertion order.
    pub fn nearest(&self, target: LatLon, count: usize) -> Vec<GridCell> {
        let mut ranked: Vec<(f64, &GridCell)> = self
            .cells
            .iter()
            .map(|c| (c.point.distance_km(target), c))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked
            .into_iter()
            .take(count)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

impl GridDataProvider for InMemoryGridProvider {
    async fn neighbours(
        &self,
        target: LatLon,
        count: usize,
    ) -> Result<Vec<GridCell>, GridDataError> {
        Ok(self.nearest(target, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::interpolator::tests::{sample, series_with};
    use crate::types::grid_point::GridPoint;

    fn cell(id: &str, lat: f64, lon: f64) -> GridCell {
        GridCell::new(
            GridPoint::new(id, lat, lon, 5.0),
            series_with(3, |h| sample(h, 0.0)),
        )
    }

    #[tokio::test]
    async fn test_neighbours_are_nearest_first() -> Result<(), GridDataError> {
        let provider = InMemoryGridProvider::new(vec![
            cell("far", 37.0, 140.0),
            cell("near", 36.51, 140.0),
            cell("mid", 36.6, 140.0),
        ]);
        let cells = provider.neighbours(LatLon(36.5, 140.0), 2).await?;
        let ids: Vec<_> = cells.iter().map(|c| c.point.id.as_str()).collect();
        assert_eq!(ids, ["near", "mid"]);
        assert_eq!(provider.neighbours(LatLon(36.5, 140.0), 10).await?.len(), 3);
        Ok(())
    }
}
