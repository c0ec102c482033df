//! Defines the data structure representing a cell of the mesoscale model grid,
//! with the implementations needed for spatial indexing using the `rstar` crate.

use crate::types::coordinates::LatLon;
use crate::types::series::HourlySeries;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// A single cell of the mesoscale model grid.
///
/// Grid points are immutable and come from a [`crate::GridDataProvider`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GridPoint {
    /// Stable cell identifier (e.g. "5339-35").
    pub id: String,
    /// Latitude of the cell centre in decimal degrees.
    pub latitude: f64,
    /// Longitude of the cell centre in decimal degrees.
    pub longitude: f64,
    /// Representative terrain elevation of the cell in metres.
    ///
    /// Ocean and coastal cells sit at or slightly below zero.
    pub elevation: f64,
}

impl GridPoint {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            elevation,
        }
    }

    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// Great-circle distance from the cell centre to `point` in kilometres.
    pub fn distance_km(&self, point: LatLon) -> f64 {
        self.location().distance_km(point)
    }
}

/// A grid point together with its hourly basic-dataset series.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub point: GridPoint,
    pub series: HourlySeries,
}

impl GridCell {
    pub fn new(point: GridPoint, series: HourlySeries) -> Self {
        Self { point, series }
    }
}

/// Lets the grid catalogue be indexed in an R-tree.
///
/// A grid point is a degenerate AABB containing only its (latitude, longitude).
impl RTreeObject for GridPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

impl PointDistance for GridPoint {
    /// Squared Euclidean distance in degree space.
    ///
    /// Only used to order nearest-neighbour candidates; final distances are
    /// great-circle distances.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}
