//! Geographic coordinates, the target point of a request and the bounding
//! region covered by the mesoscale model grid.

use crate::error::ClimateError;
use haversine::{distance, Location as HaversineLocation, Units};
use serde::{Deserialize, Serialize};

/// Southern edge of the supported region, in decimal degrees.
pub const DOMAIN_MIN_LATITUDE: f64 = 22.4;
/// Northern edge of the supported region, in decimal degrees.
pub const DOMAIN_MAX_LATITUDE: f64 = 47.6;
/// Western edge of the supported region, in decimal degrees.
pub const DOMAIN_MIN_LONGITUDE: f64 = 120.0;
/// Eastern edge of the supported region, in decimal degrees.
pub const DOMAIN_MAX_LONGITUDE: f64 = 150.0;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use arcclimate::LatLon;
///
/// let tsukuba = LatLon(36.05, 140.12);
/// assert_eq!(tsukuba.0, 36.05); // Latitude
/// assert_eq!(tsukuba.1, 140.12); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(self) -> f64 {
        self.0
    }

    pub fn longitude(self) -> f64 {
        self.1
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(self, other: LatLon) -> f64 {
        distance(
            HaversineLocation {
                latitude: self.0,
                longitude: self.1,
            },
            HaversineLocation {
                latitude: other.0,
                longitude: other.1,
            },
            Units::Kilometers,
        )
    }

    /// Whether the coordinate lies inside the region covered by the model grid.
    pub fn in_domain(self) -> bool {
        (DOMAIN_MIN_LATITUDE..=DOMAIN_MAX_LATITUDE).contains(&self.0)
            && (DOMAIN_MIN_LONGITUDE..=DOMAIN_MAX_LONGITUDE).contains(&self.1)
    }

    /// Rejects coordinates outside the supported region.
    pub fn ensure_in_domain(self) -> Result<(), ClimateError> {
        if self.in_domain() {
            Ok(())
        } else {
            Err(ClimateError::OutOfDomain {
                latitude: self.0,
                longitude: self.1,
            })
        }
    }
}

/// The point a weather record is requested for.
///
/// `elevation` is optional: when it is `None` the configured
/// [`crate::ElevationFallback`] decides what happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPoint {
    pub location: LatLon,
    /// Elevation above sea level in metres.
    pub elevation: Option<f64>,
}

impl TargetPoint {
    pub fn new(location: LatLon, elevation: Option<f64>) -> Self {
        Self {
            location,
            elevation,
        }
    }
}
