//! Configuration records for the pipeline.
//!
//! Every tunable constant of the pipeline lives in [`PipelineConfig`] with a
//! documented default. Records are built with `bon` builders:
//!
//! ```
//! use arcclimate::{PipelineConfig, SeparationMethod};
//!
//! let config = PipelineConfig::builder()
//!     .idw_exponent(2.0)
//!     .separation(SeparationMethod::Erbs)
//!     .build();
//! assert_eq!(config.neighbour_count, 4);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ClimateError;
use crate::types::calendar::Year;
use bon::Builder;

/// What to do when the target point has no elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElevationFallback {
    /// Use the weight-combined elevation of the grid cells, i.e. no elevation shift.
    #[default]
    GridInterpolated,
    /// Fail with [`ClimateError::InvalidElevation`].
    Reject,
}

/// Model used to split global horizontal radiation into direct normal and
/// diffuse horizontal parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparationMethod {
    /// Nagata diffuse model, solved by bisection on transmittance.
    #[default]
    Nagata,
    /// Watanabe diffuse model, solved by bisection on transmittance.
    Watanabe,
    /// Erbs clearness-index correlation for the diffuse fraction.
    Erbs,
    /// Udagawa clearness-index model for the direct part.
    Udagawa,
    /// Perez DIRINT model for the direct part, reading the neighbouring hours,
    /// the dew point and the site elevation.
    Perez,
    /// No separation columns are produced.
    Disabled,
}

/// Per-variable weights of the month similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct SimilarityWeights {
    #[builder(default = 0.2)]
    pub temperature: f64,
    #[builder(default = 0.2)]
    pub humidity: f64,
    #[builder(default = 0.5)]
    pub radiation: f64,
    #[builder(default = 0.1)]
    pub wind: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SimilarityWeights {
    pub fn total(&self) -> f64 {
        self.temperature + self.humidity + self.radiation + self.wind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct StandardYearConfig {
    /// Minimum number of complete candidate years per calendar month.
    #[builder(default = 2)]
    pub min_years: usize,
    /// Placeholder calendar year for design-year timestamps; must not be a leap year.
    #[builder(default = 1970)]
    pub reference_year: i32,
    /// Hours blended on each side of a month seam.
    #[builder(default = 6)]
    pub smoothing_window_hours: usize,
    #[builder(default)]
    pub weights: SimilarityWeights,
}

impl Default for StandardYearConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Every calibrated constant used by the pipeline.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct PipelineConfig {
    /// Number of nearest grid cells requested from the provider.
    #[builder(default = 4)]
    pub neighbour_count: usize,
    /// Inverse-distance exponent `p`; must be at least 1.
    #[builder(default = 1.0)]
    pub idw_exponent: f64,
    /// Distance under which the target is considered to sit on a grid point.
    #[builder(default = 0.001)]
    pub coincidence_tolerance_km: f64,
    /// Cells at or below this elevation (metres) are treated as ocean cells.
    #[builder(default = 0.0)]
    pub min_land_elevation: f64,
    /// Fall back to ocean cells, flagged as degraded, when no land cell is available.
    #[builder(default = true)]
    pub ocean_fallback: bool,
    /// Environmental lapse rate in °C per 100 m.
    #[builder(default = 0.65)]
    pub lapse_rate: f64,
    #[builder(default)]
    pub elevation_fallback: ElevationFallback,
    /// Relative change of global radiation per km of elevation gain.
    #[builder(default = 0.02)]
    pub shortwave_gain_per_km: f64,
    /// Bound on the relative elevation adjustment of either radiation term.
    #[builder(default = 0.10)]
    pub radiation_adjustment_limit: f64,
    /// Negative values down to `-negativity_tolerance` are treated as floating noise.
    #[builder(default = 1e-6)]
    pub negativity_tolerance: f64,
    /// Upper bound of atmospheric transmittance used by the global radiation estimate.
    #[builder(default = 0.85)]
    pub clear_sky_transmittance: f64,
    #[builder(default)]
    pub separation: SeparationMethod,
    #[builder(default)]
    pub standard_year: StandardYearConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Longest smoothing window that keeps both ramps inside the shortest month.
const MAX_SMOOTHING_WINDOW_HOURS: usize = 28 * 24 / 2;

impl PipelineConfig {
    /// Checks every field against its admissible range.
    pub fn validate(&self) -> Result<(), ClimateError> {
        let invalid = |msg: String| Err(ClimateError::InvalidConfiguration(msg));

        if self.neighbour_count == 0 {
            return invalid("neighbour_count must be at least 1".into());
        }
        if !(self.idw_exponent.is_finite() && self.idw_exponent >= 1.0) {
            return invalid(format!("idw_exponent must be >= 1, got {}", self.idw_exponent));
        }
        if !(self.coincidence_tolerance_km.is_finite() && self.coincidence_tolerance_km >= 0.0) {
            return invalid(format!(
                "coincidence_tolerance_km must be >= 0, got {}",
                self.coincidence_tolerance_km
            ));
        }
        if !self.min_land_elevation.is_finite() {
            return invalid("min_land_elevation must be finite".into());
        }
        if !(self.lapse_rate.is_finite() && self.lapse_rate >= 0.0) {
            return invalid(format!("lapse_rate must be >= 0, got {}", self.lapse_rate));
        }
        if !(self.shortwave_gain_per_km.is_finite() && self.shortwave_gain_per_km >= 0.0) {
            return invalid(format!(
                "shortwave_gain_per_km must be >= 0, got {}",
                self.shortwave_gain_per_km
            ));
        }
        if !(0.0..1.0).contains(&self.radiation_adjustment_limit) {
            return invalid(format!(
                "radiation_adjustment_limit must be in [0, 1), got {}",
                self.radiation_adjustment_limit
            ));
        }
        if !(self.negativity_tolerance.is_finite() && self.negativity_tolerance >= 0.0) {
            return invalid(format!(
                "negativity_tolerance must be >= 0, got {}",
                self.negativity_tolerance
            ));
        }
        if !(self.clear_sky_transmittance > 0.0 && self.clear_sky_transmittance <= 1.0) {
            return invalid(format!(
                "clear_sky_transmittance must be in (0, 1], got {}",
                self.clear_sky_transmittance
            ));
        }

        let sy = &self.standard_year;
        if sy.min_years == 0 {
            return invalid("standard_year.min_years must be at least 1".into());
        }
        if Year(sy.reference_year).is_leap() {
            return invalid(format!(
                "standard_year.reference_year {} is a leap year",
                sy.reference_year
            ));
        }
        if sy.smoothing_window_hours > MAX_SMOOTHING_WINDOW_HOURS {
            return invalid(format!(
                "standard_year.smoothing_window_hours must be <= {}, got {}",
                MAX_SMOOTHING_WINDOW_HOURS, sy.smoothing_window_hours
            ));
        }
        let w = &sy.weights;
        let all = [w.temperature, w.humidity, w.radiation, w.wind];
        if all.iter().any(|x| !(x.is_finite() && *x >= 0.0)) || w.total() <= 0.0 {
            return invalid("similarity weights must be non-negative with a positive sum".into());
        }
        Ok(())
    }
}
