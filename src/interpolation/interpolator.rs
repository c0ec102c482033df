use crate::config::PipelineConfig;
use crate::error::ClimateError;
use crate::interpolation::weights::{inverse_distance_weights, InterpolationWeights};
use crate::types::coordinates::LatLon;
use crate::types::grid_point::{GridCell, GridPoint};
use crate::types::record::{HourlyRecord, Meteo};
use crate::types::series::HourlySeries;
use log::{debug, warn};

/// How much the interpolated values can be trusted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Confidence {
    /// Only land cells contributed.
    #[default]
    Full,
    /// Every candidate was an ocean cell and the ocean cells were used anyway.
    Degraded { ocean_cells: Vec<String> },
}

impl Confidence {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Confidence::Degraded { .. })
    }
}

/// Result of combining the grid cell series into one target series.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationOutcome {
    pub weights: InterpolationWeights,
    pub confidence: Confidence,
    /// `Σ w_i * elevation_i` over the contributing cells, in metres.
    pub effective_grid_elevation: f64,
    pub series: HourlySeries,
}

/// Combines the series of `cells` into one series for `target`.
///
/// Ocean cells (elevation at or below `min_land_elevation`) are excluded
/// unless no land cell is left, in which case they are used and the outcome
/// is flagged [`Confidence::Degraded`]. Every cell series must cover exactly
/// the same hours.
pub fn interpolate(
    target: LatLon,
    cells: &[GridCell],
    config: &PipelineConfig,
) -> Result<InterpolationOutcome, ClimateError> {
    let Some(first) = cells.first() else {
        return Err(ClimateError::InsufficientGridData { rejected: vec![] });
    };
    for cell in &cells[1..] {
        if !cell.series.is_aligned_with(&first.series) {
            return Err(ClimateError::MisalignedSeries {
                grid_id: cell.point.id.clone(),
                detail: format!(
                    "{} records from {:?}, expected {} records from {:?} as in '{}'",
                    cell.series.len(),
                    cell.series.first_timestamp(),
                    first.series.len(),
                    first.series.first_timestamp(),
                    first.point.id
                ),
            });
        }
    }

    let is_land = |point: &GridPoint| point.elevation > config.min_land_elevation;
    let land_count = cells.iter().filter(|c| is_land(&c.point)).count();

    let (used, confidence): (Vec<bool>, Confidence) = if land_count > 0 {
        for cell in cells.iter().filter(|c| !is_land(&c.point)) {
            debug!(
                "Excluding ocean cell '{}' (elevation {} m)",
                cell.point.id, cell.point.elevation
            );
        }
        (cells.iter().map(|c| is_land(&c.point)).collect(), Confidence::Full)
    } else if config.ocean_fallback {
        let ocean_cells: Vec<String> = cells.iter().map(|c| c.point.id.clone()).collect();
        warn!(
            "No land cell among {} candidates near ({}, {}); using ocean cells with degraded confidence",
            cells.len(),
            target.0,
            target.1
        );
        (vec![true; cells.len()], Confidence::Degraded { ocean_cells })
    } else {
        return Err(ClimateError::InsufficientGridData {
            rejected: cells.iter().map(|c| c.point.clone()).collect(),
        });
    };

    let used_cells: Vec<&GridCell> = cells
        .iter()
        .zip(&used)
        .filter_map(|(cell, keep)| keep.then_some(cell))
        .collect();
    let distances: Vec<f64> = used_cells
        .iter()
        .map(|c| c.point.distance_km(target))
        .collect();
    let used_weights = inverse_distance_weights(
        &distances,
        config.idw_exponent,
        config.coincidence_tolerance_km,
    );

    let mut used_iter = used_weights.iter();
    let entries: Vec<(String, f64)> = cells
        .iter()
        .zip(&used)
        .map(|(cell, keep)| {
            let w = if *keep {
                used_iter.next().copied().unwrap_or(0.0)
            } else {
                0.0
            };
            (cell.point.id.clone(), w)
        })
        .collect();

    // Zero weights are skipped so a coincident cell passes through unchanged.
    let contributors: Vec<(&GridCell, f64)> = used_cells
        .iter()
        .zip(&used_weights)
        .filter(|(_, w)| **w > 0.0)
        .map(|(cell, w)| (*cell, *w))
        .collect();

    let effective_grid_elevation = contributors
        .iter()
        .fold(0.0, |acc, (cell, w)| acc + w * cell.point.elevation);

    let records = (0..first.series.len())
        .map(|i| {
            let mut values = Meteo::default();
            for (cell, w) in &contributors {
                values.add_weighted(&cell.series.records()[i].values, *w);
            }
            HourlyRecord::new(first.series.records()[i].timestamp, values)
        })
        .collect();

    debug!(
        "Interpolated {} cells onto ({}, {}), effective grid elevation {:.2} m",
        contributors.len(),
        target.0,
        target.1,
        effective_grid_elevation
    );

    Ok(InterpolationOutcome {
        weights: InterpolationWeights::new(entries),
        confidence,
        effective_grid_elevation,
        series: HourlySeries::from_trusted(records),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    pub(crate) fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2011, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    pub(crate) fn series_with(hours: usize, f: impl Fn(usize) -> Meteo) -> HourlySeries {
        let records = (0..hours)
            .map(|h| HourlyRecord::new(start() + Duration::hours(h as i64), f(h)))
            .collect();
        HourlySeries::new(records, "test").unwrap()
    }

    pub(crate) fn sample(h: usize, offset: f64) -> Meteo {
        let x = h as f64;
        Meteo {
            temperature: 10.0 + offset + (x / 24.0 * std::f64::consts::TAU).sin() * 5.0,
            humidity: 6.0 + offset * 0.1,
            global_radiation: (1.5 * (x / 24.0 * std::f64::consts::TAU).sin()).max(0.0),
            atmospheric_radiation: 1.1,
            wind_u: 2.0 - offset * 0.05,
            wind_v: -1.5,
            pressure: 1005.0 - offset,
            precipitation: if h % 7 == 0 { 0.5 } else { 0.0 },
        }
    }

    fn cell(id: &str, lat: f64, lon: f64, elevation: f64, offset: f64) -> GridCell {
        GridCell::new(
            GridPoint::new(id, lat, lon, elevation),
            series_with(48, |h| sample(h, offset)),
        )
    }

    #[test]
    fn test_single_coincident_cell_passes_through() {
        let c = cell("5339-35", 36.5, 140.0, 20.0, 0.0);
        let outcome =
            interpolate(LatLon(36.5, 140.0), &[c.clone()], &PipelineConfig::default()).unwrap();
        assert_eq!(outcome.series, c.series);
        assert_eq!(outcome.weights.get("5339-35"), Some(1.0));
        assert_eq!(outcome.effective_grid_elevation, 20.0);
        assert_eq!(outcome.confidence, Confidence::Full);
    }

    #[test]
    fn test_coincident_cell_among_neighbours_passes_through() {
        let cells = [
            cell("a", 36.55, 140.0, 50.0, 3.0),
            cell("b", 36.5, 140.0, 20.0, 0.0),
            cell("c", 36.5, 140.0625, 80.0, -2.0),
        ];
        let outcome =
            interpolate(LatLon(36.5, 140.0), &cells, &PipelineConfig::default()).unwrap();
        assert_eq!(outcome.series, cells[1].series);
        assert_eq!(outcome.weights.get("a"), Some(0.0));
        assert_eq!(outcome.weights.get("b"), Some(1.0));
    }

    #[test]
    fn test_weights_are_normalised_and_values_convex() {
        let cells = [
            cell("a", 36.55, 140.0, 50.0, 3.0),
            cell("b", 36.45, 140.05, 20.0, 0.0),
            cell("c", 36.5, 140.1, 80.0, -2.0),
        ];
        let outcome =
            interpolate(LatLon(36.51, 140.02), &cells, &PipelineConfig::default()).unwrap();
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-12);
        assert!(outcome.weights.iter().all(|(_, w)| (0.0..=1.0).contains(&w)));
        assert!(outcome.effective_grid_elevation > 20.0);
        assert!(outcome.effective_grid_elevation < 80.0);
        for (i, record) in outcome.series.iter().enumerate() {
            let lo = cells
                .iter()
                .map(|c| c.series.records()[i].values.pressure)
                .fold(f64::INFINITY, f64::min);
            let hi = cells
                .iter()
                .map(|c| c.series.records()[i].values.pressure)
                .fold(f64::NEG_INFINITY, f64::max);
            assert!(record.values.pressure >= lo - 1e-9 && record.values.pressure <= hi + 1e-9);
        }
    }

    #[test]
    fn test_ocean_cells_are_excluded_when_land_exists() {
        let cells = [
            cell("sea", 36.5, 140.0, 0.0, 5.0),
            cell("land", 36.6, 140.0, 12.0, 0.0),
        ];
        let outcome =
            interpolate(LatLon(36.5, 140.0), &cells, &PipelineConfig::default()).unwrap();
        assert_eq!(outcome.weights.get("sea"), Some(0.0));
        assert_eq!(outcome.weights.get("land"), Some(1.0));
        assert_eq!(outcome.series, cells[1].series);
        assert_eq!(outcome.confidence, Confidence::Full);
    }

    #[test]
    fn test_all_ocean_degrades() {
        let cells = [
            cell("sea1", 36.5, 140.0, -1.0, 0.0),
            cell("sea2", 36.6, 140.0, 0.0, 1.0),
        ];
        let outcome =
            interpolate(LatLon(36.55, 140.0), &cells, &PipelineConfig::default()).unwrap();
        assert!(outcome.confidence.is_degraded());
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_ocean_without_fallback_fails() {
        let cells = [cell("sea1", 36.5, 140.0, -1.0, 0.0)];
        let config = PipelineConfig::builder().ocean_fallback(false).build();
        match interpolate(LatLon(36.5, 140.0), &cells, &config) {
            Err(ClimateError::InsufficientGridData { rejected }) => {
                assert_eq!(rejected.len(), 1);
                assert_eq!(rejected[0].id, "sea1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_no_cells_fails() {
        assert!(matches!(
            interpolate(LatLon(36.5, 140.0), &[], &PipelineConfig::default()),
            Err(ClimateError::InsufficientGridData { .. })
        ));
    }

    #[test]
    fn test_misaligned_series_fails() {
        let a = cell("a", 36.5, 140.0, 10.0, 0.0);
        let b = GridCell::new(
            GridPoint::new("b", 36.6, 140.0, 10.0),
            series_with(24, |h| sample(h, 0.0)),
        );
        match interpolate(LatLon(36.5, 140.0), &[a, b], &PipelineConfig::default()) {
            Err(ClimateError::MisalignedSeries { grid_id, .. }) => assert_eq!(grid_id, "b"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
