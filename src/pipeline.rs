//! Sequencing of the core stages for one target point.

use crate::config::PipelineConfig;
use crate::correction::elevation::{check_target_elevation, correct, resolve_target_elevation};
use crate::derived::derive;
use crate::derived::invariants::check_series;
use crate::error::ClimateError;
use crate::interpolation::{interpolate, Confidence, InterpolationWeights};
use crate::standard_year::synthesize;
use crate::types::coordinates::TargetPoint;
use crate::types::grid_point::GridCell;
use crate::types::output_mode::OutputMode;
use crate::types::series::ClimateSeries;
use crate::types::standard_year::StandardYear;
use log::info;

/// The corrected, fully derived series for one target point, with the
/// interpolation details that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointClimate {
    pub target: TargetPoint,
    /// Elevation the series describes: the supplied one, or the effective grid
    /// elevation when none was supplied.
    pub target_elevation: f64,
    pub weights: InterpolationWeights,
    pub confidence: Confidence,
    pub effective_grid_elevation: f64,
    pub series: ClimateSeries,
}

/// Result of a pipeline run, by [`OutputMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClimateOutput {
    FullPeriod(PointClimate),
    DesignYear {
        point: PointClimate,
        year: StandardYear,
    },
}

impl ClimateOutput {
    pub fn mode(&self) -> OutputMode {
        match self {
            ClimateOutput::FullPeriod(_) => OutputMode::FullPeriod,
            ClimateOutput::DesignYear { .. } => OutputMode::DesignYear,
        }
    }

    pub fn point(&self) -> &PointClimate {
        match self {
            ClimateOutput::FullPeriod(point) | ClimateOutput::DesignYear { point, .. } => point,
        }
    }

    pub fn design_year(&self) -> Option<&StandardYear> {
        match self {
            ClimateOutput::FullPeriod(_) => None,
            ClimateOutput::DesignYear { year, .. } => Some(year),
        }
    }

    pub fn confidence(&self) -> &Confidence {
        &self.point().confidence
    }
}

/// Runs the core stages for `target` over already retrieved grid cells.
///
/// Interpolation, elevation correction and derivation always run; the
/// design-year synthesis runs only in [`OutputMode::DesignYear`]. The function
/// is pure: identical inputs give identical outputs.
///
/// # Errors
///
/// Any [`ClimateError`]. Cheap checks (configuration, domain, elevation,
/// input consistency) run before the interpolation starts.
pub fn run_pipeline(
    target: &TargetPoint,
    cells: &[GridCell],
    mode: OutputMode,
    config: &PipelineConfig,
) -> Result<ClimateOutput, ClimateError> {
    config.validate()?;
    target.location.ensure_in_domain()?;
    check_target_elevation(target, config.elevation_fallback)?;
    for cell in cells {
        check_series(&cell.series, &cell.point.id, config.negativity_tolerance)?;
    }

    let outcome = interpolate(target.location, cells, config)?;
    let target_elevation = resolve_target_elevation(
        target,
        outcome.effective_grid_elevation,
        config.elevation_fallback,
    )?;
    let corrected = correct(
        &outcome.series,
        outcome.effective_grid_elevation,
        target_elevation,
        config,
    );
    let series = derive(&corrected, target.location, target_elevation, config)?;
    info!(
        "Built {} hourly records for ({}, {}) at {:.1} m",
        series.len(),
        target.location.latitude(),
        target.location.longitude(),
        target_elevation
    );

    let point = PointClimate {
        target: *target,
        target_elevation,
        weights: outcome.weights,
        confidence: outcome.confidence,
        effective_grid_elevation: outcome.effective_grid_elevation,
        series,
    };

    match mode {
        OutputMode::FullPeriod => Ok(ClimateOutput::FullPeriod(point)),
        OutputMode::DesignYear => {
            let year = synthesize(&point.series, &config.standard_year)?;
            Ok(ClimateOutput::DesignYear { point, year })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{ElevationFallback, StandardYearConfig};
    use crate::interpolation::interpolator::tests::{sample, series_with};
    use crate::types::calendar::HOURS_PER_STANDARD_YEAR;
    use crate::types::coordinates::LatLon;
    use crate::types::grid_point::GridPoint;
    use crate::types::record::Meteo;
    use crate::types::variable::Variable;

    pub(crate) fn neighbours(hours: usize) -> Vec<GridCell> {
        let cell = |id: &str, lat: f64, lon: f64, elevation: f64, offset: f64| {
            GridCell::new(
                GridPoint::new(id, lat, lon, elevation),
                series_with(hours, |h| sample(h, offset)),
            )
        };
        vec![
            cell("a", 36.45, 140.0, 30.0, 0.0),
            cell("b", 36.55, 140.0, 60.0, 1.0),
            cell("c", 36.5, 140.0625, 5.0, 2.0),
            cell("d", 36.5, 139.9375, -2.0, 3.0),
        ]
    }

    #[test]
    fn test_coincident_single_cell_passes_through() {
        let raw = series_with(72, |h| sample(h, 0.0));
        let cells = vec![GridCell::new(
            GridPoint::new("5339-35", 36.5, 140.0, 20.0),
            raw.clone(),
        )];
        let target = TargetPoint::new(LatLon(36.5, 140.0), Some(20.0));
        let output =
            run_pipeline(&target, &cells, OutputMode::FullPeriod, &PipelineConfig::default())
                .unwrap();
        let point = output.point();
        assert_eq!(point.weights.get("5339-35"), Some(1.0));
        assert_eq!(point.confidence, Confidence::Full);
        assert_eq!(point.target_elevation, 20.0);
        assert_eq!(point.series.len(), raw.len());
        for (derived, input) in point.series.iter().zip(raw.iter()) {
            assert_eq!(derived.timestamp, input.timestamp);
            for variable in Variable::ALL {
                assert_eq!(derived.values.get(variable), input.values.get(variable));
            }
        }
    }

    #[test]
    fn test_outputs_hold_physical_invariants() {
        let target = TargetPoint::new(LatLon(36.49, 140.01), Some(350.0));
        let output = run_pipeline(
            &target,
            &neighbours(96),
            OutputMode::FullPeriod,
            &PipelineConfig::default(),
        )
        .unwrap();
        let point = output.point();
        // The ocean cell is excluded but keeps its place in the weights.
        assert_eq!(point.weights.get("d"), Some(0.0));
        assert!((point.weights.sum() - 1.0).abs() < 1e-12);
        for r in point.series.iter() {
            assert!(r.values.global_radiation >= 0.0);
            assert!(r.global_radiation_est >= 0.0);
            assert!(r.values.atmospheric_radiation >= 0.0);
            assert!(r.values.pressure > 0.0);
            assert!(r.values.precipitation >= 0.0);
            assert!(r.values.humidity >= 0.0);
            assert!((r.wind_speed - r.values.wind_u.hypot(r.values.wind_v)).abs() < 1e-12);
            assert!((0.0..360.0).contains(&r.wind_direction));
            assert!((0.0..=100.0).contains(&r.relative_humidity));
        }
    }

    #[test]
    fn test_higher_target_is_never_warmer() {
        let cells = neighbours(48);
        let config = PipelineConfig::default();
        let run = |elevation: f64| {
            let target = TargetPoint::new(LatLon(36.5, 140.0), Some(elevation));
            run_pipeline(&target, &cells, OutputMode::FullPeriod, &config).unwrap()
        };
        let low = run(10.0);
        let high = run(800.0);
        for (l, h) in low.point().series.iter().zip(high.point().series.iter()) {
            assert!(h.values.temperature < l.values.temperature);
            assert!(h.values.pressure < l.values.pressure);
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let cells = neighbours(48);
        let target = TargetPoint::new(LatLon(36.52, 139.98), None);
        let config = PipelineConfig::default();
        let a = run_pipeline(&target, &cells, OutputMode::FullPeriod, &config).unwrap();
        let b = run_pipeline(&target, &cells, OutputMode::FullPeriod, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.point().target_elevation, a.point().effective_grid_elevation);
    }

    #[test]
    fn test_rejections_before_any_work() {
        let cells = neighbours(24);
        let config = PipelineConfig::default();

        let outside = TargetPoint::new(LatLon(10.0, 140.0), Some(0.0));
        assert!(matches!(
            run_pipeline(&outside, &cells, OutputMode::FullPeriod, &config),
            Err(ClimateError::OutOfDomain { .. })
        ));

        let nan = TargetPoint::new(LatLon(36.5, 140.0), Some(f64::NAN));
        assert!(matches!(
            run_pipeline(&nan, &cells, OutputMode::FullPeriod, &config),
            Err(ClimateError::InvalidElevation { .. })
        ));

        let strict = PipelineConfig::builder()
            .elevation_fallback(ElevationFallback::Reject)
            .build();
        let missing = TargetPoint::new(LatLon(36.5, 140.0), None);
        assert!(matches!(
            run_pipeline(&missing, &cells, OutputMode::FullPeriod, &strict),
            Err(ClimateError::InvalidElevation {
                elevation: None,
                ..
            })
        ));

        let bad = PipelineConfig::builder().idw_exponent(0.5).build();
        assert!(matches!(
            run_pipeline(&missing, &cells, OutputMode::FullPeriod, &bad),
            Err(ClimateError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_input_names_the_cell() {
        let mut cells = neighbours(24);
        cells[2] = GridCell::new(
            cells[2].point.clone(),
            series_with(24, |h| Meteo {
                precipitation: if h == 5 { -3.0 } else { 0.0 },
                ..sample(h, 0.0)
            }),
        );
        let target = TargetPoint::new(LatLon(36.5, 140.0), Some(10.0));
        match run_pipeline(&target, &cells, OutputMode::FullPeriod, &PipelineConfig::default()) {
            Err(ClimateError::PhysicallyInconsistentInput {
                series,
                variable,
                value,
                ..
            }) => {
                assert_eq!(series, "c");
                assert_eq!(variable, Variable::Precipitation);
                assert_eq!(value, -3.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_all_ocean_neighbours() {
        let cells: Vec<GridCell> = neighbours(24)
            .into_iter()
            .map(|c| GridCell::new(GridPoint { elevation: 0.0, ..c.point }, c.series))
            .collect();
        let target = TargetPoint::new(LatLon(36.5, 140.0), Some(0.0));

        let output =
            run_pipeline(&target, &cells, OutputMode::FullPeriod, &PipelineConfig::default())
                .unwrap();
        assert!(output.confidence().is_degraded());

        let strict = PipelineConfig::builder().ocean_fallback(false).build();
        match run_pipeline(&target, &cells, OutputMode::FullPeriod, &strict) {
            Err(ClimateError::InsufficientGridData { rejected }) => assert_eq!(rejected.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_design_year_mode() {
        let hours = 2 * HOURS_PER_STANDARD_YEAR;
        let cells = vec![GridCell::new(
            GridPoint::new("x", 36.5, 140.0, 20.0),
            series_with(hours, |h| sample(h, 0.0)),
        )];
        let target = TargetPoint::new(LatLon(36.5, 140.0), Some(20.0));

        // 2012 is a leap year, so two standard years of hours stop on
        // 30 December 2012 and leave December with a single complete year.
        match run_pipeline(&target, &cells, OutputMode::DesignYear, &PipelineConfig::default()) {
            Err(ClimateError::InsufficientHistory { month, available, .. }) => {
                assert_eq!(month, 12);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected {other:?}"),
        }

        let config = PipelineConfig::builder()
            .standard_year(StandardYearConfig::builder().min_years(1).build())
            .build();
        let output = run_pipeline(&target, &cells, OutputMode::DesignYear, &config).unwrap();
        assert_eq!(output.mode(), OutputMode::DesignYear);
        assert_eq!(output.point().series.len(), hours);
        let year = output.design_year().unwrap();
        assert_eq!(year.len(), HOURS_PER_STANDARD_YEAR);
        assert_eq!(year.source_year(12), Some(2011));
    }
}
