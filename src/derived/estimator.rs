use crate::config::{PipelineConfig, SeparationMethod};
use crate::correction::psychrometrics::{dew_point, relative_humidity};
use crate::derived::invariants::check_record;
use crate::derived::perez::{PerezContext, PerezHour};
use crate::derived::separation::{erbs_diffuse, separate_in_context};
use crate::derived::solar_position::sun_position;
use crate::derived::wind::{wind_direction, wind_speed};
use crate::error::ClimateError;
use crate::types::coordinates::LatLon;
use crate::types::record::{ClimateRecord, Meteo, SunPosition};
use crate::types::series::{ClimateSeries, HourlySeries};
use log::{debug, info};

const STANDARD_PRESSURE: f64 = 1013.25;
/// Label used for the target series in error reports.
const TARGET_SERIES: &str = "target";

/// Reconstructs the derived variables of a corrected series for a site at
/// `location` and `elevation` (m).
///
/// Fails with [`ClimateError::PhysicallyInconsistentInput`] when an input
/// record breaks a non-negativity invariant beyond floating noise; noise
/// within the tolerance is clamped to zero.
pub fn derive(
    series: &HourlySeries,
    location: LatLon,
    elevation: f64,
    config: &PipelineConfig,
) -> Result<ClimateSeries, ClimateError> {
    let mut records = Vec::with_capacity(series.len());

    for record in series.iter() {
        check_record(record, TARGET_SERIES, config.negativity_tolerance)?;
        let values = clamp_noise(&record.values);
        let sun = sun_position(record.timestamp, location);
        let global_radiation_est =
            estimate_global(&values, &sun, config.clear_sky_transmittance);

        records.push(ClimateRecord {
            timestamp: record.timestamp,
            values,
            global_radiation_est,
            wind_speed: wind_speed(values.wind_u, values.wind_v),
            wind_direction: wind_direction(values.wind_u, values.wind_v),
            relative_humidity: relative_humidity(
                values.temperature,
                values.pressure,
                values.humidity,
            ),
            sun,
            split_est: None,
            split_model: None,
        });
    }

    if config.separation != SeparationMethod::Disabled {
        let unsolved = split_radiation(&mut records, config.separation, elevation);
        if unsolved > 0 {
            info!(
                "Radiation separation left {} of {} hours without a solution",
                unsolved,
                records.len()
            );
        }
    }
    Ok(ClimateSeries::from_trusted(records))
}

fn perez_hours(
    records: &[ClimateRecord],
    global: impl Fn(&ClimateRecord) -> f64,
) -> Vec<PerezHour> {
    records
        .iter()
        .map(|r| PerezHour {
            global: global(r),
            altitude: r.sun.altitude,
        })
        .collect()
}

/// Fills both radiation splits of every record and returns the number of
/// hours left unsolved.
fn split_radiation(
    records: &mut [ClimateRecord],
    method: SeparationMethod,
    elevation: f64,
) -> usize {
    let estimated = perez_hours(records, |r| r.global_radiation_est);
    let model = perez_hours(records, |r| r.values.global_radiation);

    let mut unsolved = 0;
    for (i, record) in records.iter_mut().enumerate() {
        let dew_point = match method {
            SeparationMethod::Perez => dew_point(record.values.humidity, record.values.pressure),
            _ => None,
        };
        let context = |hours: &[PerezHour]| PerezContext {
            previous: i.checked_sub(1).and_then(|j| hours.get(j)).copied(),
            next: hours.get(i + 1).copied(),
            dew_point,
            elevation,
        };
        record.split_est = separate_in_context(
            record.global_radiation_est,
            &record.sun,
            method,
            &context(&estimated),
        );
        record.split_model = separate_in_context(
            record.values.global_radiation,
            &record.sun,
            method,
            &context(&model),
        );
        if record.split_est.is_none() || record.split_model.is_none() {
            debug!(
                "Radiation separation did not converge at {}",
                record.timestamp
            );
            unsolved += 1;
        }
    }
    unsolved
}

fn clamp_noise(values: &Meteo) -> Meteo {
    Meteo {
        humidity: values.humidity.max(0.0),
        global_radiation: values.global_radiation.max(0.0),
        atmospheric_radiation: values.atmospheric_radiation.max(0.0),
        precipitation: values.precipitation.max(0.0),
        ..*values
    }
}

/// Estimated global horizontal radiation: the Erbs diffuse part of the model
/// value plus its direct part, capped at the clear-sky beam
/// `IN0 * τ^m * sin h` with relative air mass `m = (P / 1013.25) / sin h`.
/// Zero while the sun is below the horizon.
pub fn estimate_global(values: &Meteo, sun: &SunPosition, transmittance: f64) -> f64 {
    if !sun.is_up() || values.global_radiation <= 0.0 {
        return 0.0;
    }
    let sin_h = sun.sin_altitude();
    let global = values.global_radiation;
    let diffuse = erbs_diffuse(global, sun.extraterrestrial, sin_h).min(global);
    let direct = global - diffuse;
    let air_mass = (values.pressure / STANDARD_PRESSURE) / sin_h;
    let clear_beam = sun.extraterrestrial * transmittance.powf(air_mass) * sin_h;
    (diffuse + direct.min(clear_beam)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::interpolator::tests::{sample, series_with};

    const TSUKUBA: LatLon = LatLon(36.05, 140.12);

    #[test]
    fn test_derived_records_satisfy_invariants() {
        let series = series_with(24 * 10, |h| sample(h, 0.0));
        let derived = derive(&series, TSUKUBA, 25.0, &PipelineConfig::default()).unwrap();
        assert_eq!(derived.len(), series.len());
        for r in derived.iter() {
            let v = &r.values;
            assert!((r.wind_speed - (v.wind_u.powi(2) + v.wind_v.powi(2)).sqrt()).abs() < 1e-12);
            assert!((0.0..360.0).contains(&r.wind_direction));
            assert!((0.0..=100.0).contains(&r.relative_humidity));
            assert!(r.global_radiation_est >= 0.0);
            assert!(r.global_radiation_est <= v.global_radiation + 1e-12);
            assert!(v.global_radiation >= 0.0 && v.atmospheric_radiation >= 0.0);
            assert!(v.precipitation >= 0.0 && v.humidity >= 0.0 && v.pressure > 0.0);
            if let Some(split) = r.split_model {
                assert!(split.direct_normal >= 0.0 && split.diffuse_horizontal >= 0.0);
            }
            if !r.sun.is_up() {
                assert_eq!(r.global_radiation_est, 0.0);
            }
        }
    }

    #[test]
    fn test_input_series_is_not_modified() {
        let series = series_with(24, |h| sample(h, 0.0));
        let copy = series.clone();
        let derived = derive(&series, TSUKUBA, 25.0, &PipelineConfig::default()).unwrap();
        assert_eq!(series, copy);
        for (raw, r) in series.iter().zip(derived.iter()) {
            assert_eq!(raw.values, r.values);
            assert_eq!(raw.timestamp, r.timestamp);
        }
    }

    #[test]
    fn test_disabled_separation() {
        let series = series_with(24, |h| sample(h, 0.0));
        let config = PipelineConfig::builder()
            .separation(SeparationMethod::Disabled)
            .build();
        let derived = derive(&series, TSUKUBA, 25.0, &config).unwrap();
        assert!(derived
            .iter()
            .all(|r| r.split_est.is_none() && r.split_model.is_none()));
    }

    #[test]
    fn test_perez_separation_reads_the_series() {
        let series = series_with(48, |h| sample(h, 0.0));
        let config = PipelineConfig::builder()
            .separation(SeparationMethod::Perez)
            .build();
        let derived = derive(&series, TSUKUBA, 25.0, &config).unwrap();
        let mut direct_hours = 0;
        for r in derived.iter() {
            let split = r.split_model.unwrap();
            let sin_h = r.sun.sin_altitude();
            if r.sun.is_up() {
                let recomposed = split.direct_normal * sin_h + split.diffuse_horizontal;
                assert!((recomposed - r.values.global_radiation).abs() < 1e-9);
            } else {
                assert_eq!(split.direct_normal, 0.0);
            }
            if split.direct_normal > 0.0 {
                direct_hours += 1;
            }
            assert!(r.split_est.is_some());
        }
        assert!(direct_hours > 0);
    }

    #[test]
    fn test_negative_radiation_is_rejected() {
        let series = series_with(3, |h| Meteo {
            global_radiation: if h == 1 { -0.2 } else { 0.3 },
            ..sample(h, 0.0)
        });
        assert!(matches!(
            derive(&series, TSUKUBA, 25.0, &PipelineConfig::default()),
            Err(ClimateError::PhysicallyInconsistentInput { .. })
        ));
    }

    #[test]
    fn test_noise_is_clamped_to_zero() {
        let series = series_with(2, |h| Meteo {
            precipitation: -1e-9,
            ..sample(h, 0.0)
        });
        let derived = derive(&series, TSUKUBA, 25.0, &PipelineConfig::default()).unwrap();
        assert!(derived.iter().all(|r| r.values.precipitation == 0.0));
    }

    #[test]
    fn test_clear_sky_estimate_is_capped() {
        let sun = SunPosition {
            altitude: 60.0,
            azimuth: 180.0,
            extraterrestrial: 4.9,
        };
        let clear = Meteo {
            global_radiation: 4.9 * sun.sin_altitude(),
            pressure: 1013.25,
            ..Meteo::default()
        };
        let est = estimate_global(&clear, &sun, 0.85);
        assert!(est < clear.global_radiation);
        let cloudy = Meteo {
            global_radiation: 0.3,
            ..clear
        };
        assert!((estimate_global(&cloudy, &sun, 0.85) - 0.3).abs() < 1e-12);
    }
}
