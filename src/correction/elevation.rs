use crate::config::{ElevationFallback, PipelineConfig};
use crate::correction::psychrometrics::saturation_mixing_ratio;
use crate::error::ClimateError;
use crate::types::coordinates::TargetPoint;
use crate::types::record::{HourlyRecord, Meteo};
use crate::types::series::HourlySeries;
use log::debug;

/// Standard gravity, m/s².
const GRAVITY: f64 = 9.80665;
/// Specific gas constant of dry air, J/(kg K).
const DRY_AIR_GAS_CONSTANT: f64 = 287.05;
const ZERO_CELSIUS_K: f64 = 273.15;
/// Elevations beyond this magnitude (metres) are rejected as invalid.
const MAX_ABS_ELEVATION: f64 = 10_000.0;

/// Checks the supplied target elevation before any work is done.
pub fn check_target_elevation(
    target: &TargetPoint,
    fallback: ElevationFallback,
) -> Result<(), ClimateError> {
    match (target.elevation, fallback) {
        (Some(elevation), _) => check_value(elevation),
        (None, ElevationFallback::GridInterpolated) => Ok(()),
        (None, ElevationFallback::Reject) => Err(ClimateError::InvalidElevation {
            elevation: None,
            reason: "no target elevation supplied and no fallback configured".into(),
        }),
    }
}

/// The elevation the corrected series should describe.
pub fn resolve_target_elevation(
    target: &TargetPoint,
    effective_grid_elevation: f64,
    fallback: ElevationFallback,
) -> Result<f64, ClimateError> {
    check_target_elevation(target, fallback)?;
    Ok(target.elevation.unwrap_or(effective_grid_elevation))
}

fn check_value(elevation: f64) -> Result<(), ClimateError> {
    if !elevation.is_finite() {
        return Err(ClimateError::InvalidElevation {
            elevation: Some(elevation),
            reason: "elevation is not a finite number".into(),
        });
    }
    if elevation.abs() > MAX_ABS_ELEVATION {
        return Err(ClimateError::InvalidElevation {
            elevation: Some(elevation),
            reason: format!("elevation magnitude exceeds {MAX_ABS_ELEVATION} m"),
        });
    }
    Ok(())
}

/// Shifts an interpolated series from `effective_grid_elevation` to
/// `target_elevation`.
///
/// Temperature follows the lapse rate, pressure the barometric formula,
/// the mixing ratio is held but capped at saturation, and both radiation
/// terms receive a bounded adjustment. Wind and precipitation pass through.
pub fn correct(
    series: &HourlySeries,
    effective_grid_elevation: f64,
    target_elevation: f64,
    config: &PipelineConfig,
) -> HourlySeries {
    let dz = target_elevation - effective_grid_elevation;
    if dz == 0.0 {
        return series.clone();
    }
    debug!(
        "Applying elevation shift of {:.2} m ({:.2} m -> {:.2} m)",
        dz, effective_grid_elevation, target_elevation
    );
    let records = series
        .iter()
        .map(|r| HourlyRecord::new(r.timestamp, correct_values(&r.values, dz, config)))
        .collect();
    HourlySeries::from_trusted(records)
}

fn correct_values(values: &Meteo, dz: f64, config: &PipelineConfig) -> Meteo {
    let temperature = values.temperature - config.lapse_rate * dz / 100.0;
    let pressure = barometric_pressure(values.pressure, values.temperature, dz, config.lapse_rate);

    let humidity = values
        .humidity
        .min(saturation_mixing_ratio(temperature, pressure));

    let limit = config.radiation_adjustment_limit;
    let bounded = |factor: f64| factor.clamp(1.0 - limit, 1.0 + limit);

    let shortwave_factor = bounded(1.0 + config.shortwave_gain_per_km * dz / 1000.0);
    let longwave_factor = bounded(
        ((temperature + ZERO_CELSIUS_K) / (values.temperature + ZERO_CELSIUS_K)).powi(4),
    );

    Meteo {
        temperature,
        humidity,
        global_radiation: (values.global_radiation * shortwave_factor).max(0.0),
        atmospheric_radiation: (values.atmospheric_radiation * longwave_factor).max(0.0),
        pressure,
        ..*values
    }
}

/// Pressure at `dz` metres above a level with `pressure` (hPa) and
/// `temperature` (°C), assuming a constant lapse rate in °C/100 m.
pub fn barometric_pressure(pressure: f64, temperature: f64, dz: f64, lapse_rate: f64) -> f64 {
    let t_k = temperature + ZERO_CELSIUS_K;
    let gamma = lapse_rate / 100.0;
    if gamma == 0.0 {
        return pressure * (-GRAVITY * dz / (DRY_AIR_GAS_CONSTANT * t_k)).exp();
    }
    let base = (1.0 - gamma * dz / t_k).max(f64::MIN_POSITIVE);
    pressure * base.powf(GRAVITY / (DRY_AIR_GAS_CONSTANT * gamma))
}
