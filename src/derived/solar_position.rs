//! Solar geometry after Akasaka's approximations, evaluated in Japan
//! Standard Time.

use crate::types::coordinates::LatLon;
use crate::types::record::SunPosition;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Solar constant in MJ/m²h.
pub const SOLAR_CONSTANT: f64 = 4.921;
/// Declination at the winter solstice, in degrees.
const WINTER_SOLSTICE_DECLINATION: f64 = -23.4393;
/// Longitude of the JST standard meridian.
const STANDARD_MERIDIAN: f64 = 135.0;
/// Offsets (hours) before the timestamp at which the hour is sampled.
const SUB_STEPS: [f64; 10] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];

/// Orbit-dependent quantities for one calendar day.
#[derive(Debug, Clone, Copy)]
struct DailyOrbit {
    sin_declination: f64,
    cos_declination: f64,
    /// Equation of time in degrees.
    equation_of_time: f64,
    /// Extraterrestrial normal radiation in MJ/m²h.
    extraterrestrial: f64,
}

impl DailyOrbit {
    fn new(year: i32, day_of_year: u32) -> Self {
        let n = (year - 1968) as f64;
        let perihelion_day = 3.71 + 0.2596 * n - ((n + 3.0) / 4.0).floor();
        let mean_anomaly = 360.0 * (day_of_year as f64 - perihelion_day) / 365.2596;
        let eps = 12.3901 + 0.0172 * (n + mean_anomaly / 360.0);
        let true_anomaly = mean_anomaly
            + 1.914 * mean_anomaly.to_radians().sin()
            + 0.02 * (2.0 * mean_anomaly).to_radians().sin();
        let veps = (true_anomaly + eps).to_radians();
        let equation_of_time = (mean_anomaly - true_anomaly)
            - (0.043 * (2.0 * veps).sin() / (1.0 - 0.043 * (2.0 * veps).cos()))
                .atan()
                .to_degrees();
        let sin_declination = veps.cos() * WINTER_SOLSTICE_DECLINATION.to_radians().sin();
        let cos_declination = (1.0 - sin_declination * sin_declination).abs().sqrt();
        let extraterrestrial = SOLAR_CONSTANT * (1.0 + 0.033 * true_anomaly.to_radians().cos());
        Self {
            sin_declination,
            cos_declination,
            equation_of_time,
            extraterrestrial,
        }
    }
}

/// Mean solar altitude and azimuth over the hour ending at `timestamp` (JST),
/// together with the extraterrestrial normal radiation of that day.
///
/// Azimuth is measured clockwise from north.
pub fn sun_position(timestamp: NaiveDateTime, location: LatLon) -> SunPosition {
    let orbit = DailyOrbit::new(timestamp.year(), timestamp.ordinal());
    let lat = location.latitude().to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let hour = timestamp.hour() as f64;

    let mut altitude_sum = 0.0;
    let mut azimuth_sum = 0.0;
    for step in SUB_STEPS {
        let solar_time = hour - step;
        let hour_angle = (15.0 * (solar_time - 12.0)
            + (location.longitude() - STANDARD_MERIDIAN)
            + orbit.equation_of_time)
            .to_radians();
        let sin_h = sin_lat * orbit.sin_declination
            + cos_lat * orbit.cos_declination * hour_angle.cos();
        let cos_h = (1.0 - sin_h * sin_h).sqrt();
        let sin_a = orbit.cos_declination * hour_angle.sin() / cos_h;
        let cos_a = (sin_h * sin_lat - orbit.sin_declination) / (cos_h * cos_lat);
        altitude_sum += sin_h.clamp(-1.0, 1.0).asin().to_degrees();
        azimuth_sum += (sin_a.atan2(cos_a) + std::f64::consts::PI).to_degrees();
    }

    let count = SUB_STEPS.len() as f64;
    SunPosition {
        altitude: altitude_sum / count,
        azimuth: azimuth_sum / count,
        extraterrestrial: orbit.extraterrestrial,
    }
}
