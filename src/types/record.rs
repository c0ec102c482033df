//! Hourly records flowing through the pipeline.

use crate::types::variable::Variable;
use chrono::NaiveDateTime;

/// The basic dataset values for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Meteo {
    pub temperature: f64,
    pub humidity: f64,
    pub global_radiation: f64,
    pub atmospheric_radiation: f64,
    pub wind_u: f64,
    pub wind_v: f64,
    pub pressure: f64,
    pub precipitation: f64,
}

impl Meteo {
    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Temperature => self.temperature,
            Variable::Humidity => self.humidity,
            Variable::GlobalRadiation => self.global_radiation,
            Variable::AtmosphericRadiation => self.atmospheric_radiation,
            Variable::WindU => self.wind_u,
            Variable::WindV => self.wind_v,
            Variable::Pressure => self.pressure,
            Variable::Precipitation => self.precipitation,
        }
    }

    pub fn set(&mut self, variable: Variable, value: f64) {
        match variable {
            Variable::Temperature => self.temperature = value,
            Variable::Humidity => self.humidity = value,
            Variable::GlobalRadiation => self.global_radiation = value,
            Variable::AtmosphericRadiation => self.atmospheric_radiation = value,
            Variable::WindU => self.wind_u = value,
            Variable::WindV => self.wind_v = value,
            Variable::Pressure => self.pressure = value,
            Variable::Precipitation => self.precipitation = value,
        }
    }

    /// Adds `weight * other` to every variable.
    pub fn add_weighted(&mut self, other: &Meteo, weight: f64) {
        for variable in Variable::ALL {
            self.set(variable, self.get(variable) + weight * other.get(variable));
        }
    }
}

/// One hour of the basic dataset, as supplied for a grid cell or as
/// interpolated/corrected for the target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord {
    /// Hour-ending timestamp (JST).
    pub timestamp: NaiveDateTime,
    pub values: Meteo,
}

impl HourlyRecord {
    pub fn new(timestamp: NaiveDateTime, values: Meteo) -> Self {
        Self { timestamp, values }
    }
}

/// Solar geometry for the hour ending at a record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SunPosition {
    /// Mean solar altitude over the hour in degrees (negative below the horizon).
    pub altitude: f64,
    /// Mean solar azimuth in degrees, clockwise from north.
    pub azimuth: f64,
    /// Extraterrestrial normal radiation in MJ/m²h.
    pub extraterrestrial: f64,
}

impl SunPosition {
    pub fn sin_altitude(&self) -> f64 {
        self.altitude.to_radians().sin()
    }

    pub fn is_up(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Direct normal and diffuse horizontal parts of a global radiation value, in MJ/m²h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiationSplit {
    pub direct_normal: f64,
    pub diffuse_horizontal: f64,
}

/// A fully derived hourly record for the target point.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRecord {
    pub timestamp: NaiveDateTime,
    pub values: Meteo,
    /// Estimated global horizontal radiation in MJ/m²h.
    pub global_radiation_est: f64,
    /// Scalar wind speed in m/s, always `hypot(wind_u, wind_v)`.
    pub wind_speed: f64,
    /// Direction the wind blows from, degrees clockwise from north in [0, 360).
    pub wind_direction: f64,
    /// Relative humidity in %.
    pub relative_humidity: f64,
    pub sun: SunPosition,
    /// Separation of the estimated global radiation, when enabled and solvable.
    pub split_est: Option<RadiationSplit>,
    /// Separation of the model global radiation, when enabled and solvable.
    pub split_model: Option<RadiationSplit>,
}
