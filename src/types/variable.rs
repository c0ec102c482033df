//! The meteorological variables carried by the basic dataset.

use std::fmt;

/// A variable of the basic dataset, interpolated independently per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Air temperature in °C.
    Temperature,
    /// Mixing ratio (absolute humidity) in g/kg of dry air.
    Humidity,
    /// Model global horizontal radiation in MJ/m²h.
    GlobalRadiation,
    /// Downward atmospheric (longwave) radiation in MJ/m²h.
    AtmosphericRadiation,
    /// East-west wind component in m/s, positive towards the east.
    WindU,
    /// North-south wind component in m/s, positive towards the north.
    WindV,
    /// Surface pressure in hPa.
    Pressure,
    /// Hourly precipitation in mm/h.
    Precipitation,
}

impl Variable {
    pub const ALL: [Variable; 8] = [
        Variable::Temperature,
        Variable::Humidity,
        Variable::GlobalRadiation,
        Variable::AtmosphericRadiation,
        Variable::WindU,
        Variable::WindV,
        Variable::Pressure,
        Variable::Precipitation,
    ];

    /// Column name used by the basic dataset and the output frames.
    pub fn column_name(self) -> &'static str {
        match self {
            Variable::Temperature => "TMP",
            Variable::Humidity => "MR",
            Variable::GlobalRadiation => "DSWRF_msm",
            Variable::AtmosphericRadiation => "DLWRF",
            Variable::WindU => "UGRD",
            Variable::WindV => "VGRD",
            Variable::Pressure => "PRES",
            Variable::Precipitation => "APCP01",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Variable::Temperature => "°C",
            Variable::Humidity => "g/kgDA",
            Variable::GlobalRadiation | Variable::AtmosphericRadiation => "MJ/m²h",
            Variable::WindU | Variable::WindV => "m/s",
            Variable::Pressure => "hPa",
            Variable::Precipitation => "mm/h",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
