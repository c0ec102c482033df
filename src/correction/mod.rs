//! Elevation correction of the interpolated series.

pub mod elevation;
pub mod psychrometrics;

pub use elevation::{barometric_pressure, correct, resolve_target_elevation};
