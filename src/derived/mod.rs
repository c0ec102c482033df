//! Derived variables: solar geometry, radiation estimate and separation,
//! wind speed and direction, relative humidity.

pub mod estimator;
pub mod invariants;
pub mod perez;
pub mod separation;
pub mod solar_position;
pub mod wind;

pub use estimator::{derive, estimate_global};
pub use separation::{separate, separate_in_context};
pub use solar_position::sun_position;
pub use wind::{wind_direction, wind_speed};
