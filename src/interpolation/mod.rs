//! Spatial interpolation of grid cell series onto a target point.

pub mod interpolator;
pub mod weights;

pub use interpolator::{interpolate, Confidence, InterpolationOutcome};
pub use weights::{inverse_distance_weights, InterpolationWeights};
