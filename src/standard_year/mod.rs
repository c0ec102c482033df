//! Design-year synthesis from a multi-year corrected series.

pub mod similarity;
pub mod smoothing;
pub mod synthesizer;

pub use synthesizer::synthesize;
