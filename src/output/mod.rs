//! Tabular rendering of pipeline results.

pub mod csv;
pub mod frame;

pub use frame::{design_year_frame, series_frame};
