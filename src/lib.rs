mod arcclimate;
mod config;
mod error;
mod pipeline;
mod types;
mod utils;

pub mod correction;
pub mod derived;
pub mod grid_data;
pub mod interpolation;
pub mod output;
pub mod standard_year;

pub use arcclimate::ArcClimate;
pub use config::{
    ElevationFallback, PipelineConfig, SeparationMethod, SimilarityWeights, StandardYearConfig,
};
pub use error::{ArcClimateError, ClimateError};
pub use pipeline::{run_pipeline, ClimateOutput, PointClimate};

pub use grid_data::{GridDataError, GridDataProvider, InMemoryGridProvider, MsmGridProvider};
pub use interpolation::{Confidence, InterpolationWeights};

pub use types::calendar::{Month, Year, HOURS_PER_STANDARD_YEAR};
pub use types::coordinates::{
    LatLon, TargetPoint, DOMAIN_MAX_LATITUDE, DOMAIN_MAX_LONGITUDE, DOMAIN_MIN_LATITUDE,
    DOMAIN_MIN_LONGITUDE,
};
pub use types::grid_point::{GridCell, GridPoint};
pub use types::output_mode::OutputMode;
pub use types::record::{ClimateRecord, HourlyRecord, Meteo, RadiationSplit, SunPosition};
pub use types::series::{ClimateSeries, HourlySeries};
pub use types::standard_year::{
    CandidateScore, MonthSelection, Provenance, StandardYear, StandardYearRecord,
};
pub use types::variable::Variable;
