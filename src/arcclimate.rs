//! The main entry point: an asynchronous client that retrieves the grid cells
//! around a point and runs the climate pipeline over them.

use crate::config::PipelineConfig;
use crate::error::ArcClimateError;
use crate::grid_data::{GridDataProvider, MsmGridProvider};
use crate::pipeline::{run_pipeline, ClimateOutput};
use crate::types::coordinates::{LatLon, TargetPoint};
use crate::types::output_mode::OutputMode;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::debug;
use std::path::PathBuf;

/// The client for building point climate records.
///
/// `ArcClimate` asks its [`GridDataProvider`] for the cells nearest to a
/// requested location and runs interpolation, elevation correction,
/// derivation and (optionally) design-year synthesis over them. The
/// computation runs on a blocking worker thread, so awaiting a request never
/// stalls the async runtime.
///
/// Create an instance with [`ArcClimate::new()`] or
/// [`ArcClimate::with_cache_folder()`] to read from an MSM dataset mirror, or
/// with [`ArcClimate::with_provider()`] for any other source of grid cells.
///
/// # Examples
///
/// ```rust,no_run
/// # use arcclimate::{ArcClimate, ArcClimateError, LatLon, OutputMode};
/// # async fn run() -> Result<(), ArcClimateError> {
/// let client = ArcClimate::new("https://example.org/arcclimate").await?;
/// let output = client
///     .point()
///     .location(LatLon(35.6812, 139.7671))
///     .elevation(40.0)
///     .mode(OutputMode::DesignYear)
///     .call()
///     .await?;
/// output.write_csv("tokyo_design_year.csv")?;
/// # Ok(())
/// # }
/// ```
pub struct ArcClimate<P: GridDataProvider = MsmGridProvider> {
    provider: P,
    config: PipelineConfig,
}

impl ArcClimate<MsmGridProvider> {
    /// Creates a client reading from the dataset mirror at `base_url`, caching
    /// downloads in `cache_folder`.
    ///
    /// The grid catalogue is loaded (or first downloaded) here; cell data is
    /// fetched lazily per request.
    ///
    /// # Errors
    ///
    /// Returns [`ArcClimateError::CacheDirCreation`] if the folder cannot be
    /// created, and [`ArcClimateError::GridData`] if the catalogue cannot be
    /// loaded.
    pub async fn with_cache_folder(
        base_url: &str,
        cache_folder: PathBuf,
    ) -> Result<Self, ArcClimateError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| ArcClimateError::CacheDirCreation(cache_folder.clone(), e))?;
        let provider = MsmGridProvider::new(base_url, &cache_folder).await?;
        Ok(Self::with_provider(provider, PipelineConfig::default()))
    }

    /// Creates a client reading from the dataset mirror at `base_url`, caching
    /// downloads in the default cache directory (e.g.
    /// `~/.cache/arcclimate_rs_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`ArcClimateError::CacheDirResolution`] if no cache directory
    /// can be determined, otherwise as [`ArcClimate::with_cache_folder`].
    pub async fn new(base_url: &str) -> Result<Self, ArcClimateError> {
        let cache_folder = get_cache_dir().map_err(ArcClimateError::CacheDirResolution)?;
        Self::with_cache_folder(base_url, cache_folder).await
    }
}

#[bon]
impl<P: GridDataProvider> ArcClimate<P> {
    pub fn with_provider(provider: P, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// Replaces the pipeline configuration.
    pub fn with_config(self, config: PipelineConfig) -> Self {
        Self { config, ..self }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Builds the climate record for one location.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** Target coordinate, inside the
    ///   supported region (latitude 22.4 to 47.6, longitude 120 to 150).
    /// * `.elevation(f64)`: Optional target elevation in metres. When omitted
    ///   the configured [`crate::ElevationFallback`] applies.
    /// * `.mode(OutputMode)`: Optional. [`OutputMode::FullPeriod`] (default)
    ///   returns the whole corrected series, [`OutputMode::DesignYear`] also
    ///   synthesizes the design year.
    ///
    /// # Errors
    ///
    /// [`ArcClimateError::Climate`] for pipeline errors (the location is
    /// checked against the supported region before any retrieval),
    /// [`ArcClimateError::GridData`] if the provider fails, and
    /// [`ArcClimateError::TaskJoin`] if the worker thread panics.
    #[builder]
    pub async fn point(
        &self,
        location: LatLon,
        elevation: Option<f64>,
        #[builder(default)] mode: OutputMode,
    ) -> Result<ClimateOutput, ArcClimateError> {
        location.ensure_in_domain()?;
        let target = TargetPoint::new(location, elevation);
        let cells = self
            .provider
            .neighbours(location, self.config.neighbour_count)
            .await?;
        debug!(
            "Retrieved {} grid cells around ({}, {})",
            cells.len(),
            location.latitude(),
            location.longitude()
        );

        let config = self.config.clone();
        let output =
            tokio::task::spawn_blocking(move || run_pipeline(&target, &cells, mode, &config))
                .await??;
        Ok(output)
    }
}
