//! Uses the grid data layer directly: opens an MSM mirror with a custom cache
//! folder, inspects the nearest cells, then runs the pipeline over a
//! hand-picked subset through the in-memory provider.
//!
//! Usage: `cargo run --example from_mirror -- <mirror base url> <cache dir>`

use arcclimate::{
    ArcClimate, ArcClimateError, GridDataProvider, InMemoryGridProvider, LatLon,
    MsmGridProvider, PipelineConfig,
};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), ArcClimateError> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let cache = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("arcclimate_demo_cache"));

    let location = LatLon(34.6937, 135.5023); // Osaka
    let provider = MsmGridProvider::new(&base_url, &cache).await?;
    for (point, distance) in provider.locator().nearest(location, 6) {
        println!(
            "{} at {:.3} km, elevation {:.1} m",
            point.id, distance, point.elevation
        );
    }

    // Keep only the land cells among the six nearest.
    let cells: Vec<_> = provider
        .neighbours(location, 6)
        .await?
        .into_iter()
        .filter(|c| c.point.elevation > 0.0)
        .collect();
    println!("{} land cells retained", cells.len());

    let config = PipelineConfig::builder().idw_exponent(2.0).build();
    let client = ArcClimate::with_provider(InMemoryGridProvider::new(cells), config);
    let output = client
        .point()
        .location(location)
        .elevation(5.0)
        .call()
        .await?;
    println!("{}", output.to_dataframe()?.tail(Some(5)));
    Ok(())
}
