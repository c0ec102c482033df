//! Synthesizes a design year for a point and writes it to CSV.
//!
//! Usage: `cargo run --example design_year -- <mirror base url> [out.csv]`

use arcclimate::{ArcClimate, ArcClimateError, LatLon, OutputMode};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), ArcClimateError> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("design_year.csv"));

    let client = ArcClimate::new(&base_url).await?;
    // Sapporo, no elevation: the interpolated grid elevation is used.
    let output = client
        .point()
        .location(LatLon(43.0621, 141.3544))
        .mode(OutputMode::DesignYear)
        .call()
        .await?;

    if let Some(year) = output.design_year() {
        for selection in year.selections() {
            println!(
                "{:02}: {} ({} candidates)",
                selection.month,
                selection.source_year,
                selection.candidates.len()
            );
        }
    }
    output.write_csv(&out)?;
    println!("Wrote {}", out.display());
    Ok(())
}
