//! Builds the full corrected series for a point from a dataset mirror and
//! prints the first hours.
//!
//! Usage: `cargo run --example full_period -- <mirror base url>`

use arcclimate::{ArcClimate, ArcClimateError, LatLon};
use std::env;

#[tokio::main]
async fn main() -> Result<(), ArcClimateError> {
    env_logger::init();
    configure_polars_display();
    let base_url = env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let client = ArcClimate::new(&base_url).await?;
    // Tsukuba
    let output = client
        .point()
        .location(LatLon(36.0834, 140.0763))
        .elevation(25.0)
        .call()
        .await?;

    let point = output.point();
    println!("Confidence: {:?}", point.confidence);
    println!(
        "Effective grid elevation {:.1} m, corrected to {:.1} m",
        point.effective_grid_elevation, point.target_elevation
    );
    for (id, weight) in point.weights.iter() {
        println!("  {id}: {weight:.4}");
    }
    println!("{}", output.to_dataframe()?.head(Some(24)));
    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "24");
}
