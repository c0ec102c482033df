use arcclimate::{
    run_pipeline, GridCell, GridPoint, HourlyRecord, HourlySeries, LatLon, Meteo, OutputMode,
    PipelineConfig, TargetPoint,
};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Four cells with three years of synthetic hour-ending data.
fn cells() -> Vec<GridCell> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1)
        .and_then(|d| d.and_hms_opt(1, 0, 0))
        .expect("valid start");
    let hours = 3 * 8760 + 24;
    let layout = [
        ("a", 36.45, 140.0, 30.0),
        ("b", 36.55, 140.0, 60.0),
        ("c", 36.5, 140.0625, 5.0),
        ("d", 36.5, 139.9375, 12.0),
    ];
    layout
        .iter()
        .enumerate()
        .map(|(i, &(id, lat, lon, elevation))| {
            let records = (0..hours)
                .map(|h| {
                    let x = h as f64;
                    let day = (x / 24.0 * std::f64::consts::TAU).sin();
                    let year = (x / 8760.0 * std::f64::consts::TAU).cos();
                    let values = Meteo {
                        temperature: 15.0 - 10.0 * year + 4.0 * day + i as f64,
                        humidity: 8.0 - 3.0 * year,
                        global_radiation: (2.5 * day).max(0.0),
                        atmospheric_radiation: 1.1,
                        wind_u: 1.0 + day,
                        wind_v: -1.5,
                        pressure: 1008.0 + 4.0 * year,
                        precipitation: if h % 29 == 0 { 1.5 } else { 0.0 },
                    };
                    HourlyRecord::new(start + Duration::hours(h as i64), values)
                })
                .collect();
            let series = HourlySeries::new(records, id).expect("contiguous series");
            GridCell::new(GridPoint::new(id, lat, lon, elevation), series)
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let cells = cells();
    let target = TargetPoint::new(LatLon(36.51, 140.01), Some(120.0));
    let config = PipelineConfig::default();

    c.bench_function("full_period", |b| {
        b.iter(|| run_pipeline(black_box(&target), &cells, OutputMode::FullPeriod, &config))
    });
    c.bench_function("design_year", |b| {
        b.iter(|| run_pipeline(black_box(&target), &cells, OutputMode::DesignYear, &config))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
