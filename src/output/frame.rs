use crate::error::ArcClimateError;
use crate::grid_data::extractor::{COL_DATE, DATE_FORMAT};
use crate::pipeline::ClimateOutput;
use crate::types::record::ClimateRecord;
use crate::types::series::ClimateSeries;
use crate::types::standard_year::StandardYear;
use polars::prelude::*;

pub const COL_GLOBAL_EST: &str = "DSWRF_est";
pub const COL_WIND_SPEED: &str = "w_spd";
pub const COL_WIND_DIRECTION: &str = "w_dir";
pub const COL_RELATIVE_HUMIDITY: &str = "RH";
pub const COL_SUN_ALTITUDE: &str = "h";
pub const COL_SUN_AZIMUTH: &str = "A";
pub const COL_SOURCE_YEAR: &str = "source_year";

impl ClimateOutput {
    /// Renders the output as a DataFrame, one row per hour.
    ///
    /// Columns, in order: `date, TMP, MR, DSWRF_est, DSWRF_msm, DLWRF, VGRD,
    /// UGRD, PRES, APCP01, w_spd, w_dir, RH, h, A`, followed by
    /// `DN_est, SH_est, DN_msm, SH_msm` when radiation separation ran.
    /// Design-year frames carry dates in the reference year and a trailing
    /// `source_year` column.
    pub fn to_dataframe(&self) -> Result<DataFrame, ArcClimateError> {
        match self {
            ClimateOutput::FullPeriod(point) => series_frame(&point.series),
            ClimateOutput::DesignYear { year, .. } => design_year_frame(year),
        }
    }
}

pub fn series_frame(series: &ClimateSeries) -> Result<DataFrame, ArcClimateError> {
    let records: Vec<&ClimateRecord> = series.iter().collect();
    DataFrame::new(record_columns(&records)).map_err(ArcClimateError::OutputFrame)
}

pub fn design_year_frame(year: &StandardYear) -> Result<DataFrame, ArcClimateError> {
    let records: Vec<&ClimateRecord> = year.records().iter().map(|r| &r.record).collect();
    let mut columns = record_columns(&records);
    let source_years: Vec<i32> = year
        .records()
        .iter()
        .map(|r| r.provenance.source_year)
        .collect();
    columns.push(Column::new(COL_SOURCE_YEAR.into(), source_years));
    DataFrame::new(columns).map_err(ArcClimateError::OutputFrame)
}

fn record_columns(records: &[&ClimateRecord]) -> Vec<Column> {
    let dates: Vec<String> = records
        .iter()
        .map(|r| r.timestamp.format(DATE_FORMAT).to_string())
        .collect();

    let mut columns = vec![
        Column::new(COL_DATE.into(), dates),
        float_column("TMP", records, |r| r.values.temperature),
        float_column("MR", records, |r| r.values.humidity),
        float_column(COL_GLOBAL_EST, records, |r| r.global_radiation_est),
        float_column("DSWRF_msm", records, |r| r.values.global_radiation),
        float_column("DLWRF", records, |r| r.values.atmospheric_radiation),
        float_column("VGRD", records, |r| r.values.wind_v),
        float_column("UGRD", records, |r| r.values.wind_u),
        float_column("PRES", records, |r| r.values.pressure),
        float_column("APCP01", records, |r| r.values.precipitation),
        float_column(COL_WIND_SPEED, records, |r| r.wind_speed),
        float_column(COL_WIND_DIRECTION, records, |r| r.wind_direction),
        float_column(COL_RELATIVE_HUMIDITY, records, |r| r.relative_humidity),
        float_column(COL_SUN_ALTITUDE, records, |r| r.sun.altitude),
        float_column(COL_SUN_AZIMUTH, records, |r| r.sun.azimuth),
    ];

    let separated = records
        .iter()
        .any(|r| r.split_est.is_some() || r.split_model.is_some());
    if separated {
        columns.push(split_column("DN_est", records, |r| {
            r.split_est.map(|s| s.direct_normal)
        }));
        columns.push(split_column("SH_est", records, |r| {
            r.split_est.map(|s| s.diffuse_horizontal)
        }));
        columns.push(split_column("DN_msm", records, |r| {
            r.split_model.map(|s| s.direct_normal)
        }));
        columns.push(split_column("SH_msm", records, |r| {
            r.split_model.map(|s| s.diffuse_horizontal)
        }));
    }
    columns
}

fn float_column(
    name: &str,
    records: &[&ClimateRecord],
    f: impl Fn(&ClimateRecord) -> f64,
) -> Column {
    let values: Vec<f64> = records.iter().map(|r| f(*r)).collect();
    Column::new(name.into(), values)
}

/// Nullable column: hours where separation found no solution stay empty.
fn split_column(
    name: &str,
    records: &[&ClimateRecord],
    f: impl Fn(&ClimateRecord) -> Option<f64>,
) -> Column {
    let values: Vec<Option<f64>> = records.iter().map(|r| f(*r)).collect();
    Column::new(name.into(), values)
}
