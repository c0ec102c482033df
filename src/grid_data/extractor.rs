use crate::grid_data::error::GridDataError;
use crate::types::record::{HourlyRecord, Meteo};
use crate::types::series::HourlySeries;
use crate::types::variable::Variable;
use chrono::NaiveDateTime;
use polars::prelude::*;

pub const COL_DATE: &str = "date";
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Materialises a cell frame into an [`HourlySeries`].
///
/// Blocking: collects the frame. Rows must already be in hourly order.
pub fn frame_to_series(frame: LazyFrame, grid_id: &str) -> Result<HourlySeries, GridDataError> {
    let polars_err = |source| GridDataError::PolarsError {
        grid_id: grid_id.to_string(),
        source,
    };

    let mut exprs = vec![col(COL_DATE).cast(DataType::String)];
    exprs.extend(
        Variable::ALL
            .iter()
            .map(|v| col(v.column_name()).cast(DataType::Float64)),
    );
    let df = frame.select(exprs).collect().map_err(polars_err)?;

    let dates = df
        .column(COL_DATE)
        .and_then(|c| c.str())
        .map_err(polars_err)?;
    let columns = Variable::ALL
        .iter()
        .map(|v| {
            df.column(v.column_name())
                .and_then(|c| c.f64())
                .map(|ca| (*v, ca))
                .map_err(polars_err)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let missing = |column: &str, row: usize| GridDataError::MissingValue {
        grid_id: grid_id.to_string(),
        column: column.to_string(),
        row,
    };

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let raw = dates.get(row).ok_or_else(|| missing(COL_DATE, row))?;
        let timestamp = NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|source| {
            GridDataError::TimestampParse {
                grid_id: grid_id.to_string(),
                value: raw.to_string(),
                source,
            }
        })?;
        let mut values = Meteo::default();
        for (variable, ca) in &columns {
            let value = ca
                .get(row)
                .ok_or_else(|| missing(variable.column_name(), row))?;
            values.set(*variable, value);
        }
        records.push(HourlyRecord::new(timestamp, values));
    }

    HourlySeries::new(records, grid_id).map_err(GridDataError::InvalidSeries)
}
