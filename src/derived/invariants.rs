use crate::error::ClimateError;
use crate::types::record::HourlyRecord;
use crate::types::series::HourlySeries;
use crate::types::variable::Variable;

/// Checks the physical invariants of one record: every value finite,
/// radiation, humidity and precipitation not below `-tolerance`, pressure
/// strictly positive.
pub fn check_record(
    record: &HourlyRecord,
    series: &str,
    tolerance: f64,
) -> Result<(), ClimateError> {
    for variable in Variable::ALL {
        let value = record.values.get(variable);
        let valid = value.is_finite()
            && match variable {
                Variable::Pressure => value > 0.0,
                Variable::Humidity
                | Variable::GlobalRadiation
                | Variable::AtmosphericRadiation
                | Variable::Precipitation => value >= -tolerance,
                Variable::Temperature | Variable::WindU | Variable::WindV => true,
            };
        if !valid {
            return Err(ClimateError::PhysicallyInconsistentInput {
                series: series.to_string(),
                timestamp: record.timestamp,
                variable,
                value,
            });
        }
    }
    Ok(())
}

/// Checks every record of `series`, reporting the first violation.
pub fn check_series(
    series: &HourlySeries,
    label: &str,
    tolerance: f64,
) -> Result<(), ClimateError> {
    series
        .iter()
        .try_for_each(|record| check_record(record, label, tolerance))
}
