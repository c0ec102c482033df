//! Ordered hourly series. A series is always strictly increasing and
//! contiguous at hourly resolution.

use crate::error::ClimateError;
use crate::types::record::{ClimateRecord, HourlyRecord};
use chrono::{Duration, NaiveDateTime};

/// Hourly basic-dataset series for a grid cell or for the target point.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    records: Vec<HourlyRecord>,
}

impl HourlySeries {
    /// Builds a series, checking that timestamps step by exactly one hour.
    ///
    /// `label` names the series in the error (typically the grid id).
    pub fn new(records: Vec<HourlyRecord>, label: &str) -> Result<Self, ClimateError> {
        check_contiguous(records.iter().map(|r| r.timestamp), label)?;
        Ok(Self { records })
    }

    pub(crate) fn from_trusted(records: Vec<HourlyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HourlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.records.last().map(|r| r.timestamp)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HourlyRecord> {
        self.records.iter()
    }

    /// Whether both series cover exactly the same hours.
    pub fn is_aligned_with(&self, other: &HourlySeries) -> bool {
        // Contiguity makes first timestamp and length sufficient.
        self.len() == other.len() && self.first_timestamp() == other.first_timestamp()
    }
}

/// Fully derived hourly series for the target point.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateSeries {
    records: Vec<ClimateRecord>,
}

impl ClimateSeries {
    pub(crate) fn from_trusted(records: Vec<ClimateRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ClimateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClimateRecord> {
        self.records.iter()
    }
}

fn check_contiguous(
    mut timestamps: impl Iterator<Item = NaiveDateTime>,
    label: &str,
) -> Result<(), ClimateError> {
    let Some(mut previous) = timestamps.next() else {
        return Ok(());
    };
    for current in timestamps {
        if current - previous != Duration::hours(1) {
            return Err(ClimateError::MisalignedSeries {
                grid_id: label.to_string(),
                detail: format!(
                    "expected {} after {}, found {}",
                    previous + Duration::hours(1),
                    previous,
                    current
                ),
            });
        }
        previous = current;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::Meteo;
    use chrono::NaiveDate;

    fn hour(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_contiguous_series_is_accepted() {
        let records = (0..48)
            .map(|h| HourlyRecord::new(hour(1 + h / 24, h % 24), Meteo::default()))
            .collect();
        let series = HourlySeries::new(records, "a").unwrap();
        assert_eq!(series.len(), 48);
        assert_eq!(series.first_timestamp(), Some(hour(1, 0)));
        assert_eq!(series.last_timestamp(), Some(hour(2, 23)));
    }

    #[test]
    fn test_gap_is_rejected() {
        let records = vec![
            HourlyRecord::new(hour(1, 0), Meteo::default()),
            HourlyRecord::new(hour(1, 2), Meteo::default()),
        ];
        let err = HourlySeries::new(records, "cell-7").unwrap_err();
        match err {
            ClimateError::MisalignedSeries { grid_id, .. } => assert_eq!(grid_id, "cell-7"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let records = vec![
            HourlyRecord::new(hour(1, 1), Meteo::default()),
            HourlyRecord::new(hour(1, 0), Meteo::default()),
        ];
        assert!(HourlySeries::new(records, "b").is_err());
    }
}
