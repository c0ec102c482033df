use crate::config::StandardYearConfig;
use crate::correction::psychrometrics::relative_humidity;
use crate::error::ClimateError;
use crate::standard_year::similarity::{daily_aggregates, score_candidates, select_most_typical};
use crate::standard_year::smoothing::smooth_seams;
use crate::types::calendar::{covered_hour, is_leap_day, Month, HOURS_PER_STANDARD_YEAR};
use crate::types::record::ClimateRecord;
use crate::types::series::ClimateSeries;
use crate::types::standard_year::{MonthSelection, Provenance, StandardYear, StandardYearRecord};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use log::{debug, info};
use std::collections::BTreeMap;

/// Assembles a design year from a multi-year series.
///
/// Records are bucketed by the calendar month of the hour they cover
/// (labels are hour-ending), 29 February is discarded, and only complete
/// buckets are candidates. For each calendar month the most typical
/// candidate year is chosen, the twelve months are concatenated under
/// hour-ending labels in the reference year, and temperature and pressure are
/// blended across seams between different source years. The last record is
/// labelled 1 January 00:00 of the year after the reference year.
pub fn synthesize(
    series: &ClimateSeries,
    config: &StandardYearConfig,
) -> Result<StandardYear, ClimateError> {
    let mut buckets: BTreeMap<Month, Vec<&ClimateRecord>> = BTreeMap::new();
    for record in series.iter() {
        let hour = covered_hour(record.timestamp);
        if !is_leap_day(hour) {
            buckets.entry(Month::of(hour)).or_default().push(record);
        }
    }

    let mut selections = Vec::with_capacity(12);
    let mut chosen: Vec<&[&ClimateRecord]> = Vec::with_capacity(12);

    for month in 1..=12u32 {
        let candidates: Vec<(i32, &Vec<&ClimateRecord>)> = buckets
            .iter()
            .filter(|(key, records)| {
                key.month() == month && records.len() == key.standard_hours()
            })
            .map(|(key, records)| (key.year(), records))
            .collect();

        if candidates.len() < config.min_years {
            return Err(ClimateError::InsufficientHistory {
                month,
                available: candidates.len(),
                required: config.min_years,
            });
        }

        let aggregates: Vec<_> = candidates
            .iter()
            .map(|(year, records)| (*year, daily_aggregates(records)))
            .collect();
        let scores = score_candidates(&aggregates, &config.weights);
        let missing = || ClimateError::InsufficientHistory {
            month,
            available: 0,
            required: config.min_years,
        };
        let best = select_most_typical(&scores).ok_or_else(missing)?;
        info!(
            "Month {:02}: selected {} out of {} candidate years (score {:.4})",
            month,
            best.year,
            candidates.len(),
            best.score
        );

        let records = candidates
            .iter()
            .find(|(year, _)| *year == best.year)
            .map(|&(_, records)| records.as_slice())
            .ok_or_else(missing)?;
        chosen.push(records);
        selections.push(MonthSelection {
            month,
            source_year: best.year,
            candidates: scores,
        });
    }

    let mut records = Vec::with_capacity(HOURS_PER_STANDARD_YEAR);
    for (selection, month_records) in selections.iter().zip(&chosen) {
        for record in month_records.iter() {
            let hour = covered_hour(record.timestamp);
            let timestamp =
                NaiveDate::from_ymd_opt(config.reference_year, selection.month, hour.day())
                    .and_then(|d| d.and_hms_opt(hour.hour(), 0, 0))
                    .map(|start| start + Duration::hours(1))
                    .ok_or_else(|| {
                        ClimateError::InvalidConfiguration(format!(
                            "reference year {} cannot hold {}",
                            config.reference_year, record.timestamp
                        ))
                    })?;
            records.push(StandardYearRecord {
                record: ClimateRecord {
                    timestamp,
                    ..(*record).clone()
                },
                provenance: Provenance {
                    source_year: selection.source_year,
                    month: selection.month,
                },
            });
        }
    }

    let smoothed = smooth_seams(&mut records, config.smoothing_window_hours);
    debug!("Smoothed {} month seams", smoothed);
    for r in &mut records {
        let v = &r.record.values;
        r.record.relative_humidity = relative_humidity(v.temperature, v.pressure, v.humidity);
    }

    Ok(StandardYear::new(config.reference_year, records, selections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineConfig, SeparationMethod};
    use crate::derived::derive;
    use crate::types::coordinates::LatLon;
    use crate::types::record::{HourlyRecord, Meteo};
    use crate::types::series::HourlySeries;
    use chrono::NaiveDateTime;
    use std::collections::HashSet;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Hour-ending series covering `start` to `end`: labels run from
    /// `start + 1h` to `end` inclusive and `f` receives the start of each
    /// covered hour.
    fn climate(
        start: NaiveDateTime,
        end: NaiveDateTime,
        f: impl Fn(NaiveDateTime) -> Meteo,
    ) -> ClimateSeries {
        let hours = (end - start).num_hours();
        let records = (0..hours)
            .map(|h| {
                let hour = start + Duration::hours(h);
                HourlyRecord::new(hour + Duration::hours(1), f(hour))
            })
            .collect();
        let series = HourlySeries::new(records, "test").unwrap();
        let config = PipelineConfig::builder()
            .separation(SeparationMethod::Disabled)
            .build();
        derive(&series, LatLon(36.05, 140.12), 20.0, &config).unwrap()
    }

    /// Same values every year: depends on day of year and hour only.
    fn seasonal(ts: NaiveDateTime) -> Meteo {
        let doy = ts.ordinal0().min(364) as f64;
        let hour = ts.hour() as f64;
        let season = (doy / 365.0 * std::f64::consts::TAU).cos();
        let daily = (hour / 24.0 * std::f64::consts::TAU).sin();
        let daylight = -(hour / 24.0 * std::f64::consts::TAU).cos();
        Meteo {
            temperature: 15.0 - 10.0 * season + 4.0 * daily,
            humidity: 9.0 - 4.0 * season,
            global_radiation: (2.5 - season) * daylight.max(0.0),
            atmospheric_radiation: 1.2,
            wind_u: 1.5,
            wind_v: -2.0,
            pressure: 1010.0 + 5.0 * season,
            precipitation: if ts.day() % 5 == 0 { 1.0 } else { 0.0 },
        }
    }

    #[test]
    fn test_design_year_shape() {
        let series = climate(at(2013, 1, 1), at(2016, 1, 1), seasonal);
        let year = synthesize(&series, &StandardYearConfig::default()).unwrap();
        assert_eq!(year.len(), HOURS_PER_STANDARD_YEAR);
        assert_eq!(year.reference_year(), 1970);
        for pair in year.records().windows(2) {
            assert_eq!(
                pair[1].record.timestamp - pair[0].record.timestamp,
                Duration::hours(1)
            );
        }
        let first = year.records().first().unwrap().record.timestamp;
        let last = year.records().last().unwrap().record.timestamp;
        assert_eq!(first, at(1970, 1, 1) + Duration::hours(1));
        assert_eq!(last, at(1971, 1, 1));
        assert!(year
            .records()
            .iter()
            .all(|r| covered_hour(r.record.timestamp).year() == 1970));
        let provenance: HashSet<(u32, i32)> = year
            .records()
            .iter()
            .map(|r| (r.provenance.month, r.provenance.source_year))
            .collect();
        assert_eq!(provenance.len(), 12);
        let months: HashSet<u32> = provenance.iter().map(|(m, _)| *m).collect();
        assert_eq!(months.len(), 12);
        for r in year.records() {
            assert_eq!(covered_hour(r.record.timestamp).month(), r.provenance.month);
        }
    }

    #[test]
    fn test_hour_ending_labels_fill_whole_months() {
        // Labels from 2013-01-01 01:00 to 2015-01-01 00:00: exactly two years.
        let series = climate(at(2013, 1, 1), at(2015, 1, 1), seasonal);
        assert_eq!(series.len(), 2 * HOURS_PER_STANDARD_YEAR);
        let year = synthesize(&series, &StandardYearConfig::default()).unwrap();
        for selection in year.selections() {
            assert_eq!(selection.candidates.len(), 2, "month {}", selection.month);
        }
        // The midnight label closing January stays with January.
        let closing = year
            .records()
            .iter()
            .find(|r| r.record.timestamp == at(1970, 2, 1))
            .unwrap();
        assert_eq!(closing.provenance.month, 1);
        let source = series
            .iter()
            .find(|r| r.timestamp == at(2013, 2, 1))
            .unwrap();
        assert_eq!(closing.record.values, source.values);
    }

    #[test]
    fn test_identical_years_select_earliest() {
        let series = climate(at(2013, 1, 1), at(2016, 1, 1), seasonal);
        assert!(series.iter().any(|r| r.values.global_radiation > 1.0));
        let year = synthesize(&series, &StandardYearConfig::default()).unwrap();
        for selection in year.selections() {
            assert_eq!(selection.source_year, 2013, "month {}", selection.month);
            assert_eq!(selection.candidates.len(), 3);
            let first = selection.candidates[0].score;
            assert!(selection.candidates.iter().all(|c| c.score == first));
        }
        // No seam between different years, so values are copied verbatim.
        let source: Vec<_> = series.iter().take(HOURS_PER_STANDARD_YEAR).collect();
        for (r, s) in year.records().iter().zip(source) {
            assert_eq!(r.record.values, s.values);
        }
    }

    #[test]
    fn test_typical_year_is_selected() {
        let series = climate(at(2011, 1, 1), at(2014, 1, 1), |ts| {
            let offset = 10.0 * (ts.year() - 2011) as f64;
            Meteo {
                temperature: seasonal(ts).temperature + offset,
                ..seasonal(ts)
            }
        });
        let year = synthesize(&series, &StandardYearConfig::default()).unwrap();
        for month in 1..=12 {
            assert_eq!(year.source_year(month), Some(2012), "month {month}");
        }
    }

    #[test]
    fn test_single_year_is_insufficient() {
        let series = climate(at(2013, 1, 1), at(2014, 1, 1), seasonal);
        match synthesize(&series, &StandardYearConfig::default()) {
            Err(ClimateError::InsufficientHistory {
                month,
                available,
                required,
            }) => {
                assert_eq!(month, 1);
                assert_eq!(available, 1);
                assert_eq!(required, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_leap_day_is_discarded() {
        let series = climate(at(2012, 1, 1), at(2014, 1, 1), seasonal);
        let year = synthesize(&series, &StandardYearConfig::default()).unwrap();
        assert_eq!(year.len(), HOURS_PER_STANDARD_YEAR);
        let february = year.selections().iter().find(|s| s.month == 2).unwrap();
        assert_eq!(february.candidates.len(), 2);
        assert!(year.records().iter().all(|r| !is_leap_day(r.record.timestamp)));
    }

    #[test]
    fn test_incomplete_months_are_not_candidates() {
        // 2015 stops at the end of June; January 2013 starts a day late.
        let series = climate(at(2013, 1, 2), at(2015, 7, 1), seasonal);
        let config = StandardYearConfig::builder().min_years(1).build();
        let year = synthesize(&series, &config).unwrap();
        let count = |m: u32| {
            year.selections()
                .iter()
                .find(|s| s.month == m)
                .map(|s| s.candidates.len())
        };
        assert_eq!(count(1), Some(2)); // 2014, 2015
        assert_eq!(count(6), Some(3));
        assert_eq!(count(7), Some(2));
        assert_eq!(year.source_year(1), Some(2014));
    }

    #[test]
    fn test_seams_between_years_are_continuous() {
        // Odd months are most typical in 2012, even months in 2013.
        let series = climate(at(2011, 1, 1), at(2014, 1, 1), |ts| {
            let base = seasonal(ts);
            let shift = match (ts.year(), ts.month() % 2) {
                (2011, _) => -10.0,
                (2012, 1) | (2013, 0) => 0.0,
                _ => 10.0,
            };
            Meteo {
                temperature: base.temperature + shift,
                pressure: base.pressure + shift,
                ..base
            }
        });
        let year = synthesize(&series, &StandardYearConfig::default()).unwrap();
        assert_eq!(year.source_year(1), Some(2012));
        assert_eq!(year.source_year(2), Some(2013));
        let recs = year.records();
        for i in 1..recs.len() {
            if recs[i].provenance.month != recs[i - 1].provenance.month {
                let a = &recs[i - 1].record.values;
                let b = &recs[i].record.values;
                assert!((a.temperature - b.temperature).abs() < 1e-9);
                assert!((a.pressure - b.pressure).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let series = climate(at(2013, 1, 1), at(2016, 1, 1), |ts| Meteo {
            temperature: seasonal(ts).temperature + (ts.year() % 3) as f64,
            ..seasonal(ts)
        });
        let config = StandardYearConfig::default();
        let a = synthesize(&series, &config).unwrap();
        let b = synthesize(&series, &config).unwrap();
        assert_eq!(a, b);
    }
}
