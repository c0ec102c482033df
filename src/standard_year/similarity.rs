//! Finkelstein-Schafer similarity of candidate months.

use crate::config::SimilarityWeights;
use crate::types::record::ClimateRecord;
use crate::types::standard_year::CandidateScore;
use ordered_float::OrderedFloat;

/// Daily aggregates compared between candidate years, in the order
/// temperature, humidity, radiation, wind.
pub type DailyAggregate = [f64; 4];

/// Aggregates a complete month bucket (whole days of 24 records, each day
/// covering midnight to midnight) into daily mean temperature, mean humidity,
/// total model global radiation and mean wind speed.
///
/// Only input variables take part, so years with identical input data
/// aggregate identically whatever their calendar.
pub fn daily_aggregates(records: &[&ClimateRecord]) -> Vec<DailyAggregate> {
    records
        .chunks(24)
        .map(|day| {
            let n = day.len() as f64;
            let mut agg = [0.0; 4];
            for r in day {
                agg[0] += r.values.temperature;
                agg[1] += r.values.humidity;
                agg[2] += r.values.global_radiation;
                agg[3] += r.wind_speed;
            }
            [agg[0] / n, agg[1] / n, agg[2], agg[3] / n]
        })
        .collect()
}

/// Mean absolute difference between the empirical CDF of `candidate` and the
/// pooled CDF, evaluated at every pooled sample. Both inputs must be sorted.
pub fn finkelstein_schafer(candidate_sorted: &[f64], pooled_sorted: &[f64]) -> f64 {
    if candidate_sorted.is_empty() || pooled_sorted.is_empty() {
        return 0.0;
    }
    let n_c = candidate_sorted.len() as f64;
    let n_p = pooled_sorted.len() as f64;
    let total: f64 = pooled_sorted
        .iter()
        .map(|x| {
            let f_c = candidate_sorted.partition_point(|v| v <= x) as f64 / n_c;
            let f_p = pooled_sorted.partition_point(|v| v <= x) as f64 / n_p;
            (f_c - f_p).abs()
        })
        .sum();
    total / n_p
}

fn sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Scores every candidate year of one calendar month against the pooled
/// distribution of all candidates. `candidates` holds `(year, daily aggregates)`.
pub fn score_candidates(
    candidates: &[(i32, Vec<DailyAggregate>)],
    weights: &SimilarityWeights,
) -> Vec<CandidateScore> {
    let w = [weights.temperature, weights.humidity, weights.radiation, weights.wind];

    let pooled: Vec<Vec<f64>> = (0..4)
        .map(|k| sorted(candidates.iter().flat_map(|(_, days)| days.iter().map(move |d| d[k]))))
        .collect();
    let moments: Vec<(f64, f64)> = pooled.iter().map(|p| mean_and_std(p)).collect();

    candidates
        .iter()
        .map(|(year, days)| {
            let mut score = 0.0;
            let mut deviation = 0.0;
            for k in 0..4 {
                let own = sorted(days.iter().map(|d| d[k]));
                score += w[k] * finkelstein_schafer(&own, &pooled[k]);
                let (mean, std) = moments[k];
                if std > 0.0 && !days.is_empty() {
                    let mean_dev =
                        days.iter().map(|d| (d[k] - mean).abs()).sum::<f64>() / days.len() as f64;
                    deviation += w[k] * mean_dev / std;
                }
            }
            CandidateScore {
                year: *year,
                score,
                deviation,
            }
        })
        .collect()
}

/// Lowest score wins; ties go to the lower deviation, then to the earliest year.
pub fn select_most_typical(scores: &[CandidateScore]) -> Option<CandidateScore> {
    scores
        .iter()
        .min_by_key(|c| (OrderedFloat(c.score), OrderedFloat(c.deviation), c.year))
        .copied()
}
