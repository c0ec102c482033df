use crate::types::standard_year::StandardYearRecord;
use crate::types::variable::Variable;

/// Variables blended across month seams. Radiation and precipitation are
/// legitimately discontinuous and are left alone.
pub const SMOOTHED_VARIABLES: [Variable; 2] = [Variable::Temperature, Variable::Pressure];

/// Blends temperature and pressure across every internal month seam whose
/// two sides come from different source years.
///
/// With `d` the step across the seam, the `j`-th hour before the seam is
/// raised by `d/2 * (w - j) / w` and the `j`-th hour after it lowered by the
/// same amount, so both sides meet at the midpoint. Returns the number of
/// seams smoothed.
pub fn smooth_seams(records: &mut [StandardYearRecord], window: usize) -> usize {
    if window == 0 || records.len() < 2 {
        return 0;
    }
    let seams: Vec<usize> = (1..records.len())
        .filter(|&i| {
            let (prev, next) = (&records[i - 1].provenance, &records[i].provenance);
            prev.month != next.month && prev.source_year != next.source_year
        })
        .collect();

    for &seam in &seams {
        for variable in SMOOTHED_VARIABLES {
            let before = records[seam - 1].record.values.get(variable);
            let after = records[seam].record.values.get(variable);
            let half_step = (after - before) / 2.0;
            for j in 0..window {
                let ramp = half_step * (window - j) as f64 / window as f64;
                if let Some(r) = seam.checked_sub(1 + j).and_then(|i| records.get_mut(i)) {
                    let v = r.record.values.get(variable);
                    r.record.values.set(variable, v + ramp);
                }
                if let Some(r) = records.get_mut(seam + j) {
                    let v = r.record.values.get(variable);
                    r.record.values.set(variable, v - ramp);
                }
            }
        }
    }
    seams.len()
}
