//! Inverse-distance weights.

/// Time-invariant weights of the grid cells supplied for one target point.
///
/// Every supplied candidate appears, in the order it was supplied; cells
/// excluded before weighting carry a weight of zero. Weights lie in `[0, 1]`
/// and sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationWeights {
    entries: Vec<(String, f64)>,
}

impl InterpolationWeights {
    pub(crate) fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Weight of the grid cell `id`, if it was a candidate.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, w)| (id.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

/// Normalised inverse-distance weights `w_i ∝ 1 / d_i^p`.
///
/// When any distance is within `coincidence_tolerance_km`, the nearest such
/// point receives weight 1 and every other point 0. Returns an empty vector
/// for empty input.
pub fn inverse_distance_weights(
    distances_km: &[f64],
    exponent: f64,
    coincidence_tolerance_km: f64,
) -> Vec<f64> {
    let nearest = distances_km
        .iter()
        .enumerate()
        .filter(|(_, d)| **d <= coincidence_tolerance_km)
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);

    if let Some(index) = nearest {
        let mut weights = vec![0.0; distances_km.len()];
        weights[index] = 1.0;
        return weights;
    }

    let raw: Vec<f64> = distances_km.iter().map(|d| d.powf(-exponent)).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_follow_inverse_square_distance() {
        let weights = inverse_distance_weights(&[1.0, 2.0, 4.0], 2.0, 0.001);
        // Proportional to {1, 0.25, 0.0625}, normalised by 1.3125.
        assert!((weights[0] - 16.0 / 21.0).abs() < 1e-12);
        assert!((weights[1] - 4.0 / 21.0).abs() < 1e-12);
        assert!((weights[2] - 1.0 / 21.0).abs() < 1e-12);
        assert!((weights[1] / weights[0] - 0.25).abs() < 1e-12);
        assert!((weights[2] / weights[0] - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_weights_sum_to_one_and_are_bounded() {
        let cases: [&[f64]; 4] = [
            &[3.2],
            &[0.5, 0.5],
            &[1.0, 7.5, 12.0, 30.0],
            &[100.0, 0.2, 5.0, 5.0, 8.0],
        ];
        for distances in cases {
            for exponent in [1.0, 1.5, 2.0, 3.0] {
                let weights = inverse_distance_weights(distances, exponent, 0.001);
                let sum: f64 = weights.iter().sum();
                assert!((sum - 1.0).abs() < 1e-12, "{distances:?} p={exponent}");
                assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));
            }
        }
    }

    #[test]
    fn test_coincident_point_takes_all_weight() {
        let weights = inverse_distance_weights(&[3.0, 0.0005, 0.0, 9.0], 1.0, 0.001);
        assert_eq!(weights, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(inverse_distance_weights(&[], 1.0, 0.001).is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let weights = InterpolationWeights::new(vec![("a".into(), 0.25), ("b".into(), 0.75)]);
        assert_eq!(weights.get("b"), Some(0.75));
        assert_eq!(weights.get("c"), None);
        assert_eq!(weights.len(), 2);
        assert!((weights.sum() - 1.0).abs() < 1e-15);
    }
}
