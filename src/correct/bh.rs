//! Benjamini-Hochberg false discovery rate correction.

use serde::{Deserialize, Serialize};

/// Result of BH correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BhCorrected {
    /// Feature IDs in original order.
    pub feature_ids: Vec<String>,
    /// Original p-values.
    pub p_values: Vec<f64>,
    /// Adjusted p-values (q-values). NaN where the p-value was NaN.
    pub q_values: Vec<f64>,
    /// Number of tests (non-NaN p-values).
    pub n_tests: usize,
}

impl BhCorrected {
    /// Get q-value for a specific feature.
    pub fn get_qvalue(&self, feature_id: &str) -> Option<f64> {
        let idx = self.feature_ids.iter().position(|f| f == feature_id)?;
        self.q_values.get(idx).copied()
    }

    /// Count significant results at a threshold.
    pub fn n_significant(&self, alpha: f64) -> usize {
        self.q_values.iter().filter(|&&q| q < alpha).count()
    }

    /// Reject flags at a threshold, in original order.
    pub fn rejected(&self, alpha: f64) -> Vec<bool> {
        self.q_values.iter().map(|&q| q < alpha).collect()
    }

    /// Get indices of significant results.
    pub fn significant_indices(&self, alpha: f64) -> Vec<usize> {
        self.q_values
            .iter()
            .enumerate()
            .filter(|(_, &q)| q < alpha)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Apply Benjamini-Hochberg FDR correction.
///
/// For each p-value, the adjusted p-value (q-value) is calculated as:
/// q[i] = min(p[i] * n / rank[i], q[i+1])
///
/// NaN p-values are left out of the ranking and keep a NaN q-value.
///
/// # Arguments
/// * `p_values` - Raw p-values
/// * `feature_ids` - Feature identifiers (same order as p_values)
pub fn correct_bh(p_values: &[f64], feature_ids: &[String]) -> BhCorrected {
    let mut q_values = vec![f64::NAN; p_values.len()];

    // Sorted index over testable p-values
    let mut indices: Vec<usize> = (0..p_values.len())
        .filter(|&i| !p_values[i].is_nan())
        .collect();
    indices.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let n = indices.len();
    if n > 0 {
        let n_f64 = n as f64;
        let mut q_sorted = vec![0.0; n];

        // Start from largest p-value
        q_sorted[n - 1] = p_values[indices[n - 1]].min(1.0);

        // Work backwards
        for i in (0..n - 1).rev() {
            let rank = i + 1;
            let adjusted = p_values[indices[i]] * n_f64 / rank as f64;
            q_sorted[i] = adjusted.min(q_sorted[i + 1]).min(1.0);
        }

        // Restore original order
        for (i, &orig_idx) in indices.iter().enumerate() {
            q_values[orig_idx] = q_sorted[i];
        }
    }

    BhCorrected {
        feature_ids: feature_ids.to_vec(),
        p_values: p_values.to_vec(),
        q_values,
        n_tests: n,
    }
}
