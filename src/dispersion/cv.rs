//! Coefficient of variation and young/old CV ratios.

use crate::data::Table;
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Population standard deviation over mean.
///
/// NaN entries are treated as missing and skipped. Returns NaN, not an
/// error, when the mean is exactly zero or no values remain.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return f64::NAN;
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return f64::NAN;
    }
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// CV ratio for a single feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvRatioSingle {
    /// Feature identifier.
    pub feature_id: String,
    /// CV in the young cohort.
    pub young_cv: f64,
    /// CV in the old cohort.
    pub old_cv: f64,
    /// old_cv / young_cv, NaN when young_cv is zero.
    pub ratio: f64,
}

/// CV ratios for all features, in the young table's row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvRatioResults {
    /// Individual results.
    pub results: Vec<CvRatioSingle>,
}

impl CvRatioResults {
    /// Number of features.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Ratios only, in feature order.
    pub fn ratios(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.ratio).collect()
    }

    /// Get result for a specific feature.
    pub fn get_feature(&self, feature_id: &str) -> Option<&CvRatioSingle> {
        self.results.iter().find(|r| r.feature_id == feature_id)
    }
}

fn ratio(old_cv: f64, young_cv: f64) -> f64 {
    if young_cv == 0.0 {
        f64::NAN
    } else {
        old_cv / young_cv
    }
}

/// Per-feature CVs and old/young ratios between two cohorts.
///
/// Both tables are features x samples; features of `young` are looked up
/// by id in `old`.
pub fn cv_ratios(young: &Table, old: &Table) -> Result<CvRatioResults> {
    let old_rows = young.align_rows(old)?;

    let results = old_rows
        .par_iter()
        .enumerate()
        .map(|(row, &old_row)| -> Result<CvRatioSingle> {
            let young_cv = coefficient_of_variation(&young.numeric_row(row)?);
            let old_cv = coefficient_of_variation(&old.numeric_row(old_row)?);
            Ok(CvRatioSingle {
                feature_id: young.index()[row].clone(),
                young_cv,
                old_cv,
                ratio: ratio(old_cv, young_cv),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CvRatioResults { results })
}

/// Old/young CV ratio per feature, in the young table's row order.
pub fn cv_ratio(young: &Table, old: &Table) -> Result<Vec<f64>> {
    Ok(cv_ratios(young, old)?.ratios())
}
