//! Result types for young/old noise marker analysis.

use crate::correct::Correction;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Direction of the variability change with age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseDirection {
    /// Old cohort is more variable (CV ratio > 1).
    Increased,
    /// Old cohort is less variable (CV ratio < 1).
    Decreased,
    /// Ratio is exactly 1.
    Unchanged,
    /// Ratio is undefined (NaN).
    Undefined,
}

impl NoiseDirection {
    /// Classify a CV ratio.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio.is_nan() {
            Self::Undefined
        } else if ratio > 1.0 {
            Self::Increased
        } else if ratio < 1.0 {
            Self::Decreased
        } else {
            Self::Unchanged
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Increased => "increased",
            Self::Decreased => "decreased",
            Self::Unchanged => "unchanged",
            Self::Undefined => "undefined",
        }
    }
}

/// Result for a single feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseMarkerResult {
    /// Feature identifier.
    pub feature_id: String,
    /// Levene W statistic.
    pub statistic: f64,
    /// Raw Levene p-value.
    pub p_value: f64,
    /// Adjusted p-value, present only when a correction was applied.
    pub q_value: Option<f64>,
    /// CV in the young cohort.
    pub young_cv: f64,
    /// CV in the old cohort.
    pub old_cv: f64,
    /// old_cv / young_cv.
    pub cv_ratio: f64,
    /// Direction of the change.
    pub direction: NoiseDirection,
}

impl NoiseMarkerResult {
    /// Create a new result.
    pub fn new(
        feature_id: String,
        statistic: f64,
        p_value: f64,
        q_value: Option<f64>,
        young_cv: f64,
        old_cv: f64,
        cv_ratio: f64,
    ) -> Self {
        Self {
            feature_id,
            statistic,
            p_value,
            q_value,
            young_cv,
            old_cv,
            cv_ratio,
            direction: NoiseDirection::from_ratio(cv_ratio),
        }
    }

    /// The p-value used for significance: q when corrected, otherwise raw p.
    pub fn evidence(&self) -> f64 {
        self.q_value.unwrap_or(self.p_value)
    }

    /// Check if significant at a threshold.
    pub fn is_significant_at(&self, alpha: f64) -> bool {
        self.evidence() < alpha
    }
}

/// Collection of per-feature results from one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseMarkerResultSet {
    /// Correction applied to the p-values.
    pub correction: Correction,
    /// Number of young samples.
    pub n_young: usize,
    /// Number of old samples.
    pub n_old: usize,
    /// Individual results, in feature order.
    pub results: Vec<NoiseMarkerResult>,
}

impl NoiseMarkerResultSet {
    /// Create a new result set.
    pub fn new(
        correction: Correction,
        n_young: usize,
        n_old: usize,
        results: Vec<NoiseMarkerResult>,
    ) -> Self {
        Self {
            correction,
            n_young,
            n_old,
            results,
        }
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Get result for a specific feature.
    pub fn get_feature(&self, feature_id: &str) -> Option<&NoiseMarkerResult> {
        self.results.iter().find(|r| r.feature_id == feature_id)
    }

    /// Results sorted by p-value (ascending, NaN last).
    pub fn sorted_by_pvalue(&self) -> Vec<&NoiseMarkerResult> {
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| match (a.p_value.is_nan(), b.p_value.is_nan()) {
            (false, false) => a.p_value.total_cmp(&b.p_value),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        sorted
    }

    /// Results significant at a threshold.
    pub fn significant_at(&self, alpha: f64) -> Vec<&NoiseMarkerResult> {
        self.results
            .iter()
            .filter(|r| r.is_significant_at(alpha))
            .collect()
    }

    /// Results rejected at the correction's FDR level.
    ///
    /// Empty when no correction was applied: raw p-values carry no FDR decision.
    pub fn significant(&self) -> Vec<&NoiseMarkerResult> {
        match self.correction.alpha() {
            Some(alpha) => self.significant_at(alpha),
            None => Vec::new(),
        }
    }

    /// Count results at common thresholds.
    pub fn summary(&self) -> ResultSummary {
        let count = |alpha: f64| self.results.iter().filter(|r| r.is_significant_at(alpha)).count();
        ResultSummary {
            total: self.len(),
            corrected: self.correction.is_enabled(),
            fdr_alpha: self.correction.alpha(),
            discoveries: self.correction.alpha().map(count),
            significant_01: count(0.01),
            significant_05: count(0.05),
            significant_10: count(0.10),
            increased: self
                .results
                .iter()
                .filter(|r| r.direction == NoiseDirection::Increased)
                .count(),
            undefined_ratio: self
                .results
                .iter()
                .filter(|r| r.direction == NoiseDirection::Undefined)
                .count(),
        }
    }

    /// Write results to TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "protein\tstatistic\tp_value\tq_value\tyoung_cv\told_cv\tcv_ratio\tdirection"
        )?;

        for r in &self.results {
            let q = r.q_value.map(|q| format!("{:.6e}", q)).unwrap_or_default();
            writeln!(
                writer,
                "{}\t{:.6}\t{:.6e}\t{}\t{:.6}\t{:.6}\t{:.6}\t{}",
                r.feature_id,
                r.statistic,
                r.p_value,
                q,
                r.young_cv,
                r.old_cv,
                r.cv_ratio,
                r.direction.name()
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Iterate over results.
    pub fn iter(&self) -> impl Iterator<Item = &NoiseMarkerResult> {
        self.results.iter()
    }
}

/// Summary statistics for a result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Number of features tested.
    pub total: usize,
    /// Whether counts are based on q-values.
    pub corrected: bool,
    /// FDR level of the applied correction.
    pub fdr_alpha: Option<f64>,
    /// Features rejected at `fdr_alpha`.
    pub discoveries: Option<usize>,
    /// Significant at 0.01.
    pub significant_01: usize,
    /// Significant at 0.05.
    pub significant_05: usize,
    /// Significant at 0.10.
    pub significant_10: usize,
    /// Features with a CV ratio above 1.
    pub increased: usize,
    /// Features with a NaN CV ratio.
    pub undefined_ratio: usize,
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = if self.corrected { "q" } else { "p" };
        writeln!(f, "Total features tested: {}", self.total)?;
        writeln!(f, "Significant at {} < 0.01: {}", label, self.significant_01)?;
        writeln!(f, "Significant at {} < 0.05: {}", label, self.significant_05)?;
        writeln!(f, "Significant at {} < 0.10: {}", label, self.significant_10)?;
        if let (Some(alpha), Some(n)) = (self.fdr_alpha, self.discoveries) {
            writeln!(f, "Discoveries at FDR {}: {}", alpha, n)?;
        }
        writeln!(f, "Noisier with age:        {}", self.increased)?;
        writeln!(f, "Undefined CV ratio:      {}", self.undefined_ratio)?;
        Ok(())
    }
}
