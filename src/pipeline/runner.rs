//! Analysis runner chaining ordering, cohort split, and per-feature statistics.

use crate::correct::Correction;
use crate::data::{NoiseMarkerResult, NoiseMarkerResultSet, Table};
use crate::dispersion::cv_ratios;
use crate::error::{MarkerError, Result};
use crate::group::{order_by_category, split_cohorts, Cohorts, AGE_COLUMN};
use crate::test::levene_pvalues;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the analysis.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Column used as sample identifiers; rows are numbered when unset.
    #[serde(default)]
    pub index_column: Option<String>,
    /// Column holding age labels.
    #[serde(default = "default_age_column")]
    pub age_column: String,
    /// Category order applied to the age column before splitting.
    #[serde(default)]
    pub age_order: Option<Vec<String>>,
    /// Multiple testing correction; off unless set.
    #[serde(default)]
    pub correction: Correction,
}

fn default_age_column() -> String {
    AGE_COLUMN.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            description: None,
            index_column: None,
            age_column: default_age_column(),
            age_order: None,
            correction: Correction::None,
        }
    }
}

impl AnalysisConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(MarkerError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(MarkerError::from)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MarkerError::from)
    }
}

/// Builder for configuring and running a young/old noise analysis.
#[derive(Debug, Clone, Default)]
pub struct NoiseAnalysis {
    config: AnalysisConfig,
}

impl NoiseAnalysis {
    /// Create an analysis with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Set the analysis name.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    /// Use a column as sample identifiers.
    pub fn index_column(mut self, column: &str) -> Self {
        self.config.index_column = Some(column.to_string());
        self
    }

    /// Set the column holding age labels.
    pub fn age_column(mut self, column: &str) -> Self {
        self.config.age_column = column.to_string();
        self
    }

    /// Order samples by these age categories before splitting.
    pub fn age_order<S: AsRef<str>>(mut self, order: &[S]) -> Self {
        self.config.age_order = Some(order.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    /// Set the multiple testing correction.
    pub fn correction(mut self, correction: Correction) -> Self {
        self.config.correction = correction;
        self
    }

    /// Switch on Benjamini-Hochberg correction at the default FDR level.
    pub fn correct_bh(self) -> Self {
        self.correction(Correction::fdr_bh())
    }

    /// Current configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            description: description.map(String::from),
            ..self.config.clone()
        }
    }

    /// Order and split a samples x measurements table into cohorts.
    pub fn cohorts(&self, samples: &Table) -> Result<Cohorts> {
        let indexed = match &self.config.index_column {
            Some(column) => samples
                .set_index(column)
                .map_err(|e| step_error("index", e))?,
            None => samples.clone(),
        };
        let ordered = match &self.config.age_order {
            Some(order) => order_by_category(&indexed, &self.config.age_column, order.as_slice())
                .map_err(|e| step_error("order", e))?,
            None => indexed,
        };
        split_cohorts(&ordered, &self.config.age_column).map_err(|e| step_error("split", e))
    }

    /// Run on a samples x measurements table.
    pub fn run(&self, samples: &Table) -> Result<NoiseMarkerResultSet> {
        log::info!(
            "Running analysis '{}' on {} samples",
            self.config.name,
            samples.n_rows()
        );
        let cohorts = self.cohorts(samples)?;
        self.run_cohorts(&cohorts)
    }

    /// Load a GCT-style file and run on it.
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<NoiseMarkerResultSet> {
        let samples = Table::from_gct(path)?;
        self.run(&samples)
    }

    /// Run the statistics on already split cohorts.
    pub fn run_cohorts(&self, cohorts: &Cohorts) -> Result<NoiseMarkerResultSet> {
        let levene = levene_pvalues(&cohorts.young, &cohorts.old)
            .map_err(|e| step_error("levene", e))?;
        let cv = cv_ratios(&cohorts.young, &cohorts.old).map_err(|e| step_error("cv_ratio", e))?;
        let corrected = levene.correct(self.config.correction);

        let results = levene
            .results
            .iter()
            .zip(&cv.results)
            .enumerate()
            .map(|(i, (test, dispersion))| {
                NoiseMarkerResult::new(
                    test.feature_id.clone(),
                    test.statistic,
                    test.p_value,
                    corrected.as_ref().and_then(|bh| bh.q_values.get(i).copied()),
                    dispersion.young_cv,
                    dispersion.old_cv,
                    dispersion.ratio,
                )
            })
            .collect();

        let set = NoiseMarkerResultSet::new(
            self.config.correction,
            cohorts.n_young(),
            cohorts.n_old(),
            results,
        );
        log::info!("Done: {} features tested", set.len());
        Ok(set)
    }
}

/// Add step context to a failure. Parse and numerical errors pass through unchanged.
fn step_error(step: &str, e: MarkerError) -> MarkerError {
    if e.is_parse_error() || e.is_numerical_error() {
        return e;
    }
    MarkerError::Pipeline(format!("Step '{}' failed: {}", step, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn sample_table() -> Table {
        let rows: [(&str, &str, [f64; 2]); 7] = [
            ("s1", "60-69", [10.0, 3.0]),
            ("s2", "20-29", [10.5, 3.1]),
            ("s3", "70-79", [2.0, 2.9]),
            ("s4", "20-29", [9.5, 2.8]),
            ("s5", "60-69", [18.0, 3.2]),
            ("s6", "20-29", [10.2, 3.0]),
            ("s7", "40-49", [7.0, 1.0]),
        ];
        Table::new(
            "sample_id",
            rows.iter().map(|r| r.0.to_string()).collect(),
            vec!["age".into(), "P1".into(), "P2".into()],
            rows.iter()
                .map(|r| vec![Value::parse(r.1), Value::Number(r.2[0]), Value::Number(r.2[1])])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_run_defaults() {
        let results = NoiseAnalysis::new().run(&sample_table()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.n_young, 3);
        assert_eq!(results.n_old, 3);
        assert_eq!(results.correction, Correction::None);
        assert!(results.iter().all(|r| r.q_value.is_none()));

        let p1 = results.get_feature("P1").unwrap();
        assert!(p1.cv_ratio > 1.0);
        assert!((0.0..=1.0).contains(&p1.p_value));
    }

    #[test]
    fn test_run_with_order_and_correction() {
        let analysis = NoiseAnalysis::new()
            .name("age_noise")
            .age_order(&["20-29", "60-69", "70-79"])
            .correct_bh();
        let cohorts = analysis.cohorts(&sample_table()).unwrap();
        assert_eq!(cohorts.young.columns(), &["s2", "s4", "s6"]);
        assert_eq!(cohorts.old.columns(), &["s1", "s5", "s3"]);

        let results = analysis.run_cohorts(&cohorts).unwrap();
        for r in results.iter() {
            let q = r.q_value.unwrap();
            assert!(q >= r.p_value);
        }
    }

    #[test]
    fn test_labels_outside_age_order_are_unassigned() {
        let analysis = NoiseAnalysis::new().age_order(&["20-29", "60-69"]);
        let cohorts = analysis.cohorts(&sample_table()).unwrap();
        assert_eq!(cohorts.old.columns(), &["s1", "s5"]);
        assert_eq!(cohorts.unassigned, vec!["s3".to_string(), "s7".to_string()]);

        let results = analysis.run_cohorts(&cohorts).unwrap();
        assert_eq!(results.n_old, 2);
    }

    #[test]
    fn test_index_column_from_file_layout() {
        let positional = Table::with_positional_index(
            vec!["age".into(), "barcode".into(), "P1".into()],
            vec![
                vec![Value::parse("20-29"), Value::parse("b1"), Value::Number(1.0)],
                vec![Value::parse("60-69"), Value::parse("b2"), Value::Number(2.0)],
                vec![Value::parse("20-29"), Value::parse("b3"), Value::Number(1.5)],
                vec![Value::parse("70-79"), Value::parse("b4"), Value::Number(4.0)],
            ],
        )
        .unwrap();

        let cohorts = NoiseAnalysis::new().cohorts(&positional).unwrap();
        assert_eq!(cohorts.young.columns(), &["0", "2"]);

        let cohorts = NoiseAnalysis::new()
            .index_column("barcode")
            .cohorts(&positional)
            .unwrap();
        assert_eq!(cohorts.young.columns(), &["b1", "b3"]);
        assert_eq!(cohorts.old.columns(), &["b2", "b4"]);
        assert_eq!(cohorts.feature_ids(), &["P1"]);

        let err = NoiseAnalysis::new()
            .index_column("sample_id")
            .cohorts(&positional)
            .unwrap_err();
        assert!(matches!(err, MarkerError::MissingColumn(_)));
    }

    #[test]
    fn test_missing_age_column_is_parse_error() {
        let err = NoiseAnalysis::new()
            .age_column("decade")
            .run(&sample_table())
            .unwrap_err();
        assert!(matches!(err, MarkerError::MissingColumn(_)));
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let analysis = NoiseAnalysis::new()
            .name("age_noise")
            .age_order(&["20-29", "60-69"])
            .correction(Correction::BenjaminiHochberg { alpha: 0.05 });
        let config = analysis.to_config(Some("test config"));

        let yaml = config.to_yaml().unwrap();
        let loaded = AnalysisConfig::from_yaml(&yaml).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(NoiseAnalysis::from_config(&loaded).config(), &config);
    }

    #[test]
    fn test_config_defaults_from_minimal_yaml() {
        let config = AnalysisConfig::from_yaml("name: minimal\n").unwrap();
        assert_eq!(config.age_column, "age");
        assert!(config.index_column.is_none());
        assert_eq!(config.correction, Correction::None);
        assert!(config.age_order.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let config =
            AnalysisConfig::from_json(r#"{"name": "j", "correction": {"BenjaminiHochberg": {"alpha": 0.1}}}"#)
                .unwrap();
        assert_eq!(config.correction, Correction::fdr_bh());
    }
}
