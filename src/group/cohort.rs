//! Splitting a sample table into young and old cohorts.

use crate::data::{ColumnKind, Table};
use crate::error::{MarkerError, Result};
use crate::group::AgeGroup;

/// Index name of cohort tables (rows are measured features).
pub const FEATURE_INDEX_NAME: &str = "protein";

/// Young and old cohorts, each oriented features x samples.
#[derive(Debug, Clone)]
pub struct Cohorts {
    /// Features x young samples.
    pub young: Table,
    /// Features x old samples.
    pub old: Table,
    /// Samples whose label matched both predicates; in neither cohort.
    pub ambiguous: Vec<String>,
    /// Samples whose label matched neither predicate.
    pub unassigned: Vec<String>,
}

impl Cohorts {
    /// Feature identifiers shared by both cohorts.
    pub fn feature_ids(&self) -> &[String] {
        self.young.index()
    }

    /// Number of young samples.
    pub fn n_young(&self) -> usize {
        self.young.n_cols()
    }

    /// Number of old samples.
    pub fn n_old(&self) -> usize {
        self.old.n_cols()
    }
}

/// Measurement columns of a samples table: every numeric column except the age column.
///
/// A column mixing numbers and text is an error. Text-only and empty
/// columns are skipped with a warning.
fn measurement_columns(table: &Table, age_col: usize) -> Result<Vec<usize>> {
    let mut measurements = Vec::new();
    for col in (0..table.n_cols()).filter(|&c| c != age_col) {
        let name = &table.columns()[col];
        match table.column_kind(col) {
            ColumnKind::Numeric => measurements.push(col),
            ColumnKind::Mixed { row } => {
                return Err(MarkerError::InvalidValue {
                    feature: name.clone(),
                    column: table.index()[row].clone(),
                    value: table.get(row, col).to_string(),
                })
            }
            ColumnKind::Text => {
                log::warn!("Column '{}' holds text only; not used as a measurement", name)
            }
            ColumnKind::Empty => {
                log::warn!("Column '{}' has no values; not used as a measurement", name)
            }
        }
    }
    Ok(measurements)
}

/// Split a samples x measurements table by the age label column.
///
/// Measurement columns are the numeric columns other than `age_column`.
/// Both cohorts are transposed so rows are features and columns are
/// samples, which gives them identical feature indices.
pub fn split_cohorts(table: &Table, age_column: &str) -> Result<Cohorts> {
    let age_col = table
        .column_index(age_column)
        .ok_or_else(|| MarkerError::MissingColumn(age_column.to_string()))?;

    let measurements = measurement_columns(table, age_col)?;
    if measurements.is_empty() {
        return Err(MarkerError::EmptyData(
            "No numeric measurement columns".to_string(),
        ));
    }

    let mut young_rows = Vec::new();
    let mut old_rows = Vec::new();
    let mut ambiguous = Vec::new();
    let mut unassigned = Vec::new();

    for row in 0..table.n_rows() {
        let sample = &table.index()[row];
        match AgeGroup::classify(table.get(row, age_col)) {
            AgeGroup::Young => young_rows.push(row),
            AgeGroup::Old => old_rows.push(row),
            AgeGroup::Ambiguous => {
                log::warn!(
                    "Sample '{}' has ambiguous age label '{}'; excluded from both cohorts",
                    sample,
                    table.get(row, age_col)
                );
                ambiguous.push(sample.clone());
            }
            AgeGroup::Unassigned => unassigned.push(sample.clone()),
        }
    }

    if young_rows.is_empty() || old_rows.is_empty() {
        log::warn!(
            "Cohort split left {} young and {} old samples",
            young_rows.len(),
            old_rows.len()
        );
    }
    log::debug!(
        "Split {} samples: {} young, {} old, {} ambiguous, {} unassigned",
        table.n_rows(),
        young_rows.len(),
        old_rows.len(),
        ambiguous.len(),
        unassigned.len()
    );

    let young = table
        .select_rows(&young_rows)?
        .select_columns(&measurements)?
        .transpose(FEATURE_INDEX_NAME);
    let old = table
        .select_rows(&old_rows)?
        .select_columns(&measurements)?
        .transpose(FEATURE_INDEX_NAME);

    Ok(Cohorts {
        young,
        old,
        ambiguous,
        unassigned,
    })
}
