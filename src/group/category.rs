//! Ordered categories and category-based row ordering.

use crate::data::{Table, Value};
use crate::error::{MarkerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Default name of the age label column.
pub const AGE_COLUMN: &str = "age";

/// An ordered, finite set of category labels mapped to ordinals.
///
/// The ordinal defines sort position only; it carries no magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryOrder {
    labels: Vec<String>,
    ordinals: HashMap<String, usize>,
}

impl CategoryOrder {
    /// Build from labels in ascending order. Repeated labels keep their first position.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut ordered = Vec::with_capacity(labels.len());
        let mut ordinals = HashMap::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref().to_string();
            if !ordinals.contains_key(&label) {
                ordinals.insert(label.clone(), ordered.len());
                ordered.push(label);
            }
        }
        Self {
            labels: ordered,
            ordinals,
        }
    }

    /// Ordinal of a label, `None` if the label is not a category.
    pub fn ordinal(&self, label: &str) -> Option<usize> {
        self.ordinals.get(label).copied()
    }

    /// Labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl From<Vec<String>> for CategoryOrder {
    fn from(labels: Vec<String>) -> Self {
        Self::new(&labels)
    }
}

impl From<CategoryOrder> for Vec<String> {
    fn from(order: CategoryOrder) -> Self {
        order.labels
    }
}

/// Sort rows by the category order of one column.
///
/// The sort is stable. Labels not in `order` are not valid categories:
/// they become missing cells in the returned table, sort after every
/// known category, and are reported with a warning.
pub fn order_by_category<S: AsRef<str>>(
    table: &Table,
    column: &str,
    order: &[S],
) -> Result<Table> {
    let categories = CategoryOrder::new(order);
    let col = table
        .column_index(column)
        .ok_or_else(|| MarkerError::MissingColumn(column.to_string()))?;

    let mut unknown: BTreeSet<String> = BTreeSet::new();
    let keys: Vec<Option<usize>> = (0..table.n_rows())
        .map(|row| {
            let label = table.get(row, col);
            if label.is_missing() {
                return None;
            }
            let label = label.to_string();
            let ordinal = categories.ordinal(&label);
            if ordinal.is_none() {
                unknown.insert(label);
            }
            ordinal
        })
        .collect();

    for label in &unknown {
        log::warn!(
            "Label '{}' in column '{}' is not one of {:?}; treated as missing",
            label,
            column,
            categories.labels()
        );
    }

    let mut rows: Vec<usize> = (0..table.n_rows()).collect();
    rows.sort_by_key(|&row| keys[row].unwrap_or(usize::MAX));

    let mut sorted = table.select_rows(&rows)?;
    for (pos, &row) in rows.iter().enumerate() {
        if keys[row].is_none() {
            sorted.set(pos, col, Value::Missing);
        }
    }
    Ok(sorted)
}

/// Sort rows by the `age` column.
pub fn order_by_age<S: AsRef<str>>(table: &Table, order: &[S]) -> Result<Table> {
    order_by_category(table, AGE_COLUMN, order)
}
