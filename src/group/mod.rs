//! Age grouping: category ordering, young/old predicates, cohort splitting.

mod age;
mod category;
mod cohort;

pub use age::{is_old, is_young, AgeGroup};
pub use category::{order_by_age, order_by_category, CategoryOrder, AGE_COLUMN};
pub use cohort::{split_cohorts, Cohorts, FEATURE_INDEX_NAME};
