//! Noise marker statistics for young/old cohort comparison
//!
//! This library provides the statistical helpers of a biomarker discovery
//! workflow that looks for proteins whose variability changes with age.
//!
//! # Overview
//!
//! - **data**: Expression tables loaded from GCT-style files, result types
//! - **group**: Age category ordering, young/old predicates, cohort splitting
//! - **test**: Levene's test for equality of variances (median-centred)
//! - **dispersion**: Coefficient of variation and old/young CV ratios
//! - **correct**: Optional Benjamini-Hochberg correction (off by default)
//! - **pipeline**: Analysis runner and serializable configuration
//!
//! # Example
//!
//! ```no_run
//! use noise_markers::prelude::*;
//!
//! // Samples x (age, proteins...)
//! let samples = read_table("expression.gct").unwrap();
//! let ordered = order_by_age(&samples, &["20-29", "60-69", "70-79"]).unwrap();
//! let cohorts = split_cohorts(&ordered, "age").unwrap();
//!
//! let levene = levene_pvalues(&cohorts.young, &cohorts.old).unwrap();
//! let ratios = cv_ratio(&cohorts.young, &cohorts.old).unwrap();
//! assert_eq!(levene.len(), ratios.len());
//!
//! // Or all at once
//! let results = NoiseAnalysis::new()
//!     .age_order(&["20-29", "60-69", "70-79"])
//!     .run(&samples)
//!     .unwrap();
//! results.to_tsv("noise_markers.tsv").unwrap();
//! ```

pub mod correct;
pub mod data;
pub mod dispersion;
pub mod error;
pub mod group;
pub mod pipeline;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::correct::{correct_bh, BhCorrected, Correction, DEFAULT_FDR_ALPHA};
    pub use crate::data::{
        read_table, ColumnKind, NoiseDirection, NoiseMarkerResult, NoiseMarkerResultSet,
        ResultSummary, Table, Value,
    };
    pub use crate::dispersion::{
        coefficient_of_variation, cv_ratio, cv_ratios, CvRatioResults, CvRatioSingle,
    };
    pub use crate::error::{MarkerError, Result};
    pub use crate::group::{
        is_old, is_young, order_by_age, order_by_category, split_cohorts, AgeGroup,
        CategoryOrder, Cohorts, AGE_COLUMN,
    };
    pub use crate::pipeline::{AnalysisConfig, NoiseAnalysis};
    pub use crate::test::{
        levene, levene_groups, levene_pvalues, LeveneResultSingle, LeveneResults, LeveneTest,
    };
}
