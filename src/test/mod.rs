//! Statistical hypothesis testing between age cohorts.


pub use levene::{
    levene, levene_groups, levene_pvalues, LeveneResultSingle, LeveneResults, LeveneTest,
};
