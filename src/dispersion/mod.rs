//! Dispersion measures between age cohorts.

pub mod cv;

pub use cv::{coefficient_of_variation, cv_ratio, cv_ratios, CvRatioResults, CvRatioSingle};
