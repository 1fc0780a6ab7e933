//! Analysis composition and execution.

mod runner;

pub use runner::{AnalysisConfig, NoiseAnalysis};
