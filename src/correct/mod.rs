//! Multiple testing correction.
//!
//! Correction is opt-in: [`Correction::None`] is the default and leaves
//! raw p-values as the reported evidence.

pub mod bh;

pub use bh::{correct_bh, BhCorrected};

use serde::{Deserialize, Serialize};

/// FDR level used when BH correction is switched on without an explicit alpha.
pub const DEFAULT_FDR_ALPHA: f64 = 0.1;

/// Multiple testing correction applied to a p-value sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Correction {
    /// Report raw p-values only.
    #[default]
    None,
    /// Benjamini-Hochberg FDR at level `alpha`.
    BenjaminiHochberg { alpha: f64 },
}

impl Correction {
    /// BH correction at the default FDR level.
    pub fn fdr_bh() -> Self {
        Self::BenjaminiHochberg {
            alpha: DEFAULT_FDR_ALPHA,
        }
    }

    /// FDR level, if a correction is active.
    pub fn alpha(&self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::BenjaminiHochberg { alpha } => Some(*alpha),
        }
    }

    /// Check if a correction is active.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Apply to p-values; `None` when correction is off.
    pub fn apply(&self, p_values: &[f64], feature_ids: &[String]) -> Option<BhCorrected> {
        match self {
            Self::None => None,
            Self::BenjaminiHochberg { .. } => Some(correct_bh(p_values, feature_ids)),
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BenjaminiHochberg { .. } => "fdr_bh",
        }
    }
}
