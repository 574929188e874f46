//! Evaluation configuration: Coulomb iteration bounds and reconstruction options.
//!
//! Every field carries a default so that partial JSON documents are accepted;
//! `load_evaluation_config` reads a complete `EvaluationConfig` from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tolerances and iteration budgets of the Coulomb wave function evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoulombConfig {
    /// Accepted deviation of the Wronskian F′G − G′F from one.
    pub wronskian_tolerance: f64,
    /// Relative size of G below which the upward l recursion stops.
    pub lmax_criterion: f64,
    /// Convergence criterion of the asymptotic series.
    pub series_criterion: f64,
    pub max_iterations: usize,
    /// Largest orbital angular momentum held in the recursion buffers.
    pub max_l: usize,
    /// Largest starting order of the downward F recursion.
    pub max_l0: usize,
    pub newmark_mesh: f64,
    pub newmark_convergence: f64,
    pub newmark_beta: f64,
    /// Terms of the closed-channel s-wave power series before it is
    /// declared divergent.
    pub closed_series_terms: usize,
    pub closed_series_criterion: f64,
    /// Terms kept in the large-ρ Whittaker expansion.
    pub closed_asymptotic_terms: usize,
    /// Depth of the continued fraction for the growing solution, above l.
    pub closed_fraction_depth: usize,
}

impl Default for CoulombConfig {
    fn default() -> Self {
        Self {
            wronskian_tolerance: 1.0e-6,
            lmax_criterion: 1.0e-10,
            series_criterion: 1.0e-16,
            max_iterations: 100,
            max_l: 60,
            max_l0: 100,
            newmark_mesh: 0.01,
            newmark_convergence: 1.0e-10,
            newmark_beta: 0.1,
            closed_series_terms: 1000,
            closed_series_criterion: 1.0e-16,
            closed_asymptotic_terms: 26,
            closed_fraction_depth: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Formalism {
    /// Capture eliminated into the complex pole energies.
    #[default]
    ReichMoore,
    /// Full level matrix, no eliminated channel.
    GeneralRMatrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum BoundaryOption {
    /// B = S, so that L = iP.
    #[default]
    ShiftFactor,
    /// L = S − B + iP with the channel's constant B.
    Constant,
}

/// Which grid points of a resonance pole are emitted by `SpinGroup::grid`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub enum GridPolicy {
    /// Poles at or below zero energy are skipped and non-positive points dropped.
    #[default]
    PositiveOnly,
    IncludeNegative,
    ClampToMinimum { minimum: f64 },
}

impl GridPolicy {
    pub fn accepts_pole(self, energy: f64) -> bool {
        match self {
            Self::IncludeNegative => true,
            Self::PositiveOnly | Self::ClampToMinimum { .. } => energy > 0.0,
        }
    }

    pub fn filter_point(self, energy: f64) -> Option<f64> {
        match self {
            Self::PositiveOnly => (energy > 0.0).then_some(energy),
            Self::IncludeNegative => Some(energy),
            Self::ClampToMinimum { minimum } => Some(energy.max(minimum)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum ClosedChannelPolicy {
    /// Rows and columns of below-threshold channels are removed from R.
    #[default]
    Eliminate,
    Retain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum RadiusOutOfRange {
    /// Flat extension beyond the tabulated energy range.
    #[default]
    Clamp,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationOptions {
    pub formalism: Formalism,
    pub boundary: BoundaryOption,
    pub grid_policy: GridPolicy,
    pub closed_channels: ClosedChannelPolicy,
    pub radius_out_of_range: RadiusOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationConfig {
    pub coulomb: CoulombConfig,
    pub options: EvaluationOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read evaluation config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse evaluation config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_evaluation_config(path: impl AsRef<Path>) -> Result<EvaluationConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
