pub mod special;

pub use special::{
    closed_coulomb_wave_functions, coulomb_wave_functions, hard_sphere, solve_matrix,
    ClosedCoulombWaveFunctions, CoulombError, CoulombInput, CoulombWaveFunctions,
    DenseComplexMatrix, HardSphereError, HardSphereFunctions, SolveError,
};

use serde::{Deserialize, Serialize};

/// ENDF-6 interpolation laws (INT = 1..5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum InterpolationLaw {
    Histogram,
    LinearLinear,
    LinearLog,
    LogLinear,
    LogLog,
}

impl InterpolationLaw {
    pub fn from_endf(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Histogram),
            2 => Some(Self::LinearLinear),
            3 => Some(Self::LinearLog),
            4 => Some(Self::LogLinear),
            5 => Some(Self::LogLog),
            _ => None,
        }
    }

    pub const fn endf_code(self) -> u32 {
        match self {
            Self::Histogram => 1,
            Self::LinearLinear => 2,
            Self::LinearLog => 3,
            Self::LogLinear => 4,
            Self::LogLog => 5,
        }
    }

    /// Interpolates between (x0, y0) and (x1, y1). Log laws require positive
    /// abscissae (LinearLog, LogLog) or ordinates (LogLinear, LogLog).
    pub fn interpolate(self, x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
        if x1 == x0 {
            return y1;
        }

        match self {
            Self::Histogram => y0,
            Self::LinearLinear => y0 + (y1 - y0) * (x - x0) / (x1 - x0),
            Self::LinearLog => y0 + (y1 - y0) * (x / x0).ln() / (x1 / x0).ln(),
            Self::LogLinear => y0 * ((y1 / y0).ln() * (x - x0) / (x1 - x0)).exp(),
            Self::LogLog => y0 * ((y1 / y0).ln() * (x / x0).ln() / (x1 / x0).ln()).exp(),
        }
    }
}

/// Sorts ascending by total order and removes exact duplicates.
pub fn sort_and_dedup(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup();
}
