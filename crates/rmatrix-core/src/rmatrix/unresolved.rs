//! Unresolved resonance parameters: an average level spacing and one reduced
//! width per channel, tabulated on an energy grid and interpolated lin-lin in
//! between.

use crate::numerics::InterpolationLaw;
use serde::{Deserialize, Serialize};

/// Largest number of degrees of freedom of a channel width distribution.
const MAX_DEGREES_OF_FREEDOM: u32 = 4;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnresolvedTableError {
    #[error("an unresolved resonance table needs at least one tabulated energy")]
    Empty,
    #[error("{actual} degrees of freedom given for {expected} channels")]
    DegreesCount { expected: usize, actual: usize },
    #[error("channel '{id}' has {degrees} degrees of freedom, at most 4 are allowed")]
    DegreesOfFreedom { id: String, degrees: u32 },
    #[error("channel '{id}' appears more than once in the unresolved table")]
    DuplicateChannel { id: String },
    #[error("unresolved entry {index} has {actual} widths for {expected} channels")]
    WidthCount {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unresolved entry {index} has a non-finite energy, spacing or width")]
    NonFinite { index: usize },
    #[error("unresolved entry {index} at {energy} eV is below the preceding energy")]
    Unsorted { index: usize, energy: f64 },
    #[error("{energy} eV lies outside the unresolved table range [{lower}, {upper}] eV")]
    OutOfRange { energy: f64, lower: f64, upper: f64 },
}

/// What a lookup outside the tabulated energies does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum UnresolvedOutOfRange {
    #[default]
    Error,
    /// Linear continuation of the first or last interval.
    Extrapolate,
}

/// Parameters at one energy; widths in √eV, the spacing in eV.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedResonance {
    energy: f64,
    level_spacing: f64,
    widths: Vec<f64>,
}

impl UnresolvedResonance {
    pub fn new(energy: f64, level_spacing: f64, widths: Vec<f64>) -> Self {
        Self {
            energy,
            level_spacing,
            widths,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn level_spacing(&self) -> f64 {
        self.level_spacing
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedResonanceTable {
    channels: Vec<String>,
    resonances: Vec<UnresolvedResonance>,
    degrees: Vec<u32>,
}

impl UnresolvedResonanceTable {
    /// Table over ascending energies. Repeated energies mark a discontinuity;
    /// a lookup exactly at one takes the first entry.
    pub fn new(
        channels: Vec<String>,
        resonances: Vec<UnresolvedResonance>,
        degrees: Vec<u32>,
    ) -> Result<Self, UnresolvedTableError> {
        if resonances.is_empty() {
            return Err(UnresolvedTableError::Empty);
        }
        if degrees.len() != channels.len() {
            return Err(UnresolvedTableError::DegreesCount {
                expected: channels.len(),
                actual: degrees.len(),
            });
        }
        for (position, (id, &count)) in channels.iter().zip(&degrees).enumerate() {
            if count > MAX_DEGREES_OF_FREEDOM {
                return Err(UnresolvedTableError::DegreesOfFreedom {
                    id: id.clone(),
                    degrees: count,
                });
            }
            if channels[..position].contains(id) {
                return Err(UnresolvedTableError::DuplicateChannel { id: id.clone() });
            }
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, resonance) in resonances.iter().enumerate() {
            if resonance.widths.len() != channels.len() {
                return Err(UnresolvedTableError::WidthCount {
                    index,
                    expected: channels.len(),
                    actual: resonance.widths.len(),
                });
            }
            let finite = resonance.energy.is_finite()
                && resonance.level_spacing.is_finite()
                && resonance.widths.iter().all(|width| width.is_finite());
            if !finite {
                return Err(UnresolvedTableError::NonFinite { index });
            }
            if resonance.energy < previous {
                return Err(UnresolvedTableError::Unsorted {
                    index,
                    energy: resonance.energy,
                });
            }
            previous = resonance.energy;
        }

        Ok(Self {
            channels,
            resonances,
            degrees,
        })
    }

    pub fn number_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_ids(&self) -> &[String] {
        &self.channels
    }

    pub fn degrees_of_freedom(&self) -> &[u32] {
        &self.degrees
    }

    pub fn resonances(&self) -> &[UnresolvedResonance] {
        &self.resonances
    }

    pub fn energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.resonances.iter().map(UnresolvedResonance::energy)
    }

    /// Tabulated energy range, both ends included.
    pub fn energy_range(&self) -> (f64, f64) {
        let first = self.resonances.first().map_or(f64::NAN, UnresolvedResonance::energy);
        let last = self.resonances.last().map_or(f64::NAN, UnresolvedResonance::energy);
        (first, last)
    }

    /// Spacing and widths at `energy`.
    pub fn at(
        &self,
        energy: f64,
        out_of_range: UnresolvedOutOfRange,
    ) -> Result<UnresolvedResonance, UnresolvedTableError> {
        let (lower, upper) = self.energy_range();
        let outside = energy < lower || energy > upper;
        if !energy.is_finite() || (outside && out_of_range == UnresolvedOutOfRange::Error) {
            return Err(UnresolvedTableError::OutOfRange {
                energy,
                lower,
                upper,
            });
        }

        let count = self.resonances.len();
        let right = if count == 1 {
            let only = &self.resonances[0];
            return Ok(UnresolvedResonance::new(energy, only.level_spacing, only.widths.clone()));
        } else if energy < lower {
            1
        } else if energy > upper {
            count - 1
        } else {
            let index = self.resonances.partition_point(|entry| entry.energy < energy);
            let entry = &self.resonances[index];
            if entry.energy == energy {
                return Ok(UnresolvedResonance::new(
                    energy,
                    entry.level_spacing,
                    entry.widths.clone(),
                ));
            }
            index
        };

        let (left, right) = (&self.resonances[right - 1], &self.resonances[right]);
        let interpolate = |y0: f64, y1: f64| {
            InterpolationLaw::LinearLinear.interpolate(energy, left.energy, right.energy, y0, y1)
        };
        let widths = left
            .widths
            .iter()
            .zip(&right.widths)
            .map(|(y0, y1)| interpolate(*y0, *y1))
            .collect();
        Ok(UnresolvedResonance::new(
            energy,
            interpolate(left.level_spacing, right.level_spacing),
            widths,
        ))
    }
}
