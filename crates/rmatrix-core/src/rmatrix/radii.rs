//! Channel radii: constants or energy-dependent ENDF tabulations.

use crate::common::config::RadiusOutOfRange;
use crate::numerics::InterpolationLaw;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RadiusError {
    #[error("a radius table needs at least one point")]
    EmptyTable,
    #[error("radius table has {energies} energies but {radii} radii")]
    LengthMismatch { energies: usize, radii: usize },
    #[error("radius table energies must be non-decreasing, violated at index {index}")]
    UnsortedEnergies { index: usize },
    #[error("radius table has {boundaries} region boundaries but {laws} interpolation laws")]
    RegionMismatch { boundaries: usize, laws: usize },
    #[error("radius table region boundaries {boundaries:?} do not end at point {points}")]
    InvalidBoundaries { boundaries: Vec<usize>, points: usize },
    #[error("channel radius must be finite and non-negative, got {radius}")]
    InvalidRadius { radius: f64 },
    #[error("energy {energy} eV lies outside the radius table range [{lower}, {upper}] eV")]
    OutOfRange { energy: f64, lower: f64, upper: f64 },
}

/// Multi-region tabulated radius (ENDF TAB1 semantics: `boundaries` are the
/// 1-based indices of the last point of every interpolation region).
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusTable {
    energies: Vec<f64>,
    radii: Vec<f64>,
    boundaries: Vec<usize>,
    laws: Vec<InterpolationLaw>,
    out_of_range: RadiusOutOfRange,
}

impl RadiusTable {
    pub fn new(
        energies: Vec<f64>,
        radii: Vec<f64>,
        boundaries: Vec<usize>,
        laws: Vec<InterpolationLaw>,
        out_of_range: RadiusOutOfRange,
    ) -> Result<Self, RadiusError> {
        if energies.is_empty() {
            return Err(RadiusError::EmptyTable);
        }
        if energies.len() != radii.len() {
            return Err(RadiusError::LengthMismatch {
                energies: energies.len(),
                radii: radii.len(),
            });
        }
        if let Some(index) = energies.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(RadiusError::UnsortedEnergies { index: index + 1 });
        }
        if let Some(radius) = radii.iter().copied().find(|r| !r.is_finite() || *r < 0.0) {
            return Err(RadiusError::InvalidRadius { radius });
        }
        if boundaries.len() != laws.len() {
            return Err(RadiusError::RegionMismatch {
                boundaries: boundaries.len(),
                laws: laws.len(),
            });
        }
        let increasing = boundaries.windows(2).all(|pair| pair[0] < pair[1]);
        if boundaries.last() != Some(&energies.len()) || !increasing || boundaries[0] == 0 {
            return Err(RadiusError::InvalidBoundaries {
                boundaries,
                points: energies.len(),
            });
        }

        Ok(Self {
            energies,
            radii,
            boundaries,
            laws,
            out_of_range,
        })
    }

    /// Single-region linear-linear table.
    pub fn linear(
        energies: Vec<f64>,
        radii: Vec<f64>,
        out_of_range: RadiusOutOfRange,
    ) -> Result<Self, RadiusError> {
        let points = energies.len();
        Self::new(
            energies,
            radii,
            vec![points],
            vec![InterpolationLaw::LinearLinear],
            out_of_range,
        )
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn radius(&self, energy: f64) -> Result<f64, RadiusError> {
        let last = self.energies.len() - 1;
        let (lower, upper) = (self.energies[0], self.energies[last]);
        if energy < lower || energy > upper {
            return match self.out_of_range {
                RadiusOutOfRange::Clamp if energy < lower => Ok(self.radii[0]),
                RadiusOutOfRange::Clamp => Ok(self.radii[last]),
                RadiusOutOfRange::Error => Err(RadiusError::OutOfRange {
                    energy,
                    lower,
                    upper,
                }),
            };
        }
        if last == 0 {
            return Ok(self.radii[0]);
        }

        let right = self
            .energies
            .partition_point(|value| *value <= energy)
            .clamp(1, last);
        let left = right - 1;
        // the region owning the interval is the first one ending at or after `right`
        let region = self
            .boundaries
            .iter()
            .position(|boundary| *boundary > right)
            .unwrap_or(self.laws.len() - 1);
        Ok(self.laws[region].interpolate(
            energy,
            self.energies[left],
            self.energies[right],
            self.radii[left],
            self.radii[right],
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelRadius {
    Constant(f64),
    Table(RadiusTable),
}

impl ChannelRadius {
    pub fn constant(radius: f64) -> Result<Self, RadiusError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(RadiusError::InvalidRadius { radius });
        }
        Ok(Self::Constant(radius))
    }

    pub fn radius(&self, energy: f64) -> Result<f64, RadiusError> {
        match self {
            Self::Constant(radius) => Ok(*radius),
            Self::Table(table) => table.radius(energy),
        }
    }
}

impl From<RadiusTable> for ChannelRadius {
    fn from(table: RadiusTable) -> Self {
        Self::Table(table)
    }
}

/// Radii used for the penetrability, the shift factor and the phase shift.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRadii {
    penetrability: ChannelRadius,
    shift_factor: ChannelRadius,
    phase_shift: ChannelRadius,
}

impl ChannelRadii {
    pub fn new(radius: ChannelRadius) -> Self {
        Self::with_radii(radius.clone(), radius.clone(), radius)
    }

    /// True radius for penetrability and shift factor, effective radius for
    /// the phase shift.
    pub fn with_true_and_effective(true_radius: ChannelRadius, effective: ChannelRadius) -> Self {
        Self::with_radii(true_radius.clone(), true_radius, effective)
    }

    pub fn with_radii(
        penetrability: ChannelRadius,
        shift_factor: ChannelRadius,
        phase_shift: ChannelRadius,
    ) -> Self {
        Self {
            penetrability,
            shift_factor,
            phase_shift,
        }
    }

    pub fn penetrability_radius(&self, energy: f64) -> Result<f64, RadiusError> {
        self.penetrability.radius(energy)
    }

    pub fn shift_factor_radius(&self, energy: f64) -> Result<f64, RadiusError> {
        self.shift_factor.radius(energy)
    }

    pub fn phase_shift_radius(&self, energy: f64) -> Result<f64, RadiusError> {
        self.phase_shift.radius(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelRadii, ChannelRadius, RadiusError, RadiusTable};
    use crate::common::config::RadiusOutOfRange;
    use crate::numerics::InterpolationLaw;

    fn two_region_table(out_of_range: RadiusOutOfRange) -> RadiusTable {
        RadiusTable::new(
            vec![1.0, 2.0, 4.0, 8.0],
            vec![0.5, 0.6, 0.8, 0.8],
            vec![2, 4],
            vec![InterpolationLaw::Histogram, InterpolationLaw::LinearLinear],
            out_of_range,
        )
        .expect("valid table")
    }

    #[test]
    fn regions_select_their_interpolation_law() {
        let table = two_region_table(RadiusOutOfRange::Clamp);
        assert_eq!(table.radius(1.5).expect("inside"), 0.5);
        assert!((table.radius(3.0).expect("inside") - 0.7).abs() < 1.0e-15);
        assert_eq!(table.radius(8.0).expect("endpoint"), 0.8);
        assert_eq!(table.radius(2.0).expect("grid point"), 0.6);
    }

    #[test]
    fn out_of_range_policy_is_honoured() {
        let clamped = two_region_table(RadiusOutOfRange::Clamp);
        assert_eq!(clamped.radius(0.1).expect("clamped"), 0.5);
        assert_eq!(clamped.radius(100.0).expect("clamped"), 0.8);

        let strict = two_region_table(RadiusOutOfRange::Error);
        let error = strict.radius(100.0).expect_err("outside the table");
        assert_eq!(
            error,
            RadiusError::OutOfRange {
                energy: 100.0,
                lower: 1.0,
                upper: 8.0
            }
        );
    }

    #[test]
    fn malformed_tables_are_rejected() {
        let error = RadiusTable::linear(vec![2.0, 1.0], vec![0.1, 0.2], RadiusOutOfRange::Clamp)
            .expect_err("unsorted");
        assert_eq!(error, RadiusError::UnsortedEnergies { index: 1 });

        let error = RadiusTable::new(
            vec![1.0, 2.0],
            vec![0.1, 0.2],
            vec![1],
            vec![InterpolationLaw::LinearLinear],
            RadiusOutOfRange::Clamp,
        )
        .expect_err("last boundary must be the point count");
        assert!(matches!(error, RadiusError::InvalidBoundaries { .. }));

        assert!(ChannelRadius::constant(-0.1).is_err());
    }

    #[test]
    fn two_radius_constructor_splits_true_and_effective() {
        let radii = ChannelRadii::with_true_and_effective(
            ChannelRadius::Constant(0.482),
            ChannelRadius::Constant(0.367),
        );
        assert_eq!(radii.penetrability_radius(1.0).expect("p"), 0.482);
        assert_eq!(radii.shift_factor_radius(1.0).expect("s"), 0.482);
        assert_eq!(radii.phase_shift_radius(1.0).expect("phi"), 0.367);
    }
}
