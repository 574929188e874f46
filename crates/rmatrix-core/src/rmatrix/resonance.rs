//! Resonance parameters and the R- and T-matrix assembly.

use crate::numerics::special::{solve_matrix, DenseComplexMatrix, SolveError};
use num_complex::Complex64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResonanceTableError {
    #[error("resonance {index} at {energy} eV has {actual} widths for {expected} channels")]
    WidthCount {
        index: usize,
        energy: f64,
        expected: usize,
        actual: usize,
    },
    #[error("resonance {index} has a non-finite energy or width")]
    NonFinite { index: usize },
    #[error("channel '{id}' appears more than once in the resonance table")]
    DuplicateChannel { id: String },
}

/// A pole: energy in eV, reduced widths in √eV (one per channel, signed) and
/// the eliminated capture width (zero outside Reich-Moore).
#[derive(Debug, Clone, PartialEq)]
pub struct Resonance {
    energy: f64,
    widths: Vec<f64>,
    eliminated_width: f64,
}

impl Resonance {
    pub fn new(energy: f64, widths: Vec<f64>, eliminated_width: f64) -> Self {
        Self {
            energy,
            widths,
            eliminated_width,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn eliminated_width(&self) -> f64 {
        self.eliminated_width
    }

    /// E_λ − E − iγ²_elim
    fn detuning(&self, energy: f64) -> Complex64 {
        Complex64::new(
            self.energy - energy,
            -self.eliminated_width * self.eliminated_width,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResonanceTable {
    channels: Vec<String>,
    resonances: Vec<Resonance>,
}

impl ResonanceTable {
    pub fn new(
        channels: Vec<String>,
        resonances: Vec<Resonance>,
    ) -> Result<Self, ResonanceTableError> {
        for (position, id) in channels.iter().enumerate() {
            if channels[..position].contains(id) {
                return Err(ResonanceTableError::DuplicateChannel { id: id.clone() });
            }
        }
        for (index, resonance) in resonances.iter().enumerate() {
            if resonance.widths.len() != channels.len() {
                return Err(ResonanceTableError::WidthCount {
                    index,
                    energy: resonance.energy,
                    expected: channels.len(),
                    actual: resonance.widths.len(),
                });
            }
            let finite = resonance.energy.is_finite()
                && resonance.eliminated_width.is_finite()
                && resonance.widths.iter().all(|width| width.is_finite());
            if !finite {
                return Err(ResonanceTableError::NonFinite { index });
            }
        }
        Ok(Self {
            channels,
            resonances,
        })
    }

    pub fn number_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn number_resonances(&self) -> usize {
        self.resonances.len()
    }

    pub fn channel_ids(&self) -> &[String] {
        &self.channels
    }

    pub fn resonances(&self) -> &[Resonance] {
        &self.resonances
    }

    pub fn energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.resonances.iter().map(Resonance::energy)
    }

    /// R_cc′ = Σ_λ γ_λc γ_λc′/(E_λ − E − iγ²_elim,λ)
    pub fn rmatrix(&self, energy: f64) -> DenseComplexMatrix {
        let size = self.number_channels();
        let mut rmatrix = DenseComplexMatrix::zeros(size, size);
        for resonance in &self.resonances {
            let denominator = resonance.detuning(energy).inv();
            for (c, gamma) in resonance.widths.iter().enumerate() {
                for (cprime, gamma_prime) in resonance.widths.iter().enumerate() {
                    rmatrix[(c, cprime)] += denominator * (gamma * gamma_prime);
                }
            }
        }
        rmatrix
    }

    /// T = (I − R·L)⁻¹·R for the diagonal `l_diagonal`. Rows and columns of
    /// channels flagged in `closed` are removed from R first.
    pub fn tmatrix(
        &self,
        energy: f64,
        l_diagonal: &[Complex64],
        closed: &[bool],
        out: &mut DenseComplexMatrix,
    ) -> Result<(), SolveError> {
        let size = self.number_channels();
        let mut rmatrix = self.rmatrix(energy);
        for (c, _) in closed.iter().enumerate().filter(|(_, closed)| **closed) {
            for other in 0..size {
                rmatrix[(c, other)] = Complex64::new(0.0, 0.0);
                rmatrix[(other, c)] = Complex64::new(0.0, 0.0);
            }
        }

        let mut system = DenseComplexMatrix::zeros(size, size);
        for c in 0..size {
            for cprime in 0..size {
                let delta = if c == cprime { 1.0 } else { 0.0 };
                system[(c, cprime)] = delta - rmatrix[(c, cprime)] * l_diagonal[cprime];
            }
        }

        *out = solve_matrix(&system, &rmatrix)?;
        Ok(())
    }

    /// T = γᵀ·A⁻¹·γ with the level matrix
    /// A_λμ = (E_λ − E − iγ²_elim,λ)·δ_λμ − Σ_c γ_λc·L_c·γ_μc.
    pub fn level_matrix_tmatrix(
        &self,
        energy: f64,
        l_diagonal: &[Complex64],
        closed: &[bool],
        out: &mut DenseComplexMatrix,
    ) -> Result<(), SolveError> {
        let channels = self.number_channels();
        let levels = self.number_resonances();
        if levels == 0 {
            *out = DenseComplexMatrix::zeros(channels, channels);
            return Ok(());
        }

        let is_closed = |c: usize| closed.get(c).copied().unwrap_or(false);
        let mut gamma = DenseComplexMatrix::zeros(levels, channels);
        for (lambda, resonance) in self.resonances.iter().enumerate() {
            for (c, width) in resonance.widths.iter().enumerate() {
                if !is_closed(c) {
                    gamma[(lambda, c)] = Complex64::new(*width, 0.0);
                }
            }
        }

        let mut level_matrix = DenseComplexMatrix::zeros(levels, levels);
        for lambda in 0..levels {
            level_matrix[(lambda, lambda)] = self.resonances[lambda].detuning(energy);
            for mu in 0..levels {
                for (c, l_value) in l_diagonal.iter().enumerate() {
                    let coupling = gamma[(lambda, c)] * *l_value * gamma[(mu, c)];
                    level_matrix[(lambda, mu)] -= coupling;
                }
            }
        }

        let solved = solve_matrix(&level_matrix, &gamma)?;
        let mut tmatrix = DenseComplexMatrix::zeros(channels, channels);
        for c in 0..channels {
            for cprime in 0..channels {
                let mut value = Complex64::new(0.0, 0.0);
                for lambda in 0..levels {
                    value += gamma[(lambda, c)] * solved[(lambda, cprime)];
                }
                tmatrix[(c, cprime)] = value;
            }
        }
        *out = tmatrix;
        Ok(())
    }
}
