//! Coulomb wave functions F_l, G_l and their ρ-derivatives.
//!
//! Open channels start from an asymptotic representation of G_0 at a matching
//! radius, integrate inward to ρ, recurse upward in l for G and downward for F
//! and normalise F through the Wronskian F′G − G′F = 1. Closed channels only
//! need the logarithmic derivative of the exponentially decaying solution.

mod asymptotic;
mod closed;
mod open;

pub use closed::{closed_coulomb_wave_functions, ClosedCoulombWaveFunctions};
pub use open::coulomb_wave_functions;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoulombError {
    #[error("Coulomb functions require a finite positive rho, got {rho}")]
    InvalidArgument { rho: f64 },
    #[error("Coulomb functions require a finite non-negative eta, got {eta}")]
    InvalidSommerfeldParameter { eta: f64 },
    #[error("orbital angular momentum {order} exceeds the supported maximum {max_order}")]
    OrderTooLarge { order: u32, max_order: u32 },
    #[error(
        "Wronskian not satisfied for l <= {order} after raising the F recursion start to {start_order} (limit {max_start_order})"
    )]
    WronskianBudgetExceeded {
        order: u32,
        start_order: usize,
        max_start_order: usize,
    },
    #[error("{stage} did not converge within {iterations} iterations at rho = {rho}")]
    IterationBudgetExceeded {
        stage: &'static str,
        iterations: usize,
        rho: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoulombInput {
    pub order: u32,
    pub rho: f64,
    pub eta: f64,
}

impl CoulombInput {
    pub fn new(order: u32, rho: f64, eta: f64) -> Self {
        Self { order, rho, eta }
    }

    fn validate(self, max_order: u32) -> Result<Self, CoulombError> {
        if !self.rho.is_finite() || self.rho <= 0.0 {
            return Err(CoulombError::InvalidArgument { rho: self.rho });
        }
        if !self.eta.is_finite() || self.eta < 0.0 {
            return Err(CoulombError::InvalidSommerfeldParameter { eta: self.eta });
        }
        if self.order > max_order {
            return Err(CoulombError::OrderTooLarge {
                order: self.order,
                max_order,
            });
        }
        Ok(self)
    }
}

/// Regular (F) and irregular (G) Coulomb functions with their derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoulombWaveFunctions {
    pub f: f64,
    pub g: f64,
    pub df: f64,
    pub dg: f64,
}

impl CoulombWaveFunctions {
    /// Functions whose asymptotic start underflowed; they carry no flux.
    pub const VANISHING: Self = Self {
        f: 0.0,
        g: 0.0,
        df: 0.0,
        dg: 0.0,
    };

    pub fn is_vanishing(&self) -> bool {
        self.f == 0.0 && self.g == 0.0
    }

    pub fn wronskian(&self) -> f64 {
        self.df * self.g - self.dg * self.f
    }

    fn squared_modulus(&self) -> f64 {
        self.f * self.f + self.g * self.g
    }

    pub fn penetrability(&self, rho: f64) -> f64 {
        if self.is_vanishing() {
            return 0.0;
        }
        rho / self.squared_modulus()
    }

    pub fn shift_factor(&self, rho: f64) -> f64 {
        if self.is_vanishing() {
            return 0.0;
        }
        rho * (self.f * self.df + self.g * self.dg) / self.squared_modulus()
    }

    /// Hard-sphere phase arctan(F/G) folded onto [0, π].
    pub fn phase_shift(&self) -> f64 {
        if self.is_vanishing() {
            return 0.0;
        }
        (self.g / self.squared_modulus().sqrt()).clamp(-1.0, 1.0).acos()
    }
}

/// Coulomb phase σ_l − σ_0 = Σ_{n=1..l} arctan(η/n).
pub fn coulomb_phase_difference(order: u32, eta: f64) -> f64 {
    (1..=order).map(|n| (eta / f64::from(n)).atan()).sum()
}

/// Coulomb phase σ_0 = arg Γ(1 + iη) from its asymptotic expansion.
pub fn coulomb_phase_sigma0(eta: f64) -> f64 {
    let y2 = eta * eta;
    let y3 = 16.0 + y2;
    let y4 = y3 * y3;
    -eta + eta * y3.ln() / 2.0 + 3.5 * (eta / 4.0).atan()
        - ((eta).atan() + (eta / 2.0).atan() + (eta / 3.0).atan())
        - eta * (1.0 + (y2 - 48.0) / (30.0 * y4) + (y2 * y2 - 160.0 * y2 + 1280.0) / (105.0 * y4 * y4))
            / (12.0 * y3)
}

#[cfg(test)]
mod tests {
    use super::{coulomb_phase_difference, coulomb_phase_sigma0, CoulombWaveFunctions};

    #[test]
    fn sigma0_matches_gamma_function_argument() {
        // arg Γ(1 + i) and arg Γ(1 + 10i) + 4π
        assert!((coulomb_phase_sigma0(1.0) - (-0.301_640_320_467_533)).abs() < 1.0e-7);
        assert!((coulomb_phase_sigma0(10.0) - 13.802_912_974_232_9).abs() < 1.0e-9);
        assert_eq!(coulomb_phase_sigma0(0.0), 0.0);
    }

    #[test]
    fn phase_difference_sums_arctangents() {
        assert_eq!(coulomb_phase_difference(0, 3.0), 0.0);
        let expected = 2.0_f64.atan() + 1.0_f64.atan();
        assert!((coulomb_phase_difference(2, 2.0) - expected).abs() < 1.0e-15);
        assert_eq!(coulomb_phase_difference(3, 0.0), 0.0);
    }

    #[test]
    fn vanishing_functions_report_zero_flux() {
        let functions = CoulombWaveFunctions::VANISHING;
        assert!(functions.is_vanishing());
        assert_eq!(functions.penetrability(1.0), 0.0);
        assert_eq!(functions.shift_factor(1.0), 0.0);
        assert_eq!(functions.phase_shift(), 0.0);
    }
}
