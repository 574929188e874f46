//! Exponentially decaying and growing Coulomb solutions of a closed channel,
//! u'' = (1 + 2η/ρ + l(l+1)/ρ²)·u, represented through their logarithmic
//! derivatives at ρ and normalised to a unit Wronskian.

use super::{CoulombError, CoulombInput};
use crate::common::config::CoulombConfig;
use crate::common::constants::EULER_MASCHERONI;

/// Below this η the l = 0 decaying solution is taken to be e^{−ρ}.
const NEUTRAL_ETA: f64 = 1.0e-8;
const LONG_RANGE_DISTANCE: f64 = 10.0;
const LONG_RANGE_MAX_STEP: f64 = 0.001_953_125;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedCoulombWaveFunctions {
    pub decaying: f64,
    pub growing: f64,
    pub decaying_derivative: f64,
    pub growing_derivative: f64,
}

impl ClosedCoulombWaveFunctions {
    pub fn wronskian(&self) -> f64 {
        self.decaying * self.growing_derivative - self.decaying_derivative * self.growing
    }

    /// ρ·W′/W of the decaying solution W.
    pub fn shift_factor(&self, rho: f64) -> f64 {
        rho * self.decaying_derivative / self.decaying
    }
}

pub fn closed_coulomb_wave_functions(
    input: CoulombInput,
    config: &CoulombConfig,
) -> Result<ClosedCoulombWaveFunctions, CoulombError> {
    let max_order = config.max_l.max(3) - 2;
    let CoulombInput { order, rho, eta } = input.validate(max_order as u32)?;

    let decaying = decaying_log_derivative(order, rho, eta, config)?;
    let growing = growing_log_derivative(order, rho, eta, config.closed_fraction_depth);
    let amplitude = 1.0 / (growing - decaying).abs().sqrt();

    Ok(ClosedCoulombWaveFunctions {
        decaying: amplitude,
        growing: amplitude,
        decaying_derivative: decaying * amplitude,
        growing_derivative: growing * amplitude,
    })
}

/// Logarithmic derivative of the decaying solution, recursed upward from l = 0.
fn decaying_log_derivative(
    order: u32,
    rho: f64,
    eta: f64,
    config: &CoulombConfig,
) -> Result<f64, CoulombError> {
    let mut log_derivative = if eta < NEUTRAL_ETA {
        -1.0
    } else {
        s_wave_decaying_log_derivative(rho, eta, config)?
    };
    for l in 0..order {
        let (a, b) = recursion_coefficients(l, rho, eta);
        log_derivative = (a * a - 1.0) / (b - log_derivative) - b;
    }
    Ok(log_derivative)
}

/// Logarithmic derivative of the growing solution from a continued fraction
/// started well above `order`.
fn growing_log_derivative(order: u32, rho: f64, eta: f64, depth: usize) -> f64 {
    let top = order as usize + depth + (5.0 * eta) as usize;
    let mut log_derivative = 1.0;
    for l in (order as usize..top).rev() {
        let (a, b) = recursion_coefficients(l as u32, rho, eta);
        log_derivative = b - (a * a - 1.0) / (b + log_derivative);
    }
    log_derivative
}

fn recursion_coefficients(l: u32, rho: f64, eta: f64) -> (f64, f64) {
    let next = f64::from(l + 1);
    let a = eta / next;
    (a, a + next / rho)
}

fn s_wave_decaying_log_derivative(
    rho: f64,
    eta: f64,
    config: &CoulombConfig,
) -> Result<f64, CoulombError> {
    if (eta + 1.0) * rho > 8.0 {
        if rho < LONG_RANGE_DISTANCE * (eta + 1.0) {
            Ok(long_range_integration(rho, eta))
        } else {
            Ok(asymptotic_series(rho, eta, config.closed_asymptotic_terms))
        }
    } else {
        power_series(rho, eta, config)
    }
}

/// Numerov integration inward from ρ + 10, where the solution is e^{−ρ}.
fn long_range_integration(rho: f64, eta: f64) -> f64 {
    let h = (0.25 * rho).min(LONG_RANGE_MAX_STEP);
    let h12 = h * h / 12.0;
    let steps = (1.0 + LONG_RANGE_DISTANCE / h) as i64;
    let potential = |index: i64| h12 * (1.0 + 2.0 * eta / (rho + h * index as f64));

    let mut window = [0.0; 7];
    window[5] = (-h).exp();
    window[6] = 1.0;
    let mut v2 = potential(steps);
    let mut v3 = potential(steps - 1);
    for index in (-3..=steps - 2).rev() {
        let scale = window[6];
        for slot in 0..6 {
            window[slot] = window[slot + 1] / scale;
        }
        let v1 = v2;
        v2 = v3;
        v3 = potential(index);
        window[6] = (window[5] * (2.0 + 10.0 * v2) - window[4] * (1.0 - v1)) / (1.0 - v3);
    }

    ((window[0] - window[6]) / 60.0 + 0.15 * (window[5] - window[1])
        + 0.75 * (window[2] - window[4]))
        / (h * window[3])
}

/// Large-ρ expansion of the Whittaker function W(−η, 1/2, 2ρ).
fn asymptotic_series(rho: f64, eta: f64, terms: usize) -> f64 {
    let (mut term, mut sum, mut derivative) = (1.0, 1.0, 0.0);
    for m in 1..=terms {
        let m = m as f64;
        term = -term * 0.5 * (eta + m - 1.0) * (eta + m) / (rho * m);
        sum += term;
        derivative -= term * m / rho;
    }
    derivative / sum - 1.0 - eta / rho
}

/// Power series of the regular and irregular s-wave solutions, combined with
/// the digamma function into the decaying one.
fn power_series(rho: f64, eta: f64, config: &CoulombConfig) -> Result<f64, CoulombError> {
    let criterion = config.closed_series_criterion;
    let (mut u0, mut u1, mut v0, mut v1) = (0.0, rho, 1.0, 0.0);
    let (mut u, mut v) = (u0 + u1, v0 + v1);
    let (mut du, mut dv) = (1.0, 0.0);
    let mut converged = false;
    for n in 2..config.closed_series_terms {
        let n = n as f64;
        let cn = n * (n - 1.0);
        let u2 = rho * (2.0 * eta * u1 + rho * u0) / cn;
        let v2 = rho * (2.0 * eta * v1 + rho * v0) / cn - 2.0 * eta * (2.0 * n - 1.0) * u2 / cn;
        u += u2;
        v += v2;
        du += u2 * n / rho;
        dv += v2 * n / rho;
        if (u2 / u).abs() > criterion {
            (u0, u1, v0, v1) = (u1, u2, v1, v2);
        } else if (v2 / v).abs() < criterion {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(CoulombError::IterationBudgetExceeded {
            stage: "closed-channel power series",
            iterations: config.closed_series_terms,
            rho,
        });
    }

    let digamma_term = if eta >= NEUTRAL_ETA {
        let shift = if eta <= 7.5 { (8.5 - eta) as usize } else { 0 };
        let x = 1.0 + eta + shift as f64;
        let uu = 1.0 / (x * x);
        let mut psi = x.ln() - 0.5 / x - uu / 12.0 + uu.powi(2) / 120.0 - uu.powi(3) / 252.0
            + uu.powi(4) / 240.0
            - uu.powi(5) / 132.0
            + uu.powi(6) * 691.0 / 32760.0;
        for i in 1..=shift {
            psi -= 1.0 / (x - i as f64);
        }
        psi - 0.5 / eta + 2.0 * EULER_MASCHERONI - 1.0
    } else {
        EULER_MASCHERONI - 1.0
    };
    let ce = 2.0 * eta * (digamma_term + (2.0 * rho).ln());
    Ok((dv + du * ce + 2.0 * eta * u / rho) / (v + u * ce))
}

#[cfg(test)]
mod tests {
    use super::{closed_coulomb_wave_functions, decaying_log_derivative};
    use crate::common::config::CoulombConfig;
    use crate::numerics::special::coulomb::{CoulombError, CoulombInput};
    use crate::numerics::special::hard_sphere::closed_hard_sphere_shift_factor;

    fn assert_close(expected: f64, actual: f64, tolerance: f64) {
        assert!(
            (expected - actual).abs() <= tolerance * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn decaying_log_derivative_matches_whittaker_function() {
        // d/dρ ln W(−η, l + 1/2, 2ρ), evaluated in arbitrary precision.
        let cases = [
            (0, 1.0, 0.5, -1.327_609_131_231_799_7),
            (0, 4.0, 2.0, -1.386_258_316_984_043),
            (0, 20.0, 1.0, -1.047_720_478_009_185),
            (0, 0.5, 3.0, -3.228_911_735_876_266_7),
            (0, 2.0, 1.5, -1.518_105_432_422_783),
            (1, 2.0, 1.5, -1.644_695_128_099_338),
            (2, 2.0, 1.5, -1.878_877_552_619_858_7),
        ];
        let config = CoulombConfig::default();
        for (order, rho, eta, expected) in cases {
            let value = decaying_log_derivative(order, rho, eta, &config).expect("converged");
            assert_close(expected, value, 1.0e-9);
        }
    }

    #[test]
    fn neutral_closed_channel_matches_hard_sphere_recursion() {
        let config = CoulombConfig::default();
        for order in 0..=5 {
            let rho = 0.8;
            let functions = closed_coulomb_wave_functions(CoulombInput::new(order, rho, 0.0), &config)
                .expect("closed functions");
            assert_close(
                closed_hard_sphere_shift_factor(order, rho),
                functions.shift_factor(rho),
                1.0e-12,
            );
        }
    }

    #[test]
    fn closed_functions_have_unit_wronskian() {
        let config = CoulombConfig::default();
        for (order, rho, eta) in [(0, 1.0, 0.5), (3, 6.0, 2.0), (1, 0.2, 9.0)] {
            let functions = closed_coulomb_wave_functions(CoulombInput::new(order, rho, eta), &config)
                .expect("closed functions");
            assert_close(1.0, functions.wronskian(), 1.0e-12);
            assert!(functions.decaying_derivative < 0.0);
        }
    }

    #[test]
    fn exhausted_power_series_is_an_error() {
        let starved = CoulombConfig {
            closed_series_terms: 4,
            ..CoulombConfig::default()
        };
        let error = closed_coulomb_wave_functions(CoulombInput::new(0, 0.5, 3.0), &starved)
            .expect_err("series cannot converge in two terms");
        assert_eq!(
            error,
            CoulombError::IterationBudgetExceeded {
                stage: "closed-channel power series",
                iterations: 4,
                rho: 0.5,
            }
        );

        let functions =
            closed_coulomb_wave_functions(CoulombInput::new(0, 0.5, 3.0), &CoulombConfig::default())
                .expect("default budget converges");
        assert_close(-3.228_911_735_876_266_7, functions.shift_factor(0.5) / 0.5, 1.0e-9);
    }
}
