use super::asymptotic::irregular_start;
use super::{coulomb_phase_sigma0, CoulombError, CoulombInput, CoulombWaveFunctions};
use crate::common::config::CoulombConfig;
use tracing::warn;

/// Downward F recursion is started this many orders above the last G order.
const START_ORDER_OFFSET: usize = 10;
const START_ORDER_STEP: usize = 10;
const DOWNWARD_SEED: f64 = 1.0e-36;

/// F_l, G_l, F′_l and G′_l of an open channel.
///
/// Returns [`CoulombWaveFunctions::VANISHING`] when the asymptotic start of G
/// overflows, which happens deep below the Coulomb barrier.
pub fn coulomb_wave_functions(
    input: CoulombInput,
    config: &CoulombConfig,
) -> Result<CoulombWaveFunctions, CoulombError> {
    let max_l = config.max_l.max(3);
    let CoulombInput { order, rho, eta } = input.validate((max_l - 2) as u32)?;
    let order = order as usize;
    let eta_norm = (1.0 + eta * eta).sqrt();

    let (g0, g1) = if eta == 0.0 {
        let g0 = rho.cos();
        (g0, g0 / rho + rho.sin())
    } else {
        match irregular_start(rho, eta, coulomb_phase_sigma0(eta), config)? {
            Some(start) if start.value != 0.0 || start.derivative != 0.0 => (
                start.value,
                ((eta + 1.0 / rho) * start.value - start.derivative) / eta_norm,
            ),
            _ => return Ok(CoulombWaveFunctions::VANISHING),
        }
    };

    let mut g = vec![0.0; max_l];
    g[0] = g0;
    g[1] = g1;
    let scale = if eta == 0.0 { 1.0 } else { (g0 * g0).max(g1 * g1) };

    let (mut previous, mut current) = (g0, g1);
    let mut top = 1;
    while top < max_l - 1 {
        let next = irregular_upward(top, eta, rho, previous, current);
        g[top + 1] = next;
        if scale / (next * next) < config.lmax_criterion && top >= order {
            break;
        }
        (previous, current) = (current, next);
        top += 1;
    }
    let lmax = if top == max_l - 1 { max_l - 2 } else { top };

    let mut f = vec![0.0; max_l];
    let mut df = vec![0.0; max_l];
    let mut dg = vec![0.0; max_l];
    let mut start_order = lmax + START_ORDER_OFFSET;
    loop {
        let (mut upper, mut lower) = (0.0, DOWNWARD_SEED);
        for l in (1..=start_order).rev() {
            let next = regular_downward(l, eta, rho, upper, lower);
            if l <= lmax + 2 {
                f[l - 1] = next;
            }
            (upper, lower) = (lower, next);
        }

        let normalisation = 1.0 / ((f[0] * g1 - g0 * f[1]) * eta_norm);
        for value in f.iter_mut().take(lmax + 2) {
            *value *= normalisation;
        }

        let mut satisfied = true;
        for l in 0..=lmax {
            dg[l] = derivative(l, eta, rho, g[l], g[l + 1]);
            df[l] = derivative(l, eta, rho, f[l], f[l + 1]);
            if (df[l] * g[l] - dg[l] * f[l] - 1.0).abs() > config.wronskian_tolerance {
                satisfied = false;
                break;
            }
        }
        if satisfied {
            break;
        }

        start_order += START_ORDER_STEP;
        if start_order > config.max_l0 {
            return Err(CoulombError::WronskianBudgetExceeded {
                order: order as u32,
                start_order,
                max_start_order: config.max_l0,
            });
        }
        warn!(rho, eta, start_order, "Coulomb Wronskian check failed, restarting F recursion higher");
    }

    Ok(CoulombWaveFunctions {
        f: f[order],
        g: g[order],
        df: df[order],
        dg: dg[order],
    })
}

/// G_{l+1} from G_{l−1} and G_l.
fn irregular_upward(l: usize, eta: f64, rho: f64, lower: f64, current: f64) -> f64 {
    let j = l as f64;
    let j1 = j + 1.0;
    ((j + j1) * (eta + j * j1 / rho) * current - j1 * (j * j + eta * eta).sqrt() * lower)
        / (j * (j1 * j1 + eta * eta).sqrt())
}

/// F_{l−1} from F_{l+1} and F_l.
fn regular_downward(l: usize, eta: f64, rho: f64, upper: f64, current: f64) -> f64 {
    let j = l as f64;
    let j1 = j + 1.0;
    ((j + j1) * (eta + j * j1 / rho) * current - j * (j1 * j1 + eta * eta).sqrt() * upper)
        / (j1 * (j * j + eta * eta).sqrt())
}

/// dF_l/dρ from F_l and F_{l+1} (same for G).
fn derivative(l: usize, eta: f64, rho: f64, value: f64, next: f64) -> f64 {
    let j1 = l as f64 + 1.0;
    ((eta + j1 * j1 / rho) * value - (j1 * j1 + eta * eta).sqrt() * next) / j1
}
