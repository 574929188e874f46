//! Hard-sphere (neutral particle) penetrability, shift factor and phase shift.
//!
//! Closed forms are available for l = 0..=4 in terms of ρ = k·a. The shift
//! factor of a closed channel is the logarithmic derivative of the decaying
//! Riccati function ρ·k_l(ρ) and is defined for every l.

const MAX_ORDER: u32 = 4;
const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

const PENETRABILITY_DENOMINATORS: [&[f64]; 5] = [
    &[1.0],
    &[1.0, 1.0],
    &[9.0, 3.0, 1.0],
    &[225.0, 45.0, 6.0, 1.0],
    &[11025.0, 1575.0, 135.0, 10.0, 1.0],
];

const SHIFT_NUMERATORS: [&[f64]; 5] = [
    &[0.0],
    &[1.0],
    &[18.0, 3.0],
    &[675.0, 90.0, 6.0],
    &[44100.0, 4725.0, 270.0, 10.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HardSphereError {
    #[error("hard-sphere functions are tabulated for l <= 4, got l = {order}")]
    UnsupportedOrder { order: u32 },
}

/// Penetrability, shift factor and phase shift at a common ρ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardSphereFunctions {
    pub penetrability: f64,
    pub shift_factor: f64,
    pub phase_shift: f64,
}

pub fn hard_sphere(order: u32, rho: f64) -> Result<HardSphereFunctions, HardSphereError> {
    Ok(HardSphereFunctions {
        penetrability: hard_sphere_penetrability(order, rho)?,
        shift_factor: hard_sphere_shift_factor(order, rho)?,
        phase_shift: hard_sphere_phase_shift(order, rho)?,
    })
}

pub fn hard_sphere_penetrability(order: u32, rho: f64) -> Result<f64, HardSphereError> {
    let index = checked_order(order)?;
    let squared = rho * rho;
    Ok(rho * squared.powi(order as i32) / horner(PENETRABILITY_DENOMINATORS[index], squared))
}

pub fn hard_sphere_shift_factor(order: u32, rho: f64) -> Result<f64, HardSphereError> {
    let index = checked_order(order)?;
    if index == 0 {
        return Ok(0.0);
    }

    let squared = rho * rho;
    Ok(-horner(SHIFT_NUMERATORS[index], squared)
        / horner(PENETRABILITY_DENOMINATORS[index], squared))
}

/// Hard-sphere phase shift, continuous in ρ (it tends to ρ − lπ/2).
pub fn hard_sphere_phase_shift(order: u32, rho: f64) -> Result<f64, HardSphereError> {
    checked_order(order)?;
    let squared = rho * rho;
    let angle = match order {
        0 => 0.0,
        1 => rho.atan(),
        2 => (3.0 * rho).atan2(3.0 - squared),
        3 => (rho * (15.0 - squared)).atan2(15.0 - 6.0 * squared),
        _ => (rho * (105.0 - 10.0 * squared)).atan2(horner(&[105.0, -45.0, 1.0], squared)),
    };
    let angle = if angle < 0.0 { angle + TWO_PI } else { angle };
    Ok(rho - angle)
}

/// Shift factor ρ·W′/W of the decaying solution W = ρ·k_l(ρ) of a closed
/// neutral channel.
pub fn closed_hard_sphere_shift_factor(order: u32, rho: f64) -> f64 {
    let (values, derivatives) = closed_riccati_functions(order as usize, rho);
    let index = order as usize;
    rho * derivatives[index] / values[index]
}

/// Values and derivatives of ρ·k_l(ρ) for l = 0..=max_order, where
/// k_l are the modified spherical Bessel functions of the second kind
/// scaled to k_0(ρ) = e^{−ρ}/ρ.
pub(crate) fn closed_riccati_functions(max_order: usize, rho: f64) -> (Vec<f64>, Vec<f64>) {
    let mut bessel = vec![0.0; max_order + 2];
    bessel[0] = 1.0 / rho;
    bessel[1] = bessel[0] + 1.0 / (rho * rho);
    for order in 1..max_order {
        bessel[order + 1] = (2.0 * order as f64 + 1.0) / rho * bessel[order] + bessel[order - 1];
    }

    let decay = (-rho).exp();
    for value in bessel.iter_mut() {
        *value *= decay;
    }

    let mut derivatives = vec![0.0; max_order + 1];
    derivatives[0] = -decay;
    for order in 1..=max_order {
        derivatives[order] = -(order as f64) * bessel[order] - rho * bessel[order - 1];
    }

    let values = bessel
        .iter()
        .take(max_order + 1)
        .map(|value| rho * value)
        .collect();
    (values, derivatives)
}

fn checked_order(order: u32) -> Result<usize, HardSphereError> {
    if order > MAX_ORDER {
        return Err(HardSphereError::UnsupportedOrder { order });
    }
    Ok(order as usize)
}

/// Evaluates a polynomial with coefficients ordered from the constant term up.
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |accumulator, coefficient| accumulator * x + coefficient)
}
