//! Starting values of the irregular function G_0 and its derivative at a
//! matching radius, followed by Newmark integration back to the requested ρ.

use super::CoulombError;
use crate::common::config::CoulombConfig;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use tracing::trace;

/// Exponent above which the Riccati expansion overflows.
const RICCATI_EXPONENT_LIMIT: f64 = 100.0;

/// G_0 and dG_0/dρ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct IrregularStart {
    pub value: f64,
    pub derivative: f64,
}

/// Starting values of G_0 at ρ, or `None` when the expansion overflows and the
/// functions are to be treated as vanishing.
pub(super) fn irregular_start(
    rho: f64,
    eta: f64,
    sigma0: f64,
    config: &CoulombConfig,
) -> Result<Option<IrregularStart>, CoulombError> {
    let (radius, start) = if eta >= 15.0 {
        let radius = 16.0;
        if radius < rho {
            if rho <= 5.0 * eta / 3.0 - 5.0 {
                (rho, riccati_expansion(rho, eta))
            } else {
                (2.0 * eta, Some(airy_expansion(eta)))
            }
        } else {
            (radius, riccati_expansion(radius, eta))
        }
    } else if eta >= 5.0 {
        let radius = 2.0 * eta;
        if radius < rho {
            let radius = (2.5 * eta + 7.5).max(rho);
            (radius, Some(shifted_riccati_expansion(radius, eta)))
        } else {
            (radius, Some(airy_expansion(eta)))
        }
    } else {
        let (radius, start) = asymptotic_series((2.0 * eta + 10.0).max(rho), eta, sigma0, config)?;
        (radius, Some(start))
    };

    let Some(start) = start else {
        return Ok(None);
    };
    if start.value == 0.0 || start.derivative == 0.0 {
        return Ok(Some(start));
    }

    let distance = radius - rho;
    if distance == 0.0 {
        return Ok(Some(start));
    }
    let steps = ((distance / config.newmark_mesh) as i64 + 1).unsigned_abs() as usize;
    newmark_integration(steps, distance / steps as f64, eta, radius, start, config).map(Some)
}

/// Riccati (WKB) expansion for large η with ρ well inside the turning point.
fn riccati_expansion(radius: f64, eta: f64) -> Option<IrregularStart> {
    let y1 = 1.0 / (2.0 * eta);
    let t = radius * y1;
    let t1 = 1.0 - t;
    let t2 = t * t1.powi(3);
    let t3 = t2.sqrt();

    let g0 = (t * t1).sqrt() + t.sqrt().asin() - FRAC_PI_2;
    let g1 = (t / t1).ln() / 4.0;
    let g2 = -(8.0 * t * t - 12.0 * t + 9.0) / (48.0 * t3);
    let g3 = (8.0 * t - 3.0) / (64.0 * t2);
    let g4 = (t * (t * (t * (t * (t * (2048.0 * t - 9216.0) + 16128.0) - 13440.0) - 12240.0)
        + 7560.0)
        - 1890.0)
        / (92160.0 * t2 * t3);
    let g5 = 3.0 * (t * (t * (1024.0 * t - 448.0) + 208.0) - 39.0) / (8192.0 * t2 * t2);
    let g6 = -(t
        * (t * (t * (t * (t * (t * (t * (t * (t * (262144.0 * t - 1966080.0) + 6389760.0)
            - 11714560.0)
            + 13178880.0)
            - 9225216.0)
            + 13520640.0)
            - 3588480.0)
            + 2487240.0)
            - 873180.0)
        + 130977.0)
        / (10321920.0 * t2 * t2 * t3);
    let g7 = (t * (t * (t * (t * (1105920.0 * t - 55296.0) + 314624.0) - 159552.0) + 45576.0)
        - 5697.0)
        / (393216.0 * t2 * t2 * t2);

    let exponent =
        -2.0 * eta * g0 + g1 - y1 * (g2 - y1 * (g3 - y1 * (g4 - y1 * (g5 - y1 * (g6 - g7 * y1)))));
    if exponent > RICCATI_EXPONENT_LIMIT {
        return None;
    }
    let value = exponent.exp();

    let h0 = (t1 / t).sqrt();
    let h1 = 1.0 / (4.0 * t * t1);
    let h2 = -(8.0 * t - 3.0) / (32.0 * (t.powi(3) * t1.powi(5)).sqrt());
    let h3 = 3.0 * (8.0 * t * t - 4.0 * t + 1.0) / (64.0 * t * t * t1.powi(4));
    let h4 = -(t * (t * (1536.0 * t - 704.0) + 336.0) - 63.0)
        / (2048.0 * (t.powi(5) * t1.powi(11)).sqrt());
    let h5 = 3.0 * (t * (t * (t * (2560.0 * t - 832.0) + 728.0) - 260.0) + 39.0)
        / (4096.0 * t.powi(3) * t1.powi(7));
    let h6 = (t * (t * (t * (t * (-368640.0 * t - 30720.0) + 114944.0) - 57792.0) + 16632.0)
        - 2079.0)
        / (65536.0 * (t.powi(7) * t1.powi(17)).sqrt());
    let h7 = 3.0
        * (t * (t * (t * (t * (t * (860160.0 * t + 196608.0) + 308480.0) - 177280.0) + 73432.0)
            - 17724.0)
            + 1899.0)
        / (131072.0 * t.powi(4) * t1.powi(10));
    let derivative = value
        * y1
        * (-2.0 * eta * h0 + h1
            - y1 * (h2 - y1 * (h3 - y1 * (h4 - y1 * (h5 - y1 * (h6 - h7 * y1))))));

    Some(IrregularStart { value, derivative })
}

/// Expansion at the turning point ρ = 2η.
fn airy_expansion(eta: f64) -> IrregularStart {
    let value = 1.223_404_016
        * eta.powf(1.0 / 6.0)
        * (1.0 + 0.049_595_701_65 * eta.powf(-4.0 / 3.0) - 0.008_888_888_889 * eta.powi(-2)
            + 0.002_455_199_181 * eta.powf(-10.0 / 3.0)
            - 0.000_910_895_806_1 * eta.powi(-4)
            + 0.000_253_468_411_5 * eta.powf(-16.0 / 3.0));
    let derivative = -0.707_881_773_4
        * eta.powf(-1.0 / 6.0)
        * (1.0 - 0.172_826_036_9 * eta.powf(-2.0 / 3.0) + 0.000_317_460_317_4 * eta.powi(-2)
            - 0.003_581_214_850 * eta.powf(-8.0 / 3.0)
            + 0.000_311_782_468_0 * eta.powi(-4)
            - 0.000_907_396_642_7 * eta.powf(-14.0 / 3.0));
    IrregularStart { value, derivative }
}

/// Asymptotic series of G_0 around ρ → ∞. The radius grows in steps of five
/// until the series satisfies its own Wronskian; the radius actually used is
/// returned with the start values.
fn asymptotic_series(
    radius: f64,
    eta: f64,
    sigma0: f64,
    config: &CoulombConfig,
) -> Result<(f64, IrregularStart), CoulombError> {
    let mut radius = radius;
    for _ in 0..=config.max_iterations {
        let phase = radius - eta * (2.0 * radius).ln() + sigma0;
        let (mut gs, mut gt, mut ps, mut pt) = (1.0, 0.0, 0.0, 1.0 - eta / radius);
        let (mut gs0, mut gt0, mut ps0, mut pt0) = (gs, gt, ps, pt);

        for term in 0..config.max_iterations {
            let c = 2.0 * (term + 1) as f64 * radius;
            let a = (2 * term + 1) as f64 * eta / c;
            let b = (eta * eta - (term * (term + 1)) as f64) / c;
            if a * a + b * b > 1.0 {
                break;
            }
            let gs1 = a * gs0 - b * gt0;
            let gt1 = a * gt0 + b * gs0;
            let ps1 = a * ps0 - b * pt0 - gs1 / radius;
            let pt1 = a * pt0 + b * ps0 - gt1 / radius;
            let value_change = if gs0 != 0.0 { (1.0 - gs1 / gs0).abs() } else { f64::INFINITY };
            let slope_change = if ps0 != 0.0 { (1.0 - ps1 / ps0).abs() } else { f64::INFINITY };
            if value_change < config.series_criterion && slope_change < config.series_criterion {
                break;
            }
            gs += gs1;
            gt += gt1;
            ps += ps1;
            pt += pt1;
            (gs0, gt0, ps0, pt0) = (gs1, gt1, ps1, pt1);
        }

        if (gs * pt - ps * gt - 1.0).abs() <= config.wronskian_tolerance {
            let (sin, cos) = phase.sin_cos();
            return Ok((
                radius,
                IrregularStart {
                    value: gs * cos - gt * sin,
                    derivative: ps * cos - pt * sin,
                },
            ));
        }
        radius += 5.0;
    }

    Err(CoulombError::IterationBudgetExceeded {
        stage: "asymptotic series",
        iterations: config.max_iterations,
        rho: radius,
    })
}

/// Riccati expansion for intermediate η outside the turning point.
fn shifted_riccati_expansion(radius: f64, eta: f64) -> IrregularStart {
    let x = 2.0 * eta / radius;
    let x1 = 1.0 / (1.0 - x);
    let x2 = (1.0 - x).sqrt();
    let y1 = 1.0 / (2.0 * eta);
    let y2 = y1 * y1;

    let mut g0 = y2 * x1.powi(3);
    let g1 = -(x * (9.0 * x - 12.0) + 8.0) / 48.0;
    let g2 = -(x * (x * (x * (x * (x * (-1890.0 * x + 7560.0) - 12240.0) - 13440.0) + 16128.0)
        - 9216.0)
        + 2048.0)
        / 92160.0;
    let g3 = -(x
        * (x * (x * (x * (x * (x * (x * (x * (x * (130977.0 * x - 873180.0) + 2487240.0)
            - 3588480.0)
            + 13520640.0)
            - 9225216.0)
            + 15178880.0)
            - 11714560.0)
            + 6389760.0)
            - 1966080.0)
        + 262144.0)
        / 10321920.0;
    let g4 = 2.0 * eta * (x2 / x + 0.5 * ((1.0 - x2) / (1.0 + x2)).ln()) + FRAC_PI_4;
    let phase = g4 + g0.sqrt() * (g1 + g0 * (g2 + g0 * g3));

    g0 *= x * x;
    let g1 = -(8.0 - 3.0 * x) / 64.0;
    let g2 = 3.0 * (x * (x * (-39.0 * x + 208.0) - 448.0) + 1024.0) / 8192.0;
    let g3 = -(x * (x * (x * (x * (-5697.0 * x + 45576.0) - 159552.0) + 314624.0) - 55296.0)
        + 1105920.0)
        / 393216.0;
    let log_amplitude = x * g0 * (g1 + g0 * (g2 + g0 * g3));

    let g1 = (8.0 - 3.0 * x) / 32.0;
    let g2 = -(x * (x * (-63.0 * x + 336.0) - 704.0) + 1536.0) / 2048.0;
    let g3 = (x * (x * (x * (x * (-2079.0 * x + 16632.0) - 57792.0) + 114944.0) - 30720.0)
        + 368640.0)
        / 65536.0;
    let a = x2 / x * (1.0 / x + g0 * (g1 + g0 * (g2 + g0 * g3)));

    let g1 = -3.0 * (x * (x - 4.0) + 8.0) / 64.0;
    let g2 = 3.0 * (x * (x * (x * (39.0 * x - 260.0) + 728.0) - 832.0) + 2560.0) / 4096.0;
    let g3 = -3.0
        * (x * (x * (x * (x * (x * (1899.0 * x - 17724.0) + 73432.0) - 177280.0) + 308480.0)
            + 196608.0)
            + 860160.0)
        / 131072.0;
    let b = x1 * y1 / 4.0 + g0 * (g1 + g0 * (g2 + g0 * g3));

    let amplitude = log_amplitude.exp() / x2.sqrt();
    let value = amplitude * phase.cos();
    let derivative = -x * x * (a * amplitude * phase.sin() + b * value);
    IrregularStart { value, derivative }
}

/// Integrates G'' = (2η/ρ − 1)G with the Newmark β scheme from `radius` over
/// `steps` steps of size `mesh` towards smaller ρ (larger when `mesh` < 0).
fn newmark_integration(
    steps: usize,
    mesh: f64,
    eta: f64,
    radius: f64,
    start: IrregularStart,
    config: &CoulombConfig,
) -> Result<IrregularStart, CoulombError> {
    let two_eta = 2.0 * eta;
    let h = -mesh;
    let h2 = h * h;
    let beta = h2 * config.newmark_beta;

    let mut value = start.value;
    let mut derivative = start.derivative;
    let mut curvature = (two_eta / radius - 1.0) * value;
    let mut predicted = curvature;
    let mut corrector_steps = 0usize;

    for step in 1..=steps {
        let x = radius + step as f64 * h;
        let mut iterations = 0usize;
        loop {
            let next_derivative = derivative + h * (curvature + predicted) / 2.0;
            let next_value = value + h * derivative + h2 * curvature / 2.0 + beta * (predicted - curvature);
            let corrected = (two_eta / x - 1.0) * next_value;
            let change = if corrected != 0.0 {
                (1.0 - predicted / corrected).abs()
            } else {
                (corrected - predicted).abs()
            };
            iterations += 1;
            if iterations > config.max_iterations {
                return Err(CoulombError::IterationBudgetExceeded {
                    stage: "Newmark integration",
                    iterations: config.max_iterations,
                    rho: x,
                });
            }
            predicted = corrected;
            if change <= config.newmark_convergence {
                value = next_value;
                derivative = next_derivative;
                curvature = predicted;
                break;
            }
        }
        corrector_steps += iterations;
    }

    trace!(steps, corrector_steps, from = radius, "Newmark integration of G_0");
    Ok(IrregularStart { value, derivative })
}
