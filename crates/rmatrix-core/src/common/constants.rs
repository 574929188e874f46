//! Physical constants shared by the channel physics and the ENDF adapter.
//!
//! Values follow CODATA 2018. Energies are in eV, masses in daltons and
//! lengths in √barn (1 √b = 10 fm), so `HBAR_C` and `COULOMB_CONSTANT`
//! carry units of eV·√b.

pub const PI: f64 = std::f64::consts::PI;
pub const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_860_607;

/// Rest energy of one dalton in eV.
pub const DALTON_EV: f64 = 931.494_102_42e6;
/// ħc in eV·√b.
pub const HBAR_C: f64 = 1.973_269_804e7;
/// e²/(4πε₀) in eV·√b.
pub const COULOMB_CONSTANT: f64 = 1.439_964_548e5;

pub const NEUTRON_MASS_AMU: f64 = 1.008_664_915_95;
pub const PROTON_MASS_AMU: f64 = 1.007_276_466_621;

/// Radius constants of the ENDF-6 default channel radius 0.123·A^(1/3) + 0.08,
/// expressed in √b.
pub const ENDF_RADIUS_SLOPE: f64 = 0.123;
pub const ENDF_RADIUS_OFFSET: f64 = 0.08;
