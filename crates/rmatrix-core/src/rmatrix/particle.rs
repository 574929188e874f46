use crate::common::constants::{COULOMB_CONSTANT, DALTON_EV, HBAR_C};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParticleError {
    #[error("particle '{id}' requires a finite non-negative mass, got {mass}")]
    InvalidMass { id: String, mass: f64 },
    #[error("particle '{id}' requires a finite non-negative charge, got {charge}")]
    InvalidCharge { id: String, charge: f64 },
    #[error("particle '{id}' requires a non-negative half-integer spin, got {spin}")]
    InvalidSpin { id: String, spin: f64 },
    #[error("particle pair '{id}' has zero total mass")]
    MasslessPair { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parity {
    Negative,
    Positive,
}

impl Parity {
    /// Parity from the sign of a value; zero counts as positive.
    pub fn from_sign(value: f64) -> Self {
        if value < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// (−1)^l
    pub fn of_orbital(l: u32) -> Self {
        if l % 2 == 0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub const fn sign(self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }
}

/// Doubles a spin and checks that it is a non-negative half-integer.
pub(crate) fn twice_half_integer(value: f64) -> Option<u32> {
    let twice = 2.0 * value;
    (value.is_finite() && value >= 0.0 && twice.fract() == 0.0).then_some(twice as u32)
}

/// Formats `twice / 2` as an integer or as `n/2`.
pub(crate) fn format_half_integer(twice: u32) -> String {
    if twice % 2 == 0 {
        (twice / 2).to_string()
    } else {
        format!("{twice}/2")
    }
}

/// A particle with its mass in daltons and charge in elementary charges.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: String,
    mass: f64,
    charge: f64,
    spin: f64,
    parity: Parity,
}

impl Particle {
    pub fn new(
        id: impl Into<String>,
        mass: f64,
        charge: f64,
        spin: f64,
        parity: Parity,
    ) -> Result<Self, ParticleError> {
        let id = id.into();
        if !mass.is_finite() || mass < 0.0 {
            return Err(ParticleError::InvalidMass { id, mass });
        }
        if !charge.is_finite() || charge < 0.0 {
            return Err(ParticleError::InvalidCharge { id, charge });
        }
        if twice_half_integer(spin).is_none() {
            return Err(ParticleError::InvalidSpin { id, spin });
        }
        Ok(Self {
            id,
            mass,
            charge,
            spin,
            parity,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }
}

/// An ordered (particle, residual) pair such as `n,Fe54`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticlePair {
    particle: Particle,
    residual: Particle,
    id: String,
}

impl ParticlePair {
    pub fn new(particle: Particle, residual: Particle) -> Result<Self, ParticleError> {
        let id = format!("{},{}", particle.id(), residual.id());
        Self::with_id(particle, residual, id)
    }

    /// Pair with an explicit identifier, e.g. `capture` or `fission`.
    pub fn with_id(
        particle: Particle,
        residual: Particle,
        id: impl Into<String>,
    ) -> Result<Self, ParticleError> {
        let id = id.into();
        if particle.mass() + residual.mass() <= 0.0 {
            return Err(ParticleError::MasslessPair { id });
        }
        Ok(Self {
            particle,
            residual,
            id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn particle(&self) -> &Particle {
        &self.particle
    }

    pub fn residual(&self) -> &Particle {
        &self.residual
    }

    /// μ = ma·mb/(ma + mb) in daltons.
    pub fn reduced_mass(&self) -> f64 {
        let (ma, mb) = (self.particle.mass(), self.residual.mass());
        ma * mb / (ma + mb)
    }

    /// mb/(ma + mb), converting laboratory to centre-of-mass energy.
    pub fn mass_ratio(&self) -> f64 {
        let (ma, mb) = (self.particle.mass(), self.residual.mass());
        mb / (ma + mb)
    }

    /// Wave number in 1/√b for a centre-of-mass energy in eV.
    pub fn wave_number_at(&self, energy: f64) -> f64 {
        (2.0 * self.reduced_mass() * DALTON_EV * energy.abs()).sqrt() / HBAR_C
    }

    /// Wave number for an incident energy of this pair in the laboratory.
    pub fn wave_number(&self, energy: f64) -> f64 {
        self.wave_number_at(energy * self.mass_ratio())
    }

    /// η = za·zb·e²·μ/(ħ²k), zero for a neutral pair.
    pub fn sommerfeld_parameter_at(&self, wave_number: f64) -> f64 {
        let product = self.particle.charge() * self.residual.charge();
        if product == 0.0 {
            return 0.0;
        }
        product * COULOMB_CONSTANT * self.reduced_mass() * DALTON_EV
            / (HBAR_C * HBAR_C * wave_number)
    }

    pub fn sommerfeld_parameter(&self, energy: f64) -> f64 {
        self.sommerfeld_parameter_at(self.wave_number(energy))
    }
}

impl Display for ParticlePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_half_integer, Parity, Particle, ParticleError, ParticlePair};
    use crate::common::constants::NEUTRON_MASS_AMU;

    fn neutron() -> Particle {
        Particle::new("n", NEUTRON_MASS_AMU, 0.0, 0.5, Parity::Positive).expect("neutron")
    }

    fn iron() -> Particle {
        Particle::new("Fe54", 53.476_24 * NEUTRON_MASS_AMU, 26.0, 0.0, Parity::Positive)
            .expect("Fe54")
    }

    #[test]
    fn pair_identifier_and_masses_are_derived() {
        let pair = ParticlePair::new(neutron(), iron()).expect("pair");
        assert_eq!(pair.id(), "n,Fe54");
        assert!((pair.mass_ratio() - 53.476_24 / 54.476_24).abs() < 1.0e-14);
        let expected = NEUTRON_MASS_AMU * 53.476_24 / 54.476_24;
        assert!((pair.reduced_mass() - expected).abs() < 1.0e-12);
        assert_eq!(pair.sommerfeld_parameter(1.0e3), 0.0);
    }

    #[test]
    fn neutron_wave_number_follows_the_usual_rule_of_thumb() {
        // k ≈ 2.19685e-3·(A/(A+1))·√E in 1/√b for neutrons
        let pair = ParticlePair::new(neutron(), iron()).expect("pair");
        let expected = 2.196_8e-3 * 53.476_24 / 54.476_24 * 1.0e2;
        assert!((pair.wave_number(1.0e4) / expected - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn proton_sommerfeld_parameter_matches_closed_form() {
        let proton = Particle::new("p", 1.007_276, 1.0, 0.5, Parity::Positive).expect("p");
        let chlorine = Particle::new("Cl35", 34.968_85, 17.0, 1.5, Parity::Positive).expect("Cl");
        let pair = ParticlePair::new(proton, chlorine).expect("pair");
        // η = za·zb·α·√(μc²/(2E)) in the centre of mass
        let energy_cm = 1.0e6;
        let mu_c2 = pair.reduced_mass() * crate::common::constants::DALTON_EV;
        let alpha = 1.0 / 137.035_999_084;
        let expected = 17.0 * alpha * (mu_c2 / (2.0 * energy_cm)).sqrt();
        let eta = pair.sommerfeld_parameter_at(pair.wave_number_at(energy_cm));
        assert!((eta / expected - 1.0).abs() < 1.0e-8);
    }

    #[test]
    fn invalid_particles_are_rejected() {
        let error = Particle::new("x", -1.0, 0.0, 0.5, Parity::Positive).expect_err("mass");
        assert!(matches!(error, ParticleError::InvalidMass { .. }));
        let error = Particle::new("x", 1.0, 0.0, 0.3, Parity::Positive).expect_err("spin");
        assert!(matches!(error, ParticleError::InvalidSpin { .. }));
    }

    #[test]
    fn half_integers_are_formatted_as_fractions() {
        assert_eq!(format_half_integer(1), "1/2");
        assert_eq!(format_half_integer(4), "2");
        assert_eq!(Parity::of_orbital(3), Parity::Negative);
        assert_eq!(Parity::from_sign(-0.5).symbol(), '-');
    }
}
