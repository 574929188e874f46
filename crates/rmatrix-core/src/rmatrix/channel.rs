//! Channels and their energy-dependent barrier functions.

use super::particle::ParticlePair;
use super::quantum_numbers::ChannelQuantumNumbers;
use super::radii::{ChannelRadii, RadiusError};
use crate::common::config::CoulombConfig;
use crate::numerics::special::coulomb::{
    closed_coulomb_wave_functions, coulomb_phase_difference, coulomb_wave_functions,
    CoulombError, CoulombInput,
};
use crate::numerics::special::hard_sphere::{
    closed_hard_sphere_shift_factor, hard_sphere_penetrability, hard_sphere_phase_shift,
    hard_sphere_shift_factor, HardSphereError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    #[error(transparent)]
    Radius(#[from] RadiusError),
    #[error(transparent)]
    HardSphere(#[from] HardSphereError),
    #[error(transparent)]
    Coulomb(#[from] CoulombError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ChannelKind {
    Neutron,
    Photon,
    ChargedParticle,
    Fission,
}

/// Barrier functions of one channel at one incident energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelPhysics {
    pub penetrability: f64,
    pub shift_factor: f64,
    pub phase_shift: f64,
    pub coulomb_phase_shift: f64,
    pub below_threshold: bool,
}

impl ChannelPhysics {
    const FLAT: Self = Self {
        penetrability: 1.0,
        shift_factor: 0.0,
        phase_shift: 0.0,
        coulomb_phase_shift: 0.0,
        below_threshold: false,
    };

    fn closed(shift_factor: f64) -> Self {
        Self {
            penetrability: 0.0,
            shift_factor,
            phase_shift: 0.0,
            coulomb_phase_shift: 0.0,
            below_threshold: true,
        }
    }
}

type PhysicsFn = fn(&Channel, f64, bool) -> Result<ChannelPhysics, ChannelError>;

/// Barrier-function evaluator of a channel kind, picked once when the channel
/// is built.
#[derive(Clone, Copy)]
struct BarrierFunctions {
    kind: ChannelKind,
    evaluate: PhysicsFn,
}

impl BarrierFunctions {
    fn for_kind(kind: ChannelKind) -> Self {
        let evaluate: PhysicsFn = match kind {
            ChannelKind::Photon | ChannelKind::Fission => Channel::flat_physics,
            ChannelKind::Neutron => Channel::neutron_physics,
            ChannelKind::ChargedParticle => Channel::charged_physics,
        };
        Self { kind, evaluate }
    }
}

impl PartialEq for BarrierFunctions {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Debug for BarrierFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BarrierFunctions").field(&self.kind).finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    id: String,
    barrier: BarrierFunctions,
    incident: ParticlePair,
    pair: ParticlePair,
    q: f64,
    numbers: ChannelQuantumNumbers,
    radii: ChannelRadii,
    boundary: f64,
    coulomb: CoulombConfig,
}

impl Channel {
    /// Channel with the default identifier `<pair id><quantum numbers>`.
    pub fn new(
        kind: ChannelKind,
        incident: ParticlePair,
        pair: ParticlePair,
        q: f64,
        numbers: ChannelQuantumNumbers,
        radii: ChannelRadii,
        boundary: f64,
    ) -> Self {
        Self {
            id: format!("{}{}", pair.id(), numbers),
            barrier: BarrierFunctions::for_kind(kind),
            incident,
            pair,
            q,
            numbers,
            radii,
            boundary,
            coulomb: CoulombConfig::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_coulomb_config(mut self, config: CoulombConfig) -> Self {
        self.coulomb = config;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ChannelKind {
        self.barrier.kind
    }

    pub fn incident_pair(&self) -> &ParticlePair {
        &self.incident
    }

    pub fn particle_pair(&self) -> &ParticlePair {
        &self.pair
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn quantum_numbers(&self) -> &ChannelQuantumNumbers {
        &self.numbers
    }

    pub fn radii(&self) -> &ChannelRadii {
        &self.radii
    }

    pub fn boundary_condition(&self) -> f64 {
        self.boundary
    }

    pub fn reaction_id(&self) -> String {
        format!("{}->{}", self.incident.id(), self.pair.id())
    }

    pub fn is_incident(&self) -> bool {
        self.pair.id() == self.incident.id()
    }

    /// The same channel seen from another entrance pair whose Q value, relative
    /// to the current one, is `q_shift`.
    pub fn with_incident_pair(&self, incident: ParticlePair, q_shift: f64) -> Self {
        Self {
            incident,
            q: self.q - q_shift,
            ..self.clone()
        }
    }

    /// E·ratio + Q, the channel energy in the centre-of-mass frame.
    fn channel_energy(&self, energy: f64) -> f64 {
        energy * self.incident.mass_ratio() + self.q
    }

    /// Wave number in 1/√b: ħ²k² = 2μ·|E·ratio + Q|.
    pub fn wave_number(&self, energy: f64) -> f64 {
        self.pair.wave_number_at(self.channel_energy(energy))
    }

    pub fn sommerfeld_parameter(&self, energy: f64) -> f64 {
        self.pair.sommerfeld_parameter_at(self.wave_number(energy))
    }

    pub fn below_threshold(&self, energy: f64) -> bool {
        self.channel_energy(energy) < 0.0
    }

    /// Incident energy below which the channel is closed.
    pub fn threshold_energy(&self) -> f64 {
        -self.q / self.incident.mass_ratio()
    }

    /// g = (2J + 1)/((2ia + 1)(2ib + 1)) for the particles of this channel.
    pub fn statistical_spin_factor(&self) -> f64 {
        let j = self.numbers.total_angular_momentum();
        let ia = self.pair.particle().spin();
        let ib = self.pair.residual().spin();
        (2.0 * j + 1.0) / ((2.0 * ia + 1.0) * (2.0 * ib + 1.0))
    }

    pub fn penetrability(&self, energy: f64) -> Result<f64, ChannelError> {
        Ok(self.physics(energy)?.penetrability)
    }

    pub fn shift_factor(&self, energy: f64) -> Result<f64, ChannelError> {
        Ok(self.physics(energy)?.shift_factor)
    }

    pub fn phase_shift(&self, energy: f64) -> Result<f64, ChannelError> {
        Ok(self.physics(energy)?.phase_shift)
    }

    pub fn coulomb_phase_shift(&self, energy: f64) -> Result<f64, ChannelError> {
        Ok(self.physics(energy)?.coulomb_phase_shift)
    }

    /// Penetrability as if the channel were open, used to turn ENDF widths
    /// into reduced widths at pole energies that may lie below threshold.
    pub fn open_penetrability(&self, energy: f64) -> Result<f64, ChannelError> {
        Ok((self.barrier.evaluate)(self, energy, false)?.penetrability)
    }

    /// P, S, φ and ω at the incident energy.
    pub fn physics(&self, energy: f64) -> Result<ChannelPhysics, ChannelError> {
        (self.barrier.evaluate)(self, energy, self.below_threshold(energy))
    }

    /// Photon and fission channels carry no barrier.
    fn flat_physics(
        &self,
        _energy: f64,
        below_threshold: bool,
    ) -> Result<ChannelPhysics, ChannelError> {
        if below_threshold {
            return Ok(ChannelPhysics::closed(0.0));
        }
        Ok(ChannelPhysics::FLAT)
    }

    fn neutron_physics(
        &self,
        energy: f64,
        below_threshold: bool,
    ) -> Result<ChannelPhysics, ChannelError> {
        let l = self.numbers.orbital_angular_momentum();
        let k = self.wave_number(energy);
        let shift_rho = k * self.radii.shift_factor_radius(energy)?;
        if below_threshold {
            return Ok(ChannelPhysics::closed(closed_hard_sphere_shift_factor(l, shift_rho)));
        }

        let penetrability_rho = k * self.radii.penetrability_radius(energy)?;
        let phase_rho = k * self.radii.phase_shift_radius(energy)?;
        Ok(ChannelPhysics {
            penetrability: hard_sphere_penetrability(l, penetrability_rho)?,
            shift_factor: hard_sphere_shift_factor(l, shift_rho)?,
            phase_shift: hard_sphere_phase_shift(l, phase_rho)?,
            coulomb_phase_shift: 0.0,
            below_threshold,
        })
    }

    fn charged_physics(
        &self,
        energy: f64,
        below_threshold: bool,
    ) -> Result<ChannelPhysics, ChannelError> {
        let l = self.numbers.orbital_angular_momentum();
        let k = self.wave_number(energy);
        if k == 0.0 {
            return Ok(ChannelPhysics {
                below_threshold,
                ..ChannelPhysics::closed(0.0)
            });
        }
        let eta = self.pair.sommerfeld_parameter_at(k);
        let shift_rho = k * self.radii.shift_factor_radius(energy)?;

        if below_threshold {
            let closed =
                closed_coulomb_wave_functions(CoulombInput::new(l, shift_rho, eta), &self.coulomb)?;
            return Ok(ChannelPhysics::closed(closed.shift_factor(shift_rho)));
        }

        let penetrability_rho = k * self.radii.penetrability_radius(energy)?;
        let phase_rho = k * self.radii.phase_shift_radius(energy)?;
        let at = |rho: f64| coulomb_wave_functions(CoulombInput::new(l, rho, eta), &self.coulomb);

        let penetrability_functions = at(penetrability_rho)?;
        let shift_functions = if shift_rho == penetrability_rho {
            penetrability_functions
        } else {
            at(shift_rho)?
        };
        let phase_functions = if phase_rho == penetrability_rho {
            penetrability_functions
        } else {
            at(phase_rho)?
        };

        Ok(ChannelPhysics {
            penetrability: penetrability_functions.penetrability(penetrability_rho),
            shift_factor: shift_functions.shift_factor(shift_rho),
            phase_shift: phase_functions.phase_shift(),
            coulomb_phase_shift: coulomb_phase_difference(l, eta),
            below_threshold,
        })
    }
}
