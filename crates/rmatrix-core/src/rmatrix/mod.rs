//! R-matrix description of a compound nucleus: particles, channels, spin
//! groups and the compound system evaluating cross sections from them.

pub mod channel;
pub mod channel_data;
pub mod compound_system;
pub mod particle;
pub mod quantum_numbers;
pub mod radii;
pub mod resonance;
pub mod spin_group;
pub mod unresolved;

pub use channel::{Channel, ChannelError, ChannelKind, ChannelPhysics};
pub use channel_data::{consolidate, ChannelDataError, ParticleChannelData};
pub use compound_system::{CompoundSystem, CompoundSystemError};
pub use particle::{Parity, Particle, ParticleError, ParticlePair};
pub use quantum_numbers::{
    possible_channel_spin_values, possible_total_angular_momentum_values, ChannelQuantumNumbers,
    QuantumNumberError,
};
pub use radii::{ChannelRadii, ChannelRadius, RadiusError, RadiusTable};
pub use resonance::{Resonance, ResonanceTable, ResonanceTableError};
pub use spin_group::{EvaluationError, EvaluationScratch, SpinGroup, SpinGroupError};
pub use unresolved::{
    UnresolvedOutOfRange, UnresolvedResonance, UnresolvedResonanceTable, UnresolvedTableError,
};
