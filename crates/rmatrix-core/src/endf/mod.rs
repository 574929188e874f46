//! Construction of compound systems from ENDF resolved resonance records.
//!
//! Two representations are supported: R-matrix limited (LRF = 7), which
//! lists particle pairs and spin groups explicitly, and Reich-Moore (LRF = 3),
//! whose channels are reconstructed from l values and resonance spins.
//! Formalism and boundary option follow the record; the remaining evaluation
//! options and the Coulomb settings come from the caller's configuration.

mod limited;
pub mod particles;
pub mod radii;
pub mod records;
mod reich_moore;

pub use limited::make_particle_pairs;
pub use records::{
    load_resonance_record, LValueRecord, ParticlePairRecord, RMatrixLimitedRecord,
    RadiusTableRecord, RecordError, ReichMooreRecord, ReichMooreResonanceRecord,
    ResonanceChannelRecord, ResonanceParameterRecord, ResonanceRecord, SpinGroupRecord,
};

use crate::common::config::EvaluationConfig;
use crate::rmatrix::{
    Channel, ChannelDataError, CompoundSystem, CompoundSystemError, EvaluationError,
    ParticleError, QuantumNumberError, RadiusError, SpinGroupError,
};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("R-matrix limited formalism KRM = {formalism} is not supported")]
    UnsupportedFormalism { formalism: u32 },
    #[error("no particle pair is associated with MT = {mt}")]
    MissingPair { mt: u32 },
    #[error("no particle identifier for ZA = {za}")]
    UnknownParticle { za: u32 },
    #[error("no element with Z = {z}")]
    UnknownElement { z: u32 },
    #[error("spin group {group} channel {channel} refers to particle pair {index} of {pairs}")]
    PairIndex {
        group: usize,
        channel: usize,
        index: usize,
        pairs: usize,
    },
    #[error("spin group {group}: resonance at {energy} eV has {actual} widths for {expected} channels")]
    WidthCount {
        group: usize,
        energy: f64,
        expected: usize,
        actual: usize,
    },
    #[error("no channel quantum numbers are available for l = {l}, J = {j}")]
    NoQuantumNumbers { l: u32, j: f64 },
    #[error("a Reich-Moore record needs at least one l value")]
    EmptyLValues,
    #[error("unknown ENDF interpolation law INT = {code}")]
    UnknownInterpolation { code: u32 },
    #[error(transparent)]
    Particle(#[from] ParticleError),
    #[error(transparent)]
    QuantumNumbers(#[from] QuantumNumberError),
    #[error(transparent)]
    Radius(#[from] RadiusError),
    #[error(transparent)]
    ChannelData(#[from] ChannelDataError),
    #[error(transparent)]
    SpinGroup(#[from] SpinGroupError),
    #[error(transparent)]
    CompoundSystem(#[from] CompoundSystemError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

pub fn compound_system_from_record(
    record: &ResonanceRecord,
    config: &EvaluationConfig,
) -> Result<CompoundSystem, AdapterError> {
    let system = match record {
        ResonanceRecord::RMatrixLimited(record) => limited::compound_system(record, config)?,
        ResonanceRecord::ReichMoore(record) => reich_moore::compound_system(record, config)?,
    };
    debug!(
        incident = system.incident_pair().id(),
        spin_groups = system.spin_groups().len(),
        reactions = system.reaction_ids().len(),
        "built compound system from resonance record"
    );
    Ok(system)
}

/// γ = sign(Γ)·√(|Γ|/(2P(E_λ))). A vanishing penetrability yields a zero
/// reduced width.
fn reduced_width(channel: &Channel, energy: f64, width: f64) -> Result<f64, AdapterError> {
    let penetrability = channel
        .open_penetrability(energy)
        .map_err(EvaluationError::from)?;
    if penetrability <= 0.0 {
        warn!(
            channel = channel.id(),
            energy, width, "zero penetrability at the resonance energy, reduced width set to zero"
        );
        return Ok(0.0);
    }
    Ok(width.signum() * (width.abs() / (2.0 * penetrability)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{compound_system_from_record, AdapterError, ResonanceRecord};
    use crate::common::config::{EvaluationConfig, Formalism};
    use crate::domain::{ErrorCategory, ReconstructionError};

    fn cl35_record() -> ResonanceRecord {
        serde_json::from_str(
            r#"
            {
              "representation": "RMatrixLimited",
              "formalism": 3,
              "particlePairs": [
                { "ma": 0.0, "mb": 35.6, "za": 0.0, "zb": 17.0, "ia": 0.0, "ib": 2.0,
                  "pa": 1.0, "pb": 1.0, "mt": 102 },
                { "ma": 1.0, "mb": 34.66845, "za": 0.0, "zb": 17.0, "ia": 0.5, "ib": 1.5,
                  "mt": 2 },
                { "ma": 0.9986235, "mb": 34.66863, "za": 1.0, "zb": 16.0, "ia": 0.5,
                  "ib": 1.5, "q": 615220.0, "mt": 600 }
              ],
              "spinGroups": [
                {
                  "aj": 1.0,
                  "channels": [
                    { "ppi": 1, "l": 0, "sch": 0.0, "ape": 0.0, "apt": 0.0 },
                    { "ppi": 2, "l": 0, "sch": 1.0, "ape": 0.366798, "apt": 0.482222 },
                    { "ppi": 3, "l": 0, "sch": 1.0, "ape": 0.366798, "apt": 0.482222 }
                  ],
                  "resonances": [
                    { "er": 68236.16, "widths": [0.39336, 217.904, 1.0e-5] }
                  ]
                }
              ]
            }
            "#,
        )
        .expect("record")
    }

    #[test]
    fn record_selects_formalism_and_reactions() {
        let system =
            compound_system_from_record(&cl35_record(), &EvaluationConfig::default()).expect("system");
        assert_eq!(system.incident_pair().id(), "n,Cl35_e0");
        assert_eq!(
            system.reaction_ids(),
            [
                "n,Cl35_e0->capture".to_string(),
                "n,Cl35_e0->n,Cl35_e0".to_string(),
                "n,Cl35_e0->p,S35_e0".to_string(),
            ]
        );
        let group = &system.spin_groups()[0];
        assert_eq!(group.options().formalism, Formalism::ReichMoore);
        assert_eq!(group.channels().len(), 2);
        let resonance = &group.resonance_table().resonances()[0];
        assert!((resonance.eliminated_width() - (0.39336_f64 / 2.0).sqrt()).abs() < 1.0e-15);
    }

    #[test]
    fn adapter_errors_map_to_input_validation() {
        let error = AdapterError::MissingPair { mt: 2 };
        let mapped = ReconstructionError::from(error);
        assert_eq!(mapped.category(), ErrorCategory::Input);
        assert_eq!(mapped.code(), "INPUT.RESONANCE_RECORD");
    }
}
