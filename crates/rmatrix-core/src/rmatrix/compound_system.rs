use super::channel_data::ParticleChannelData;
use super::particle::ParticlePair;
use super::spin_group::{EvaluationError, SpinGroup, SpinGroupError};
use crate::common::config::EvaluationOptions;
use crate::numerics::sort_and_dedup;
use num_complex::Complex64;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompoundSystemError {
    #[error("a compound system needs at least one spin group")]
    Empty,
    #[error("there are at least two spin groups with J,π = {label}")]
    DuplicateSpinGroup { label: String },
    #[error("spin group {label} has incident pair '{found}', expected '{expected}'")]
    IncidentPairMismatch {
        label: String,
        expected: String,
        found: String,
    },
    #[error("spin group {label}: {source}")]
    SpinGroup {
        label: String,
        #[source]
        source: SpinGroupError,
    },
}

/// All spin groups of one compound nucleus, seen from one incident pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSystem {
    groups: Vec<SpinGroup>,
    reactions: Vec<String>,
}

impl CompoundSystem {
    pub fn new(groups: Vec<SpinGroup>) -> Result<Self, CompoundSystemError> {
        verify_spin_groups(&groups)?;
        let reactions = reaction_ids(&groups);
        Ok(Self { groups, reactions })
    }

    /// Groups the channel data by J,π (in ascending order) and builds one
    /// spin group per distinct value.
    pub fn from_channel_data(
        data: Vec<ParticleChannelData>,
        options: EvaluationOptions,
    ) -> Result<Self, CompoundSystemError> {
        let mut grouped: BTreeMap<_, Vec<ParticleChannelData>> = BTreeMap::new();
        for entry in data {
            let key = entry.channel().quantum_numbers().spin_group_key();
            grouped.entry(key).or_default().push(entry);
        }

        let groups = grouped
            .into_values()
            .map(|entries| {
                let label = entries
                    .first()
                    .map(|entry| entry.channel().quantum_numbers().spin_parity_label())
                    .unwrap_or_default();
                SpinGroup::from_channel_data(entries, options)
                    .map_err(|source| CompoundSystemError::SpinGroup { label, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(groups)
    }

    pub fn spin_groups(&self) -> &[SpinGroup] {
        &self.groups
    }

    pub fn incident_pair(&self) -> &ParticlePair {
        self.groups[0].incident_pair()
    }

    /// Sorted union of the reactions of all groups.
    pub fn reaction_ids(&self) -> &[String] {
        &self.reactions
    }

    pub fn grid(&self) -> Result<Vec<f64>, EvaluationError> {
        let mut grid = Vec::new();
        for group in &self.groups {
            grid.extend(group.grid()?);
        }
        sort_and_dedup(&mut grid);
        Ok(grid)
    }

    pub fn evaluate(&self, energy: f64) -> Result<BTreeMap<String, f64>, EvaluationError> {
        let mut result = BTreeMap::new();
        self.evaluate_into(energy, &mut result)?;
        Ok(result)
    }

    pub fn evaluate_into(
        &self,
        energy: f64,
        result: &mut BTreeMap<String, f64>,
    ) -> Result<(), EvaluationError> {
        for group in &self.groups {
            let mut scratch = group.scratch();
            group.evaluate_with(energy, &mut scratch, result)?;
        }
        Ok(())
    }

    pub fn evaluate_tmatrix(
        &self,
        energy: f64,
    ) -> Result<BTreeMap<String, Complex64>, EvaluationError> {
        let mut result = BTreeMap::new();
        for group in &self.groups {
            group.evaluate_tmatrix_into(energy, &mut result)?;
        }
        Ok(result)
    }

    /// Switches every group to `incident`. Either all groups switch or the
    /// system is left unchanged.
    pub fn switch_incident_pair(
        &mut self,
        incident: &ParticlePair,
    ) -> Result<(), CompoundSystemError> {
        if incident.id() == self.incident_pair().id() {
            return Ok(());
        }
        let mut groups = self.groups.clone();
        for group in &mut groups {
            group
                .switch_incident_pair(incident)
                .map_err(|source| CompoundSystemError::SpinGroup {
                    label: group.label(),
                    source,
                })?;
        }
        self.reactions = reaction_ids(&groups);
        self.groups = groups;
        Ok(())
    }
}

fn verify_spin_groups(groups: &[SpinGroup]) -> Result<(), CompoundSystemError> {
    let first = groups.first().ok_or(CompoundSystemError::Empty)?;
    let pair = first.incident_pair().id();
    for (position, group) in groups.iter().enumerate() {
        let key = group.channels()[0].quantum_numbers().spin_group_key();
        let duplicate = groups[..position]
            .iter()
            .any(|other| other.channels()[0].quantum_numbers().spin_group_key() == key);
        if duplicate {
            return Err(CompoundSystemError::DuplicateSpinGroup {
                label: group.label(),
            });
        }
        if group.incident_pair().id() != pair {
            return Err(CompoundSystemError::IncidentPairMismatch {
                label: group.label(),
                expected: pair.to_string(),
                found: group.incident_pair().id().to_string(),
            });
        }
    }
    Ok(())
}

fn reaction_ids(groups: &[SpinGroup]) -> Vec<String> {
    let mut reactions: Vec<String> = groups
        .iter()
        .flat_map(|group| group.reaction_ids().iter().cloned())
        .collect();
    reactions.sort();
    reactions.dedup();
    reactions
}
