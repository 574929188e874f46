//! R-matrix limited records (LRF = 7).

use super::particles::{light_particle_id, mass_number, residual_id};
use super::records::{ParticlePairRecord, RMatrixLimitedRecord, SpinGroupRecord};
use super::{reduced_width, AdapterError};
use crate::common::config::{BoundaryOption, EvaluationConfig, EvaluationOptions, Formalism};
use crate::common::constants::NEUTRON_MASS_AMU;
use crate::rmatrix::{
    Channel, ChannelKind, ChannelQuantumNumbers, ChannelRadii, ChannelRadius, CompoundSystem,
    Parity, Particle, ParticlePair, Resonance, ResonanceTable, SpinGroup, SpinGroupError,
};

const INCIDENT_MT: u32 = 2;
const CAPTURE_MT: u32 = 102;

pub(super) fn compound_system(
    record: &RMatrixLimitedRecord,
    config: &EvaluationConfig,
) -> Result<CompoundSystem, AdapterError> {
    let pairs = make_particle_pairs(&record.particle_pairs)?;
    let incident = pair_index(&record.particle_pairs, INCIDENT_MT)
        .ok_or(AdapterError::MissingPair { mt: INCIDENT_MT })?;

    let formalism = match record.formalism {
        3 => Formalism::ReichMoore,
        4 => Formalism::GeneralRMatrix,
        formalism => return Err(AdapterError::UnsupportedFormalism { formalism }),
    };
    let boundary = match record.particle_pairs.first().map_or(0, |pair| pair.shf) {
        0 => BoundaryOption::ShiftFactor,
        _ => BoundaryOption::Constant,
    };
    let options = EvaluationOptions {
        formalism,
        boundary,
        ..config.options
    };
    let eliminated = match formalism {
        Formalism::ReichMoore => pair_index(&record.particle_pairs, CAPTURE_MT),
        Formalism::GeneralRMatrix => None,
    };

    let groups = record
        .spin_groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let builder = GroupBuilder {
                index,
                record,
                pairs: &pairs,
                incident: &pairs[incident],
                eliminated,
                config,
            };
            builder.build(group, options)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompoundSystem::new(groups)?)
}

/// One particle pair per record, identified from charge and mass numbers:
/// `n,Fe54_e0`, `p,S35_e0`, `g,Cl36_e0`, ...
pub fn make_particle_pairs(records: &[ParticlePairRecord]) -> Result<Vec<ParticlePair>, AdapterError> {
    records
        .iter()
        .map(|record| {
            let light = light_particle_id(whole(record.za), mass_number(record.ma))?;
            let nucleus = residual_id(whole(record.zb), mass_number(record.mb), record.mt)?;
            Ok(ParticlePair::new(
                particle(light, record.ma, record.za, record.ia, record.pa)?,
                particle(&nucleus, record.mb, record.zb, record.ib, record.pb)?,
            )?)
        })
        .collect()
}

fn pair_index(records: &[ParticlePairRecord], mt: u32) -> Option<usize> {
    records.iter().position(|record| record.mt == mt)
}

fn whole(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Spin magnitude from `spin`; parity from its sign, or from `parity` when
/// the spin is zero.
fn particle(
    id: &str,
    mass: f64,
    charge: f64,
    spin: f64,
    parity: f64,
) -> Result<Particle, AdapterError> {
    Ok(Particle::new(
        id,
        mass * NEUTRON_MASS_AMU,
        charge,
        spin.abs(),
        signed_parity(spin, parity),
    )?)
}

fn signed_parity(value: f64, fallback: f64) -> Parity {
    if value == 0.0 {
        Parity::from_sign(fallback)
    } else {
        Parity::from_sign(value)
    }
}

fn channel_kind(mt: u32, pair: &ParticlePair) -> ChannelKind {
    match mt {
        CAPTURE_MT => ChannelKind::Photon,
        18..=21 | 38 => ChannelKind::Fission,
        _ if pair.particle().charge() > 0.0 => ChannelKind::ChargedParticle,
        _ => ChannelKind::Neutron,
    }
}

struct GroupBuilder<'a> {
    index: usize,
    record: &'a RMatrixLimitedRecord,
    pairs: &'a [ParticlePair],
    incident: &'a ParticlePair,
    eliminated: Option<usize>,
    config: &'a EvaluationConfig,
}

impl GroupBuilder<'_> {
    fn build(
        &self,
        group: &SpinGroupRecord,
        options: EvaluationOptions,
    ) -> Result<SpinGroup, AdapterError> {
        let j = group.aj.abs();
        let parity = signed_parity(group.aj, group.pj);

        let mut channels = Vec::with_capacity(group.channels.len());
        let mut pair_indices = Vec::with_capacity(group.channels.len());
        for (position, channel) in group.channels.iter().enumerate() {
            let pair_index = channel
                .ppi
                .checked_sub(1)
                .filter(|index| *index < self.pairs.len())
                .ok_or(AdapterError::PairIndex {
                    group: self.index,
                    channel: position,
                    index: channel.ppi,
                    pairs: self.pairs.len(),
                })?;
            let pair = &self.pairs[pair_index];
            let pair_record = &self.record.particle_pairs[pair_index];
            let kind = channel_kind(pair_record.mt, pair);
            let numbers = match kind {
                ChannelKind::Photon | ChannelKind::Fission => {
                    ChannelQuantumNumbers::uncoupled(channel.l, channel.sch.abs(), j, parity)?
                }
                ChannelKind::Neutron | ChannelKind::ChargedParticle => {
                    ChannelQuantumNumbers::new(channel.l, channel.sch.abs(), j, parity)?
                }
            };
            let radii = ChannelRadii::with_true_and_effective(
                ChannelRadius::constant(channel.apt)?,
                ChannelRadius::constant(channel.ape)?,
            );
            channels.push(
                Channel::new(
                    kind,
                    self.incident.clone(),
                    pair.clone(),
                    pair_record.q,
                    numbers,
                    radii,
                    channel.bnd,
                )
                .with_coulomb_config(self.config.coulomb),
            );
            pair_indices.push(pair_index);
        }

        let eliminated = self
            .eliminated
            .and_then(|pair| pair_indices.iter().position(|index| *index == pair));

        let mut resonances = Vec::with_capacity(group.resonances.len());
        for resonance in &group.resonances {
            if resonance.widths.len() < channels.len() {
                return Err(AdapterError::WidthCount {
                    group: self.index,
                    energy: resonance.er,
                    expected: channels.len(),
                    actual: resonance.widths.len(),
                });
            }
            let mut widths = channels
                .iter()
                .zip(&resonance.widths)
                .map(|(channel, width)| {
                    if self.record.reduced_widths {
                        Ok(*width)
                    } else {
                        reduced_width(channel, resonance.er, *width)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            let eliminated_width = eliminated.map_or(0.0, |position| widths.remove(position));
            resonances.push(Resonance::new(resonance.er, widths, eliminated_width));
        }

        if let Some(position) = eliminated {
            channels.remove(position);
        }
        let ids = channels.iter().map(|channel| channel.id().to_string()).collect();
        let table = ResonanceTable::new(ids, resonances).map_err(SpinGroupError::from)?;
        Ok(SpinGroup::new(channels, table, options)?)
    }
}
