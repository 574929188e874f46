//! Reich-Moore records (LRF = 3).
//!
//! The record lists resonances per l value with their total angular momentum
//! only. Each (l, J) becomes an elastic neutron channel with an eliminated
//! capture channel and up to two fission channels; the channel spin is taken
//! from the quantum numbers the incident pair can still form. Elastic
//! channels required for convergence (l < NLSC) that carry no resonance are
//! added for potential scattering before the data is grouped by J,π.

use super::particles::nucleus_id;
use super::radii::{channel_radii, radius_table};
use super::records::{LValueRecord, ReichMooreRecord, ReichMooreResonanceRecord};
use super::{reduced_width, AdapterError};
use crate::common::config::{BoundaryOption, EvaluationConfig, EvaluationOptions, Formalism};
use crate::common::constants::NEUTRON_MASS_AMU;
use crate::rmatrix::{
    possible_channel_spin_values, possible_total_angular_momentum_values, Channel, ChannelKind,
    ChannelQuantumNumbers, ChannelRadii, CompoundSystem, ParticleChannelData, Parity, Particle,
    ParticlePair, RadiusTable,
};

pub(super) fn compound_system(
    record: &ReichMooreRecord,
    config: &EvaluationConfig,
) -> Result<CompoundSystem, AdapterError> {
    let first = record.l_values.first().ok_or(AdapterError::EmptyLValues)?;
    let target_mass = first.awri * NEUTRON_MASS_AMU;
    let neutron = Particle::new("n", NEUTRON_MASS_AMU, 0.0, 0.5, Parity::Positive)?;
    let target = Particle::new(
        nucleus_id(record.za / 1000, record.za % 1000)?,
        target_mass,
        0.0,
        record.spin,
        Parity::Positive,
    )?;
    let incident = ParticlePair::new(neutron, target)?;

    let table = record
        .radius
        .as_ref()
        .map(|table| radius_table(table, config.options.radius_out_of_range))
        .transpose()?;
    let radii = channel_radii(record.ap, table.as_ref(), record.naps, target_mass)?;

    let builder = ChannelBuilder {
        incident: &incident,
        record,
        table: table.as_ref(),
        config,
    };
    let mut available = required_quantum_numbers(&incident, record.nlsc)?;
    let mut data = Vec::new();
    for l_value in &record.l_values {
        builder.l_value_data(l_value, &radii, &mut available, &mut data)?;
    }
    for numbers in available {
        let elastic = builder.channel(ChannelKind::Neutron, incident.clone(), numbers, radii.clone());
        data.push(ParticleChannelData::new(elastic, Vec::new(), Vec::new(), false)?);
    }

    let options = EvaluationOptions {
        formalism: Formalism::ReichMoore,
        boundary: BoundaryOption::ShiftFactor,
        ..config.options
    };
    Ok(CompoundSystem::from_channel_data(data, options)?)
}

/// Every {l, s, J, (−1)^l} of the incident pair with l < `lmax`.
fn required_quantum_numbers(
    incident: &ParticlePair,
    lmax: u32,
) -> Result<Vec<ChannelQuantumNumbers>, AdapterError> {
    let spins =
        possible_channel_spin_values(incident.particle().spin(), incident.residual().spin());
    let mut numbers = Vec::new();
    for l in 0..lmax {
        for s in &spins {
            for j in possible_total_angular_momentum_values(l, *s) {
                numbers.push(ChannelQuantumNumbers::new(l, *s, j, Parity::of_orbital(l))?);
            }
        }
    }
    Ok(numbers)
}

/// Takes the first still available quantum numbers with the given l and J.
/// When none is left, the first channel spin that couples l to J is used.
fn retrieve_quantum_numbers(
    incident: &ParticlePair,
    l: u32,
    j: f64,
    available: &mut Vec<ChannelQuantumNumbers>,
) -> Result<ChannelQuantumNumbers, AdapterError> {
    let found = available.iter().position(|numbers| {
        numbers.orbital_angular_momentum() == l && numbers.total_angular_momentum() == j
    });
    if let Some(position) = found {
        return Ok(available.remove(position));
    }
    possible_channel_spin_values(incident.particle().spin(), incident.residual().spin())
        .into_iter()
        .find_map(|s| ChannelQuantumNumbers::new(l, s, j, Parity::of_orbital(l)).ok())
        .ok_or(AdapterError::NoQuantumNumbers { l, j })
}

struct ChannelBuilder<'a> {
    incident: &'a ParticlePair,
    record: &'a ReichMooreRecord,
    table: Option<&'a RadiusTable>,
    config: &'a EvaluationConfig,
}

impl ChannelBuilder<'_> {
    fn channel(
        &self,
        kind: ChannelKind,
        pair: ParticlePair,
        numbers: ChannelQuantumNumbers,
        radii: ChannelRadii,
    ) -> Channel {
        Channel::new(kind, self.incident.clone(), pair, 0.0, numbers, radii, 0.0)
            .with_coulomb_config(self.config.coulomb)
    }

    fn renamed_pair(&self, id: &str) -> Result<ParticlePair, AdapterError> {
        Ok(ParticlePair::with_id(
            self.incident.particle().clone(),
            self.incident.residual().clone(),
            id,
        )?)
    }

    fn l_value_data(
        &self,
        l_value: &LValueRecord,
        radii: &ChannelRadii,
        available: &mut Vec<ChannelQuantumNumbers>,
        data: &mut Vec<ParticleChannelData>,
    ) -> Result<(), AdapterError> {
        let l = l_value.l;
        let radii = if l_value.apl != 0.0 {
            channel_radii(
                l_value.apl,
                self.table,
                self.record.naps,
                l_value.awri * NEUTRON_MASS_AMU,
            )?
        } else {
            radii.clone()
        };

        let mut spins: Vec<f64> = l_value.resonances.iter().map(|resonance| resonance.aj).collect();
        spins.sort_by(f64::total_cmp);
        spins.dedup();

        let capture_pair = self.renamed_pair("capture")?;
        let fission_pair = self.renamed_pair("fission")?;
        for aj in spins {
            let j = aj.abs();
            let resonances: Vec<&ReichMooreResonanceRecord> = l_value
                .resonances
                .iter()
                .filter(|resonance| resonance.aj == aj)
                .collect();
            let energies: Vec<f64> = resonances.iter().map(|resonance| resonance.er).collect();

            let numbers = retrieve_quantum_numbers(self.incident, l, j, available)?;
            let elastic =
                self.channel(ChannelKind::Neutron, self.incident.clone(), numbers, radii.clone());
            let capture =
                self.channel(ChannelKind::Photon, capture_pair.clone(), numbers, radii.clone());

            let elastic_widths = self.widths(&elastic, &resonances, |resonance| resonance.gn)?;
            let capture_widths = self.widths(&capture, &resonances, |resonance| resonance.gg)?;
            data.push(ParticleChannelData::new(elastic, energies.clone(), elastic_widths, false)?);
            data.push(ParticleChannelData::new(capture, energies.clone(), capture_widths, true)?);

            let fission_numbers =
                ChannelQuantumNumbers::uncoupled(l, 0.0, j, Parity::of_orbital(l))?;
            let fission_columns: [fn(&ReichMooreResonanceRecord) -> f64; 2] =
                [|resonance| resonance.gfa, |resonance| resonance.gfb];
            let mut fission_channels = 0;
            for column in fission_columns {
                if resonances.iter().all(|resonance| column(resonance) == 0.0) {
                    continue;
                }
                fission_channels += 1;
                let fission = self
                    .channel(
                        ChannelKind::Fission,
                        fission_pair.clone(),
                        fission_numbers,
                        radii.clone(),
                    )
                    .with_id(format!("fission{fission_channels}{fission_numbers}"));
                let widths = self.widths(&fission, &resonances, column)?;
                data.push(ParticleChannelData::new(fission, energies.clone(), widths, false)?);
            }
        }
        Ok(())
    }

    fn widths(
        &self,
        channel: &Channel,
        resonances: &[&ReichMooreResonanceRecord],
        width: impl Fn(&ReichMooreResonanceRecord) -> f64,
    ) -> Result<Vec<f64>, AdapterError> {
        resonances
            .iter()
            .map(|resonance| reduced_width(channel, resonance.er, width(resonance)))
            .collect()
    }
}
