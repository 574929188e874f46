//! Spin groups: channels sharing J and π, their resonances and the
//! cross sections they produce.

use super::channel::{Channel, ChannelError, ChannelPhysics};
use super::channel_data::{consolidate, ChannelDataError, ParticleChannelData};
use super::particle::ParticlePair;
use super::resonance::{ResonanceTable, ResonanceTableError};
use crate::common::config::{BoundaryOption, ClosedChannelPolicy, EvaluationOptions, Formalism};
use crate::numerics::sort_and_dedup;
use crate::numerics::special::{DenseComplexMatrix, SolveError};
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinGroupError {
    #[error("a spin group needs at least one channel")]
    Empty,
    #[error("channel '{id}' has J,π = {found} in a spin group with J,π = {expected}")]
    SpinParityMismatch {
        id: String,
        expected: String,
        found: String,
    },
    #[error("channel '{id}' has incident pair '{found}' in a spin group with incident pair '{expected}'")]
    IncidentPairMismatch {
        id: String,
        expected: String,
        found: String,
    },
    #[error("channel '{id}' appears more than once in the spin group")]
    DuplicateChannel { id: String },
    #[error("no channel of the spin group belongs to the incident pair '{pair}'")]
    NoIncidentChannel { pair: String },
    #[error("resonance table channels {found:?} do not match the spin group channels {expected:?}")]
    TableMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error(transparent)]
    ChannelData(#[from] ChannelDataError),
    #[error(transparent)]
    Table(#[from] ResonanceTableError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("T-matrix solve failed: {0}")]
    Matrix(#[from] SolveError),
}

/// Per-channel working buffers of one evaluation. A scratch created for a
/// spin group can be reused across energies for that group.
#[derive(Debug, Clone)]
pub struct EvaluationScratch {
    physics: Vec<ChannelPhysics>,
    l_diagonal: Vec<Complex64>,
    closed: Vec<bool>,
    sqrt_penetrability: Vec<f64>,
    omega: Vec<Complex64>,
    tmatrix: DenseComplexMatrix,
}

impl EvaluationScratch {
    pub fn new(number_channels: usize) -> Self {
        Self {
            physics: Vec::with_capacity(number_channels),
            l_diagonal: Vec::with_capacity(number_channels),
            closed: Vec::with_capacity(number_channels),
            sqrt_penetrability: Vec::with_capacity(number_channels),
            omega: Vec::with_capacity(number_channels),
            tmatrix: DenseComplexMatrix::zeros(number_channels, number_channels),
        }
    }

    fn clear(&mut self) {
        self.physics.clear();
        self.l_diagonal.clear();
        self.closed.clear();
        self.sqrt_penetrability.clear();
        self.omega.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinGroup {
    channels: Vec<Channel>,
    incident: Vec<usize>,
    table: ResonanceTable,
    reactions: Vec<String>,
    options: EvaluationOptions,
}

impl SpinGroup {
    pub fn new(
        channels: Vec<Channel>,
        table: ResonanceTable,
        options: EvaluationOptions,
    ) -> Result<Self, SpinGroupError> {
        verify_channels(&channels)?;
        let expected: Vec<String> = channels.iter().map(|c| c.id().to_string()).collect();
        if table.channel_ids() != expected.as_slice() {
            return Err(SpinGroupError::TableMismatch {
                expected,
                found: table.channel_ids().to_vec(),
            });
        }
        let incident = incident_channels(&channels)?;
        let reactions = reaction_ids(&channels, options.formalism);
        Ok(Self {
            channels,
            incident,
            table,
            reactions,
            options,
        })
    }

    /// Spin group from per-channel resonance data (see [`consolidate`]).
    pub fn from_channel_data(
        data: Vec<ParticleChannelData>,
        options: EvaluationOptions,
    ) -> Result<Self, SpinGroupError> {
        let (channels, table) = consolidate(data)?;
        Self::new(channels, table, options)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn incident_channels(&self) -> impl Iterator<Item = &Channel> + '_ {
        self.incident.iter().map(|index| &self.channels[*index])
    }

    pub fn incident_pair(&self) -> &ParticlePair {
        self.channels[0].incident_pair()
    }

    pub fn resonance_table(&self) -> &ResonanceTable {
        &self.table
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn reaction_ids(&self) -> &[String] {
        &self.reactions
    }

    /// `J` and parity of the group, e.g. `1/2+`.
    pub fn label(&self) -> String {
        self.channels[0].quantum_numbers().spin_parity_label()
    }

    pub fn scratch(&self) -> EvaluationScratch {
        EvaluationScratch::new(self.channels.len())
    }

    /// Resonance energies and the energies half a total width away from
    /// them, filtered by the grid policy, sorted and de-duplicated.
    pub fn grid(&self) -> Result<Vec<f64>, EvaluationError> {
        let policy = self.options.grid_policy;
        let mut grid = Vec::with_capacity(3 * self.table.number_resonances());
        for resonance in self.table.resonances() {
            let energy = resonance.energy();
            if !policy.accepts_pole(energy) {
                continue;
            }
            let eliminated = resonance.eliminated_width();
            let mut total = 2.0 * eliminated * eliminated;
            for (channel, gamma) in self.channels.iter().zip(resonance.widths()) {
                total += 2.0 * channel.penetrability(energy)? * gamma * gamma;
            }
            let points = [energy - 0.5 * total, energy, energy + 0.5 * total];
            grid.extend(points.into_iter().filter_map(|point| policy.filter_point(point)));
        }
        sort_and_dedup(&mut grid);
        Ok(grid)
    }

    pub fn evaluate(&self, energy: f64) -> Result<BTreeMap<String, f64>, EvaluationError> {
        let mut result = BTreeMap::new();
        self.evaluate_into(energy, &mut result)?;
        Ok(result)
    }

    /// Adds the cross sections of this group at `energy` to `result`.
    pub fn evaluate_into(
        &self,
        energy: f64,
        result: &mut BTreeMap<String, f64>,
    ) -> Result<(), EvaluationError> {
        let mut scratch = self.scratch();
        self.evaluate_with(energy, &mut scratch, result)
    }

    pub fn evaluate_with(
        &self,
        energy: f64,
        scratch: &mut EvaluationScratch,
        result: &mut BTreeMap<String, f64>,
    ) -> Result<(), EvaluationError> {
        self.prepare(energy, scratch)?;

        let first = &self.channels[self.incident[0]];
        let wave_number = first.wave_number(energy);
        let factor = PI / (wave_number * wave_number) * first.statistical_spin_factor();
        let size = self.channels.len();
        let capture = self.options.formalism == Formalism::ReichMoore;

        for &c in &self.incident {
            let exponential = Complex64::from_polar(1.0, scratch.physics[c].coulomb_phase_shift);
            // 1 − Σ|U_cc′|² with U = Ω(I + X)Ω and X = 2i√P·T·√P; |Ω| = 1 so
            // the leading 1 cancels exactly.
            let mut absorption = 0.0;
            for cprime in 0..size {
                let x = Complex64::new(0.0, 2.0)
                    * scratch.sqrt_penetrability[c]
                    * scratch.tmatrix[(c, cprime)]
                    * scratch.sqrt_penetrability[cprime];
                let (w, delta_phase) = if c == cprime {
                    absorption -= 2.0 * x.re;
                    (x + 1.0, exponential)
                } else {
                    (x, Complex64::new(0.0, 0.0))
                };
                absorption -= x.norm_sqr();
                let u = scratch.omega[c] * w * scratch.omega[cprime];
                *result.entry(self.reactions[cprime].clone()).or_insert(0.0) +=
                    factor * (delta_phase - u).norm_sqr();
            }
            if capture {
                *result.entry(self.reactions[size].clone()).or_insert(0.0) += factor * absorption;
            }
        }

        debug!(
            group = %self.label(),
            energy,
            channels = size,
            resonances = self.table.number_resonances(),
            "evaluated spin group cross sections"
        );
        Ok(())
    }

    pub fn evaluate_tmatrix(
        &self,
        energy: f64,
    ) -> Result<BTreeMap<String, Complex64>, EvaluationError> {
        let mut result = BTreeMap::new();
        self.evaluate_tmatrix_into(energy, &mut result)?;
        Ok(result)
    }

    /// Adds √P_c·T_cc′·√P_c′ for every channel pair, keyed `c->c′`.
    pub fn evaluate_tmatrix_into(
        &self,
        energy: f64,
        result: &mut BTreeMap<String, Complex64>,
    ) -> Result<(), EvaluationError> {
        let mut scratch = self.scratch();
        self.prepare(energy, &mut scratch)?;
        for (c, channel) in self.channels.iter().enumerate() {
            for (cprime, other) in self.channels.iter().enumerate() {
                let value = scratch.sqrt_penetrability[c]
                    * scratch.tmatrix[(c, cprime)]
                    * scratch.sqrt_penetrability[cprime];
                *result
                    .entry(format!("{}->{}", channel.id(), other.id()))
                    .or_insert(Complex64::new(0.0, 0.0)) += value;
            }
        }
        Ok(())
    }

    /// Makes the channels of `incident` the entrance channels; Q values are
    /// taken relative to that pair. A no-op when the pair does not change.
    pub fn switch_incident_pair(&mut self, incident: &ParticlePair) -> Result<(), SpinGroupError> {
        if incident.id() == self.incident_pair().id() {
            return Ok(());
        }
        let q_shift = self
            .channels
            .iter()
            .find(|channel| channel.particle_pair().id() == incident.id())
            .map(Channel::q)
            .ok_or_else(|| SpinGroupError::NoIncidentChannel {
                pair: incident.id().to_string(),
            })?;

        let channels: Vec<Channel> = self
            .channels
            .iter()
            .map(|channel| channel.with_incident_pair(incident.clone(), q_shift))
            .collect();
        self.incident = incident_channels(&channels)?;
        self.reactions = reaction_ids(&channels, self.options.formalism);
        self.channels = channels;
        Ok(())
    }

    fn prepare(&self, energy: f64, scratch: &mut EvaluationScratch) -> Result<(), EvaluationError> {
        scratch.clear();
        let eliminate = self.options.closed_channels == ClosedChannelPolicy::Eliminate;
        for channel in &self.channels {
            let physics = channel.physics(energy)?;
            let real = match self.options.boundary {
                BoundaryOption::ShiftFactor => 0.0,
                BoundaryOption::Constant => {
                    physics.shift_factor - channel.boundary_condition()
                }
            };
            scratch
                .l_diagonal
                .push(Complex64::new(real, physics.penetrability));
            scratch.closed.push(eliminate && physics.below_threshold);
            scratch.sqrt_penetrability.push(physics.penetrability.sqrt());
            scratch.omega.push(Complex64::from_polar(
                1.0,
                physics.coulomb_phase_shift - physics.phase_shift,
            ));
            scratch.physics.push(physics);
        }

        match self.options.formalism {
            Formalism::ReichMoore => self.table.tmatrix(
                energy,
                &scratch.l_diagonal,
                &scratch.closed,
                &mut scratch.tmatrix,
            )?,
            Formalism::GeneralRMatrix => self.table.level_matrix_tmatrix(
                energy,
                &scratch.l_diagonal,
                &scratch.closed,
                &mut scratch.tmatrix,
            )?,
        }
        Ok(())
    }
}

fn verify_channels(channels: &[Channel]) -> Result<(), SpinGroupError> {
    let first = channels.first().ok_or(SpinGroupError::Empty)?;
    let key = first.quantum_numbers().spin_group_key();
    let pair = first.incident_pair().id();
    for (position, channel) in channels.iter().enumerate() {
        if channel.quantum_numbers().spin_group_key() != key {
            return Err(SpinGroupError::SpinParityMismatch {
                id: channel.id().to_string(),
                expected: first.quantum_numbers().spin_parity_label(),
                found: channel.quantum_numbers().spin_parity_label(),
            });
        }
        if channel.incident_pair().id() != pair {
            return Err(SpinGroupError::IncidentPairMismatch {
                id: channel.id().to_string(),
                expected: pair.to_string(),
                found: channel.incident_pair().id().to_string(),
            });
        }
        if channels[..position].iter().any(|other| other.id() == channel.id()) {
            return Err(SpinGroupError::DuplicateChannel {
                id: channel.id().to_string(),
            });
        }
    }
    Ok(())
}

fn incident_channels(channels: &[Channel]) -> Result<Vec<usize>, SpinGroupError> {
    let incident: Vec<usize> = channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| channel.is_incident())
        .map(|(index, _)| index)
        .collect();
    if incident.is_empty() {
        let pair = channels
            .first()
            .map_or_else(String::new, |channel| channel.incident_pair().id().to_string());
        return Err(SpinGroupError::NoIncidentChannel { pair });
    }
    Ok(incident)
}

fn reaction_ids(channels: &[Channel], formalism: Formalism) -> Vec<String> {
    let mut reactions: Vec<String> = channels.iter().map(Channel::reaction_id).collect();
    if formalism == Formalism::ReichMoore {
        if let Some(first) = channels.first() {
            reactions.push(format!("{}->capture", first.incident_pair().id()));
        }
    }
    reactions
}

#[cfg(test)]
mod tests {
    use super::{SpinGroup, SpinGroupError};
    use crate::common::config::{EvaluationOptions, Formalism, GridPolicy};
    use crate::common::constants::NEUTRON_MASS_AMU;
    use crate::rmatrix::channel::{Channel, ChannelKind};
    use crate::rmatrix::channel_data::ParticleChannelData;
    use crate::rmatrix::particle::{Parity, Particle, ParticlePair};
    use crate::rmatrix::quantum_numbers::ChannelQuantumNumbers;
    use crate::rmatrix::radii::{ChannelRadii, ChannelRadius};
    use crate::rmatrix::resonance::{Resonance, ResonanceTable};
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn assert_close(expected: f64, actual: f64, tolerance: f64) {
        let scale = expected.abs().max(f64::MIN_POSITIVE);
        assert!(
            ((expected - actual) / scale).abs() <= tolerance,
            "expected {expected:e}, got {actual:e}"
        );
    }

    fn fe54_pair() -> ParticlePair {
        let neutron =
            Particle::new("n", NEUTRON_MASS_AMU, 0.0, 0.5, Parity::Positive).expect("neutron");
        let iron = Particle::new("Fe54", 53.476_24 * NEUTRON_MASS_AMU, 26.0, 0.0, Parity::Positive)
            .expect("Fe54");
        ParticlePair::new(neutron, iron).expect("pair")
    }

    fn fe54_channel() -> Channel {
        Channel::new(
            ChannelKind::Neutron,
            fe54_pair(),
            fe54_pair(),
            0.0,
            ChannelQuantumNumbers::new(0, 0.5, 0.5, Parity::Positive).expect("numbers"),
            ChannelRadii::new(ChannelRadius::Constant(0.543_73)),
            0.0,
        )
    }

    /// Fe54 s-wave resonance from Γn and Γγ in eV.
    fn fe54_resonance(channel: &Channel, energy: f64, neutron: f64, gamma: f64) -> Resonance {
        let penetrability = channel.penetrability(energy).expect("P");
        Resonance::new(
            energy,
            vec![(neutron / (2.0 * penetrability)).sqrt()],
            (gamma / 2.0).sqrt(),
        )
    }

    fn fe54_group_from(resonances: Vec<Resonance>, options: EvaluationOptions) -> SpinGroup {
        let channel = fe54_channel();
        let table =
            ResonanceTable::new(vec![channel.id().to_string()], resonances).expect("table");
        SpinGroup::new(vec![channel], table, options).expect("spin group")
    }

    fn fe54_group(resonances: &[(f64, f64, f64)], options: EvaluationOptions) -> SpinGroup {
        let channel = fe54_channel();
        let resonances = resonances
            .iter()
            .map(|&(energy, neutron, gamma)| fe54_resonance(&channel, energy, neutron, gamma))
            .collect();
        fe54_group_from(resonances, options)
    }

    const FE54_SINGLE: [(f64, f64, f64); 1] = [(7_788.0, 1_187.354, 1.455)];

    fn cl35_channels() -> (Channel, Channel) {
        let particle = |id: &str, mass: f64, charge: f64, spin: f64| {
            Particle::new(id, mass * NEUTRON_MASS_AMU, charge, spin, Parity::Positive)
                .expect("particle")
        };
        let incident = ParticlePair::new(
            particle("n", 1.0, 0.0, 0.5),
            particle("Cl35", 34.668_45, 17.0, 1.5),
        )
        .expect("incident");
        let proton = ParticlePair::new(
            particle("p", 0.998_623_5, 1.0, 0.5),
            particle("S36", 34.668_63, 16.0, 1.5),
        )
        .expect("proton pair");
        let numbers = ChannelQuantumNumbers::new(0, 1.0, 1.0, Parity::Positive).expect("numbers");
        let radii = ChannelRadii::with_true_and_effective(
            ChannelRadius::Constant(0.482_222),
            ChannelRadius::Constant(0.366_798),
        );
        let elastic = Channel::new(
            ChannelKind::Neutron,
            incident.clone(),
            incident.clone(),
            0.0,
            numbers,
            radii.clone(),
            0.0,
        );
        let emission = Channel::new(
            ChannelKind::ChargedParticle,
            incident,
            proton,
            6.152_20e5,
            numbers,
            radii,
            0.0,
        );
        (elastic, emission)
    }

    /// Cl35 1+ group with a single resonance; `reversed` lists the proton
    /// channel first.
    fn cl35_group(reversed: bool) -> SpinGroup {
        let (elastic, emission) = cl35_channels();
        let energy = 6.823_616e4;
        let reduced = |channel: &Channel, width: f64| {
            (width / (2.0 * channel.penetrability(energy).expect("P"))).sqrt()
        };
        let mut widths = vec![reduced(&elastic, 2.179_04e2), reduced(&emission, 1.0e-5)];
        let mut channels = vec![elastic, emission];
        if reversed {
            widths.reverse();
            channels.reverse();
        }
        let ids = channels.iter().map(|channel| channel.id().to_string()).collect();
        let table = ResonanceTable::new(
            ids,
            vec![Resonance::new(energy, widths, (3.933_6e-1_f64 / 2.0).sqrt())],
        )
        .expect("table");
        SpinGroup::new(channels, table, EvaluationOptions::default()).expect("spin group")
    }

    #[test]
    fn fe54_single_resonance_reproduces_reference_cross_sections() {
        let group = fe54_group(&FE54_SINGLE, EvaluationOptions::default());
        assert_eq!(
            group.reaction_ids(),
            ["n,Fe54->n,Fe54".to_string(), "n,Fe54->capture".to_string()]
        );

        let cases = [
            (1.0e-5, 2.575_879e-1, 6.895_037e1),
            (1.0, 2.574_031e-1, 2.180_961e-1),
            (1.0e3, 8.932_777e-2, 9.067_251e-3),
            (1.0e4, 4.342_056e1, 2.473_549e-2),
            (7_788.0, 3.424_287e2, 4.241_421e-1),
            (1.0e6, 2.308_817, 1.343_259e-8),
        ];
        for (energy, elastic, capture) in cases {
            let result = group.evaluate(energy).expect("evaluation");
            assert_close(elastic, result["n,Fe54->n,Fe54"], 1.0e-5);
            assert_close(capture, result["n,Fe54->capture"], 1.0e-5);
        }
    }

    #[test]
    fn thermal_capture_follows_the_one_over_v_law() {
        let group = cl35_group(false);
        let cases = [
            (1.0e-5, 6.241_509e-1, 5.576_194e-8, 5.758_583e-3),
            (1.0e-4, 6.241_509e-1, 1.763_347e-8, 1.821_024e-3),
            (1.0e-3, 6.241_509e-1, 5.576_194e-9, 5.758_583e-4),
            (1.0e-2, 6.241_509e-1, 1.763_348e-9, 1.821_024e-4),
            (1.0e-1, 6.241_508e-1, 5.576_219e-10, 5.758_600e-5),
            (1.0e3, 6.238_793e-1, 5.831_846e-12, 5.931_151e-7),
        ];
        for (energy, elastic, proton, capture) in cases {
            let result = group.evaluate(energy).expect("evaluation");
            assert_eq!(result.len(), 3);
            assert_close(elastic, result["n,Cl35->n,Cl35"], 1.0e-5);
            assert_close(proton, result["n,Cl35->p,S36"], 1.0e-5);
            assert_close(capture, result["n,Cl35->capture"], 1.0e-5);
        }

        // σ_γ·√E is constant well below the resonance
        let low = group.evaluate(1.0e-5).expect("low")["n,Cl35->capture"];
        let high = group.evaluate(1.0e-3).expect("high")["n,Cl35->capture"];
        assert_close(low, high * 10.0, 1.0e-6);
    }

    #[test]
    fn several_resonances_interfere() {
        let group = fe54_group(
            &[
                (7_788.0, 1_187.354, 1.455),
                (52_872.0, 2_000.345, 2.0),
                (71_905.0, 1_781.791, 2.0),
            ],
            EvaluationOptions::default(),
        );
        let result = group.evaluate(1.0e-5).expect("evaluation");
        assert_close(8.781_786e-2, result["n,Fe54->n,Fe54"], 1.0e-5);
        assert_close(7.082_910e1, result["n,Fe54->capture"], 1.0e-5);

        let result = group.evaluate(1.0e3).expect("evaluation");
        assert_close(7.098_247e-3, result["n,Fe54->n,Fe54"], 1.0e-5);
        assert_close(9.259_110e-3, result["n,Fe54->capture"], 1.0e-5);
    }

    #[test]
    fn single_level_closed_form_is_reproduced() {
        // s-wave neutron on a spin 1/2 target in the J = 1 group
        let neutron =
            Particle::new("n", NEUTRON_MASS_AMU, 0.0, 0.5, Parity::Positive).expect("neutron");
        let target =
            Particle::new("X", 15.0 * NEUTRON_MASS_AMU, 0.0, 0.5, Parity::Positive).expect("X");
        let pair = ParticlePair::new(neutron, target).expect("pair");
        let channel = Channel::new(
            ChannelKind::Neutron,
            pair.clone(),
            pair,
            0.0,
            ChannelQuantumNumbers::new(0, 1.0, 1.0, Parity::Positive).expect("numbers"),
            ChannelRadii::with_radii(
                ChannelRadius::Constant(0.482),
                ChannelRadius::Constant(0.482),
                ChannelRadius::Constant(0.367),
            ),
            0.0,
        );
        let table = ResonanceTable::new(
            vec![channel.id().to_string()],
            vec![Resonance::new(10.0, vec![1.0], 2.0)],
        )
        .expect("table");
        let group = SpinGroup::new(vec![channel.clone()], table, EvaluationOptions::default())
            .expect("group");

        for energy in [1.0e-5, 1.0e-4, 1.0e-3] {
            let k = channel.wave_number(energy);
            let penetrability = k * 0.482;
            let phi = k * 0.367;
            let neutron_width = 2.0 * penetrability;
            let capture_width = 8.0;
            let total = neutron_width + capture_width;
            let denominator = Complex64::new(10.0 - energy, -0.5 * total);
            let u = Complex64::from_polar(1.0, -2.0 * phi)
                * (Complex64::new(1.0, 0.0) + Complex64::new(0.0, neutron_width) / denominator);
            let factor = PI / (k * k) * 0.75;
            let elastic = factor * (Complex64::new(1.0, 0.0) - u).norm_sqr();
            let capture = factor * neutron_width * capture_width / denominator.norm_sqr();

            let result = group.evaluate(energy).expect("evaluation");
            assert_close(elastic, result["n,X->n,X"], 1.0e-6);
            assert_close(capture, result["n,X->capture"], 1.0e-6);
        }
    }

    #[test]
    fn elastic_and_capture_respect_unitarity() {
        let group = fe54_group(&FE54_SINGLE, EvaluationOptions::default());
        let channel = &group.channels()[0];
        for energy in [1.0e-5, 1.0, 5.0e3, 7_788.0, 8.0e3, 1.0e6] {
            let result = group.evaluate(energy).expect("evaluation");
            let k = channel.wave_number(energy);
            let bound = 4.0 * PI / (k * k);
            let capture = result["n,Fe54->capture"];
            assert!(capture >= 0.0);
            assert!(result["n,Fe54->n,Fe54"] + capture <= bound * (1.0 + 1.0e-12));
        }
    }

    #[test]
    fn grid_contains_poles_and_half_widths() {
        let channel = fe54_channel();
        let resonances = vec![
            Resonance::new(-100.0, vec![1.0], 1.0),
            fe54_resonance(&channel, 7_788.0, 1_187.354, 1.455),
        ];
        let group = fe54_group_from(resonances.clone(), EvaluationOptions::default());
        let grid = group.grid().expect("grid");
        let half = 0.5 * (1_187.354 + 1.455);
        assert_eq!(grid.len(), 3);
        assert_close(7_788.0 - half, grid[0], 1.0e-12);
        assert_eq!(grid[1], 7_788.0);
        assert_close(7_788.0 + half, grid[2], 1.0e-12);

        // closed at the negative pole, so only the eliminated width counts
        let options = EvaluationOptions {
            grid_policy: GridPolicy::IncludeNegative,
            ..EvaluationOptions::default()
        };
        let group = fe54_group_from(resonances, options);
        let grid = group.grid().expect("grid");
        assert_eq!(grid.len(), 6);
        assert_eq!(&grid[..3], &[-101.0, -100.0, -99.0]);
    }

    #[test]
    fn general_r_matrix_has_no_capture_reaction() {
        let options = EvaluationOptions {
            formalism: Formalism::GeneralRMatrix,
            ..EvaluationOptions::default()
        };
        let group = fe54_group(&[(7_788.0, 1_187.354, 0.0)], options);
        assert_eq!(group.reaction_ids(), ["n,Fe54->n,Fe54".to_string()]);

        let reich_moore = fe54_group(&[(7_788.0, 1_187.354, 0.0)], EvaluationOptions::default());
        for energy in [1.0, 7_000.0, 7_788.0] {
            let general = group.evaluate(energy).expect("general");
            let reference = reich_moore.evaluate(energy).expect("reich-moore");
            assert_close(reference["n,Fe54->n,Fe54"], general["n,Fe54->n,Fe54"], 1.0e-10);
            assert!(reference["n,Fe54->capture"].abs() < 1.0e-6);
        }
    }

    #[test]
    fn tmatrix_elements_are_keyed_by_channel() {
        let group = fe54_group(&FE54_SINGLE, EvaluationOptions::default());
        let elements = group.evaluate_tmatrix(7_788.0).expect("tmatrix");
        let key = "n,Fe54{0,1/2,1/2+}->n,Fe54{0,1/2,1/2+}";
        assert_eq!(elements.len(), 1);
        // at the peak P·T = iΓn/Γ
        let expected = Complex64::new(0.0, 1_187.354 / (1_187.354 + 1.455));
        assert!((elements[key] - expected).norm() < 1.0e-9);
    }

    #[test]
    fn construction_invariants_are_enforced() {
        let channel = fe54_channel();
        let table =
            ResonanceTable::new(vec!["other".to_string()], Vec::new()).expect("table");
        let error = SpinGroup::new(vec![channel.clone()], table, EvaluationOptions::default())
            .expect_err("table order");
        assert!(matches!(error, SpinGroupError::TableMismatch { .. }));

        let table = ResonanceTable::new(Vec::new(), Vec::new()).expect("table");
        let error = SpinGroup::new(Vec::new(), table, EvaluationOptions::default())
            .expect_err("empty");
        assert_eq!(error, SpinGroupError::Empty);

        let other = Channel::new(
            ChannelKind::Neutron,
            fe54_pair(),
            fe54_pair(),
            0.0,
            ChannelQuantumNumbers::new(1, 0.5, 1.5, Parity::Negative).expect("numbers"),
            ChannelRadii::new(ChannelRadius::Constant(0.543_73)),
            0.0,
        );
        let ids = vec![channel.id().to_string(), other.id().to_string()];
        let table = ResonanceTable::new(ids, Vec::new()).expect("table");
        let error = SpinGroup::new(vec![channel.clone(), other], table, EvaluationOptions::default())
            .expect_err("J,π mismatch");
        assert!(matches!(error, SpinGroupError::SpinParityMismatch { .. }));

        let capture_only = channel.clone().with_id("capture").with_incident_pair(
            ParticlePair::with_id(
                fe54_pair().particle().clone(),
                fe54_pair().residual().clone(),
                "n,Fe55",
            )
            .expect("pair"),
            0.0,
        );
        let table = ResonanceTable::new(vec!["capture".to_string()], Vec::new()).expect("table");
        let error = SpinGroup::new(vec![capture_only], table, EvaluationOptions::default())
            .expect_err("no incident channel");
        assert!(matches!(error, SpinGroupError::NoIncidentChannel { .. }));
    }

    #[test]
    fn channel_order_must_match_the_table() {
        let (elastic, emission) = cl35_channels();
        let swapped = ResonanceTable::new(
            vec![emission.id().to_string(), elastic.id().to_string()],
            Vec::new(),
        )
        .expect("table");
        let error = SpinGroup::new(
            vec![elastic.clone(), emission.clone()],
            swapped,
            EvaluationOptions::default(),
        )
        .expect_err("same channels, other order");
        assert_eq!(
            error,
            SpinGroupError::TableMismatch {
                expected: vec![elastic.id().to_string(), emission.id().to_string()],
                found: vec![emission.id().to_string(), elastic.id().to_string()],
            }
        );
    }

    #[test]
    fn reordered_channels_keep_the_incident_channel() {
        let forward = cl35_group(false);
        let reversed = cl35_group(true);
        assert_eq!(
            forward.reaction_ids(),
            [
                "n,Cl35->n,Cl35".to_string(),
                "n,Cl35->p,S36".to_string(),
                "n,Cl35->capture".to_string()
            ]
        );
        assert_eq!(
            reversed.reaction_ids(),
            [
                "n,Cl35->p,S36".to_string(),
                "n,Cl35->n,Cl35".to_string(),
                "n,Cl35->capture".to_string()
            ]
        );

        let incident: Vec<&str> = reversed.incident_channels().map(Channel::id).collect();
        assert_eq!(incident, [forward.channels()[0].id()]);
        assert_eq!(reversed.channels()[1].id(), forward.channels()[0].id());

        for energy in [1.0e-5, 1.0, 6.823_616e4] {
            let lhs = forward.evaluate(energy).expect("forward");
            let rhs = reversed.evaluate(energy).expect("reversed");
            for (reaction, value) in &lhs {
                assert_close(*value, rhs[reaction], 1.0e-9);
            }
        }
    }

    #[test]
    fn duplicate_channels_and_foreign_incident_pairs_are_rejected() {
        let (elastic, emission) = cl35_channels();
        let table = ResonanceTable::new(vec![elastic.id().to_string()], Vec::new())
            .expect("table");
        let error = SpinGroup::new(
            vec![elastic.clone(), elastic.clone()],
            table,
            EvaluationOptions::default(),
        )
        .expect_err("duplicate");
        assert_eq!(
            error,
            SpinGroupError::DuplicateChannel {
                id: "n,Cl35{0,1,1+}".to_string()
            }
        );

        let foreign = emission
            .clone()
            .with_incident_pair(emission.particle_pair().clone(), 6.152_20e5);
        let table = ResonanceTable::new(
            vec![elastic.id().to_string(), foreign.id().to_string()],
            Vec::new(),
        )
        .expect("table");
        let error = SpinGroup::new(vec![elastic, foreign], table, EvaluationOptions::default())
            .expect_err("incident pair");
        assert_eq!(
            error,
            SpinGroupError::IncidentPairMismatch {
                id: "p,S36{0,1,1+}".to_string(),
                expected: "n,Cl35".to_string(),
                found: "p,S36".to_string(),
            }
        );
    }

    #[test]
    fn channel_data_builds_the_same_group() {
        let channel = fe54_channel();
        let penetrability = channel.penetrability(7_788.0).expect("P");
        let width = (1_187.354 / (2.0 * penetrability)).sqrt();
        let capture = channel.clone().with_id("capture");
        let data = vec![
            ParticleChannelData::new(channel, vec![7_788.0], vec![width], false).expect("n"),
            ParticleChannelData::new(capture, vec![7_788.0], vec![(1.455_f64 / 2.0).sqrt()], true)
                .expect("capture"),
        ];
        let group = SpinGroup::from_channel_data(data, EvaluationOptions::default())
            .expect("group");
        let reference = fe54_group(&FE54_SINGLE, EvaluationOptions::default());
        assert_eq!(group, reference);
    }
}
