//! Per-channel resonance data and its consolidation into a resonance table.

use super::channel::Channel;
use super::resonance::{Resonance, ResonanceTable, ResonanceTableError};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelDataError {
    #[error("channel '{id}' has {energies} resonance energies but {widths} widths")]
    LengthMismatch {
        id: String,
        energies: usize,
        widths: usize,
    },
    #[error("channel '{id}' has a non-finite resonance energy or width")]
    NonFinite { id: String },
    #[error(transparent)]
    Table(#[from] ResonanceTableError),
}

/// A channel with the poles it couples to and their reduced widths.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleChannelData {
    channel: Channel,
    energies: Vec<f64>,
    widths: Vec<f64>,
    eliminated: bool,
}

impl ParticleChannelData {
    pub fn new(
        channel: Channel,
        energies: Vec<f64>,
        widths: Vec<f64>,
        eliminated: bool,
    ) -> Result<Self, ChannelDataError> {
        if energies.len() != widths.len() {
            return Err(ChannelDataError::LengthMismatch {
                id: channel.id().to_string(),
                energies: energies.len(),
                widths: widths.len(),
            });
        }
        if energies.iter().chain(&widths).any(|value| !value.is_finite()) {
            return Err(ChannelDataError::NonFinite {
                id: channel.id().to_string(),
            });
        }
        Ok(Self {
            channel,
            energies,
            widths,
            eliminated,
        })
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn channel_id(&self) -> &str {
        self.channel.id()
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }
}

/// Merges the data of one spin group into its channels and a resonance table.
///
/// Poles are matched by exact energy and sorted; a channel that does not
/// couple to a pole gets a zero width. Eliminated channels are dropped from
/// the channel list and their widths become the eliminated widths of the
/// resonances (squared widths add when several land on one pole).
pub fn consolidate(
    data: Vec<ParticleChannelData>,
) -> Result<(Vec<Channel>, ResonanceTable), ChannelDataError> {
    let mut poles: Vec<(f64, usize, f64)> = data
        .iter()
        .enumerate()
        .flat_map(|(index, entry)| {
            entry
                .energies
                .iter()
                .zip(&entry.widths)
                .map(move |(energy, width)| (*energy, index, *width))
        })
        .collect();
    poles.sort_by(|left, right| left.0.total_cmp(&right.0));

    // column of every retained channel in the resonance widths
    let mut columns = Vec::with_capacity(data.len());
    let mut retained = 0;
    for entry in &data {
        if entry.eliminated {
            columns.push(None);
        } else {
            columns.push(Some(retained));
            retained += 1;
        }
    }

    let mut resonances = Vec::new();
    let mut start = 0;
    while start < poles.len() {
        let energy = poles[start].0;
        let end = poles[start..]
            .iter()
            .position(|pole| pole.0.total_cmp(&energy) != Ordering::Equal)
            .map_or(poles.len(), |offset| start + offset);

        let mut widths = vec![0.0; retained];
        let mut eliminated: Option<f64> = None;
        for (_, index, width) in &poles[start..end] {
            match columns[*index] {
                Some(column) => widths[column] = *width,
                None => {
                    eliminated = Some(eliminated.map_or(*width, |previous| previous.hypot(*width)));
                }
            }
        }
        resonances.push(Resonance::new(energy, widths, eliminated.unwrap_or(0.0)));
        start = end;
    }

    let channels: Vec<Channel> = data
        .into_iter()
        .filter(|entry| !entry.eliminated)
        .map(|entry| entry.channel)
        .collect();
    let ids = channels.iter().map(|channel| channel.id().to_string()).collect();
    let table = ResonanceTable::new(ids, resonances)?;
    Ok((channels, table))
}
