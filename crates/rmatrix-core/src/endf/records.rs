//! Parsed ENDF-6 File 2 resonance parameters, as JSON documents.
//!
//! The structures mirror the ENDF records field by field (ENDF names in the
//! field comments); ENDF-format parsing itself happens upstream.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read resonance record '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse resonance record '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolved resonance parameters in one of the supported representations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "representation")]
pub enum ResonanceRecord {
    /// LRF = 7
    RMatrixLimited(RMatrixLimitedRecord),
    /// LRF = 3
    ReichMoore(ReichMooreRecord),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RMatrixLimitedRecord {
    /// KRL: widths are already reduced widths.
    #[serde(default)]
    pub reduced_widths: bool,
    /// KRM: 3 for Reich-Moore, 4 for the general R-matrix.
    pub formalism: u32,
    pub particle_pairs: Vec<ParticlePairRecord>,
    pub spin_groups: Vec<SpinGroupRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticlePairRecord {
    /// MA, MB: masses in neutron masses.
    pub ma: f64,
    pub mb: f64,
    /// ZA, ZB: charges in elementary charges.
    pub za: f64,
    pub zb: f64,
    /// IA, IB: spins, the sign carrying the parity.
    pub ia: f64,
    pub ib: f64,
    /// PA, PB: parities used when the spin is zero.
    #[serde(default)]
    pub pa: f64,
    #[serde(default)]
    pub pb: f64,
    #[serde(default)]
    pub q: f64,
    /// SHF: 0 when the shift factor is used as boundary condition.
    #[serde(default)]
    pub shf: u32,
    pub mt: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinGroupRecord {
    /// AJ: J with the parity in its sign.
    pub aj: f64,
    /// PJ: parity used when AJ is zero.
    #[serde(default)]
    pub pj: f64,
    pub channels: Vec<ResonanceChannelRecord>,
    #[serde(default)]
    pub resonances: Vec<ResonanceParameterRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResonanceChannelRecord {
    /// PPI: 1-based index of the particle pair.
    pub ppi: usize,
    pub l: u32,
    /// SCH: channel spin.
    pub sch: f64,
    /// BND: boundary condition.
    #[serde(default)]
    pub bnd: f64,
    /// APE, APT: effective and true channel radii in √b.
    pub ape: f64,
    pub apt: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResonanceParameterRecord {
    pub er: f64,
    /// One width per channel of the spin group, in channel order.
    pub widths: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReichMooreRecord {
    /// ZA of the target, used for its identifier.
    pub za: u32,
    /// SPI: target spin.
    pub spin: f64,
    /// AP: scattering radius in √b.
    pub ap: f64,
    #[serde(default)]
    pub naps: u32,
    #[serde(default)]
    pub nlsc: u32,
    /// Energy-dependent scattering radius (NRO = 1).
    #[serde(default)]
    pub radius: Option<RadiusTableRecord>,
    pub l_values: Vec<LValueRecord>,
}

/// ENDF TAB1 record: region boundaries (NBT), laws (INT) and the points.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusTableRecord {
    pub boundaries: Vec<usize>,
    pub interpolants: Vec<u32>,
    pub energies: Vec<f64>,
    pub radii: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LValueRecord {
    pub l: u32,
    pub awri: f64,
    /// APL: l-dependent scattering radius, zero when AP applies.
    #[serde(default)]
    pub apl: f64,
    #[serde(default)]
    pub resonances: Vec<ReichMooreResonanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReichMooreResonanceRecord {
    pub er: f64,
    pub aj: f64,
    pub gn: f64,
    pub gg: f64,
    #[serde(default)]
    pub gfa: f64,
    #[serde(default)]
    pub gfb: f64,
}

pub fn load_resonance_record(path: impl AsRef<Path>) -> Result<ResonanceRecord, RecordError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RecordError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| RecordError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
