use super::CliError;
use anyhow::Context;
use rmatrix_core::common::{load_evaluation_config, EvaluationConfig};
use rmatrix_core::domain::{ReconstructionError, ReconstructionResult};
use rmatrix_core::endf::{compound_system_from_record, load_resonance_record};
use rmatrix_core::rmatrix::{CompoundSystem, ParticlePair};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

pub(super) fn load_config(path: Option<&Path>) -> ReconstructionResult<EvaluationConfig> {
    match path {
        Some(path) => Ok(load_evaluation_config(path)?),
        None => Ok(EvaluationConfig::default()),
    }
}

pub(super) fn load_compound_system(
    input: &Path,
    config: &EvaluationConfig,
) -> ReconstructionResult<CompoundSystem> {
    let record = load_resonance_record(input)?;
    let system = compound_system_from_record(&record, config)?;
    info!(
        input = %input.display(),
        incident = system.incident_pair().id(),
        spin_groups = system.spin_groups().len(),
        "loaded resonance record"
    );
    Ok(system)
}

/// Any particle pair appearing in one of the system's channels.
pub(super) fn find_particle_pair(
    system: &CompoundSystem,
    id: &str,
) -> ReconstructionResult<ParticlePair> {
    system
        .spin_groups()
        .iter()
        .flat_map(|group| group.channels())
        .map(|channel| channel.particle_pair())
        .find(|pair| pair.id() == id)
        .cloned()
        .ok_or_else(|| {
            ReconstructionError::input(
                "INPUT.CLI_INCIDENT",
                format!("no channel of the resonance record uses particle pair '{id}'"),
            )
        })
}

/// Whitespace separated table: a header of column names, then one row per
/// energy. Reactions missing from a row are closed at that energy.
pub(super) fn render_cross_section_table(
    reactions: &[String],
    rows: &[(f64, BTreeMap<String, f64>)],
) -> String {
    let mut table = String::from("energy");
    for reaction in reactions {
        table.push(' ');
        table.push_str(reaction);
    }
    table.push('\n');

    for (energy, cross_sections) in rows {
        let _ = write!(table, "{energy:.9e}");
        for reaction in reactions {
            let value = cross_sections.get(reaction).copied().unwrap_or(0.0);
            let _ = write!(table, " {value:.9e}");
        }
        table.push('\n');
    }
    table
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CrossSectionDocument<'a> {
    reactions: &'a [String],
    rows: Vec<CrossSectionRow<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CrossSectionRow<'a> {
    energy: f64,
    cross_sections: &'a BTreeMap<String, f64>,
}

pub(super) fn render_cross_section_json(
    reactions: &[String],
    rows: &[(f64, BTreeMap<String, f64>)],
) -> Result<String, CliError> {
    let document = CrossSectionDocument {
        reactions,
        rows: rows
            .iter()
            .map(|(energy, cross_sections)| CrossSectionRow {
                energy: *energy,
                cross_sections,
            })
            .collect(),
    };
    let mut rendered = serde_json::to_string_pretty(&document)
        .context("failed to serialize cross sections")?;
    rendered.push('\n');
    Ok(rendered)
}

pub(super) fn render_grid(grid: &[f64]) -> String {
    grid.iter().map(|energy| format!("{energy:.9e}\n")).collect()
}

pub(super) fn emit(output: Option<&Path>, content: &str) -> Result<(), CliError> {
    let Some(path) = output else {
        print!("{content}");
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("failed to write output '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{render_cross_section_json, render_cross_section_table, render_grid};
    use std::collections::BTreeMap;

    #[test]
    fn table_fills_closed_reactions_with_zero() {
        let reactions = vec!["n,X->capture".to_string(), "n,X->n,X".to_string()];
        let rows = vec![
            (1.0, BTreeMap::from([("n,X->n,X".to_string(), 2.5)])),
            (
                2.0,
                BTreeMap::from([
                    ("n,X->capture".to_string(), 0.125),
                    ("n,X->n,X".to_string(), 3.0),
                ]),
            ),
        ];
        let table = render_cross_section_table(&reactions, &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "energy n,X->capture n,X->n,X");
        assert_eq!(lines[1], "1.000000000e0 0.000000000e0 2.500000000e0");
        assert_eq!(lines[2], "2.000000000e0 1.250000000e-1 3.000000000e0");
    }

    #[test]
    fn json_rows_keep_only_open_reactions() {
        let reactions = vec!["n,X->n,X".to_string()];
        let rows = vec![(1.0, BTreeMap::from([("n,X->n,X".to_string(), 2.5)]))];
        let rendered = render_cross_section_json(&reactions, &rows).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(parsed["reactions"][0], "n,X->n,X");
        assert_eq!(parsed["rows"][0]["energy"], 1.0);
        assert_eq!(parsed["rows"][0]["crossSections"]["n,X->n,X"], 2.5);
    }

    #[test]
    fn grid_has_one_energy_per_line() {
        assert_eq!(render_grid(&[1.0e-5, 7788.0]), "1.000000000e-5\n7.788000000e3\n");
    }
}
