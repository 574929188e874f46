use super::CliError;
use super::helpers::*;
use rmatrix_core::domain::ReconstructionError;
use std::path::PathBuf;
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct EvaluateArgs {
    /// Resonance record (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Evaluation config (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Incident energy in eV; repeat for several energies. The resonance
    /// grid is used when none is given.
    #[arg(long = "energy", value_name = "EV", allow_negative_numbers = true)]
    energies: Vec<f64>,

    /// Particle pair to use as the incident pair, e.g. `p,S35_e0`
    #[arg(long)]
    incident: Option<String>,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the table to this path instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub(super) enum OutputFormat {
    /// Whitespace separated columns with a header line
    Table,
    /// JSON document with the reaction list and one object per energy
    Json,
}

#[derive(clap::Args)]
pub(super) struct GridArgs {
    /// Resonance record (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Evaluation config (JSON); its grid policy decides which points are kept
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the grid to this path instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(super) fn run_evaluate_command(args: EvaluateArgs) -> Result<i32, CliError> {
    let config = load_config(args.config.as_deref())?;
    let mut system = load_compound_system(&args.input, &config)?;
    if let Some(id) = args.incident.as_deref() {
        let incident = find_particle_pair(&system, id)?;
        system
            .switch_incident_pair(&incident)
            .map_err(ReconstructionError::from)?;
    }

    let energies = if args.energies.is_empty() {
        system
            .grid()
            .map_err(ReconstructionError::from)?
    } else {
        args.energies
    };
    debug!(points = energies.len(), "evaluating cross sections");

    let rows = energies
        .into_iter()
        .map(|energy| system.evaluate(energy).map(|values| (energy, values)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ReconstructionError::from)?;

    let rendered = match args.format {
        OutputFormat::Table => render_cross_section_table(system.reaction_ids(), &rows),
        OutputFormat::Json => render_cross_section_json(system.reaction_ids(), &rows)?,
    };
    emit(args.output.as_deref(), &rendered)?;
    Ok(0)
}

pub(super) fn run_grid_command(args: GridArgs) -> Result<i32, CliError> {
    let config = load_config(args.config.as_deref())?;
    let system = load_compound_system(&args.input, &config)?;
    let grid = system
        .grid()
        .map_err(ReconstructionError::from)?;
    emit(args.output.as_deref(), &render_grid(&grid))?;
    Ok(0)
}
