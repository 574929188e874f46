//! Channel radii of Reich-Moore records (NAPS rules).

use super::records::RadiusTableRecord;
use super::AdapterError;
use crate::common::config::RadiusOutOfRange;
use crate::numerics::InterpolationLaw;
use crate::rmatrix::{ChannelRadii, ChannelRadius, RadiusTable};

pub fn radius_table(
    record: &RadiusTableRecord,
    out_of_range: RadiusOutOfRange,
) -> Result<RadiusTable, AdapterError> {
    let laws = record
        .interpolants
        .iter()
        .map(|code| {
            InterpolationLaw::from_endf(*code)
                .ok_or(AdapterError::UnknownInterpolation { code: *code })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RadiusTable::new(
        record.energies.clone(),
        record.radii.clone(),
        record.boundaries.clone(),
        laws,
        out_of_range,
    )?)
}

/// 0.123·A^{1/3} + 0.08 with A the target mass in daltons.
pub fn default_true_radius(target_mass: f64) -> f64 {
    0.123 * target_mass.cbrt() + 0.08
}

/// Radii for scattering radius `ap`, optional tabulated radius and NAPS:
/// - NAPS = 0: true radius from the mass formula, effective radius AP (or
///   the table);
/// - NAPS = 1: AP (or the table) for every radius;
/// - NAPS = 2: true radius AP, effective radius the table (AP without one).
pub fn channel_radii(
    ap: f64,
    table: Option<&RadiusTable>,
    naps: u32,
    target_mass: f64,
) -> Result<ChannelRadii, AdapterError> {
    let ap = ChannelRadius::constant(ap)?;
    let tabulated = table.cloned().map(ChannelRadius::from);
    let radii = match (naps, tabulated) {
        (0, effective) => ChannelRadii::with_true_and_effective(
            ChannelRadius::constant(default_true_radius(target_mass))?,
            effective.unwrap_or(ap),
        ),
        (1, Some(table)) => ChannelRadii::new(table),
        (2, Some(table)) => ChannelRadii::with_true_and_effective(ap, table),
        (_, _) => ChannelRadii::new(ap),
    };
    Ok(radii)
}

#[cfg(test)]
mod tests {
    use super::{channel_radii, default_true_radius, radius_table};
    use crate::common::config::RadiusOutOfRange;
    use crate::endf::records::RadiusTableRecord;
    use crate::endf::AdapterError;

    fn record(interpolant: u32) -> RadiusTableRecord {
        RadiusTableRecord {
            boundaries: vec![3],
            interpolants: vec![interpolant],
            energies: vec![1.0e-5, 1.0e3, 1.0e5],
            radii: vec![0.6, 0.62, 0.7],
        }
    }

    #[test]
    fn naps_selects_true_and_effective_radii() {
        let table = radius_table(&record(2), RadiusOutOfRange::Clamp).expect("table");
        let mass = 53.476_24 * crate::common::constants::NEUTRON_MASS_AMU;
        let formula = default_true_radius(mass);
        assert!((formula - 0.54373).abs() < 5.0e-3);

        let radii = channel_radii(0.5, None, 0, mass).expect("naps 0");
        assert_eq!(radii.penetrability_radius(1.0).expect("true"), formula);
        assert_eq!(radii.phase_shift_radius(1.0).expect("effective"), 0.5);

        let radii = channel_radii(0.5, Some(&table), 0, mass).expect("naps 0 table");
        assert_eq!(radii.shift_factor_radius(1.0e3).expect("true"), formula);
        assert_eq!(radii.phase_shift_radius(1.0e3).expect("effective"), 0.62);

        let radii = channel_radii(0.5, Some(&table), 1, mass).expect("naps 1");
        assert_eq!(radii.penetrability_radius(2.0e5).expect("table"), 0.7);

        let radii = channel_radii(0.5, Some(&table), 2, mass).expect("naps 2");
        assert_eq!(radii.penetrability_radius(1.0e5).expect("ap"), 0.5);
        assert_eq!(radii.phase_shift_radius(2.0e5).expect("table"), 0.7);

        let radii = channel_radii(0.5, None, 2, mass).expect("naps 2 without table");
        assert_eq!(radii.phase_shift_radius(1.0e5).expect("ap"), 0.5);
    }

    #[test]
    fn unknown_interpolation_laws_are_rejected() {
        let error = radius_table(&record(7), RadiusOutOfRange::Clamp).expect_err("INT = 7");
        assert_eq!(error, AdapterError::UnknownInterpolation { code: 7 });
    }
}
