//! Particle identifiers derived from ENDF charge and mass numbers.

use super::AdapterError;
use crate::common::constants::NEUTRON_MASS_AMU;

const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Mass number of a particle whose mass is given in neutron masses.
pub fn mass_number(mass_in_neutron_masses: f64) -> u32 {
    (mass_in_neutron_masses * NEUTRON_MASS_AMU).round() as u32
}

pub fn element_symbol(z: u32) -> Result<&'static str, AdapterError> {
    z.checked_sub(1)
        .and_then(|index| ELEMENTS.get(index as usize))
        .copied()
        .ok_or(AdapterError::UnknownElement { z })
}

/// Identifier of a light projectile or ejectile (`n`, `p`, `a`, ...).
pub fn light_particle_id(z: u32, a: u32) -> Result<&'static str, AdapterError> {
    match z * 1000 + a {
        0 => Ok("g"),
        1 => Ok("n"),
        1001 => Ok("p"),
        1002 => Ok("d"),
        1003 => Ok("t"),
        2003 => Ok("he3"),
        2004 => Ok("a"),
        za => Err(AdapterError::UnknownParticle { za }),
    }
}

/// Identifier of a nucleus, e.g. `Fe54`.
pub fn nucleus_id(z: u32, a: u32) -> Result<String, AdapterError> {
    Ok(format!("{}{}", element_symbol(z)?, a))
}

/// Excitation level of the residual nucleus left by reaction `mt`.
pub fn residual_level(mt: u32) -> u32 {
    match mt {
        51..=90 => mt - 50,
        600..=648 => mt - 600,
        650..=698 => mt - 650,
        700..=748 => mt - 700,
        750..=798 => mt - 750,
        800..=848 => mt - 800,
        _ => 0,
    }
}

/// Identifier of the residual nucleus of reaction `mt`, e.g. `Cl35_e0`.
pub fn residual_id(z: u32, a: u32, mt: u32) -> Result<String, AdapterError> {
    Ok(format!("{}_e{}", nucleus_id(z, a)?, residual_level(mt)))
}
