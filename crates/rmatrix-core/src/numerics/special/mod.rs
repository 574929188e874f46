pub mod coulomb;
pub mod hard_sphere;
pub mod linalg;

pub use coulomb::{
    closed_coulomb_wave_functions, coulomb_phase_difference, coulomb_phase_sigma0,
    coulomb_wave_functions, ClosedCoulombWaveFunctions, CoulombError, CoulombInput,
    CoulombWaveFunctions,
};
pub use hard_sphere::{
    closed_hard_sphere_shift_factor, hard_sphere, hard_sphere_penetrability,
    hard_sphere_phase_shift, hard_sphere_shift_factor, HardSphereError, HardSphereFunctions,
};
pub use linalg::{solve_matrix, SolveError};

use faer::Mat;
use num_complex::Complex64;

pub type DenseComplexMatrix = Mat<Complex64>;
