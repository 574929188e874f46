//! Dense complex solves for the channel-space (I − RL)·T = R system and the
//! level-space system of the general R-matrix.

use super::DenseComplexMatrix;
use num_complex::Complex64;

/// Pivots at or below this fraction of the infinity norm of the system are
/// treated as zero.
const RELATIVE_PIVOT_FLOOR: f64 = 1.0e-12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("a non-empty square matrix is required, got {rows}x{cols}")]
    Shape { rows: usize, cols: usize },
    #[error("right-hand side has {actual} rows, expected {expected}")]
    RhsRows { expected: usize, actual: usize },
    #[error("matrix is singular at pivot index {pivot_index}")]
    SingularMatrix { pivot_index: usize },
}

/// Solves A·X = B by Gaussian elimination with partial pivoting, carrying
/// every column of B through the elimination at once.
pub fn solve_matrix(
    matrix: &DenseComplexMatrix,
    rhs: &DenseComplexMatrix,
) -> Result<DenseComplexMatrix, SolveError> {
    let size = matrix.nrows();
    if size == 0 || matrix.ncols() != size {
        return Err(SolveError::Shape {
            rows: size,
            cols: matrix.ncols(),
        });
    }
    if rhs.nrows() != size {
        return Err(SolveError::RhsRows {
            expected: size,
            actual: rhs.nrows(),
        });
    }

    let floor = infinity_norm(matrix) * RELATIVE_PIVOT_FLOOR;
    let columns = rhs.ncols();
    let mut system = matrix.clone();
    let mut solution = rhs.clone();

    for k in 0..size {
        let pivot_row = (k..size)
            .max_by(|&a, &b| system[(a, k)].norm_sqr().total_cmp(&system[(b, k)].norm_sqr()))
            .unwrap_or(k);
        let pivot = system[(pivot_row, k)];
        if pivot.norm() <= floor {
            return Err(SolveError::SingularMatrix { pivot_index: k });
        }
        if pivot_row != k {
            swap_rows(&mut system, k, pivot_row);
            swap_rows(&mut solution, k, pivot_row);
        }

        for row in (k + 1)..size {
            let factor = system[(row, k)] / pivot;
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for col in k..size {
                let updated = system[(row, col)] - factor * system[(k, col)];
                system[(row, col)] = updated;
            }
            for col in 0..columns {
                let updated = solution[(row, col)] - factor * solution[(k, col)];
                solution[(row, col)] = updated;
            }
        }
    }

    for k in (0..size).rev() {
        let diagonal = system[(k, k)];
        for col in 0..columns {
            let mut value = solution[(k, col)];
            for j in (k + 1)..size {
                value -= system[(k, j)] * solution[(j, col)];
            }
            solution[(k, col)] = value / diagonal;
        }
    }
    Ok(solution)
}

fn swap_rows(matrix: &mut DenseComplexMatrix, lhs: usize, rhs: usize) {
    for col in 0..matrix.ncols() {
        let value = matrix[(lhs, col)];
        matrix[(lhs, col)] = matrix[(rhs, col)];
        matrix[(rhs, col)] = value;
    }
}

fn infinity_norm(matrix: &DenseComplexMatrix) -> f64 {
    (0..matrix.nrows())
        .map(|row| (0..matrix.ncols()).map(|col| matrix[(row, col)].norm()).sum::<f64>())
        .fold(0.0, f64::max)
}
