/// Error types for the eigensolvers
pub mod error;
/// Generalized Jacobi iteration for the reduced (dense) eigenproblem
pub mod jacobi;
/// Elementary rotations of symmetric matrices
pub mod rotation;
/// Solver controls
pub mod settings;
/// Scoped shifting of the stiffness matrix
pub mod shift;
/// Eigenvalues, mode shapes, and their export
pub mod solution;
/// Ascending sort of eigenpairs
pub mod sort;
/// Stodola (vector) iteration with deflation
pub mod stodola;
/// Sturm sequence completeness check
pub mod sturm;
/// Sub-space iteration
pub mod subspace;

#[cfg(test)]
pub(crate) mod test_problems;

pub use error::{EigenError, ErrorKind};
pub use settings::SolverSettings;
pub use solution::ModalSolution;
pub use stodola::stodola;
pub use sturm::SturmCheck;
pub use subspace::subspace;

use crate::linalg::sym_matrix::SymMatrix;

/// Iterative method used to extract the lowest modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Simultaneous iteration on a trial sub-space, with Jacobi solutions of the reduced problem
    Subspace,
    /// Inverse vector iteration, one mode at a time, purging lower modes
    Stodola,
}

// Reject invalid problem instances before anything is modified
fn check_problem(
    k: &SymMatrix,
    m: &SymMatrix,
    modes: usize,
    settings: &SolverSettings,
) -> Result<(), EigenError> {
    let SolverSettings {
        tolerance, shift, ..
    } = *settings;
    if !(tolerance >= 0.0 && tolerance.is_finite() && shift.is_finite()) {
        return Err(EigenError::InvalidSettings { tolerance, shift });
    }
    if k.dimension != m.dimension {
        return Err(EigenError::DimensionMismatch {
            stiffness: k.dimension,
            mass: m.dimension,
        });
    }
    if modes == 0 {
        return Err(EigenError::NoModes);
    }
    if modes > k.dimension {
        return Err(EigenError::TooManyModes {
            modes,
            dofs: k.dimension,
        });
    }
    for dof in 0..m.dimension {
        let value = m.diagonal(dof);
        if !(value > 0.0) {
            return Err(EigenError::NonPositiveMass { dof, value });
        }
    }
    Ok(())
}

/// Index of the mode whose convergence governs iteration: `max(m/2, m-8)` counted from one.
///
/// The upper extracted modes converge slowest, so a mode near the top of the set is watched.
fn control_mode(modes: usize) -> usize {
    (modes / 2).max(modes.saturating_sub(8)).max(1) - 1
}

// Remove the shift, keeping the physical eigenvalue positive
fn unshift(w: f64, shift: f64) -> f64 {
    if w > shift {
        w - shift
    } else {
        shift - w
    }
}
