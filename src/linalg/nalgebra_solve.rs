use super::{EigenPair, GEP};
use nalgebra::{Cholesky, SymmetricEigen};
use thiserror::Error;

const MAX_DENSE_SIZE: usize = 1000;

/// Dense reference solution of a GEP using Nalgebra's Cholesky and Symmetric Eigen decompositions
///
/// Returns the lowest `modes` eigenpairs in ascending order, with mass-normalized eigenvectors.
///
/// The problem is reduced to the standard form `L⁻¹ K L⁻ᵀ y = w y` with `M = L Lᵀ`, which
/// needs the whole problem in memory and fails outright if M is ill-conditioned.
/// It is intended for checking the iterative solvers on small problems.
pub fn nalgebra_solve_gep(gep: &GEP, modes: usize) -> Result<Vec<EigenPair>, NalgebraGEPError> {
    let n = gep.k.dimension;
    if n > MAX_DENSE_SIZE {
        return Err(NalgebraGEPError::ProblemTooLarge);
    }
    if modes > n {
        return Err(NalgebraGEPError::TooManyModes { modes, dofs: n });
    }

    let [k_mat, m_mat] = gep.to_nalgebra_dense_mats();
    let l = Cholesky::new(m_mat)
        .ok_or(NalgebraGEPError::FailedToFactorM)?
        .l();

    let l_inv_k = l
        .solve_lower_triangular(&k_mat)
        .ok_or(NalgebraGEPError::FailedToFactorM)?;
    let reduced = l
        .solve_lower_triangular(&l_inv_k.transpose())
        .ok_or(NalgebraGEPError::FailedToFactorM)?;
    let reduced = (&reduced + reduced.transpose()) * 0.5;

    let decomp = SymmetricEigen::new(reduced);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| decomp.eigenvalues[*a].total_cmp(&decomp.eigenvalues[*b]));

    order
        .into_iter()
        .take(modes)
        .map(|idx| -> Result<EigenPair, NalgebraGEPError> {
            let y = decomp.eigenvectors.column(idx).into_owned();
            let v = l
                .tr_solve_lower_triangular(&y)
                .ok_or(NalgebraGEPError::FailedToFactorM)?;
            Ok(EigenPair {
                value: decomp.eigenvalues[idx],
                vector: v.iter().cloned().collect(),
            })
        })
        .collect()
}

/// Error type for the dense reference solver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NalgebraGEPError {
    #[error("Failed to factor the M-matrix (via cholesky); it is not positive definite!")]
    FailedToFactorM,
    #[error("Matrices Exceeded Maximum Size (1000x1000); Cannot Solve!")]
    ProblemTooLarge,
    #[error("Requested {modes} modes from a problem with {dofs} degrees of freedom!")]
    TooManyModes { modes: usize, dofs: usize },
}
