use super::jacobi::jacobi;
use super::shift::ShiftGuard;
use super::sort::eigsort;
use super::sturm::sturm_check;
use super::{check_problem, control_mode, unshift, EigenError, ModalSolution, SolverSettings};
use crate::linalg::{kernels, ldl::LdlFactor, sym_matrix::SymMatrix};

use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::f64::consts::PI;

/// Find the lowest `modes` eigenvalues and eigenvectors of `K V = M V diag(w)` using
/// sub-space iteration with Jacobi solutions of the reduced problem
///
/// * `k` - n by n symmetric stiffness matrix; shifted during iteration and restored on return
/// * `m` - n by n symmetric positive definite mass matrix
///
/// Bathe, Finite Element Procedures in Engineering Analysis, Ch. 12
pub fn subspace(
    k: &mut SymMatrix,
    m: &SymMatrix,
    modes: usize,
    settings: &SolverSettings,
) -> Result<ModalSolution, EigenError> {
    check_problem(k, m, modes, settings)?;
    let n = k.dimension;
    let control = control_mode(modes);
    let tol = settings.tolerance;

    let shifted = ShiftGuard::new(k, m, settings.shift);
    let factor = LdlFactor::new(&shifted)?;
    if factor.negative_pivots() > 0 {
        return Err(EigenError::NotPositiveDefinite {
            negative_pivots: factor.negative_pivots(),
        });
    }

    let ratios: Vec<f64> = (0..n)
        .map(|i| shifted.diagonal(i) / m.diagonal(i))
        .collect();
    let start_dofs = lowest_ratio_dofs(&ratios, modes);
    let mut v = initial_basis(n, &start_dofs);

    let mut w_old = 0.0;
    let mut iterations = 0;
    let (mut w, error) = loop {
        // K Xb = M V
        let columns: Vec<DVector<f64>> = (0..modes)
            .into_par_iter()
            .map(|col| factor.solve_refined(&shifted, &kernels::sym_mul_col(m, &v, col)))
            .collect();
        let xb = DMatrix::from_columns(&columns);

        let mut kb = kernels::congruence(&shifted, &xb);
        let mut mb = kernels::congruence(m, &xb);

        let (mut w, qb) = jacobi(&mut kb, &mut mb)?;
        v = &xb * qb;

        eigsort(&mut w, &mut v);

        if w[control] == 0.0 {
            return Err(EigenError::ZeroFrequency { mode: control });
        }
        let error = (w[control] - w_old).abs() / w[control];
        iterations += 1;
        debug!(
            "iter = {}  w[{}] = {:.6}  error = {:e}",
            iterations, control, w[control], error
        );
        w_old = w[control];

        if error <= tol {
            break (w, error);
        }
        if iterations > settings.max_iterations {
            return Err(EigenError::NonConvergence {
                iterations,
                error,
                tolerance: tol,
            });
        }
    };
    drop(shifted);

    for w_k in w.iter_mut() {
        *w_k = unshift(*w_k, settings.shift);
    }

    info!("{:4} sub-space iterations,   error: {:.4e}", iterations, error);
    for (mode, (w_k, dof)) in w.iter().zip(start_dofs.iter()).enumerate() {
        info!(
            "  mode: {:2}\tDoF: {:5}\t {:9.4} Hz",
            mode + 1,
            dof,
            w_k.sqrt() / (2.0 * PI)
        );
    }

    let sturm = sturm_check(k, m, control + 1, w[control] + tol);

    Ok(ModalSolution {
        eigenvalues: w,
        eigenvectors: v,
        iterations,
        sturm,
    })
}

/// The `count` degrees of freedom with the smallest `K[i][i] / M[i][i]`; these dominate the
/// lowest modes.
fn lowest_ratio_dofs(ratios: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ratios.len()).collect();
    order.sort_by(|a, b| ratios[*a].total_cmp(&ratios[*b]));
    order.truncate(count);
    order
}

/// Unit vectors on each starting DOF, each perturbed on two nearby DOFs so the initial
/// sub-space is not singular
fn initial_basis(n: usize, dofs: &[usize]) -> DMatrix<f64> {
    let mut v = DMatrix::zeros(n, dofs.len());
    for (col, &dof) in dofs.iter().enumerate() {
        v[(dof, col)] = 1.0;

        let offsets: [isize; 2] = match (dof + 1) % 6 {
            1 | 4 => [1, 2],
            2 | 5 => [-1, 1],
            _ => [-1, -2],
        };
        for offset in offsets {
            match dof.checked_add_signed(offset) {
                Some(row) if row < n => v[(row, col)] = 0.2,
                _ => {}
            }
        }
    }
    v
}
