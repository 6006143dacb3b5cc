use super::shift::ShiftGuard;
use super::sort::eigsort;
use super::sturm::sturm_check;
use super::{check_problem, control_mode, unshift, EigenError, ModalSolution, SolverSettings};
use crate::linalg::{kernels::quad_form, ldl::LdlFactor, sym_matrix::SymMatrix};

use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::f64::consts::PI;

/// Find the lowest `modes` eigenvalues and eigenvectors of `K V = M V diag(w)` by inverse
/// vector iteration on `D = inv(K) M`, one mode at a time.
///
/// Every iterate is purged of the modes already found, so each new mode converges to the
/// lowest remaining eigenvalue. Modes are checked for convergence through their Rayleigh
/// quotients; `settings.max_iterations` bounds the iterations spent on all modes together.
///
/// * `k` - n by n symmetric stiffness matrix; shifted during iteration and restored on return
/// * `m` - n by n symmetric positive definite mass matrix
pub fn stodola(
    k: &mut SymMatrix,
    m: &SymMatrix,
    modes: usize,
    settings: &SolverSettings,
) -> Result<ModalSolution, EigenError> {
    check_problem(k, m, modes, settings)?;
    let n = k.dimension;
    let tol = settings.tolerance;

    let shifted = ShiftGuard::new(k, m, settings.shift);
    let factor = LdlFactor::new(&shifted)?;
    if factor.negative_pivots() > 0 {
        return Err(EigenError::NotPositiveDefinite {
            negative_pivots: factor.negative_pivots(),
        });
    }

    // D = inv(K) M, column by column
    let columns: Vec<DVector<f64>> = (0..n)
        .into_par_iter()
        .map(|j| factor.solve_refined(&shifted, &m.column(j)))
        .collect();
    let d = DMatrix::from_columns(&columns);

    let mut v = DMatrix::zeros(n, modes);
    let mut w = Vec::with_capacity(modes);
    let mut used = vec![false; n];
    let mut total_iterations = 0;

    for mode in 0..modes {
        let dof = dominant_dof(&d, &used);
        used[dof] = true;

        let mut u = DVector::zeros(n);
        u[dof] = 1.0;
        if dof + 1 < n {
            u[dof + 1] = 1.0e-4;
        }
        purify(&mut u, m, &v, mode)?;
        let mut rq = quad_form(&u, &shifted, &u);

        let mut iterations = 0;
        loop {
            let mut x = &d * &u;
            purify(&mut x, m, &v, mode)?;
            u = x;

            let rq_old = rq;
            rq = quad_form(&u, &shifted, &u);
            if rq == 0.0 {
                return Err(EigenError::ZeroFrequency { mode });
            }
            let error = (rq - rq_old).abs() / rq;
            iterations += 1;
            debug!(
                "mode {}  iter = {}  w = {:.6}  error = {:e}",
                mode + 1,
                iterations,
                rq,
                error
            );

            if error <= tol {
                break;
            }
            if total_iterations + iterations > settings.max_iterations {
                return Err(EigenError::NonConvergence {
                    iterations: total_iterations + iterations,
                    error,
                    tolerance: tol,
                });
            }
        }
        total_iterations += iterations;

        v.set_column(mode, &u);
        let value = unshift(rq, settings.shift);
        w.push(value);
        info!(
            "  mode: {:2}\tDoF: {:5}\t {:9.4} Hz\t{:4} iterations",
            mode + 1,
            dof,
            value.sqrt() / (2.0 * PI),
            iterations
        );
    }
    drop(shifted);

    eigsort(&mut w, &mut v);
    info!("{:4} Stodola iterations over {} modes", total_iterations, modes);

    let control = control_mode(modes);
    let sturm = sturm_check(k, m, control + 1, w[control] + tol);

    Ok(ModalSolution {
        eigenvalues: w,
        eigenvectors: v,
        iterations: total_iterations,
        sturm,
    })
}

/// The unused DOF with the largest diagonal entry of `D`; the first one wins a tie
fn dominant_dof(d: &DMatrix<f64>, used: &[bool]) -> usize {
    let mut best: Option<usize> = None;
    for i in (0..used.len()).filter(|&i| !used[i]) {
        match best {
            Some(b) if d[(i, i)] <= d[(b, b)] => {}
            _ => best = Some(i),
        }
    }
    // at most `modes <= n` DOFs are ever taken
    best.unwrap_or(0)
}

/// Mass-normalize `u` and remove its components along the first `found` columns of `v`
fn purify(
    u: &mut DVector<f64>,
    m: &SymMatrix,
    v: &DMatrix<f64>,
    found: usize,
) -> Result<(), EigenError> {
    mass_normalize(u, m, found)?;
    if found > 0 {
        let mu = m.mul_vec(u);
        for j in 0..found {
            let c = v.column(j).dot(&mu);
            u.axpy(-c, &v.column(j), 1.0);
        }
        mass_normalize(u, m, found)?;
    }
    Ok(())
}

fn mass_normalize(u: &mut DVector<f64>, m: &SymMatrix, mode: usize) -> Result<(), EigenError> {
    let norm_squared = quad_form(u, m, u);
    if !(norm_squared > 0.0) || !norm_squared.is_finite() {
        return Err(EigenError::DegenerateVector { mode });
    }
    *u /= norm_squared.sqrt();
    Ok(())
}
