use crate::linalg::{nalgebra_solve::nalgebra_solve_gep, sym_matrix::SymMatrix, EigenPair, GEP};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Fixed-fixed chain of unit springs and unit masses
pub fn uniform_chain(n: usize) -> (SymMatrix, SymMatrix) {
    let mut k = SymMatrix::new(n);
    for i in 0..n {
        k.insert([i, i], 2.0);
        if i + 1 < n {
            k.insert([i, i + 1], -1.0);
        }
    }
    (k, SymMatrix::identity(n))
}

/// Eigenvalues of [uniform_chain], ascending
pub fn uniform_chain_spectrum(n: usize) -> Vec<f64> {
    (1..=n)
        .map(|k| 2.0 - 2.0 * (k as f64 * PI / (n as f64 + 1.0)).cos())
        .collect()
}

/// Fixed-free chain with graded springs and masses, and a consistent (coupled) mass matrix
pub fn spring_chain(n: usize) -> (SymMatrix, SymMatrix) {
    let mut k = SymMatrix::new(n);
    let mut m = SymMatrix::new(n);
    for e in 0..n {
        let stiffness = 100.0 * (1.0 + 0.1 * e as f64);
        let mass = 1.0 + 0.05 * e as f64;

        // element e joins DOF e-1 (or the ground) to DOF e
        k.insert([e, e], stiffness);
        m.insert([e, e], mass / 3.0);
        if e > 0 {
            k.insert([e - 1, e - 1], stiffness);
            k.insert([e - 1, e], -stiffness);
            m.insert([e - 1, e - 1], mass / 3.0);
            m.insert([e - 1, e], mass / 6.0);
        }
    }
    (k, m)
}

pub fn dense_reference(k: &SymMatrix, m: &SymMatrix, modes: usize) -> Vec<EigenPair> {
    nalgebra_solve_gep(&GEP::from_matrices(k.clone(), m.clone()), modes)
        .expect("reference problem should be solvable densely")
}

/// `V' M V`
pub fn mass_gram(m: &SymMatrix, v: &DMatrix<f64>) -> DMatrix<f64> {
    let m_dense: DMatrix<f64> = m.into();
    v.transpose() * m_dense * v
}

/// `|| K v - w M v || / || K v ||`
pub fn relative_residual(k: &SymMatrix, m: &SymMatrix, value: f64, v: &DVector<f64>) -> f64 {
    let kv = k.mul_vec(v);
    (&kv - m.mul_vec(v) * value).norm() / kv.norm()
}
