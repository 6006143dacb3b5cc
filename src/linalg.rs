/// Products of symmetric matrices with dense bases
pub mod kernels;
/// L D L' factorization, back substitution, and iterative refinement
pub mod ldl;
/// Use Nalgebra's Eigen decomposition to solve a GEP (small problems only)
pub mod nalgebra_solve;
/// Upper-triangle storage for symmetric matrices
pub mod sym_matrix;

use crate::eigen::{stodola, subspace, EigenError, Method, ModalSolution, SolverSettings};
use nalgebra::DMatrix;
use std::f64::consts::PI;
use sym_matrix::SymMatrix;

/// Generalized Eigenvalue Problem
///
/// Kv = wMv
#[derive(Clone, Debug)]
pub struct GEP {
    /// Stiffness Matrix
    pub k: SymMatrix,
    /// Mass Matrix
    pub m: SymMatrix,
}

impl GEP {
    pub fn new(num_dofs: usize) -> Self {
        Self {
            k: SymMatrix::new(num_dofs),
            m: SymMatrix::new(num_dofs),
        }
    }

    pub fn from_matrices(k: SymMatrix, m: SymMatrix) -> Self {
        assert!(
            k.dimension == m.dimension,
            "Stiffness and Mass matrices have different dimensions; cannot construct GEP!"
        );
        Self { k, m }
    }

    pub fn num_dofs(&self) -> usize {
        self.k.dimension
    }

    /// Extract the lowest `modes` eigenpairs with the selected iterative method
    ///
    /// K is shifted while the solver runs and is restored before this returns.
    pub fn solve(
        &mut self,
        modes: usize,
        method: Method,
        settings: &SolverSettings,
    ) -> Result<ModalSolution, EigenError> {
        match method {
            Method::Subspace => subspace(&mut self.k, &self.m, modes, settings),
            Method::Stodola => stodola(&mut self.k, &self.m, modes, settings),
        }
    }

    pub fn to_nalgebra_dense_mats(&self) -> [DMatrix<f64>; 2] {
        [(&self.k).into(), (&self.m).into()]
    }
}

/// Solution to an Eigenvalue Problem
#[derive(Clone, Debug)]
pub struct EigenPair {
    /// Eigenvalue
    pub value: f64,
    /// Eigenvector
    pub vector: Vec<f64>,
}

impl EigenPair {
    /// Natural frequency in Hz, treating the eigenvalue as a squared circular frequency
    pub fn frequency_hz(&self) -> f64 {
        self.value.sqrt() / (2.0 * PI)
    }

    /// `|| K v - w M v ||` relative to `|| K v ||`
    pub fn residual_norm(&self, k: &SymMatrix, m: &SymMatrix) -> f64 {
        let v = nalgebra::DVector::from_column_slice(&self.vector);
        let kv = k.mul_vec(&v);
        let mv = m.mul_vec(&v);
        (&kv - mv * self.value).norm() / kv.norm()
    }
}
