//! Modal analysis of discretized structures.
//!
//! Extracts the lowest natural frequencies and mode shapes of the generalized
//! symmetric eigenproblem `K v = w M v`, where `K` is a stiffness matrix and `M`
//! is a positive definite mass matrix.
//!
//! ```no_run
//! use fem_modal::{Method, SolverSettings, GEP};
//!
//! let mut gep = GEP::new(3);
//! for i in 0..3 {
//!     gep.k.insert([i, i], 2.0);
//!     gep.m.insert([i, i], 1.0);
//! }
//! gep.k.insert([0, 1], -1.0);
//! gep.k.insert([1, 2], -1.0);
//!
//! let settings = SolverSettings::default().with_tolerance(1e-10);
//! let solution = gep.solve(2, Method::Subspace, &settings).unwrap();
//! println!("{:?}", solution.frequencies_hz());
//! ```

/// Iterative extraction of the lowest eigenpairs of a Generalized Eigenvalue Problem
pub mod eigen;
/// Symmetric storage, kernels, and linear solvers
pub mod linalg;

pub use eigen::{
    stodola, subspace, EigenError, ErrorKind, Method, ModalSolution, SolverSettings, SturmCheck,
};
pub use linalg::{sym_matrix::SymMatrix, EigenPair, GEP};
