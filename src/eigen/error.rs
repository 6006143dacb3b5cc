use crate::linalg::ldl::LdlError;
use thiserror::Error;

/// Broad classes of solver failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The problem instance is invalid; nothing was modified
    PreconditionViolation,
    /// A rotation or normalization could not be formed, or a zero eigenvalue was found
    NumericalBreakdown,
    /// The iteration ceiling was reached
    NonConvergence,
    /// The shifted stiffness matrix could not be factored as positive definite
    FactorizationFailure,
}

/// Error type for the iterative eigensolvers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EigenError {
    #[error("At least one mode must be requested!")]
    NoModes,
    #[error("Number of modes ({modes}) must not exceed the problem dimension ({dofs})!")]
    TooManyModes { modes: usize, dofs: usize },
    #[error("Stiffness ({stiffness}x{stiffness}) and Mass ({mass}x{mass}) matrices have different dimensions!")]
    DimensionMismatch { stiffness: usize, mass: usize },
    #[error("Solver settings must be finite with a non-negative tolerance: tolerance = {tolerance:e}, shift = {shift:e}")]
    InvalidSettings { tolerance: f64, shift: f64 },
    #[error("Mass matrix diagonal must be positive: M[{dof}][{dof}] = {value:e}")]
    NonPositiveMass { dof: usize, value: f64 },
    #[error("Jacobi rotation of entry ({row}, {col}) broke down!")]
    RotationBreakdown { row: usize, col: usize },
    #[error("Zero frequency found at mode {mode}; check that all rigid body motions are restrained!")]
    ZeroFrequency { mode: usize },
    #[error("Trial vector for mode {mode} vanished after mass normalization!")]
    DegenerateVector { mode: usize },
    #[error("Iteration limit ({iterations}) exceeded; rel. error = {error:e} > {tolerance:e}")]
    NonConvergence {
        iterations: usize,
        error: f64,
        tolerance: f64,
    },
    #[error("Failed to factor the shifted stiffness matrix: {0}")]
    Factorization(#[from] LdlError),
    #[error("Shifted stiffness matrix is not positive definite ({negative_pivots} negative pivots); check that all rigid body motions are restrained!")]
    NotPositiveDefinite { negative_pivots: usize },
}

impl EigenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoModes
            | Self::TooManyModes { .. }
            | Self::DimensionMismatch { .. }
            | Self::NonPositiveMass { .. }
            | Self::InvalidSettings { .. } => ErrorKind::PreconditionViolation,
            Self::RotationBreakdown { .. }
            | Self::ZeroFrequency { .. }
            | Self::DegenerateVector { .. } => ErrorKind::NumericalBreakdown,
            Self::NonConvergence { .. } => ErrorKind::NonConvergence,
            Self::Factorization(_) | Self::NotPositiveDefinite { .. } => {
                ErrorKind::FactorizationFailure
            }
        }
    }
}
