use super::shift::ShiftGuard;
use crate::linalg::ldl::{LdlError, LdlFactor};
use crate::linalg::sym_matrix::SymMatrix;
use log::{info, warn};
use std::f64::consts::PI;

/// Result of a Sturm sequence check
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SturmCheck {
    /// Eigenvalue limit of the check
    pub threshold: f64,
    /// Number of eigenvalues the solver claims lie below the threshold
    pub expected: usize,
    /// Number of eigenvalues that actually lie below the threshold
    pub found: usize,
    /// Row of the zero pivot met when the threshold coincided with an eigenvalue; the count
    /// was then taken just below the threshold
    pub singular_at: Option<usize>,
}

impl SturmCheck {
    pub fn is_complete(&self) -> bool {
        self.found <= self.expected
    }

    /// Number of eigenvalues below the threshold that were not extracted
    pub fn missing(&self) -> usize {
        self.found.saturating_sub(self.expected)
    }

    /// Threshold expressed as a frequency in Hz
    pub fn threshold_hz(&self) -> f64 {
        self.threshold.sqrt() / (2.0 * PI)
    }
}

// relative step below a threshold that coincides with an eigenvalue
const NUDGE: f64 = 1e-12;
const NUDGE_ATTEMPTS: i32 = 4;

/// Count the eigenvalues of `K v = w M v` below `threshold`
///
/// Equal to the number of negative pivots in the L D L' factorization of
/// `K - threshold * M`. `K` is restored before returning. Fails with `ZeroPivot` when
/// `threshold` makes a leading block of `K - threshold * M` singular.
pub fn sturm_count(k: &mut SymMatrix, m: &SymMatrix, threshold: f64) -> Result<usize, LdlError> {
    let shifted = ShiftGuard::new(k, m, -threshold);
    let factor = LdlFactor::new(&shifted)?;
    Ok(factor.negative_pivots())
}

/// Verify that no eigenvalues below `threshold` were missed by a solver that extracted
/// `expected` of them
///
/// A mismatch is reported, not treated as an error. If the threshold lands exactly on an
/// eigenvalue, the count is repeated slightly below it.
pub fn sturm_check(
    k: &mut SymMatrix,
    m: &SymMatrix,
    expected: usize,
    threshold: f64,
) -> SturmCheck {
    let scale = if threshold != 0.0 { threshold.abs() } else { 1.0 };
    let mut singular_at = None;
    let mut limit = threshold;
    let mut attempt = 0;

    let found = loop {
        match sturm_count(k, m, limit) {
            Ok(found) => break found,
            Err(LdlError::ZeroPivot {
                index,
                negative_pivots,
            }) => {
                singular_at = singular_at.or(Some(index));
                if attempt == NUDGE_ATTEMPTS {
                    warn!(
                        "K - {:e} M is singular at row {}; only the leading rows were counted",
                        limit, index
                    );
                    break negative_pivots;
                }
                limit = threshold - scale * NUDGE * 10f64.powi(attempt);
                attempt += 1;
            }
        }
    };

    let check = SturmCheck {
        threshold,
        expected,
        found,
        singular_at,
    };

    if check.is_complete() {
        info!(
            "There are {} modes below {:.6} Hz ... all {} modes were found.",
            check.found,
            check.threshold_hz(),
            expected
        );
    } else {
        warn!(
            "There are {} modes below {:.6} Hz ... {} modes were not found. Try increasing the number of modes in order to get the missing modes below {:.6} Hz.",
            check.found,
            check.threshold_hz(),
            check.missing(),
            check.threshold_hz()
        );
    }

    check
}
