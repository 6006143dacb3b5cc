use super::sym_matrix::SymMatrix;
use log::trace;
use nalgebra::DVector;
use thiserror::Error;

/// Error type for the LDL' factorization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LdlError {
    /// `negative_pivots` counts the negative pivots of the rows before `index`
    #[error("zero pivot found on the diagonal of D at row {index}; matrix is singular")]
    ZeroPivot {
        index: usize,
        negative_pivots: usize,
    },
}

/// L D L' decomposition of a symmetric matrix, computed without pivoting.
///
/// Leading zeros in each column of the upper triangle (the matrix "skyline") are skipped,
/// so banded stiffness matrices factor in proportion to their profile.
#[derive(Clone, Debug)]
pub struct LdlFactor {
    dimension: usize,
    /// strict lower triangle of L, packed row by row
    lower: Vec<f64>,
    /// diagonal of D
    pivots: Vec<f64>,
    /// first structurally non-zero column in each row of L
    skyline: Vec<usize>,
    negative_pivots: usize,
}

impl LdlFactor {
    /// Forward reduction of `a` into `L D L'`
    ///
    /// The number of negative entries in `D` is retained; by Sylvester's law of inertia
    /// it equals the number of negative eigenvalues of `a`.
    pub fn new(a: &SymMatrix) -> Result<Self, LdlError> {
        let n = a.dimension;
        let mut factor = Self {
            dimension: n,
            lower: vec![0.0; n * n.saturating_sub(1) / 2],
            pivots: vec![0.0; n],
            skyline: vec![0; n],
            negative_pivots: 0,
        };

        for j in 0..n {
            let first = (0..j).find(|&i| a.get([i, j]) != 0.0).unwrap_or(j);
            factor.skyline[j] = first;

            // un-scaled row j of L (L D)
            for i in first..j {
                let mut g = a.get([i, j]);
                for k in first.max(factor.skyline[i])..i {
                    g -= factor.l(j, k) * factor.l(i, k);
                }
                *factor.l_mut(j, i) = g;
            }

            let mut d = a.get([j, j]);
            for i in first..j {
                d -= factor.l(j, i).powi(2) / factor.pivots[i];
            }
            for i in first..j {
                *factor.l_mut(j, i) /= factor.pivots[i];
            }

            if d == 0.0 {
                return Err(LdlError::ZeroPivot {
                    index: j,
                    negative_pivots: factor.negative_pivots,
                });
            }
            if d < 0.0 {
                factor.negative_pivots += 1;
            }
            factor.pivots[j] = d;
        }

        Ok(factor)
    }

    #[inline]
    fn l(&self, row: usize, col: usize) -> f64 {
        self.lower[row * (row - 1) / 2 + col]
    }

    #[inline]
    fn l_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.lower[row * (row - 1) / 2 + col]
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of negative pivots in D
    pub fn negative_pivots(&self) -> usize {
        self.negative_pivots
    }

    /// Diagonal of D
    pub fn pivots(&self) -> &[f64] {
        &self.pivots
    }

    /// Back substitution for `x` in `A x = b`; the factorization is preserved.
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        assert_eq!(b.len(), self.dimension);
        let mut x = b.clone();

        for i in 0..self.dimension {
            for j in self.skyline[i]..i {
                x[i] -= self.l(i, j) * x[j];
            }
        }

        for i in 0..self.dimension {
            x[i] /= self.pivots[i];
        }

        for i in (1..self.dimension).rev() {
            for j in self.skyline[i]..i {
                x[j] -= self.l(i, j) * x[i];
            }
        }

        x
    }

    /// One step of iterative refinement of `x` in `A x = b`, where `a` is the matrix this
    /// factorization was computed from.
    ///
    /// The correction is applied only if its RMS value is below 90% of `rms_resid`, in which
    /// case `rms_resid` is updated and `true` is returned.
    pub fn refine(
        &self,
        a: &SymMatrix,
        b: &DVector<f64>,
        x: &mut DVector<f64>,
        rms_resid: &mut f64,
    ) -> bool {
        let resid = b - a.mul_vec(x);
        let correction = self.solve(&resid);
        let rms_resid_new = (correction.norm_squared() / self.dimension as f64).sqrt();

        if rms_resid_new / *rms_resid < 0.90 {
            *x += correction;
            *rms_resid = rms_resid_new;
            true
        } else {
            false
        }
    }

    /// Solve `A x = b` and refine the solution until refinement stops improving it.
    pub fn solve_refined(&self, a: &SymMatrix, b: &DVector<f64>) -> DVector<f64> {
        let mut x = self.solve(b);
        let mut rms_resid = 1.0;
        let mut steps = 0;
        while self.refine(a, b, &mut x, &mut rms_resid) {
            steps += 1;
        }
        trace!("{} refinement steps; RMS correction: {:9.2e}", steps, rms_resid);
        x
    }
}
