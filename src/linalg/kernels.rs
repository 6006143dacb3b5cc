//! Products of symmetric matrices with dense bases.
//!
//! Conformable dimensions are a precondition of every function here.

use super::sym_matrix::SymMatrix;
use nalgebra::{DMatrix, DVector};

/// `u = A * B[:, col]` for symmetric `A`
pub fn sym_mul_col(a: &SymMatrix, b: &DMatrix<f64>, col: usize) -> DVector<f64> {
    let n = a.dimension;
    DVector::from_iterator(
        n,
        (0..n).map(|i| (0..n).map(|k| a.get([i, k]) * b[(k, col)]).sum::<f64>()),
    )
}

/// `C = X' A X` for symmetric `A` (N by N) and `X` (N by J)
///
/// `C[i][j]` and `C[j][i]` are averaged so the result is exactly symmetric.
pub fn congruence(a: &SymMatrix, x: &DMatrix<f64>) -> SymMatrix {
    let [n, j] = [x.nrows(), x.ncols()];
    assert_eq!(a.dimension, n);

    let mut ax = DMatrix::zeros(n, j);
    for (col, x_col) in x.column_iter().enumerate() {
        ax.set_column(col, &a.mul_vec(&x_col.into_owned()));
    }
    let c = x.tr_mul(&ax);

    let mut c_sym = SymMatrix::new(j);
    for col in 0..j {
        for row in 0..=col {
            c_sym.set([row, col], 0.5 * (c[(row, col)] + c[(col, row)]));
        }
    }
    c_sym
}

/// `x' A y` for symmetric `A`
pub fn quad_form(x: &DVector<f64>, a: &SymMatrix, y: &DVector<f64>) -> f64 {
    x.dot(&a.mul_vec(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stiffness() -> SymMatrix {
        let mut a = SymMatrix::new(4);
        a.insert_group(vec![
            ([0, 0], 3.0),
            ([1, 1], 2.0),
            ([2, 2], 5.0),
            ([3, 3], 1.0),
            ([0, 1], -1.0),
            ([1, 2], 0.75),
            ([0, 3], 0.125),
        ]);
        a
    }

    fn basis() -> DMatrix<f64> {
        DMatrix::from_row_slice(4, 2, &[1.0, 0.5, -0.25, 1.0, 0.3, 0.0, 2.0, -1.5])
    }

    #[test]
    fn column_product() {
        let a = stiffness();
        let b = basis();
        let dense: DMatrix<f64> = (&a).into();

        let u = sym_mul_col(&a, &b, 1);
        let expected = &dense * b.column(1);
        for i in 0..4 {
            assert_relative_eq!(u[i], expected[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn congruence_is_symmetric_and_correct() {
        let a = stiffness();
        let x = basis();
        let dense: DMatrix<f64> = (&a).into();

        let c = congruence(&a, &x);
        let expected = x.transpose() * dense * &x;

        assert_eq!(c.dimension, 2);
        for r in 0..2 {
            for col in 0..2 {
                assert_relative_eq!(c.get([r, col]), expected[(r, col)], epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn quadratic_form() {
        let a = stiffness();
        let x = DVector::from_vec(vec![1.0, 0.0, 0.0, 1.0]);
        let y = DVector::from_vec(vec![0.0, 1.0, 0.0, 0.0]);

        assert_relative_eq!(quad_form(&x, &a, &y), -1.0);
        assert_relative_eq!(quad_form(&x, &a, &x), 3.0 + 1.0 + 2.0 * 0.125);
        assert_relative_eq!(quad_form(&y, &a, &x), quad_form(&x, &a, &y));
    }
}
