use super::rotation::rotate;
use super::EigenError;
use crate::linalg::sym_matrix::SymMatrix;
use nalgebra::DMatrix;

/// Find all eigenvalues and eigenvectors of `K V = M V diag(E)` using generalized Jacobi
/// iteration
///
/// `K` is symmetric and `M` is symmetric positive definite, both of order n. Both are
/// diagonalized in place. Eigenvalues are returned in diagonal order (unsorted) along with
/// an n by n matrix of mass-normalized eigenvectors.
///
/// `2n` sweeps are made over the upper diagonals. Every pair with a non-zero coupling in
/// `K` or `M` is rotated on every sweep; there is no early exit.
pub fn jacobi(k: &mut SymMatrix, m: &mut SymMatrix) -> Result<(Vec<f64>, DMatrix<f64>), EigenError> {
    let n = k.dimension;
    assert_eq!(n, m.dimension);
    let mut v = DMatrix::identity(n, n);

    for _sweep in 0..(2 * n) {
        for d in 1..n {
            for i in 0..(n - d) {
                let j = i + d;

                let k_ij = k.get([i, j]);
                let m_ij = m.get([i, j]);

                if k_ij * k_ij / (k.get([i, i]) * k.get([j, j])) > 0.0
                    || m_ij * m_ij / (m.get([i, i]) * m.get([j, j])) > 0.0
                {
                    let (alpha, beta) = rotation_coefficients(k, m, i, j)?;

                    rotate(k, alpha, beta, i, j);
                    rotate(m, alpha, beta, i, j);

                    // V = V * P
                    for row in 0..n {
                        let v_ri = v[(row, i)];
                        let v_rj = v[(row, j)];
                        v[(row, i)] = v_ri + beta * v_rj;
                        v[(row, j)] = v_rj + alpha * v_ri;
                    }
                }
            }
        }
    }

    for (col, mut v_col) in v.column_iter_mut().enumerate() {
        v_col /= m.get([col, col]).sqrt();
    }

    let eigenvalues = (0..n).map(|j| k.get([j, j]) / m.get([j, j])).collect();

    Ok((eigenvalues, v))
}

/// Coefficients `(alpha, beta)` of the rotation that zeroes the `(i, j)` entries of both
/// `K` and `M`
///
/// The sign of the discriminant term follows `s` to avoid cancellation. When `gamma`
/// vanishes, one of the two coupling terms is zero and the corresponding single-sided
/// rotation is used instead.
pub fn rotation_coefficients(
    k: &SymMatrix,
    m: &SymMatrix,
    i: usize,
    j: usize,
) -> Result<(f64, f64), EigenError> {
    let [k_ii, k_jj, k_ij] = [k.get([i, i]), k.get([j, j]), k.get([i, j])];
    let [m_ii, m_jj, m_ij] = [m.get([i, i]), m.get([j, j]), m.get([i, j])];

    let k_bar_i = k_ii * m_ij - k_ij * m_ii;
    let k_bar_j = k_jj * m_ij - k_ij * m_jj;
    let s = k_ii * m_jj - k_jj * m_ii;

    let root = (0.25 * s * s + k_bar_i * k_bar_j).sqrt();
    let gamma = if s >= 0.0 { 0.5 * s + root } else { 0.5 * s - root };

    let (alpha, beta) = if gamma != 0.0 {
        (k_bar_j / gamma, -k_bar_i / gamma)
    } else if k_bar_j == 0.0 {
        (0.0, -m_ij / m_jj)
    } else {
        (-m_ij / m_ii, 0.0)
    };

    if alpha.is_finite() && beta.is_finite() {
        Ok((alpha, beta))
    } else {
        Err(EigenError::RotationBreakdown { row: i, col: j })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::test_problems::{dense_reference, spring_chain};
    use approx::assert_relative_eq;

    fn sorted(mut values: Vec<f64>) -> Vec<f64> {
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    #[test]
    fn diagonal_problem_needs_no_rotation() {
        let mut k = SymMatrix::from_diagonal(&[4.0, 1.0, 9.0]);
        let mut m = SymMatrix::from_diagonal(&[1.0, 1.0, 4.0]);

        let (values, vectors) = jacobi(&mut k, &mut m).unwrap();

        assert_eq!(values, vec![4.0, 1.0, 2.25]);
        assert_eq!(vectors[(2, 2)], 0.5);
        assert_eq!(vectors[(0, 1)], 0.0);
    }

    #[test]
    fn matches_dense_reference() {
        let (k, m) = spring_chain(6);
        let reference = dense_reference(&k, &m, 6);

        let [k_dense, m_dense]: [DMatrix<f64>; 2] = [(&k).into(), (&m).into()];
        let (mut k_rot, mut m_rot) = (k.clone(), m.clone());
        let (values, vectors) = jacobi(&mut k_rot, &mut m_rot).unwrap();

        for (computed, expected) in sorted(values.clone()).iter().zip(reference.iter()) {
            assert_relative_eq!(*computed, expected.value, max_relative = 1e-10);
        }

        // V' M V = I and V' K V = diag(E)
        let vmv = vectors.transpose() * &m_dense * &vectors;
        let vkv = vectors.transpose() * &k_dense * &vectors;
        for r in 0..6 {
            for c in 0..6 {
                let identity = if r == c { 1.0 } else { 0.0 };
                let spectrum = if r == c { values[r] } else { 0.0 };
                assert_relative_eq!(vmv[(r, c)], identity, epsilon = 1e-10);
                assert_relative_eq!(vkv[(r, c)], spectrum, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn proportional_block_is_mass_orthogonalized() {
        // K = 3 M: a repeated eigenvalue, where gamma vanishes
        let mut m = SymMatrix::from_diagonal(&[2.0, 1.0]);
        m.set([0, 1], 0.5);
        let mut k = m.clone();
        k.add_scaled(&m, 2.0);
        let m_dense: DMatrix<f64> = (&m).into();

        let (values, vectors) = jacobi(&mut k, &mut m).unwrap();

        assert_relative_eq!(values[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 3.0, epsilon = 1e-12);
        let vmv = vectors.transpose() * m_dense * &vectors;
        assert_relative_eq!(vmv[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(vmv[(1, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_positive_mass_breaks_down() {
        let k = SymMatrix::from_diagonal(&[1.0, -1.0]);
        let mut m = SymMatrix::new(2);
        m.set([0, 1], 1.0);

        assert_eq!(
            rotation_coefficients(&k, &m, 0, 1).unwrap_err(),
            EigenError::RotationBreakdown { row: 0, col: 1 }
        );
    }
}
