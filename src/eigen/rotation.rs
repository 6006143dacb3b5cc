use crate::linalg::sym_matrix::SymMatrix;

/// Rotate a symmetric matrix such that `A[i][j] = A[j][i] = 0`
///
/// `A = P' A P` where `diag(P) = 1`, `P[i][j] = alpha`, and `P[j][i] = beta`. Since P is
/// sparse, only rows/columns `i` and `j` change.
pub fn rotate(a: &mut SymMatrix, alpha: f64, beta: f64, i: usize, j: usize) {
    let n = a.dimension;
    let a_i: Vec<f64> = (0..n).map(|k| a.get([i, k])).collect();
    let a_j: Vec<f64> = (0..n).map(|k| a.get([j, k])).collect();

    let [a_ii, a_jj, a_ij] = [a_i[i], a_j[j], a_i[j]];

    a.set([i, i], a_ii + 2.0 * beta * a_ij + beta * beta * a_jj);
    a.set([j, j], a_jj + 2.0 * alpha * a_ij + alpha * alpha * a_ii);

    for k in (0..n).filter(|&k| k != i && k != j) {
        a.set([k, i], a_i[k] + beta * a_j[k]);
        a.set([k, j], a_j[k] + alpha * a_i[k]);
    }
    a.set([i, j], 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::jacobi::rotation_coefficients;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn explicit_rotation(a: &SymMatrix, alpha: f64, beta: f64, i: usize, j: usize) -> DMatrix<f64> {
        let mut p = DMatrix::identity(a.dimension, a.dimension);
        p[(i, j)] = alpha;
        p[(j, i)] = beta;
        let dense: DMatrix<f64> = a.into();
        p.transpose() * dense * p
    }

    #[test]
    fn zeroes_target_pair_of_both_matrices() {
        let mut k = SymMatrix::from_diagonal(&[4.0, 6.0, 3.0]);
        k.insert_group(vec![([0, 1], -2.0), ([1, 2], 1.0), ([0, 2], 0.5)]);
        let mut m = SymMatrix::from_diagonal(&[2.0, 1.0, 1.5]);
        m.insert_group(vec![([0, 2], 0.25), ([1, 2], 0.1)]);

        let (i, j) = (0, 2);
        let (alpha, beta) = rotation_coefficients(&k, &m, i, j).unwrap();

        let k_expected = explicit_rotation(&k, alpha, beta, i, j);
        let m_expected = explicit_rotation(&m, alpha, beta, i, j);

        rotate(&mut k, alpha, beta, i, j);
        rotate(&mut m, alpha, beta, i, j);

        assert_eq!(k.get([i, j]), 0.0);
        assert_eq!(k.get([j, i]), 0.0);
        assert_eq!(m.get([i, j]), 0.0);

        for r in 0..3 {
            for c in 0..3 {
                assert_relative_eq!(k.get([r, c]), k_expected[(r, c)], epsilon = 1e-12);
                assert_relative_eq!(m.get([r, c]), m_expected[(r, c)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn untouched_rows_are_preserved() {
        let mut a = SymMatrix::from_diagonal(&[1.0, 2.0, 3.0, 4.0]);
        a.insert_group(vec![([0, 1], 0.5), ([2, 3], -0.75), ([1, 3], 0.2)]);
        let before = a.clone();

        rotate(&mut a, 0.1, -0.3, 0, 1);

        assert_eq!(a.get([2, 2]), before.get([2, 2]));
        assert_eq!(a.get([2, 3]), before.get([2, 3]));
        assert_eq!(a.get([3, 3]), before.get([3, 3]));
        assert_eq!(a.get([0, 1]), 0.0);
    }
}
