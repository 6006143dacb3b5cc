use nalgebra::DMatrix;

/// Sort eigenvalues into ascending order, rearranging the columns of `v` to match.
///
/// Straight selection with a strict comparison, so sorting a sorted set changes nothing.
pub fn eigsort(e: &mut [f64], v: &mut DMatrix<f64>) {
    assert_eq!(e.len(), v.ncols());
    let m = e.len();

    for i in 0..m.saturating_sub(1) {
        let mut k = i;
        for j in (i + 1)..m {
            if e[j] < e[k] {
                k = j;
            }
        }
        if k != i {
            e.swap(i, k);
            v.swap_columns(i, k);
        }
    }
}
