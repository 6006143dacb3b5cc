use nalgebra::{DMatrix, DVector};

/// Dense storage for square-symmetric matrices; only the upper triangle is kept.
///
/// Entries are addressed with `[row, col]` pairs in either order; `[r, c]` and `[c, r]`
/// always refer to the same value.
#[derive(Clone, Debug, PartialEq)]
pub struct SymMatrix {
    /// Size of the square matrix
    pub dimension: usize,
    /// Packed upper triangle, column by column
    entries: Vec<f64>,
}

impl SymMatrix {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: vec![0.0; dimension * (dimension + 1) / 2],
        }
    }

    pub fn identity(dimension: usize) -> Self {
        Self::from_diagonal(&vec![1.0; dimension])
    }

    pub fn from_diagonal(diagonal: &[f64]) -> Self {
        let mut sm = Self::new(diagonal.len());
        for (i, value) in diagonal.iter().enumerate() {
            sm.set([i, i], *value);
        }
        sm
    }

    #[inline]
    fn index(&self, [row_idx, col_idx]: [usize; 2]) -> usize {
        assert!(
            row_idx < self.dimension,
            "row_idx exceeded matrix dimension; cannot access value!"
        );
        assert!(
            col_idx < self.dimension,
            "col_idx exceeded matrix dimension; cannot access value!"
        );

        let (r, c) = if row_idx <= col_idx {
            (row_idx, col_idx)
        } else {
            (col_idx, row_idx)
        };
        c * (c + 1) / 2 + r
    }

    #[inline]
    pub fn get(&self, coordinates: [usize; 2]) -> f64 {
        self.entries[self.index(coordinates)]
    }

    /// Overwrite a value. Assumes symmetry: row/col order does not matter.
    #[inline]
    pub fn set(&mut self, coordinates: [usize; 2], value: f64) {
        let idx = self.index(coordinates);
        self.entries[idx] = value;
    }

    /// Add a value into the matrix. Assumes symmetry: row/col order does not matter.
    pub fn insert(&mut self, coordinates: [usize; 2], value: f64) {
        let idx = self.index(coordinates);
        self.entries[idx] += value;
    }

    /// Insert a group of entries
    pub fn insert_group(&mut self, mut entry_group: Vec<([usize; 2], f64)>) {
        for (rc, value) in entry_group.drain(0..) {
            self.insert(rc, value);
        }
    }

    pub fn diagonal(&self, i: usize) -> f64 {
        self.get([i, i])
    }

    /// `self += alpha * other`
    pub fn add_scaled(&mut self, other: &Self, alpha: f64) {
        assert!(
            self.dimension == other.dimension,
            "Symmetric Matrices have different dimensions; cannot add!"
        );
        for (a, b) in self.entries.iter_mut().zip(other.entries.iter()) {
            *a += alpha * b;
        }
    }

    /// Matrix-vector product, reading only the stored triangle
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(self.dimension, x.len());
        let mut y = DVector::zeros(self.dimension);
        for ([r, c], value) in self.iter_upper_tri() {
            y[r] += value * x[c];
            if r != c {
                y[c] += value * x[r];
            }
        }
        y
    }

    /// A full column of the matrix
    pub fn column(&self, col_idx: usize) -> DVector<f64> {
        DVector::from_iterator(
            self.dimension,
            (0..self.dimension).map(|r| self.get([r, col_idx])),
        )
    }

    /// Iterate over the upper triangle of the matrix.
    pub fn iter_upper_tri(&self) -> impl Iterator<Item = ([usize; 2], f64)> + '_ {
        (0..self.dimension)
            .flat_map(|c| (0..=c).map(move |r| [r, c]))
            .zip(self.entries.iter().copied())
    }
}

impl From<SymMatrix> for DMatrix<f64> {
    fn from(sm: SymMatrix) -> Self {
        DMatrix::from(&sm)
    }
}

impl From<&SymMatrix> for DMatrix<f64> {
    fn from(sm: &SymMatrix) -> Self {
        DMatrix::from_fn(sm.dimension, sm.dimension, |r, c| sm.get([r, c]))
    }
}

/// Takes the upper triangle of a square matrix; the lower triangle is ignored.
impl From<&DMatrix<f64>> for SymMatrix {
    fn from(mat: &DMatrix<f64>) -> Self {
        assert!(mat.is_square(), "Matrix must be square to be stored symmetrically!");
        let mut sm = Self::new(mat.nrows());
        for c in 0..mat.ncols() {
            for r in 0..=c {
                sm.set([r, c], mat[(r, c)]);
            }
        }
        sm
    }
}
