use crate::linalg::sym_matrix::SymMatrix;
use std::ops::Deref;

/// Holds `K` shifted to `K + shift * M`, restoring it when dropped.
///
/// Restoration subtracts the same multiple of `M`, so `K` returns to its original values up
/// to rounding; a zero shift leaves `K` untouched.
pub struct ShiftGuard<'a> {
    k: &'a mut SymMatrix,
    m: &'a SymMatrix,
    shift: f64,
}

impl<'a> ShiftGuard<'a> {
    pub fn new(k: &'a mut SymMatrix, m: &'a SymMatrix, shift: f64) -> Self {
        if shift != 0.0 {
            k.add_scaled(m, shift);
        }
        Self { k, m, shift }
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }
}

impl Deref for ShiftGuard<'_> {
    type Target = SymMatrix;

    fn deref(&self) -> &SymMatrix {
        &*self.k
    }
}

impl Drop for ShiftGuard<'_> {
    fn drop(&mut self) {
        if self.shift != 0.0 {
            self.k.add_scaled(self.m, -self.shift);
        }
    }
}
