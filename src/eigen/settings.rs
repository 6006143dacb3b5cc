/// Convergence and conditioning controls shared by both iterative methods
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverSettings {
    /// Relative change in the controlling eigenvalue below which iteration stops
    pub tolerance: f64,
    /// `K + shift * M` is iterated on; eigenvalues are reported without the shift
    pub shift: f64,
    /// Iteration ceiling; exceeding it is an error. The Stodola method counts across all modes.
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            shift: 0.0,
            max_iterations: 1000,
        }
    }
}

impl SolverSettings {
    pub fn new(tolerance: f64, shift: f64) -> Self {
        Self {
            tolerance,
            shift,
            ..Default::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
