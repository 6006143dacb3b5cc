use super::sturm::SturmCheck;
use crate::linalg::EigenPair;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

#[cfg(feature = "json_export")]
use json::{object, JsonValue};
#[cfg(feature = "json_export")]
use std::{fs::File, io::BufWriter};

/// The lowest eigenpairs of a GEP, as produced by one of the iterative methods
#[derive(Clone, Debug)]
pub struct ModalSolution {
    /// Eigenvalues in ascending order, with the shift removed
    pub eigenvalues: Vec<f64>,
    /// Mass-normalized mode shapes; column `k` belongs to `eigenvalues[k]`
    pub eigenvectors: DMatrix<f64>,
    /// Number of iterations taken
    pub iterations: usize,
    /// Completeness of the extracted set of modes
    pub sturm: SturmCheck,
}

impl ModalSolution {
    pub fn num_modes(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn num_dofs(&self) -> usize {
        self.eigenvectors.nrows()
    }

    /// Natural frequencies in Hz: `sqrt(w) / 2π`
    pub fn frequencies_hz(&self) -> Vec<f64> {
        self.eigenvalues
            .iter()
            .map(|w| w.sqrt() / (2.0 * PI))
            .collect()
    }

    pub fn mode_shape(&self, mode: usize) -> Option<DVector<f64>> {
        if mode < self.num_modes() {
            Some(self.eigenvectors.column(mode).into_owned())
        } else {
            None
        }
    }

    pub fn eigen_pair(&self, mode: usize) -> Option<EigenPair> {
        self.mode_shape(mode).map(|shape| EigenPair {
            value: self.eigenvalues[mode],
            vector: shape.iter().cloned().collect(),
        })
    }

    /// Iterate over all modes in ascending order
    pub fn eigen_pairs(&self) -> impl Iterator<Item = EigenPair> + '_ {
        (0..self.num_modes()).filter_map(|mode| self.eigen_pair(mode))
    }

    /// Produce a Json Object that describes this solution
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        let modes: Vec<JsonValue> = self
            .eigenvalues
            .iter()
            .zip(self.frequencies_hz())
            .enumerate()
            .map(|(mode, (value, frequency))| {
                object! {
                    "mode": mode,
                    "eigenvalue": *value,
                    "frequency_hz": frequency,
                    "shape": self.eigenvectors.column(mode).iter().cloned().collect::<Vec<f64>>(),
                }
            })
            .collect();

        object! {
            "iterations": self.iterations,
            "modes": JsonValue::from(modes),
            "sturm": object! {
                "threshold": self.sturm.threshold,
                "expected": self.sturm.expected,
                "found": self.sturm.found,
                "complete": self.sturm.is_complete(),
            },
        }
    }

    /// Print the solution to a JSON file specified by path.
    #[cfg(feature = "json_export")]
    pub fn export_to_json(&self, path: impl AsRef<str>) -> std::io::Result<()> {
        let f = File::create(path.as_ref())?;
        let mut w = BufWriter::new(&f);

        self.to_json().write_pretty(&mut w, 4)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solution() -> ModalSolution {
        ModalSolution {
            eigenvalues: vec![(2.0 * PI).powi(2), (6.0 * PI).powi(2)],
            eigenvectors: DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.5]),
            iterations: 3,
            sturm: SturmCheck {
                threshold: 40.0,
                expected: 1,
                found: 1,
                singular_at: None,
            },
        }
    }

    #[test]
    fn frequencies_and_shapes() {
        let sol = solution();

        let f = sol.frequencies_hz();
        assert_relative_eq!(f[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 3.0, epsilon = 1e-12);

        assert_eq!(sol.mode_shape(1).unwrap().as_slice(), &[0.0, 0.5]);
        assert!(sol.mode_shape(2).is_none());

        let pairs: Vec<EigenPair> = sol.eigen_pairs().collect();
        assert_eq!(pairs.len(), 2);
        assert_relative_eq!(pairs[1].frequency_hz(), 3.0, epsilon = 1e-12);
    }

    #[cfg(feature = "json_export")]
    #[test]
    fn json_description() {
        let sol = solution();
        let description = sol.to_json();

        assert_eq!(description["iterations"].as_usize(), Some(3));
        assert_eq!(description["modes"].len(), 2);
        assert_relative_eq!(
            description["modes"][1]["shape"][1].as_f64().unwrap(),
            0.5,
            epsilon = 1e-15
        );
        assert_eq!(description["sturm"]["complete"].as_bool(), Some(true));

        let path = std::env::temp_dir().join("fem_modal_solution.json");
        sol.export_to_json(path.to_string_lossy()).unwrap();
        let parsed = json::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["modes"][0]["mode"].as_usize(), Some(0));
    }
}
