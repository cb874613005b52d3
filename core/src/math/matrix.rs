use ndarray::{Array1, Array2};

use crate::prelude::{PipelineError, PipelineResult};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Least-squares solution of `A x = y` for a tall two-column `A`,
    /// via the 2x2 normal equations.
    pub fn lstsq2(a: &Array2<f64>, y: &Array1<f64>) -> PipelineResult<[f64; 2]> {
        if a.ncols() != 2 || a.nrows() != y.len() || a.nrows() == 0 {
            return Err(PipelineError::Internal(format!(
                "lstsq2 expects a non-empty {}x2 system, got {}x{}",
                y.len(),
                a.nrows(),
                a.ncols()
            )));
        }

        let ata = a.t().dot(a);
        let aty = a.t().dot(y);
        let det = ata[[0, 0]] * ata[[1, 1]] - ata[[0, 1]] * ata[[1, 0]];
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(PipelineError::Internal(
                "singular normal matrix in least-squares fit".into(),
            ));
        }

        let x0 = (aty[0] * ata[[1, 1]] - aty[1] * ata[[0, 1]]) / det;
        let x1 = (ata[[0, 0]] * aty[1] - ata[[1, 0]] * aty[0]) / det;
        Ok([x0, x1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn exact_line_is_recovered() {
        // y = 2 + 3x sampled at x = 0, 1, 2
        let a = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        let y = array![2.0, 5.0, 8.0];
        let [intercept, slope] = MatrixHelper::lstsq2(&a, &y).unwrap();
        assert!((intercept - 2.0).abs() < 1e-12);
        assert!((slope - 3.0).abs() < 1e-12);
    }

    #[test]
    fn overdetermined_noise_averages_out() {
        // constant block pulls the slope toward the mean of the y residuals
        let a = array![[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 1.0]];
        let y = array![1.0, 2.0, 0.9, 1.1];
        let [_, slope] = MatrixHelper::lstsq2(&a, &y).unwrap();
        assert!(slope > 0.9 && slope < 1.1);
    }

    #[test]
    fn singular_system_is_reported() {
        let a = array![[1.0, 1.0], [1.0, 1.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(
            MatrixHelper::lstsq2(&a, &y),
            Err(PipelineError::Internal(_))
        ));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let a = array![[1.0, 0.0, 0.0]];
        let y = array![1.0];
        assert!(MatrixHelper::lstsq2(&a, &y).is_err());
    }
}
