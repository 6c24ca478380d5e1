//! Finding degrees of freedom and assessing which variables are underconstrained.

use crate::{ComponentFreedom, Id, NonLinearSystemError, solver::Model};

impl Model<'_> {
    /// Analyse the Jacobian at these (presumably solved) values.
    pub fn freedom_analysis(
        &mut self,
        current_values: &[f64],
    ) -> Result<ComponentFreedom, NonLinearSystemError> {
        let j = self.jacobian(current_values);
        let nvars = self.layout().n_variables();
        debug_assert_eq!(nvars, j.ncols(), "Jacobian was malformed");
        if j.nrows() == 0 || nvars == 0 {
            return Ok(ComponentFreedom {
                num_variables: nvars,
                rank: 0,
                underconstrained: self.layout().variables().iter().copied().collect(),
            });
        }

        // SVD decomposes `J` into `J = UΣVᵀ`.
        let svd = j.svd().map_err(NonLinearSystemError::FaerSvd)?;

        // These are the 'singular values'.
        let sigma_col = svd.S().column_vector();
        let (m, n) = (j.nrows(), j.ncols());

        // The system is underconstrained if there's too many singular values
        // close to 0. Use the same cutoff as the solver's pseudo-inverse.
        let largest_singular_value = sigma_col.iter().copied().fold(0.0, libm::fmax);
        let tolerance = f64::EPSILON * (m.max(n) as f64) * largest_singular_value;
        let rank = sigma_col.iter().filter(|&&s| s > tolerance).count();

        // Columns rank..nvars of V span the null space: directions in which
        // the variables can move without changing any residual.
        // A variable's participation in those directions tells us whether it's free to move.
        let v = svd.V();
        let participation: Vec<f64> = (0..nvars)
            .map(|var| {
                let sum_sq: f64 = (rank..nvars).map(|k| v[(var, k)] * v[(var, k)]).sum();
                libm::sqrt(sum_sq)
            })
            .collect();
        let max_participation = participation.iter().copied().fold(0.0, libm::fmax);

        // Relative threshold, with an absolute floor so that numerical noise
        // from near-null directions doesn't mark a variable.
        let noise_floor = 10.0 * libm::sqrt(nvars as f64) * f64::EPSILON;
        let var_tol = libm::fmax(1e-3 * max_participation, noise_floor);

        let underconstrained: Vec<Id> = self
            .layout()
            .variables()
            .iter()
            .zip(&participation)
            .filter(|(_, p)| **p > var_tol)
            .map(|(id, _)| *id)
            .collect();

        Ok(ComponentFreedom {
            num_variables: nvars,
            rank,
            underconstrained,
        })
    }
}
