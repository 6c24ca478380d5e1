use faer::Mat;

use crate::{Config, NonLinearSystemError};

use super::Model;

#[derive(Debug)]
pub(crate) struct SuccessfulSolve {
    pub iterations: usize,
}

impl Model<'_> {
    /// Repeatedly take a least-squares Newton step `Δx = J⁺ · (-F(x))`
    /// until every residual is within tolerance.
    /// `current_values` holds the initial guesses, and is overwritten with each iterate.
    #[inline(never)]
    pub fn solve_gauss_newton(
        &mut self,
        current_values: &mut [f64],
        config: Config,
    ) -> Result<SuccessfulSolve, NonLinearSystemError> {
        assert_eq!(
            current_values.len(),
            self.layout().n_variables(),
            "Number of variables must match number of initial values"
        );
        let mut global_residual = vec![0.0; self.num_residuals()];
        let mut largest_absolute_elem = f64::INFINITY;

        for this_iteration in 0..config.max_iterations {
            self.residual(current_values, &mut global_residual);

            // Convergence check: if the residual is within our tolerance,
            // then the system is totally solved and we can return.
            largest_absolute_elem = max_abs(&global_residual);
            tracing::trace!(
                iteration = this_iteration,
                max_residual = largest_absolute_elem,
                "gauss-newton iteration"
            );
            if largest_absolute_elem <= config.convergence_tolerance {
                return Ok(SuccessfulSolve {
                    iterations: this_iteration,
                });
            }

            let j = self.jacobian(current_values);
            let step = pseudo_inverse_step(&j, &global_residual)?;
            debug_assert_eq!(step.len(), current_values.len());
            current_values
                .iter_mut()
                .zip(step)
                .for_each(|(curr_val, d)| {
                    *curr_val += d;
                });
        }
        Err(NonLinearSystemError::DidNotConverge {
            iterations: config.max_iterations,
            max_residual: largest_absolute_elem,
        })
    }
}

/// Largest absolute value. NaN counts as infinitely large, so it can never look converged.
fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, x| {
        if x.is_nan() {
            f64::INFINITY
        } else {
            libm::fmax(acc, x.abs())
        }
    })
}

/// Solve `J Δx = -F` in the least-squares, minimum-norm sense,
/// via the Moore-Penrose pseudo-inverse of `J`.
///
/// With `J = UΣVᵀ`, the pseudo-inverse is `VΣ⁺Uᵀ`, where `Σ⁺` inverts each
/// singular value above a cutoff and zeroes the rest. So
/// `Δx = Σₖ (Uₖ · -F / σₖ) Vₖ` over the singular values we keep.
pub(crate) fn pseudo_inverse_step(
    j: &Mat<f64>,
    residual: &[f64],
) -> Result<Vec<f64>, NonLinearSystemError> {
    let (m, n) = (j.nrows(), j.ncols());
    let mut step = vec![0.0; n];
    if m == 0 || n == 0 {
        return Ok(step);
    }

    let svd = j.svd().map_err(NonLinearSystemError::FaerSvd)?;
    let u = svd.U();
    let v = svd.V();
    let sigma = svd.S().column_vector();

    // Singular values this small are numerically zero,
    // scaled by machine epsilon and matrix size, as LAPACK recommends.
    let largest_singular_value = sigma.iter().copied().fold(0.0, libm::fmax);
    let cutoff = f64::EPSILON * (m.max(n) as f64) * largest_singular_value;

    for (k, &s) in sigma.iter().enumerate() {
        if s <= cutoff {
            continue;
        }
        let projection: f64 = (0..m).map(|row| u[(row, k)] * -residual[row]).sum();
        let scale = projection / s;
        for (col, step_col) in step.iter_mut().enumerate() {
            *step_col += scale * v[(col, k)];
        }
    }
    Ok(step)
}
