//! Geometric constraint solver for 2D sketches.
//! Finds values for points and scalars which satisfy every constraint,
//! starting from their current values.
//!
//! Constraints are split into groups which share no variables,
//! and each group is solved with the Gauss-Newton method.

pub use crate::analysis::{ComponentFreedom, FreedomAnalysis, SolveOutcomeFreedomAnalysis};
pub use crate::constraints::{Constraint, ConstraintKind};
pub use crate::error::{FeatureError, NonLinearSystemError, TextualError};
pub use crate::solve_outcome::{ComponentReport, FailureOutcome, SolveOutcome};
pub use crate::solver::Config;
pub use crate::variables::{Id, Variable, Variables};
pub use crate::warnings::{Warning, WarningContent};
use crate::solver::{Model, components::connected_components};

/// Numeric analysis of solved systems.
mod analysis;
/// Each kind of constraint we support.
mod constraints;
/// Geometric data (lines, points, etc).
pub mod datatypes;
mod error;
/// Data returned by the solver.
mod solve_outcome;
/// Numeric solver using dense matrices.
mod solver;
/// Parser for textual representation of these problems.
pub mod textual;
/// The unknowns being solved for.
mod variables;
mod vector;
/// Lints for suspicious constraints.
mod warnings;

/// Default convergence tolerance: a constraint is satisfied once its residual is this small.
const EPSILON: f64 = 1e-10;

/// Solve the constraints, using each variable's current value as the initial guess.
///
/// Constraints are grouped into connected components (constraints sharing a variable
/// are in the same component), and each component is solved in turn.
/// A solved component's variables are overwritten with the solution.
///
/// If a component fails, solving stops: components solved before it keep their new values,
/// and the failed component and every later component keep the values they had before.
///
/// Where the constraints allow several solutions, the solver converges to the one nearest
/// the initial guess. For example, with `pa` pinned at the origin, `pb` horizontal from it
/// and 2 units away, guessing `pb = (1, 0)` gives `(2, 0)` but guessing `pb = (-1, 0)`
/// gives `(-2, 0)`. So the sign of the result follows the sign of the guess.
pub fn solve(
    constraints: &[Constraint],
    variables: &mut Variables,
    config: Config,
) -> Result<SolveOutcome, FailureOutcome> {
    solve_components(constraints, variables, config, false).map(|(outcome, _)| outcome)
}

/// Just like [`solve`] except it also does some expensive analysis steps
/// at the end, to find how many degrees of freedom each component still has.
///
/// If analysing a solved component fails, its solution is still kept,
/// and the component is listed in [`FreedomAnalysis::unanalyzed`].
pub fn solve_with_analysis(
    constraints: &[Constraint],
    variables: &mut Variables,
    config: Config,
) -> Result<SolveOutcomeFreedomAnalysis, FailureOutcome> {
    solve_components(constraints, variables, config, true).map(|(outcome, analysis)| {
        SolveOutcomeFreedomAnalysis { analysis, outcome }
    })
}

fn solve_components(
    constraints: &[Constraint],
    variables: &mut Variables,
    config: Config,
    analyze: bool,
) -> Result<(SolveOutcome, FreedomAnalysis), FailureOutcome> {
    let warnings = warnings::lint(constraints);
    let mut reports = Vec::new();
    let mut analysis = FreedomAnalysis::default();

    for (component_idx, component) in connected_components(constraints).into_iter().enumerate() {
        let mut model = Model::new(component.iter().map(|&i| &constraints[i]).collect());
        let mut values: Vec<f64> = model
            .layout()
            .variables()
            .iter()
            .map(|id| variables.value(*id))
            .collect();
        let num_vars = values.len();
        let num_eqs = model.num_residuals();

        let result = model.solve_gauss_newton(&mut values, config);
        let solved = match result {
            Ok(solved) => solved,
            Err(error) => {
                tracing::warn!(
                    component = component_idx,
                    num_vars,
                    num_eqs,
                    "could not solve component: {error}"
                );
                return Err(FailureOutcome {
                    error,
                    failed_component: component_idx,
                    failed_constraints: component,
                    solved: reports,
                    warnings,
                });
            }
        };
        tracing::debug!(
            component = component_idx,
            num_vars,
            num_eqs,
            iterations = solved.iterations,
            "solved component"
        );

        if analyze {
            analysis.record(component_idx, model.freedom_analysis(&values));
        }
        for (id, value) in model.layout().variables().iter().zip(values) {
            variables.set_value(*id, value);
        }
        reports.push(ComponentReport {
            constraints: component,
            num_vars,
            num_eqs,
            iterations: solved.iterations,
        });
    }

    Ok((
        SolveOutcome {
            components: reports,
            warnings,
        },
        analysis,
    ))
}
