use faer::Mat;
use indexmap::IndexSet;

use crate::{Constraint, Id, constraints::JacobianVar};

/// Splitting constraints into independent groups.
pub(crate) mod components;
/// Degrees of freedom of a solved component.
mod find_dof;
/// The Gauss-Newton iteration itself.
mod newton;

// Roughly. Most constraints will only involve roughly 4 variables.
// May as well round up to the nearest power of 2.
const NONZEROES_PER_ROW: usize = 8;

/// Tunable parameters of the Gauss-Newton solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Give up on a component after this many steps.
    pub max_iterations: usize,
    /// A component is solved once every residual's absolute value is at most this.
    pub convergence_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_tolerance: crate::EPSILON,
        }
    }
}

impl Config {
    /// Change the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Change how small the residuals must get.
    pub fn with_convergence_tolerance(mut self, convergence_tolerance: f64) -> Self {
        self.convergence_tolerance = convergence_tolerance;
        self
    }
}

/// Maps each variable in a component to its column of the Jacobian
/// (and its position in the vector of current values).
#[derive(Debug, Default)]
pub struct Layout {
    /// One variable per column of the matrix, in first-seen order.
    columns: IndexSet<Id>,
}

impl Layout {
    /// Columns for every variable of these constraints,
    /// ordered by first appearance (constraint order, then each constraint's variable order).
    pub fn from_constraints<'a>(constraints: impl IntoIterator<Item = &'a Constraint>) -> Self {
        let mut columns = IndexSet::new();
        let mut scratch = Vec::with_capacity(NONZEROES_PER_ROW);
        for constraint in constraints {
            scratch.clear();
            constraint.nonzeroes(&mut scratch);
            columns.extend(scratch.iter().copied());
        }
        Self { columns }
    }

    /// Which column does this variable belong in?
    /// Panics if the variable isn't part of this layout, which means the
    /// layout was built from different constraints than it's being used with.
    pub fn index_of(&self, var: Id) -> usize {
        match self.columns.get_index_of(&var) {
            Some(col) => col,
            None => panic!("variable {var} is not part of this layout"),
        }
    }

    /// Number of columns.
    pub fn n_variables(&self) -> usize {
        self.columns.len()
    }

    /// Every variable, in column order.
    pub fn variables(&self) -> &IndexSet<Id> {
        &self.columns
    }
}

/// One independent group of constraints, ready to be solved.
pub(crate) struct Model<'c> {
    layout: Layout,
    constraints: Vec<&'c Constraint>,
    /// Equivalent to number of rows in the matrix being solved.
    num_residuals: usize,
    row_scratch: Vec<JacobianVar>,
    residual_scratch: Vec<f64>,
}

impl<'c> Model<'c> {
    pub fn new(constraints: Vec<&'c Constraint>) -> Self {
        /*
        The Jacobian is a matrix where
            each row is one of the residual functions,
            each column is a variable,
            each cell is the partial derivative of that row's residual
            with respect to that column's variable.
        */
        let layout = Layout::from_constraints(constraints.iter().copied());
        let num_residuals = constraints.iter().map(|c| c.residual_dim()).sum();
        Self {
            layout,
            constraints,
            num_residuals,
            row_scratch: Vec::with_capacity(NONZEROES_PER_ROW),
            residual_scratch: Vec::with_capacity(1),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn num_residuals(&self) -> usize {
        self.num_residuals
    }

    /// Compute the residual F, figuring out how close the problem is to being solved.
    /// Rows are stacked in constraint order.
    pub fn residual(&mut self, current_assignments: &[f64], out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.num_residuals);
        let mut row_num = 0;
        for constraint in &self.constraints {
            self.residual_scratch.clear();
            constraint.residual(&self.layout, current_assignments, &mut self.residual_scratch);
            debug_assert_eq!(
                self.residual_scratch.len(),
                constraint.residual_dim(),
                "Constraint {} should have {} residuals but actually had {}",
                constraint.constraint_kind(),
                constraint.residual_dim(),
                self.residual_scratch.len(),
            );
            for residual in self.residual_scratch.iter().copied() {
                out[row_num] = residual;
                row_num += 1;
            }
        }
    }

    /// Build the dense Jacobian at these values.
    pub fn jacobian(&mut self, current_assignments: &[f64]) -> Mat<f64> {
        let mut jac = Mat::<f64>::zeros(self.num_residuals, self.layout.n_variables());
        let mut first_row = 0;
        for constraint in &self.constraints {
            self.row_scratch.clear();
            constraint.jacobian(&self.layout, current_assignments, &mut self.row_scratch);
            for jacobian_var in &self.row_scratch {
                debug_assert!(jacobian_var.row < constraint.residual_dim());
                let col = self.layout.index_of(jacobian_var.id);
                // Variables appearing twice in a constraint get both partials summed.
                jac[(first_row + jacobian_var.row, col)] += jacobian_var.partial_derivative;
            }
            first_row += constraint.residual_dim();
        }
        jac
    }
}
