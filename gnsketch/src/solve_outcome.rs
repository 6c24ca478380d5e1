use crate::{NonLinearSystemError, Warning};

/// What happened when one connected component was solved.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentReport {
    /// Indices (into the constraints given to `solve`) of this component's constraints,
    /// in the order they were solved.
    pub constraints: Vec<usize>,
    /// How many variables the component involves.
    pub num_vars: usize,
    /// How many residual rows the component has.
    pub num_eqs: usize,
    /// How many Gauss-Newton steps it took.
    /// 0 if the variables already satisfied every constraint.
    pub iterations: usize,
}

/// Data from a successful solved system.
#[derive(Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub struct SolveOutcome {
    /// One report per connected component, in solve order.
    pub(crate) components: Vec<ComponentReport>,
    /// Anything that looks wrong in the problem definition.
    pub(crate) warnings: Vec<Warning>,
}

impl SolveOutcome {
    /// One report per connected component, in solve order.
    pub fn components(&self) -> &[ComponentReport] {
        &self.components
    }

    /// Total Gauss-Newton steps, summed over every component.
    pub fn iterations(&self) -> usize {
        self.components.iter().map(|c| c.iterations).sum()
    }

    /// The most Gauss-Newton steps any one component needed.
    pub fn max_iterations(&self) -> usize {
        self.components
            .iter()
            .map(|c| c.iterations)
            .max()
            .unwrap_or(0)
    }

    /// Anything that looks wrong in the problem definition.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Returned when gnsketch could not solve a system.
#[derive(Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub struct FailureOutcome {
    /// The error that stopped the system from being solved.
    pub error: NonLinearSystemError,
    /// Which component (in solve order) failed.
    pub failed_component: usize,
    /// Indices of the constraints in the failed component.
    pub failed_constraints: Vec<usize>,
    /// Components before the failed one, which were solved and written back.
    pub solved: Vec<ComponentReport>,
    /// Other warnings which might have contributed,
    /// or might be suboptimal for other reasons.
    pub warnings: Vec<Warning>,
}

impl FailureOutcome {
    /// The error that stopped the system from being solved.
    pub fn error(&self) -> &NonLinearSystemError {
        &self.error
    }

    /// Which component (in solve order) failed.
    pub fn failed_component(&self) -> usize {
        self.failed_component
    }

    /// Indices of the constraints in the failed component.
    pub fn failed_constraints(&self) -> &[usize] {
        &self.failed_constraints
    }

    /// How many components were solved before the failure.
    pub fn num_solved(&self) -> usize {
        self.solved.len()
    }

    /// Other warnings which might have contributed,
    /// or might be suboptimal for other reasons.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

impl std::fmt::Display for FailureOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "component {} (constraints {:?}) failed: {}",
            self.failed_component, self.failed_constraints, self.error
        )
    }
}

impl std::error::Error for FailureOutcome {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(iterations: usize) -> ComponentReport {
        ComponentReport {
            constraints: vec![0],
            num_vars: 1,
            num_eqs: 1,
            iterations,
        }
    }

    #[test]
    fn iteration_totals() {
        let so = SolveOutcome {
            components: vec![report(3), report(0), report(5)],
            warnings: Vec::new(),
        };
        assert_eq!(so.iterations(), 8);
        assert_eq!(so.max_iterations(), 5);

        let empty = SolveOutcome {
            components: Vec::new(),
            warnings: Vec::new(),
        };
        assert_eq!(empty.iterations(), 0);
        assert_eq!(empty.max_iterations(), 0);
    }
}
