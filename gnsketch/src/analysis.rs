use crate::{Id, NonLinearSystemError, SolveOutcome};

/// How free one component's variables are to move, once solved.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFreedom {
    /// How many variables the component has.
    pub num_variables: usize,
    /// Rank of the Jacobian at the solution.
    pub rank: usize,
    /// Variables which could move without violating any constraint.
    pub underconstrained: Vec<Id>,
}

impl ComponentFreedom {
    /// How many independent directions could the variables move in,
    /// without violating any constraint?
    pub fn degrees_of_freedom(&self) -> usize {
        self.num_variables - self.rank
    }

    /// Could any variable move without violating any constraint?
    pub fn is_underconstrained(&self) -> bool {
        self.degrees_of_freedom() > 0
    }
}

/// Freedom of every component of a solved system.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct FreedomAnalysis {
    /// One entry per analysed component, in the same order as [`SolveOutcome::components`].
    pub components: Vec<ComponentFreedom>,
    /// Components which were solved, but whose analysis failed.
    pub unanalyzed: Vec<usize>,
}

impl FreedomAnalysis {
    /// Keep this component's analysis, or note that it couldn't be analysed.
    pub(crate) fn record(
        &mut self,
        component: usize,
        result: Result<ComponentFreedom, NonLinearSystemError>,
    ) {
        match result {
            Ok(freedom) => self.components.push(freedom),
            Err(error) => {
                tracing::warn!(component, "could not analyse solved component: {error}");
                self.unanalyzed.push(component);
            }
        }
    }

    /// Total degrees of freedom across all components.
    pub fn degrees_of_freedom(&self) -> usize {
        self.components
            .iter()
            .map(ComponentFreedom::degrees_of_freedom)
            .sum()
    }

    /// Could any variable move without violating any constraint?
    pub fn is_underconstrained(&self) -> bool {
        self.components
            .iter()
            .any(ComponentFreedom::is_underconstrained)
    }

    /// Every underconstrained variable, component by component.
    pub fn underconstrained(&self) -> impl Iterator<Item = Id> + '_ {
        self.components
            .iter()
            .flat_map(|c| c.underconstrained.iter().copied())
    }
}

/// Just like [`SolveOutcome`] except it also contains the result of
/// expensive numeric analysis on the final solved system.
#[derive(Debug)]
pub struct SolveOutcomeFreedomAnalysis {
    /// Extra analysis for the system,
    /// which is probably expensive to compute.
    pub analysis: FreedomAnalysis,
    /// Other data.
    pub outcome: SolveOutcome,
}

impl AsRef<SolveOutcome> for SolveOutcomeFreedomAnalysis {
    fn as_ref(&self) -> &SolveOutcome {
        &self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freedom(rank: usize) -> ComponentFreedom {
        ComponentFreedom {
            num_variables: 2,
            rank,
            underconstrained: if rank < 2 { vec![7] } else { Vec::new() },
        }
    }

    #[test]
    fn failed_analysis_is_skipped() {
        let mut analysis = FreedomAnalysis::default();
        analysis.record(0, Ok(freedom(2)));
        analysis.record(
            1,
            Err(NonLinearSystemError::DidNotConverge {
                iterations: 0,
                max_residual: f64::NAN,
            }),
        );
        analysis.record(2, Ok(freedom(1)));

        assert_eq!(analysis.components, vec![freedom(2), freedom(1)]);
        assert_eq!(analysis.unanalyzed, vec![1]);
        assert_eq!(analysis.degrees_of_freedom(), 1);
        assert_eq!(analysis.underconstrained().collect::<Vec<_>>(), vec![7]);
    }
}
