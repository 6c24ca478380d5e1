use faer::linalg::svd::SvdError;

use crate::constraints::ConstraintKind;

/// Errors from parsing and executing gnsketch's textual representation.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum TextualError {
    /// The problem text couldn't be parsed.
    #[error("Could not parse line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What the parser expected.
        reason: String,
    },
    /// No initial guess was given for this label.
    #[error("No guess was given for {label}")]
    MissingGuess {
        /// The entity that didn't have any guesses
        label: String,
    },
    /// Guesses were given for labels which were never declared.
    #[error("You gave a guess for labels which weren't defined: {labels:?}")]
    UnusedGuesses {
        /// The entities you gave guesses for which weren't defined.
        labels: Vec<String>,
    },
    /// Two guesses were given for the same label.
    #[error("You gave more than one guess for {label}")]
    DuplicateGuess {
        /// The label guessed twice.
        label: String,
    },
    /// A label was declared twice.
    #[error("{label} was declared more than once")]
    DuplicateDeclaration {
        /// The label declared twice.
        label: String,
    },
    /// You referred to an entity that was never defined.
    #[error("You referred to {label} but it was never defined")]
    Undefined {
        /// The undefined label.
        label: String,
    },
    /// A label was used as the wrong kind of entity,
    /// e.g. a scalar where a point was expected.
    #[error("{label} is not a {expected}")]
    WrongKind {
        /// The label that was misused.
        label: String,
        /// What kind of entity was expected there.
        expected: &'static str,
    },
    /// The selected geometry can't be constrained this way.
    #[error(transparent)]
    Feature(#[from] FeatureError),
}

/// Errors from building a constraint out of selected geometry.
#[derive(thiserror::Error, Debug, PartialEq)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum FeatureError {
    /// The features don't fit this kind of constraint,
    /// e.g. a Parallel constraint given a point.
    #[error("A {kind} constraint cannot be built from {got}")]
    InvalidFeatures {
        /// Which constraint was being built.
        kind: ConstraintKind,
        /// Description of the features given.
        got: String,
    },
}

/// Errors that could occur when running the core Gauss-Newton solve.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum NonLinearSystemError {
    /// Solver did not find a solution within the allowed number of iterations.
    /// Either the constraints contradict each other, or the initial guesses
    /// are too far from any solution.
    #[error(
        "Could not find a solution in {iterations} iterations (largest residual was {max_residual:e})"
    )]
    DidNotConverge {
        /// How many iterations were tried.
        iterations: usize,
        /// Largest absolute residual at the last iterate.
        max_residual: f64,
    },
    /// Faer: could not decompose Jacobian.
    #[error("Something went wrong doing SVD in faer")]
    FaerSvd(SvdError),
}

impl NonLinearSystemError {
    /// Is this the "constraints can't be satisfied" failure,
    /// as opposed to some numeric breakdown?
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::DidNotConverge { .. })
    }
}
