//! A small text format for writing down constraint problems.
//!
//! ```text
//! # constraints
//! point p
//! point q
//! p.x = 0
//! p.y = 0
//! horizontal(p, q)
//! distance(p, q, 2)
//!
//! # guesses
//! p roughly (0, 0)
//! q roughly (1, 0)
//! ```

mod executor;
mod instruction;
mod parser;

use std::str::FromStr;

pub use executor::{ConstraintSystem, Outcome};
pub use instruction::{
    DeclarePoint, DeclareScalar, Distance, DistanceArg, FixPointComponent, FixScalar, Horizontal,
    Instruction, LinePair, Vertical,
};

use crate::{TextualError, datatypes::Point};

/// Initial guess for a point's position.
#[derive(Debug, PartialEq)]
pub struct PointGuess {
    /// Which point.
    pub point: Label,
    /// Where it probably is.
    pub guess: Point,
}

/// Initial guess for a scalar's value.
#[derive(Debug, PartialEq)]
pub struct ScalarGuess {
    /// Which scalar.
    pub scalar: Label,
    /// What it probably is.
    pub guess: f64,
}

/// A parsed problem: declarations, constraints and initial guesses.
#[derive(Debug)]
pub struct Problem {
    /// Every line of the constraints section, in order.
    pub instructions: Vec<Instruction>,
    /// Declared points, in declaration order.
    pub inner_points: Vec<Label>,
    /// Declared scalars, in declaration order.
    pub inner_scalars: Vec<Label>,
    /// Guesses for where each point is.
    pub point_guesses: Vec<PointGuess>,
    /// Guesses for what each scalar is.
    pub scalar_guesses: Vec<ScalarGuess>,
}

impl FromStr for Problem {
    type Err = TextualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Name of a point or scalar.
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct Label(pub(crate) String);

impl Label {
    /// The label's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        &self.0 == other
    }
}

impl PartialEq<String> for Label {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Problem {
    /// Labels of every declared point.
    pub fn points(&self) -> &[Label] {
        &self.inner_points
    }

    /// Labels of every declared scalar.
    pub fn scalars(&self) -> &[Label] {
        &self.inner_scalars
    }
}
