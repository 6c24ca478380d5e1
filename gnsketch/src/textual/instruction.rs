use crate::datatypes::Component;

use super::Label;

/// One line of the constraints section.
#[derive(Debug, PartialEq)]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum Instruction {
    /// `point p`
    DeclarePoint(DeclarePoint),
    /// `scalar d`
    DeclareScalar(DeclareScalar),
    /// `p.x = 0`
    FixPointComponent(FixPointComponent),
    /// `d = 4`
    FixScalar(FixScalar),
    /// `vertical(p, q)`
    Vertical(Vertical),
    /// `horizontal(p, q)`
    Horizontal(Horizontal),
    /// `distance(p, q, 2)` or `distance(p, q, d)`
    Distance(Distance),
    /// `congruent(p, q, r, s)`
    Congruent(LinePair),
    /// `parallel(p, q, r, s)`
    Parallel(LinePair),
    /// `perpendicular(p, q, r, s)`
    Perpendicular(LinePair),
}

/// How far apart two points should be.
#[derive(Debug, PartialEq)]
pub enum DistanceArg {
    /// A constant distance.
    Fixed(f64),
    /// Whatever value this scalar is solved to.
    Scalar(Label),
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct Distance {
    pub label: (Label, Label),
    pub distance: DistanceArg,
}

/// Two lines, each given by its two endpoints.
#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct LinePair {
    pub line0: (Label, Label),
    pub line1: (Label, Label),
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct Vertical {
    pub label: (Label, Label),
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct Horizontal {
    pub label: (Label, Label),
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct DeclarePoint {
    pub label: Label,
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct DeclareScalar {
    pub label: Label,
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct FixPointComponent {
    pub point: Label,
    pub component: Component,
    pub value: f64,
}

#[allow(missing_docs)]
#[derive(Debug, PartialEq)]
pub struct FixScalar {
    pub scalar: Label,
    pub value: f64,
}
