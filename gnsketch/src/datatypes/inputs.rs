//! Geometric entities that can be constrained and solved by gnsketch.

use crate::{Id, Variables};

pub(crate) trait Datum {
    fn all_variables(&self) -> impl IntoIterator<Item = Id>;
}

/// 2D point, whose position can be determined by the constraint solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct DatumPoint {
    /// ID of the variable for this point's X component.
    pub x_id: Id,
    /// ID of the variable for this point's Y component.
    pub y_id: Id,
}

impl DatumPoint {
    /// Create a new `DatumPoint`, adding its two variables to the arena
    /// with these initial guesses.
    pub fn new(variables: &mut Variables, x: f64, y: f64) -> Self {
        Self {
            x_id: variables.push(x),
            y_id: variables.push(y),
        }
    }

    /// Like [`DatumPoint::new`] but the variables are named `{name}.x` and `{name}.y`.
    pub fn named(variables: &mut Variables, name: &str, x: f64, y: f64) -> Self {
        Self {
            x_id: variables.push_named(format!("{name}.x"), x),
            y_id: variables.push_named(format!("{name}.y"), y),
        }
    }

    /// Create a new `DatumPoint` with these specific IDs.
    pub fn new_xy(x: Id, y: Id) -> Self {
        Self { x_id: x, y_id: y }
    }

    /// Id for the X component of the point.
    #[inline(always)]
    pub fn id_x(&self) -> Id {
        self.x_id
    }

    /// Id for the Y component of the point.
    #[inline(always)]
    pub fn id_y(&self) -> Id {
        self.y_id
    }
}

impl Datum for DatumPoint {
    fn all_variables(&self) -> impl IntoIterator<Item = Id> {
        [self.id_x(), self.id_y()]
    }
}

/// Finite segment of a line.
/// It has two points, one at each end, and those points
/// can be determined by the constraint solver.
/// Its direction is `p1 - p0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct DatumLineSegment {
    /// Point for one end of this line.
    pub p0: DatumPoint,
    /// Point for the other end of this line.
    pub p1: DatumPoint,
}

impl DatumLineSegment {
    /// Create a new `LineSegment`.
    pub fn new(p0: DatumPoint, p1: DatumPoint) -> Self {
        Self { p0, p1 }
    }

    /// Both ends are literally the same point (same variables),
    /// so this line can never have a length.
    pub fn is_degenerate(&self) -> bool {
        self.p0 == self.p1
    }
}

impl Datum for DatumLineSegment {
    fn all_variables(&self) -> impl IntoIterator<Item = Id> {
        [
            self.p0.id_x(),
            self.p0.id_y(),
            self.p1.id_x(),
            self.p1.id_y(),
        ]
    }
}

/// Something a user could select in a sketch and then constrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    /// A single point.
    Point(DatumPoint),
    /// A line between two points.
    Line(DatumLineSegment),
}

impl From<DatumPoint> for Feature {
    fn from(value: DatumPoint) -> Self {
        Self::Point(value)
    }
}

impl From<DatumLineSegment> for Feature {
    fn from(value: DatumLineSegment) -> Self {
        Self::Line(value)
    }
}
