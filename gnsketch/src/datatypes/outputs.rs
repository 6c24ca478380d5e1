//! The final solved values of various geometry.

use crate::{Variables, datatypes::inputs::DatumPoint, vector::V};

/// A 2D point that gnsketch solved for, i.e. found values for all its variables.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
}

/// Points can be easily converted to/from an (x, y) pair.
impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Points can be easily converted to/from an (x, y) pair.
impl From<Point> for (f64, f64) {
    fn from(Point { x, y }: Point) -> Self {
        (x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl Point {
    /// Read the current values of this point out of the arena.
    pub fn from_datum(point: &DatumPoint, variables: &Variables) -> Self {
        Self {
            x: variables.value(point.id_x()),
            y: variables.value(point.id_y()),
        }
    }

    /// Euclidean distance between two points.
    pub fn euclidean_distance(&self, r: Point) -> f64 {
        V::new(self.x, self.y).euclidean_distance(V::new(r.x, r.y))
    }
}

/// Component of a 2D point.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Component {
    /// Horizontal (X) component.
    X,
    /// Vertical (Y) component.
    Y,
}

impl Component {
    /// Which variable of this point holds this component?
    pub fn of(self, point: &DatumPoint) -> crate::Id {
        match self {
            Component::X => point.id_x(),
            Component::Y => point.id_y(),
        }
    }
}
