//! Geometry which can be constrained, and the solved values of that geometry.

/// Geometry as the solver sees it: IDs of variables.
pub mod inputs;
/// Geometry after solving: numbers.
pub mod outputs;

pub use inputs::{DatumLineSegment, DatumPoint, Feature};
pub(crate) use inputs::Datum;
pub use outputs::{Component, Point};
